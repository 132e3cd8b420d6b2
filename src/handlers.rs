use crate::auth::authenticate;
use crate::errors::AppError;
use crate::models::{HealthResponse, QuackRequest, QuackStats};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Html,
    Json,
};
use chrono::Utc;
use tracing::{debug, error};

pub async fn index() -> Html<String> {
    Html(render_index())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

pub async fn get_quacks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<QuackStats>, AppError> {
    let user_id = authenticate(&state, &headers)?;
    let data = state.data.lock().await;
    data.users
        .get(&user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("Quack stats not found"))
}

pub async fn post_quack(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<QuackStats>, AppError> {
    let user_id = authenticate(&state, &headers)?;
    let request = parse_request(&body)?;

    check_claimed_user(&request, &user_id)?;

    let increment = match request.increment {
        None => 1,
        Some(value) if value > 0 => value as u64,
        Some(_) => return Err(AppError::bad_request("increment must be a positive integer")),
    };

    let stats = apply_increment(&state, &user_id, increment).await?;
    Ok(Json(stats))
}

fn check_claimed_user(request: &QuackRequest, user_id: &str) -> Result<(), AppError> {
    match request.user_id.as_deref().filter(|id| !id.is_empty()) {
        Some(claimed) if claimed != user_id => Err(AppError::forbidden("User ID mismatch")),
        _ => Ok(()),
    }
}

fn parse_request(body: &[u8]) -> Result<QuackRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(QuackRequest::default());
    }
    serde_json::from_slice(body).map_err(|_| AppError::bad_request("Invalid request body"))
}

async fn apply_increment(
    state: &AppState,
    user_id: &str,
    increment: u64,
) -> Result<QuackStats, AppError> {
    let now = Utc::now();
    let mut data = state.data.lock().await;
    let updated = {
        let entry = data
            .users
            .entry(user_id.to_string())
            .or_insert_with(|| QuackStats::new(user_id, now));
        entry.total_quacks = entry.total_quacks.saturating_add(increment);
        entry.last_quack_at = Some(now);
        entry.updated_at = now;
        entry.clone()
    };

    if let Err(err) = persist_data(&state.data_path, &data).await {
        error!("failed to persist quack stats: {}", err.message);
        return Err(err);
    }

    debug!(user_id, increment, total = updated.total_quacks, "quacks recorded");
    Ok(updated)
}
