use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route(
            "/api/quack",
            get(handlers::get_quacks).post(handlers::post_quack),
        )
        .with_state(state)
}
