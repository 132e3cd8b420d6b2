use crate::errors::AppError;
use crate::state::AppState;
use axum::http::{header::AUTHORIZATION, HeaderMap};

pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    let token = bearer_token(headers).ok_or_else(|| {
        AppError::unauthorized("UNAUTHORIZED", "Missing or invalid authorization header")
    })?;

    state
        .user_for_token(token)
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::unauthorized("INVALID_TOKEN", "Invalid or expired authentication token")
        })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use axum::http::{HeaderValue, StatusCode};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn state() -> AppState {
        let tokens = HashMap::from([("good-token".to_string(), "user-1".to_string())]);
        AppState::new(PathBuf::from("unused.json"), AppData::default(), tokens)
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn known_token_resolves_user() {
        let user = authenticate(&state(), &headers("Bearer good-token")).unwrap();
        assert_eq!(user, "user-1");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = authenticate(&state(), &HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    #[test]
    fn non_bearer_scheme_is_unauthorized() {
        let err = authenticate(&state(), &headers("Basic good-token")).unwrap_err();
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    #[test]
    fn unknown_token_is_invalid() {
        let err = authenticate(&state(), &headers("Bearer nope")).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "INVALID_TOKEN");
    }
}
