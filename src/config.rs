use std::{collections::HashMap, env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/quacks.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Bearer token -> user id.
    pub tokens: HashMap<String, String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let tokens = env::var("APP_TOKENS")
            .map(|raw| parse_tokens(&raw))
            .unwrap_or_default();

        Self {
            port,
            data_path: resolve_data_path(),
            tokens,
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_DATA_PATH)
}

/// Parses `token:user_id` pairs separated by commas.
pub fn parse_tokens(raw: &str) -> HashMap<String, String> {
    let mut tokens = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        match entry.split_once(':') {
            Some((token, user)) if !token.trim().is_empty() && !user.trim().is_empty() => {
                tokens.insert(token.trim().to_string(), user.trim().to_string());
            }
            _ => warn!("skipping malformed APP_TOKENS entry"),
        }
    }
    tokens
}
