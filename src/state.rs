use crate::models::AppData;
use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Instant};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub tokens: Arc<HashMap<String, String>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, tokens: HashMap<String, String>) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            tokens: Arc::new(tokens),
            started_at: Instant::now(),
        }
    }

    pub fn user_for_token(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }
}
