pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod counter;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use backend::{BackendError, Credential, CredentialSource, HttpStatsBackend, StatsBackend};
pub use config::Config;
pub use counter::{ClickCounter, CounterNotice, CounterState, CounterView, SyncPhase};
pub use state::AppState;
pub use storage::load_data;
