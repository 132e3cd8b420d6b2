//! The stats service seam used by [`ClickCounter`](crate::counter::ClickCounter).
//!
//! [`StatsBackend`] persists an increment and answers with the authoritative
//! counter snapshot. [`HttpStatsBackend`] talks to this crate's own
//! `/api/quack` endpoint.

use crate::counter::CounterState;
use crate::models::{ErrorBody, QuackStats};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Supplies the credential for each sync attempt. `None` means a guest session.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

impl<F> CredentialSource for F
where
    F: Fn() -> Option<Credential> + Send + Sync,
{
    fn credential(&self) -> Option<Credential> {
        self()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait StatsBackend: Send + Sync {
    async fn increment(
        &self,
        credential: &Credential,
        amount: u64,
    ) -> Result<CounterState, BackendError>;
}

#[derive(Serialize)]
struct IncrementBody {
    increment: u64,
}

const FALLBACK_MESSAGE: &str = "Failed to sync quacks";

#[derive(Clone)]
pub struct HttpStatsBackend {
    client: Client,
    base_url: String,
}

impl HttpStatsBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl StatsBackend for HttpStatsBackend {
    async fn increment(
        &self,
        credential: &Credential,
        amount: u64,
    ) -> Result<CounterState, BackendError> {
        let response = self
            .client
            .post(format!("{}/api/quack", self.base_url))
            .bearer_auth(credential.as_str())
            .json(&IncrementBody { increment: amount })
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .map(|body| body.error)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let stats: QuackStats = serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        Ok(stats.into())
    }
}
