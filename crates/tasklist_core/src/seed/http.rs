//! HTTP seed loader.
//!
//! # Invariants
//! - Exactly one GET per `load` call, bounded by `SeedConfig::timeout`.
//! - Non-2xx responses map to `SeedUnavailable::Status`.

use super::{parse_seed_body, SeedLoader, SeedResult, SeedUnavailable, SEED_LIMIT};
use crate::model::task::Task;
use log::{info, warn};
use std::time::{Duration, Instant};

pub const DEFAULT_SEED_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/todos";
pub const DEFAULT_SEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`HttpSeedLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub endpoint: String,
    /// Clamped to [`SEED_LIMIT`] at load time.
    pub limit: usize,
    pub timeout: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEED_ENDPOINT.to_string(),
            limit: SEED_LIMIT,
            timeout: DEFAULT_SEED_TIMEOUT,
        }
    }
}

impl SeedConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

/// Blocking HTTP loader for the remote todo feed.
#[derive(Debug, Clone)]
pub struct HttpSeedLoader {
    config: SeedConfig,
}

impl HttpSeedLoader {
    pub fn new(config: SeedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    fn fetch_body(&self) -> SeedResult<String> {
        let response = ureq::get(&self.config.endpoint)
            .set("Accept", "application/json")
            .timeout(self.config.timeout)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => SeedUnavailable::Status(code),
                ureq::Error::Transport(transport) => {
                    SeedUnavailable::Transport(transport.to_string())
                }
            })?;

        response
            .into_string()
            .map_err(|err| SeedUnavailable::Transport(err.to_string()))
    }
}

impl Default for HttpSeedLoader {
    fn default() -> Self {
        Self::new(SeedConfig::default())
    }
}

impl SeedLoader for HttpSeedLoader {
    fn load(&self) -> SeedResult<Vec<Task>> {
        let started_at = Instant::now();
        let limit = self.config.limit.min(SEED_LIMIT);

        let result = self
            .fetch_body()
            .and_then(|body| parse_seed_body(&body, limit));

        match &result {
            Ok(tasks) => info!(
                "event=seed_fetch module=seed status=ok count={} duration_ms={}",
                tasks.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=seed_fetch module=seed status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }

        result
    }
}
