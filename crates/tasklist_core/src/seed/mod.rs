//! One-shot initial population for an empty task list.
//!
//! # Responsibility
//! - Define the seed loader contract used by `TaskStore::initialize`.
//! - Map remote records into `Task` values with a bounded count.
//!
//! # Invariants
//! - Loaders never return more than their configured limit.
//! - Loaders do not retry; a failure is terminal for that call.
//! - Remote ids are kept verbatim as task ids.

use crate::model::task::Task;
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod http;

pub use http::{HttpSeedLoader, SeedConfig, DEFAULT_SEED_ENDPOINT, DEFAULT_SEED_TIMEOUT};

/// Maximum number of tasks a seed may contribute.
pub const SEED_LIMIT: usize = 5;

pub type SeedResult<T> = Result<T, SeedUnavailable>;

/// The seed source could not produce tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedUnavailable {
    /// Connection, DNS, TLS or timeout failure.
    Transport(String),
    /// Remote answered with a non-success status.
    Status(u16),
    /// Response body was not the expected JSON array.
    InvalidBody(String),
    /// Seeding is switched off for this loader.
    Disabled,
}

impl Display for SeedUnavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "seed transport failed: {message}"),
            Self::Status(code) => write!(f, "seed source returned status {code}"),
            Self::InvalidBody(message) => write!(f, "seed body is invalid: {message}"),
            Self::Disabled => write!(f, "seeding is disabled"),
        }
    }
}

impl Error for SeedUnavailable {}

/// Source of the initial task list.
pub trait SeedLoader {
    fn load(&self) -> SeedResult<Vec<Task>>;
}

impl<T: SeedLoader + ?Sized> SeedLoader for &T {
    fn load(&self) -> SeedResult<Vec<Task>> {
        (**self).load()
    }
}

/// Loader returning a fixed list, truncated to [`SEED_LIMIT`].
#[derive(Debug, Clone, Default)]
pub struct StaticSeedLoader {
    tasks: Vec<Task>,
}

impl StaticSeedLoader {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl SeedLoader for StaticSeedLoader {
    fn load(&self) -> SeedResult<Vec<Task>> {
        Ok(self.tasks.iter().take(SEED_LIMIT).cloned().collect())
    }
}

/// Loader that always fails; used for offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSeedLoader;

impl SeedLoader for DisabledSeedLoader {
    fn load(&self) -> SeedResult<Vec<Task>> {
        Err(SeedUnavailable::Disabled)
    }
}

/// Remote id as it appears on the wire: JSON number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Number(u64),
    Text(String),
}

/// Remote record shape. Extra fields (e.g. `userId`) are ignored.
#[derive(Debug, Clone, Deserialize)]
struct RemoteTask {
    id: RemoteId,
    title: String,
    #[serde(default)]
    completed: Option<bool>,
}

/// Decodes a seed response body into at most `limit` tasks.
///
/// # Contract
/// - Body must be a JSON array; anything else is `InvalidBody`.
/// - Each element is decoded on its own. Elements that are not records with
///   a string or non-negative integer `id` and a string `title` are skipped.
/// - Records with blank ids, invalid titles or a repeated id are skipped.
/// - A missing or null `completed` reads as `false`.
/// - Order of the remaining records is preserved; the limit applies last.
pub fn parse_seed_body(body: &str, limit: usize) -> SeedResult<Vec<Task>> {
    let elements: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|err| SeedUnavailable::InvalidBody(err.to_string()))?;
    let total = elements.len();
    let records: Vec<RemoteTask> = elements
        .into_iter()
        .filter_map(|element| serde_json::from_value(element).ok())
        .collect();
    if records.len() < total {
        debug!(
            "event=seed_decode module=seed status=partial skipped={}",
            total - records.len()
        );
    }
    Ok(map_remote_records(records, limit))
}

fn map_remote_records(records: Vec<RemoteTask>, limit: usize) -> Vec<Task> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|record| {
            let id = match record.id {
                RemoteId::Number(value) => value.to_string(),
                RemoteId::Text(value) => value,
            };
            let task = Task::new(id, record.title)
                .with_completed(record.completed.unwrap_or(false));
            task.validate().ok()?;
            Some(task)
        })
        .filter(|task| seen.insert(task.id.clone()))
        .take(limit)
        .collect()
}
