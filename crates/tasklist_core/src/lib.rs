//! Core state management for the task list.
//! This crate owns the ordered task collection, its persistence and its
//! one-time remote seed.

pub mod logging;
pub mod model;
pub mod seed;
pub mod service;
pub mod storage;

pub use logging::{active_logging, init_logging, LogLevel, LoggingConfig};
pub use model::task::{Task, TaskId, TaskValidationError, MAX_TITLE_CHARS};
pub use seed::{
    DisabledSeedLoader, HttpSeedLoader, SeedConfig, SeedLoader, SeedResult, SeedUnavailable,
    StaticSeedLoader, SEED_LIMIT,
};
pub use service::task_store::{
    IdGenerator, LoadOrigin, StoreError, StoreResult, TaskStore, UuidIdGenerator, TASKS_KEY,
};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
