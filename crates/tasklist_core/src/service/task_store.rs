//! Task store: canonical ordered task collection.
//!
//! # Responsibility
//! - Own the ordered task list and its mutation API.
//! - Persist the full list under one key after every effective mutation.
//! - Fall back to the seed loader once when no usable persisted state exists.
//!
//! # Invariants
//! - Task ids are unique within the collection.
//! - Collection order is display order and survives a persist/reload cycle.
//! - In-memory state only changes after the matching write succeeded.
//! - Operations on absent ids are no-ops, never errors.

use crate::model::task::{validate_title, Task, TaskId, TaskValidationError};
use crate::seed::{SeedLoader, SEED_LIMIT};
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Storage key holding the serialized task list.
pub const TASKS_KEY: &str = "tasks";

const MAX_ID_ATTEMPTS: usize = 8;

pub type StoreResult<T> = Result<T, StoreError>;

/// Task store failures visible to callers.
#[derive(Debug)]
pub enum StoreError {
    /// Storage read or write failed; the in-memory list is unchanged.
    PersistenceUnavailable(StorageError),
    /// Caller supplied an unusable title.
    InvalidTask(TaskValidationError),
    /// The id generator kept returning ids already in use.
    DuplicateId(TaskId),
    /// The list could not be serialized.
    Encode(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersistenceUnavailable(err) => write!(f, "persistence unavailable: {err}"),
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "generated task id already in use: {id}"),
            Self::Encode(message) => write!(f, "failed to encode task list: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PersistenceUnavailable(err) => Some(err),
            Self::InvalidTask(err) => Some(err),
            Self::DuplicateId(_) | Self::Encode(_) => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::PersistenceUnavailable(value)
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

/// Source of fresh task ids.
///
/// The store rejects ids held by a live task or removed during its own
/// lifetime. Uniqueness across sessions is the generator's job.
pub trait IdGenerator {
    fn next_id(&mut self) -> TaskId;
}

/// Random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> TaskId {
        Uuid::new_v4().to_string()
    }
}

impl<F: FnMut() -> TaskId> IdGenerator for F {
    fn next_id(&mut self) -> TaskId {
        self()
    }
}

/// Where the initial list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Persisted,
    Seeded,
    /// No persisted state and the seed failed.
    Empty,
}

/// Ordered task collection backed by a key-value store.
///
/// A value of this type only exists after initialization has settled, so
/// every operation observes the loaded or seeded list.
pub struct TaskStore<S: KeyValueStore, G: IdGenerator> {
    storage: S,
    ids: G,
    tasks: Vec<Task>,
    /// Ids removed since initialization; never handed out again.
    retired: HashSet<TaskId>,
    origin: LoadOrigin,
}

impl<S: KeyValueStore, G: IdGenerator> TaskStore<S, G> {
    /// Loads persisted tasks, or seeds and persists when none are usable.
    ///
    /// # Contract
    /// - Reads [`TASKS_KEY`] once.
    /// - Malformed persisted data is treated as absent.
    /// - A failed seed yields an empty, usable store and writes nothing.
    ///
    /// # Errors
    /// - `PersistenceUnavailable` when the read or the seed write fails.
    pub fn initialize(storage: S, ids: G, seed: impl SeedLoader) -> StoreResult<Self> {
        let persisted = storage.get(TASKS_KEY)?;

        if let Some(tasks) = persisted.as_deref().and_then(decode_persisted) {
            info!(
                "event=store_init module=service status=ok origin=persisted count={}",
                tasks.len()
            );
            return Ok(Self {
                storage,
                ids,
                tasks,
                retired: HashSet::new(),
                origin: LoadOrigin::Persisted,
            });
        }

        let (tasks, origin) = match seed.load() {
            Ok(seeded) => {
                let tasks = sanitize_seed(seeded);
                storage.set(TASKS_KEY, &encode(&tasks)?)?;
                (tasks, LoadOrigin::Seeded)
            }
            Err(err) => {
                warn!("event=store_init module=service status=degraded origin=empty error={err}");
                (Vec::new(), LoadOrigin::Empty)
            }
        };

        info!(
            "event=store_init module=service status=ok origin={:?} count={}",
            origin,
            tasks.len()
        );
        Ok(Self {
            storage,
            ids,
            tasks,
            retired: HashSet::new(),
            origin,
        })
    }

    /// Returns a snapshot of the list in display order.
    pub fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.position(id).map(|index| self.tasks[index].clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    /// Creates an incomplete task at the front of the list.
    ///
    /// The title is trimmed before storage.
    ///
    /// # Errors
    /// - `InvalidTask` for empty, whitespace-only or over-long titles.
    /// - `DuplicateId` when no fresh id could be generated.
    /// - `PersistenceUnavailable` when the write fails; nothing is added.
    pub fn add(&mut self, title: &str) -> StoreResult<Task> {
        validate_title(title)?;
        let id = self.fresh_id()?;
        let task = Task::new(id, title.trim());

        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task.clone());
        next.extend(self.tasks.iter().cloned());
        self.commit(next, "add")?;

        Ok(task)
    }

    /// Removes the task with `id`; absent ids are ignored.
    pub fn remove(&mut self, id: &str) -> StoreResult<()> {
        let Some(index) = self.position(id) else {
            return Ok(());
        };
        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next, "remove")?;
        self.retired.insert(removed.id);
        Ok(())
    }

    /// Flips completion of the task with `id`; absent ids are ignored.
    pub fn toggle_completed(&mut self, id: &str) -> StoreResult<()> {
        let Some(index) = self.position(id) else {
            return Ok(());
        };
        let mut next = self.tasks.clone();
        next[index].toggle();
        self.commit(next, "toggle")
    }

    /// Swaps the task with its predecessor. No-op for the first task.
    pub fn move_up(&mut self, id: &str) -> StoreResult<()> {
        match self.position(id) {
            Some(index) if index > 0 => self.swap(index - 1, index, "move_up"),
            _ => Ok(()),
        }
    }

    /// Swaps the task with its successor. No-op for the last task.
    pub fn move_down(&mut self, id: &str) -> StoreResult<()> {
        match self.position(id) {
            Some(index) if index + 1 < self.tasks.len() => self.swap(index, index + 1, "move_down"),
            _ => Ok(()),
        }
    }

    fn swap(&mut self, a: usize, b: usize, op: &'static str) -> StoreResult<()> {
        let mut next = self.tasks.clone();
        next.swap(a, b);
        self.commit(next, op)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn fresh_id(&mut self) -> StoreResult<TaskId> {
        let mut last = TaskId::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !candidate.trim().is_empty()
                && self.position(&candidate).is_none()
                && !self.retired.contains(&candidate)
            {
                return Ok(candidate);
            }
            debug!("event=id_collision module=service status=retry");
            last = candidate;
        }
        Err(StoreError::DuplicateId(last))
    }

    /// Writes `next` and only then replaces the in-memory list.
    fn commit(&mut self, next: Vec<Task>, op: &'static str) -> StoreResult<()> {
        let payload = encode(&next)?;
        if let Err(err) = self.storage.set(TASKS_KEY, &payload) {
            warn!("event=store_write module=service status=error op={op} error={err}");
            return Err(err.into());
        }
        self.tasks = next;
        debug!(
            "event=store_write module=service status=ok op={op} count={}",
            self.tasks.len()
        );
        Ok(())
    }
}

fn encode(tasks: &[Task]) -> StoreResult<String> {
    serde_json::to_string(tasks).map_err(|err| StoreError::Encode(err.to_string()))
}

/// Parses persisted state, returning `None` when it is unusable.
fn decode_persisted(raw: &str) -> Option<Vec<Task>> {
    let tasks: Vec<Task> = match serde_json::from_str(raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!("event=store_load module=service status=malformed error={err}");
            return None;
        }
    };

    let mut seen = HashSet::new();
    for task in &tasks {
        if let Err(err) = task.validate() {
            warn!("event=store_load module=service status=malformed error={err}");
            return None;
        }
        if !seen.insert(task.id.as_str()) {
            warn!(
                "event=store_load module=service status=malformed error=duplicate_id id={}",
                task.id
            );
            return None;
        }
    }
    Some(tasks)
}

/// Drops invalid and repeated records from loader output and caps it at
/// [`SEED_LIMIT`].
fn sanitize_seed(seeded: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    seeded
        .into_iter()
        .filter(|task| task.validate().is_ok() && seen.insert(task.id.clone()))
        .take(SEED_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_persisted, sanitize_seed};
    use crate::model::task::Task;

    #[test]
    fn decode_rejects_duplicate_ids() {
        let raw = r#"[{"id":"a","title":"x"},{"id":"a","title":"y"}]"#;
        assert!(decode_persisted(raw).is_none());
    }

    #[test]
    fn decode_accepts_empty_list() {
        assert_eq!(decode_persisted("[]"), Some(Vec::new()));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_persisted("not json").is_none());
    }

    #[test]
    fn sanitize_seed_keeps_first_of_duplicate_ids() {
        let seeded = vec![
            Task::new("1", "first"),
            Task::new("1", "second"),
            Task::new("2", ""),
            Task::new("3", "third"),
        ];
        let ids: Vec<String> = sanitize_seed(seeded).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
