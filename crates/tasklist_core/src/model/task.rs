//! Task domain model.
//!
//! # Responsibility
//! - Define the single record held by the task list.
//! - Validate records before they enter the store or storage.
//!
//! # Invariants
//! - `id` is opaque, non-empty and never reassigned.
//! - `title` is non-empty after trimming and bounded in length.
//! - `completed` defaults to `false`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque task identifier.
///
/// Kept as a plain string because seeded ids come from a remote source and
/// local ids come from an injected generator.
pub type TaskId = String;

/// Upper bound for title length, counted in characters.
pub const MAX_TITLE_CHARS: usize = 500;

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyTitle,
    TitleTooLong { chars: usize, max: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "task title too long ({chars} characters, max {max})")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task with a caller-provided id.
    ///
    /// This constructor does not validate; call [`Task::validate`] before
    /// handing the record to storage.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
        }
    }

    /// Builder-style completion flag, used by seed mapping.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        validate_title(&self.title)
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Validates a user-supplied title.
///
/// Leading and trailing whitespace does not count towards emptiness.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_TITLE_CHARS {
        return Err(TaskValidationError::TitleTooLong {
            chars,
            max: MAX_TITLE_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_title, Task, TaskValidationError, MAX_TITLE_CHARS};

    #[test]
    fn new_task_starts_incomplete() {
        let task = Task::new("a", "Buy milk");
        assert!(!task.completed);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let mut task = Task::new("a", "Buy milk");
        task.toggle();
        assert!(task.completed);
        task.toggle();
        assert!(!task.completed);
    }

    #[test]
    fn whitespace_title_is_rejected() {
        assert_eq!(validate_title(" \t\n"), Err(TaskValidationError::EmptyTitle));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(matches!(
            validate_title(&title),
            Err(TaskValidationError::TitleTooLong { .. })
        ));
    }

    #[test]
    fn blank_id_is_rejected() {
        let task = Task::new("  ", "title");
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyId));
    }
}
