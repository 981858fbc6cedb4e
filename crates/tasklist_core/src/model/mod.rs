//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record and its validation rules.
//!
//! # Invariants
//! - Every task is identified by an opaque, non-empty `TaskId`.
//! - Deletion is a hard removal; ids are never recycled.

pub mod task;
