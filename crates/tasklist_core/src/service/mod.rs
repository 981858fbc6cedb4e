//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage and seed collaborators into the task list API.
//! - Keep presentation layers decoupled from storage details.

pub mod task_store;
