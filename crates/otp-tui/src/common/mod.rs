//! Shared TUI building blocks.

pub mod task;

pub use task::{TaskKind, TaskState, Tasks};
