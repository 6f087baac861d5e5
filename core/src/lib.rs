//! Domain core for the todo service.
//!
//! # Overview
//! Validates, stores and aggregates todo records. The HTTP surface lives in
//! the `todo-server` crate and only translates requests into `TodoManager`
//! calls and `TodoError`s into status codes.
//!
//! # Design
//! - `validate` holds pure field validators over raw JSON values.
//! - `Todo` keeps its fields private; every write re-runs validation and is
//!   all-or-nothing.
//! - `TodoManager` is the single owner of the collection and is written once
//!   against the `TodoStore` trait; `MemoryStore` and `SqliteStore` are the
//!   two backends.
//! - `TodoStats` aggregates completion and priority counts.

pub mod error;
pub mod manager;
pub mod stats;
pub mod store;
pub mod todo;
pub mod types;
pub mod validate;

pub use error::{Field, Result, TodoError, ValidationError};
pub use manager::TodoManager;
pub use stats::{PriorityBreakdown, TodoStats};
pub use store::{MemoryStore, SqliteStore, TodoStore};
pub use todo::{Priority, Todo, TodoId};
pub use types::{TodoDraft, TodoInput, TodoPatch};
