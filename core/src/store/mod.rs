//! Storage abstraction for todo records.
//!
//! # Design
//! `TodoStore` is the narrow set of primitives every backend provides.
//! Business rules (validation, not-found handling, write serialization) live
//! once in `TodoManager`; a store only persists what it is handed. Stores
//! own id assignment because a persistent backend must remember its counter
//! across restarts: ids increase monotonically, are never reused after a
//! delete, and restart from 1 after `clear`.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::stats::TodoStats;
use crate::todo::{Todo, TodoId};
use crate::types::TodoDraft;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// All todos in insertion order.
    async fn list(&self) -> Result<Vec<Todo>>;

    async fn get(&self, id: TodoId) -> Result<Option<Todo>>;

    /// Assign the next id to `draft` and persist it.
    async fn insert(&self, draft: TodoDraft) -> Result<Todo>;

    /// Overwrite the mutable fields of an existing record. Returns `false`
    /// when no record has `todo.id()`.
    async fn save(&self, todo: &Todo) -> Result<bool>;

    /// Returns `false` when nothing was removed.
    async fn remove(&self, id: TodoId) -> Result<bool>;

    /// Remove every record and reset the id counter. Returns the number of
    /// records removed.
    async fn clear(&self) -> Result<u64>;

    async fn stats(&self) -> Result<TodoStats> {
        let todos = self.list().await?;
        Ok(TodoStats::from_todos(&todos))
    }
}
