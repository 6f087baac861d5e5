//! The resource manager that owns the todo collection.
//!
//! # Design
//! `TodoManager` is written once against `TodoStore`, so every backend gets
//! the same validation, not-found and id rules. It is cheap to clone and is
//! meant to be handed to the HTTP layer as shared state.
//!
//! Mutations take a single async write lock for their whole
//! read-modify-write sequence: two requests can never interleave a
//! `get` + `save` on the same record, and id assignment is serialized.
//! Reads skip the lock and see the store's latest committed state.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Result, TodoError};
use crate::stats::TodoStats;
use crate::store::{MemoryStore, TodoStore};
use crate::todo::{Todo, TodoId};
use crate::types::{TodoInput, TodoPatch};

#[derive(Clone)]
pub struct TodoManager {
    store: Arc<dyn TodoStore>,
    writes: Arc<Mutex<()>>,
}

impl TodoManager {
    /// Take ownership of `store`. The write lock is created alongside it, so
    /// every clone of this manager serializes against the same lock.
    pub fn new(store: impl TodoStore) -> Self {
        Self {
            store: Arc::new(store),
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// All todos in insertion order.
    pub async fn list(&self) -> Result<Vec<Todo>> {
        self.store.list().await
    }

    /// The todo with `id`, or `TodoError::NotFound`.
    pub async fn get(&self, id: TodoId) -> Result<Todo> {
        self.store.get(id).await?.ok_or(TodoError::NotFound(id))
    }

    /// Validate `input` and insert it under the next id. Nothing is written
    /// when validation fails.
    pub async fn create(&self, input: &TodoInput) -> Result<Todo> {
        let draft = input.validate()?;
        let _guard = self.writes.lock().await;
        let todo = self.store.insert(draft).await?;
        debug!(id = %todo.id(), "created todo");
        Ok(todo)
    }

    /// Overwrite every mutable field of todo `id`.
    pub async fn replace(&self, id: TodoId, input: &TodoInput) -> Result<Todo> {
        let _guard = self.writes.lock().await;
        let mut todo = self.get(id).await?;
        todo.apply_full_replace(input)?;
        self.persist(todo).await
    }

    /// Overwrite only the fields present in `patch`.
    pub async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo> {
        let _guard = self.writes.lock().await;
        let mut todo = self.get(id).await?;
        if patch.is_empty() {
            return Ok(todo);
        }
        todo.apply_partial_update(patch)?;
        self.persist(todo).await
    }

    pub async fn delete(&self, id: TodoId) -> Result<()> {
        let _guard = self.writes.lock().await;
        if !self.store.remove(id).await? {
            return Err(TodoError::NotFound(id));
        }
        debug!(%id, "deleted todo");
        Ok(())
    }

    /// Remove every todo and restart ids at 1. Returns the number removed.
    pub async fn delete_all(&self) -> Result<u64> {
        let _guard = self.writes.lock().await;
        let removed = self.store.clear().await?;
        debug!(removed, "deleted all todos");
        Ok(removed)
    }

    pub async fn stats(&self) -> Result<TodoStats> {
        self.store.stats().await
    }

    async fn persist(&self, todo: Todo) -> Result<Todo> {
        if !self.store.save(&todo).await? {
            return Err(TodoError::NotFound(todo.id()));
        }
        debug!(id = %todo.id(), "saved todo");
        Ok(todo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Field;
    use crate::todo::Priority;

    #[tokio::test]
    async fn create_rejects_blank_name_without_inserting() {
        let manager = TodoManager::in_memory();
        let err = manager.create(&TodoInput::new("   ")).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(ref e) if e.field == Field::Name));
        assert!(manager.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let manager = TodoManager::in_memory();
        let id = TodoId(12);
        assert!(matches!(manager.get(id).await, Err(TodoError::NotFound(i)) if i == id));
        assert!(matches!(
            manager.replace(id, &TodoInput::new("x")).await,
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(
            manager.update(id, &TodoPatch::default().with_done(true)).await,
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(manager.delete(id).await, Err(TodoError::NotFound(_))));
    }

    #[tokio::test]
    async fn not_found_wins_over_invalid_input() {
        let manager = TodoManager::in_memory();
        let err = manager
            .replace(TodoId(1), &TodoInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_patch_returns_record_unchanged() {
        let manager = TodoManager::in_memory();
        let todo = manager
            .create(&TodoInput::new("Same").with_priority(3))
            .await
            .unwrap();
        let after = manager.update(todo.id(), &TodoPatch::default()).await.unwrap();
        assert_eq!(after, todo);
        assert_eq!(after.priority(), Priority::Low);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let manager = TodoManager::in_memory();
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    manager.create(&TodoInput::new(format!("task {i}"))).await
                })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id().0);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }
}
