//! In-process store backed by a `Vec` behind a `tokio::sync::RwLock`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::store::TodoStore;
use crate::todo::{Todo, TodoId};
use crate::types::TodoDraft;

#[derive(Debug)]
struct State {
    todos: Vec<Todo>,
    next_id: i64,
}

#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                todos: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.state.read().await.todos.clone())
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let state = self.state.read().await;
        Ok(state.todos.iter().find(|t| t.id() == id).cloned())
    }

    async fn insert(&self, draft: TodoDraft) -> Result<Todo> {
        let mut state = self.state.write().await;
        let todo = Todo::from_draft(TodoId(state.next_id), draft);
        state.next_id += 1;
        state.todos.push(todo.clone());
        Ok(todo)
    }

    async fn save(&self, todo: &Todo) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.todos.iter_mut().find(|t| t.id() == todo.id()) {
            Some(slot) => {
                *slot = todo.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: TodoId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.todos.len();
        state.todos.retain(|t| t.id() != id);
        Ok(state.todos.len() != before)
    }

    async fn clear(&self) -> Result<u64> {
        let mut state = self.state.write().await;
        let removed = state.todos.len() as u64;
        state.todos.clear();
        state.next_id = 1;
        Ok(removed)
    }
}
