//! Completion and priority statistics over a snapshot of todos.

use serde::{Deserialize, Serialize};

use crate::todo::{Priority, Todo};

/// Aggregate counts over a collection of todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    /// Percentage of completed todos, rounded to the nearest integer.
    pub completion_rate: u64,
    pub by_priority: PriorityBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl TodoStats {
    pub fn from_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        let mut total = 0;
        let mut completed = 0;
        let mut by_priority = PriorityBreakdown::default();
        for todo in todos {
            total += 1;
            if todo.done() {
                completed += 1;
            }
            match todo.priority() {
                Priority::High => by_priority.high += 1,
                Priority::Medium => by_priority.medium += 1,
                Priority::Low => by_priority.low += 1,
            }
        }
        Self::from_counts(total, completed, by_priority)
    }

    /// Derive `pending` and `completion_rate` from raw counts.
    pub fn from_counts(total: u64, completed: u64, by_priority: PriorityBreakdown) -> Self {
        Self {
            total,
            completed,
            pending: total.saturating_sub(completed),
            completion_rate: completion_rate(total, completed),
            by_priority,
        }
    }
}

fn completion_rate(total: u64, completed: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (completed as f64 * 100.0 / total as f64).round() as u64
}
