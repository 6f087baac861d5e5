//! The todo entity.
//!
//! # Design
//! Fields are private so every write goes through a validating path:
//! `create`, `apply_full_replace`, `apply_partial_update` and `restore`.
//! Each one validates everything it was given before mutating anything, so a
//! failed call leaves the record exactly as it was. The id is fixed at
//! construction and has no setter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Field, TodoError, ValidationError};
use crate::types::{TodoDraft, TodoInput, TodoPatch};
use crate::validate::{validate_done, validate_name, validate_priority};

/// Identifier assigned by the store when a todo is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parses a path segment. Anything that is not a plain integer is a
/// `MalformedReference`.
impl FromStr for TodoId {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(TodoId)
            .map_err(|_| TodoError::MalformedReference(s.to_string()))
    }
}

/// Task priority. Serialized as its integer value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Priority {
    #[default]
    High = 1,
    Medium = 2,
    Low = 3,
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        priority as i64
    }
}

impl TryFrom<i64> for Priority {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            other => Err(ValidationError::new(
                Field::Priority,
                format!("must be 1, 2 or 3 (got {other})"),
            )),
        }
    }
}

/// A single todo record. Serializes to exactly `{id, name, priority, done}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TodoRecord")]
pub struct Todo {
    id: TodoId,
    name: String,
    priority: Priority,
    done: bool,
}

/// Unchecked wire shape; converted into `Todo` through `restore`.
#[derive(Deserialize)]
struct TodoRecord {
    id: TodoId,
    name: String,
    priority: i64,
    done: bool,
}

impl TryFrom<TodoRecord> for Todo {
    type Error = ValidationError;

    fn try_from(record: TodoRecord) -> Result<Self, Self::Error> {
        Todo::restore(record.id, record.name, record.priority, record.done)
    }
}

impl Todo {
    /// Validate `input` and build a todo. Absent `priority` defaults to high,
    /// absent `done` to false; `name` is required.
    pub fn create(id: TodoId, input: &TodoInput) -> Result<Self, ValidationError> {
        input.validate().map(|draft| Self::from_draft(id, draft))
    }

    /// Build a todo from already-validated fields.
    pub fn from_draft(id: TodoId, draft: TodoDraft) -> Self {
        Self {
            id,
            name: draft.name,
            priority: draft.priority,
            done: draft.done,
        }
    }

    /// Rebuild a todo from persisted columns, re-checking every invariant.
    pub fn restore(
        id: TodoId,
        name: String,
        priority: i64,
        done: bool,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(&serde_json::Value::String(name))?;
        let priority = Priority::try_from(priority)?;
        Ok(Self {
            id,
            name,
            priority,
            done,
        })
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// Overwrite every mutable field. Same rules and defaults as `create`.
    pub fn apply_full_replace(&mut self, input: &TodoInput) -> Result<(), ValidationError> {
        let draft = input.validate()?;
        self.apply_draft(draft);
        Ok(())
    }

    fn apply_draft(&mut self, draft: TodoDraft) {
        self.name = draft.name;
        self.priority = draft.priority;
        self.done = draft.done;
    }

    /// Overwrite only the fields present in `patch`. All present fields are
    /// validated before any is written; the first failure (in name, priority,
    /// done order) is returned.
    pub fn apply_partial_update(&mut self, patch: &TodoPatch) -> Result<(), ValidationError> {
        let name = patch.name.as_ref().map(validate_name).transpose()?;
        let priority = patch.priority.as_ref().map(validate_priority).transpose()?;
        let done = patch.done.as_ref().map(validate_done).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(done) = done {
            self.done = done;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn todo(name: &str, priority: i64, done: bool) -> Todo {
        Todo::create(
            TodoId(1),
            &TodoInput::new(name).with_priority(priority).with_done(done),
        )
        .unwrap()
    }

    #[test]
    fn create_trims_name_and_keeps_fields() {
        let todo = todo("  Task  ", 2, true);
        assert_eq!(todo.id(), TodoId(1));
        assert_eq!(todo.name(), "Task");
        assert_eq!(todo.priority(), Priority::Medium);
        assert!(todo.done());
    }

    #[test]
    fn create_applies_defaults() {
        let todo = Todo::create(TodoId(7), &TodoInput::new("Defaults")).unwrap();
        assert_eq!(todo.priority(), Priority::High);
        assert!(!todo.done());
    }

    #[test]
    fn create_requires_name() {
        let err = Todo::create(TodoId(1), &TodoInput::default()).unwrap_err();
        assert_eq!(err.field, Field::Name);
    }

    #[test]
    fn todo_serializes_to_plain_record() {
        let todo = todo("  Task  ", 1, false);
        let once = serde_json::to_value(&todo).unwrap();
        assert_eq!(once, json!({"id": 1, "name": "Task", "priority": 1, "done": false}));
        assert_eq!(serde_json::to_value(&todo).unwrap(), once);
    }

    #[test]
    fn deserialize_rejects_invalid_record() {
        let bad = json!({"id": 1, "name": "  ", "priority": 1, "done": false});
        assert!(serde_json::from_value::<Todo>(bad).is_err());
        let bad = json!({"id": 1, "name": "ok", "priority": 9, "done": false});
        assert!(serde_json::from_value::<Todo>(bad).is_err());
    }

    #[test]
    fn full_replace_overwrites_everything_but_id() {
        let mut todo = todo("Old", 3, true);
        todo.apply_full_replace(&TodoInput::new(" New ")).unwrap();
        assert_eq!(todo.id(), TodoId(1));
        assert_eq!(todo.name(), "New");
        assert_eq!(todo.priority(), Priority::High);
        assert!(!todo.done());
    }

    #[test]
    fn failed_full_replace_leaves_record_unchanged() {
        let mut todo = todo("Keep", 2, false);
        let before = todo.clone();
        let err = todo
            .apply_full_replace(&TodoInput::new("Other").with_priority(5))
            .unwrap_err();
        assert_eq!(err.field, Field::Priority);
        assert_eq!(todo, before);
    }

    #[test]
    fn partial_update_touches_only_present_fields() {
        let mut todo = todo("Draft", 2, true);
        todo.apply_partial_update(&TodoPatch::default().with_name("Final"))
            .unwrap();
        assert_eq!(todo.name(), "Final");
        assert_eq!(todo.priority(), Priority::Medium);
        assert!(todo.done());
    }

    #[test]
    fn partial_update_is_all_or_nothing() {
        let mut todo = todo("Draft", 2, false);
        let before = todo.clone();
        let patch = TodoPatch::default().with_name("Changed").with_priority(4);
        let err = todo.apply_partial_update(&patch).unwrap_err();
        assert_eq!(err.field, Field::Priority);
        assert_eq!(todo, before);
    }

    #[test]
    fn partial_update_reports_first_invalid_field() {
        let mut todo = todo("Draft", 2, false);
        let patch: TodoPatch =
            serde_json::from_value(json!({"name": "", "done": "yes"})).unwrap();
        assert_eq!(todo.apply_partial_update(&patch).unwrap_err().field, Field::Name);
    }

    #[test]
    fn id_parses_integers_only() {
        assert_eq!("42".parse::<TodoId>().unwrap(), TodoId(42));
        assert!(matches!(
            "4x".parse::<TodoId>(),
            Err(TodoError::MalformedReference(raw)) if raw == "4x"
        ));
    }
}
