//! Request payloads for creating and changing todos.
//!
//! # Design
//! Payload fields are kept as raw `serde_json::Value`s so a wrongly typed
//! field (`"done": "yes"`) reaches the validators and becomes a
//! `ValidationError` instead of a body-parsing failure. A field that is
//! present with `null` is distinct from an absent field: absent means "keep"
//! or "use the default", `null` is an invalid value.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Field, ValidationError};
use crate::todo::Priority;
use crate::validate::{validate_done, validate_name, validate_priority};

/// Payload for create (POST) and full replace (PUT). `name` is required;
/// `priority` defaults to 1 and `done` to false when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoInput {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub done: Option<Value>,
}

/// Payload for partial update (PATCH). Only the fields present are applied;
/// omitted fields remain unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub done: Option<Value>,
}

/// A fully validated set of mutable fields, ready to become a `Todo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub name: String,
    pub priority: Priority,
    pub done: bool,
}

/// Maps any present value, `null` included, to `Some`. Paired with
/// `#[serde(default)]` so only a missing key yields `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TodoInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(Value::from(priority));
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(Value::Bool(done));
        self
    }

    /// Validate every field, applying defaults for absent optional ones.
    pub fn validate(&self) -> Result<TodoDraft, ValidationError> {
        let name = match &self.name {
            Some(value) => validate_name(value)?,
            None => return Err(ValidationError::new(Field::Name, "is required")),
        };
        let priority = self
            .priority
            .as_ref()
            .map(validate_priority)
            .transpose()?
            .unwrap_or_default();
        let done = self
            .done
            .as_ref()
            .map(validate_done)
            .transpose()?
            .unwrap_or(false);
        Ok(TodoDraft {
            name,
            priority,
            done,
        })
    }
}

impl TodoPatch {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Value::String(name.into()));
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(Value::from(priority));
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(Value::Bool(done));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.priority.is_none() && self.done.is_none()
    }
}
