//! JSON envelopes and error-to-status mapping.
//!
//! # Design
//! Successful responses wrap their payload in `Envelope`
//! (`{success: true, data, count?, message?}`); failures become
//! `{success: false, error, message}`. `ApiError` is the only error type
//! handlers return, and its `IntoResponse` impl is the one place where a
//! `TodoError` variant is tied to an HTTP status.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todo_core::TodoError;
use tracing::{debug, error};

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            message: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Payload of `DELETE /api/todos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted_count: u64,
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    /// The body was not JSON, or not an object.
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
}

impl ApiError {
    fn status_and_label(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Todo(TodoError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "Validation failed")
            }
            ApiError::Todo(TodoError::NotFound(_)) => (StatusCode::NOT_FOUND, "Todo not found"),
            ApiError::Todo(TodoError::MalformedReference(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid id")
            }
            ApiError::Todo(TodoError::Backend(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage backend failure")
            }
            ApiError::Body(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = self.status_and_label();
        let message = match &self {
            ApiError::Body(rejection) => rejection.body_text(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }
        let body = ErrorBody {
            success: false,
            error: label.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
