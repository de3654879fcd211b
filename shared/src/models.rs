//! Shared data models.

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Chat request payload from the app.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub text: String,
    #[serde(default)]
    pub family_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    /// Optional data context from the app, used to ground the model
    #[serde(default)]
    pub context: Option<String>,
}

/// Chat response payload.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub action: Option<Action>,
}

/// Service status for `GET /`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub status: String,
    pub version: String,
    pub model: String,
    pub api_key_configured: bool,
    pub firebase_project_locked: bool,
}

/// Health check body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Fixed-shape body for errors surfaced to the chat client.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub reply: String,
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Boundary rejection (auth, validation): just the message, no action.
    pub fn rejection(message: impl Into<String>) -> Self {
        Self {
            reply: message.into(),
            action: None,
            error: None,
        }
    }

    /// Unhandled server error: generic reply plus the raw error description.
    pub fn unhandled(error: impl Into<String>) -> Self {
        Self {
            reply: "Sorry, something went wrong on the server.".to_string(),
            action: None,
            error: Some(error.into()),
        }
    }
}
