//! Shared library for the FamilyFlow assistant backend.
//!
//! This crate provides the auth, model-client, and extraction logic used by
//! the assistant Lambda.

pub mod action;
pub mod auth;
pub mod claude;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod models;
pub mod prompt;

pub use action::Action;
pub use auth::{authenticate, bearer_token, AuthenticatedUser, FirebaseClaims, GoogleTokenVerifier, TokenVerifier};
pub use claude::ClaudeClient;
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{clean_reply, extract_action};
pub use models::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, StatusResponse};
pub use prompt::build_system_prompt;
