//! Configuration management for the assistant Lambda.

use std::env;

/// Default Claude model when `CLAUDE_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Application configuration loaded from environment variables.
///
/// Constructed once at startup and passed into the components that need it;
/// nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    /// Anthropic API key; `None` means the assistant runs unconfigured
    pub anthropic_api_key: Option<String>,
    /// Allowed CORS origins; `["*"]` allows all
    pub allowed_origins: Vec<String>,
    /// Claude model identifier
    pub model: String,
    /// Firebase project id; when set, token verification is locked to this project
    pub firebase_project_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let anthropic_api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        if anthropic_api_key.is_none() {
            tracing::warn!("ANTHROPIC_API_KEY not set! The assistant will not work.");
        }

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();
        let allowed_origins = if allowed_origins.is_empty() {
            vec!["*".to_string()]
        } else {
            allowed_origins
        };

        let model = env::var("CLAUDE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let firebase_project_id = env::var("FIREBASE_PROJECT_ID")
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Self {
            anthropic_api_key,
            allowed_origins,
            model,
            firebase_project_id,
        }
    }
}
