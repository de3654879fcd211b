//! Claude Messages API client.
//!
//! Provider failures never escape this module: the caller always gets a
//! `(reply, action)` pair, with errors folded into an apologetic reply.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::action::Action;
use crate::config::Config;
use crate::extract::{clean_reply, extract_action};
use crate::prompt::build_system_prompt;
use crate::{Error, Result};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

const NOT_CONFIGURED_REPLY: &str =
    "Sorry, the assistant is not configured. Please set the API key.";

/// Client for the Anthropic Messages API.
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl ClaudeClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_key: config.anthropic_api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send a chat message and return the cleaned reply plus any extracted
    /// action. This never fails: an unconfigured key short-circuits and
    /// provider errors become part of the reply text.
    pub async fn chat(&self, message: &str, context: Option<&str>) -> (String, Option<Action>) {
        let Some(api_key) = &self.api_key else {
            return (NOT_CONFIGURED_REPLY.to_string(), None);
        };

        match self.request_reply(api_key, message, context).await {
            Ok(reply) => finalize_reply(reply),
            Err(Error::ModelProvider(cause)) => {
                error!("Anthropic API error: {cause}");
                (format!("Sorry, there was an API error: {cause}"), None)
            }
            Err(cause) => {
                error!("Unexpected error calling model: {cause}");
                (format!("Sorry, something went wrong: {cause}"), None)
            }
        }
    }

    async fn request_reply(
        &self,
        api_key: &str,
        message: &str,
        context: Option<&str>,
    ) -> Result<String> {
        let today = chrono::Utc::now().date_naive();
        let system = build_system_prompt(today, context);

        let body = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: &system,
            messages: &[Message {
                role: "user",
                content: message,
            }],
        };

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ModelProvider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::ModelProvider(format!("{status}: {text}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("failed to parse API response: {e}")))?;

        // Concatenate all text content blocks into one reply
        let reply: String = api_response
            .content
            .iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text.as_deref()
                } else {
                    None
                }
            })
            .collect();

        Ok(reply)
    }
}

/// Run extraction over the raw reply and strip the action fragment when one
/// was actually produced.
fn finalize_reply(reply: String) -> (String, Option<Action>) {
    let Some(object) = extract_action(&reply) else {
        return (reply.trim().to_string(), None);
    };

    match Action::from_extracted(object) {
        Ok(action) => (clean_reply(&reply), Some(action)),
        Err(cause) => {
            // Extraction found something but it isn't a supported schema;
            // pass the reply through untouched.
            warn!("Discarding extracted object: {cause}");
            (reply.trim().to_string(), None)
        }
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message<'a>],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}
