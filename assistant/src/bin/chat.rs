//! Assistant Chat Lambda - The FamilyFlow cloud assistant endpoint.
//!
//! Routes:
//! - GET  /               - Service status (no auth)
//! - GET  /health         - Health check (no auth)
//! - POST /assistant/chat - Chat with the assistant (Firebase bearer token)
//!
//! Auth and validation failures are rejected at the boundary; model-provider
//! failures come back as an apologetic reply inside a 200; anything else is
//! caught at the top level and rewritten into a fixed-shape 500.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{apply_cors, error_response, json_response, preflight_response};
use shared::{
    authenticate, ChatRequest, ChatResponse, ClaudeClient, Config, ErrorResponse,
    GoogleTokenVerifier, HealthResponse, StatusResponse, TokenVerifier,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    config: Config,
    verifier: Box<dyn TokenVerifier>,
    claude: ClaudeClient,
}

impl AppState {
    fn new() -> Self {
        let config = Config::from_env();
        let http = reqwest::Client::new();
        let verifier = Box::new(GoogleTokenVerifier::new(
            http.clone(),
            config.firebase_project_id.clone(),
        ));
        let claude = ClaudeClient::new(http, &config);

        Self {
            config,
            verifier,
            claude,
        }
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let origin = event
        .headers()
        .get("origin")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = match route(&state, event).await {
        Ok(response) => response,
        Err(e) => {
            error!("Unhandled error: {e}");
            json_response(500, &ErrorResponse::unhandled(e.to_string()))?
        }
    };

    Ok(apply_cors(
        response,
        origin.as_deref(),
        &state.config.allowed_origins,
    ))
}

async fn route(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().as_str().to_string();
    let path = event.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => json_response(
            200,
            &StatusResponse {
                service: "FamilyFlow Assistant API".to_string(),
                status: "running".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                model: state.config.model.clone(),
                api_key_configured: state.config.anthropic_api_key.is_some(),
                firebase_project_locked: state.config.firebase_project_id.is_some(),
            },
        ),

        ("GET", "/health") => json_response(200, &HealthResponse::healthy()),

        ("OPTIONS", _) => Ok(preflight_response(
            event
                .headers()
                .get("origin")
                .and_then(|value| value.to_str().ok()),
            &state.config.allowed_origins,
        )),

        ("POST", "/assistant/chat") => assistant_chat(state, event).await,

        _ => error_response(404, "Not found"),
    }
}

/// Main chat endpoint (AUTH REQUIRED).
///
/// Requires: `Authorization: Bearer <Firebase ID token>`
async fn assistant_chat(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    let authorization = event
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok());

    let user = match authenticate(authorization, state.verifier.as_ref()).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Authentication failed: {e}");
            return error_response(e.status_code(), e.public_message());
        }
    };

    let mut request: ChatRequest = match serde_json::from_slice(event.body()) {
        Ok(request) => request,
        Err(e) => {
            warn!("Invalid request body: {e}");
            return error_response(400, format!("Invalid request body: {e}"));
        }
    };

    info!(
        "Chat request: '{}' uid={} email={:?}",
        preview(&request.text),
        user.user_id,
        user.email
    );

    if request.text.trim().is_empty() {
        return error_response(400, "Message text is required");
    }

    // Backfill identity from the verified token when the app didn't pass it
    if request.user_id.is_none() {
        request.user_id = Some(user.user_id.clone());
    }
    if request.user_email.is_none() {
        request.user_email = user.email.clone();
    }

    let (reply, action) = state
        .claude
        .chat(&request.text, request.context.as_deref())
        .await;

    info!("Response: reply='{}' action={:?}", preview(&reply), action);

    json_response(200, &ChatResponse { reply, action })
}

/// First 100 characters, for request logging.
fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new());

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_http::http;
    use shared::config::DEFAULT_MODEL;
    use shared::FirebaseClaims;

    struct MockVerifier {
        reject: bool,
    }

    #[async_trait]
    impl TokenVerifier for MockVerifier {
        async fn verify(&self, _token: &str) -> shared::Result<FirebaseClaims> {
            if self.reject {
                return Err(shared::Error::InvalidCredential(
                    "issuer mismatch".to_string(),
                ));
            }
            Ok(FirebaseClaims {
                sub: "uid-1".to_string(),
                user_id: None,
                email: Some("parent@example.com".to_string()),
                aud: "familyflow-app".to_string(),
                iss: "https://securetoken.google.com/familyflow-app".to_string(),
                iat: 0,
                exp: 0,
            })
        }
    }

    fn test_state(reject_tokens: bool) -> Arc<AppState> {
        let config = Config {
            anthropic_api_key: None,
            allowed_origins: vec!["*".to_string()],
            model: DEFAULT_MODEL.to_string(),
            firebase_project_id: None,
        };
        Arc::new(AppState {
            claude: ClaudeClient::new(reqwest::Client::new(), &config),
            verifier: Box::new(MockVerifier {
                reject: reject_tokens,
            }),
            config,
        })
    }

    fn request(method: &str, path: &str, auth: Option<&str>, body: &str) -> Request {
        let mut builder = http::Request::builder().method(method).uri(path);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn body_json(response: &Response<Body>) -> serde_json::Value {
        let Body::Text(body) = response.body() else {
            panic!("expected text body");
        };
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_health_requires_no_auth() {
        let response = handler(test_state(false), request("GET", "/health", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response)["status"], "healthy");
    }

    #[tokio::test]
    async fn test_root_reports_configuration() {
        let response = handler(test_state(false), request("GET", "/", None, ""))
            .await
            .unwrap();
        let json = body_json(&response);
        assert_eq!(json["service"], "FamilyFlow Assistant API");
        assert_eq!(json["status"], "running");
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["api_key_configured"], false);
        assert_eq!(json["firebase_project_locked"], false);
    }

    #[tokio::test]
    async fn test_chat_without_auth_is_401() {
        let response = handler(
            test_state(false),
            request("POST", "/assistant/chat", None, r#"{"text": "hi"}"#),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 401);
        assert_eq!(body_json(&response)["reply"], "Authentication required");
    }

    #[tokio::test]
    async fn test_chat_with_rejected_token_is_401() {
        let response = handler(
            test_state(true),
            request(
                "POST",
                "/assistant/chat",
                Some("Bearer syntactically-fine"),
                r#"{"text": "hi"}"#,
            ),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 401);
        // Uniform message; the mismatch cause stays server-side.
        assert_eq!(body_json(&response)["reply"], "Authentication required");
    }

    #[tokio::test]
    async fn test_chat_with_malformed_scheme_is_401() {
        let response = handler(
            test_state(false),
            request(
                "POST",
                "/assistant/chat",
                Some("Token abc"),
                r#"{"text": "hi"}"#,
            ),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn test_empty_text_is_400_even_when_authenticated() {
        let response = handler(
            test_state(false),
            request(
                "POST",
                "/assistant/chat",
                Some("Bearer good"),
                r#"{"text": "   "}"#,
            ),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["reply"], "Message text is required");
    }

    #[tokio::test]
    async fn test_invalid_body_is_400() {
        let response = handler(
            test_state(false),
            request("POST", "/assistant/chat", Some("Bearer good"), "not json"),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_chat_happy_path_with_unconfigured_model() {
        let response = handler(
            test_state(false),
            request(
                "POST",
                "/assistant/chat",
                Some("Bearer good"),
                r#"{"text": "add math homework for William"}"#,
            ),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 200);
        let json = body_json(&response);
        // No API key configured: degraded reply, no action, still a 200.
        assert_eq!(
            json["reply"],
            "Sorry, the assistant is not configured. Please set the API key."
        );
        assert!(json["action"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = handler(test_state(false), request("GET", "/nope", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_cors_headers_on_responses() {
        let response = handler(test_state(false), request("GET", "/health", None, ""))
            .await
            .unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let response = handler(
            test_state(false),
            request("OPTIONS", "/assistant/chat", None, ""),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 204);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_authenticated_user_prefers_user_id_claim() {
        let user = authenticate(Some("Bearer tok"), &MockVerifier { reject: false })
            .await
            .unwrap();
        assert_eq!(user.user_id, "uid-1");
        assert_eq!(user.email.as_deref(), Some("parent@example.com"));
    }
}
