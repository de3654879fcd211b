//! HTTP helpers for the assistant Lambda.

use lambda_http::http::header::HeaderValue;
use lambda_http::{Body, Response};
use serde::Serialize;

use crate::models::ErrorResponse;

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))
        .expect("Failed to build response"))
}

/// Create an error response with the given status code and message.
pub fn error_response(
    status: u16,
    message: impl Into<String>,
) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &ErrorResponse::rejection(message))
}

/// Add CORS headers to a response.
///
/// With `["*"]` every origin is allowed; otherwise the request origin is
/// echoed back only when it is on the list.
pub fn apply_cors(
    mut response: Response<Body>,
    origin: Option<&str>,
    allowed_origins: &[String],
) -> Response<Body> {
    let allow_all = allowed_origins.iter().any(|o| o == "*");

    let allow_origin = if allow_all {
        Some(HeaderValue::from_static("*"))
    } else {
        origin
            .filter(|origin| allowed_origins.iter().any(|o| o == origin))
            .and_then(|origin| HeaderValue::from_str(origin).ok())
    };

    let Some(allow_origin) = allow_origin else {
        return response;
    };

    let headers = response.headers_mut();
    headers.insert("access-control-allow-origin", allow_origin);
    headers.insert(
        "access-control-allow-credentials",
        HeaderValue::from_static("true"),
    );
    headers.insert("access-control-allow-methods", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-headers", HeaderValue::from_static("*"));
    if !allow_all {
        headers.insert("vary", HeaderValue::from_static("Origin"));
    }

    response
}

/// Respond to a CORS preflight request.
pub fn preflight_response(
    origin: Option<&str>,
    allowed_origins: &[String],
) -> Response<Body> {
    let response = Response::builder()
        .status(204)
        .body(Body::Empty)
        .expect("Failed to build preflight response");

    apply_cors(response, origin, allowed_origins)
}
