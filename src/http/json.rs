//! JSON body parsing middleware.
//!
//! Mirrors the classic body-parser stage: requests with a JSON content type
//! are buffered and parsed up front, before rate limiting and routing run.
//! The parsed value is attached to request extensions and the raw bytes are
//! restored so extractors downstream still work. Malformed JSON never
//! reaches a handler.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Parsed JSON body, available from request extensions to anything mounted
/// after this middleware.
#[derive(Debug, Clone)]
pub struct JsonBody(pub serde_json::Value);

fn has_json_content_type(request: &Request<Body>) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or("").trim();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Middleware buffering and parsing JSON request bodies.
///
/// State carries the maximum accepted body size in bytes.
pub async fn parse_json_body(
    State(max_body_size): State<usize>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !has_json_content_type(&request) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
        }
    };

    if bytes.is_empty() {
        return next.run(Request::from_parts(parts, Body::empty())).await;
    }

    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) => {
            let mut request = Request::from_parts(parts, Body::from(bytes));
            request.extensions_mut().insert(JsonBody(value));
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting malformed JSON body");
            (StatusCode::BAD_REQUEST, "Malformed JSON body").into_response()
        }
    }
}
