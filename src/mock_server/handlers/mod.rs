//! HTTP request handlers for the mock server.
//!
//! Every handler answers with the Status.io envelope
//! `{"status": {"error", "message"}, "result"}`.

pub mod incidents;
pub mod maintenances;
pub mod status;
pub mod subscribers;

pub use incidents::*;
pub use maintenances::*;
pub use status::*;
pub use subscribers::*;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::{MockError, MockResult, MockState};

/// State shared by all handlers.
pub type SharedState = Arc<RwLock<MockState>>;

/// Wrap a result in a success envelope.
pub fn envelope<T: Serialize>(result: T) -> Response {
    Json(json!({
        "status": {"error": "no", "message": "OK"},
        "result": result
    }))
    .into_response()
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::BAD_REQUEST);
        (
            status,
            Json(json!({
                "status": {"error": "yes", "message": self.message},
                "result": false
            })),
        )
            .into_response()
    }
}

/// A JSON request body with Status.io's loose typing.
///
/// Clients send numbers and flags either as JSON numbers or as text.
pub struct Body(pub Map<String, Value>);

impl Body {
    /// A required text field. Numbers are accepted and rendered as text.
    pub fn text(&self, key: &str) -> MockResult<String> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(MockError::bad_request(format!("Missing parameter: {key}"))),
        }
    }

    /// A required numeric code such as `current_status`.
    pub fn code(&self, key: &str) -> MockResult<u16> {
        let invalid = || MockError::bad_request(format!("Invalid parameter: {key}"));
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u16::try_from(n).ok())
                .ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
            _ => Err(MockError::bad_request(format!("Missing parameter: {key}"))),
        }
    }

    /// An optional `"1"`/`"0"` flag.
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::String(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
            Some(Value::Number(n)) => n.as_u64() == Some(1),
            Some(Value::Bool(b)) => *b,
            _ => false,
        }
    }

    /// An optional list; a comma-separated string is also accepted.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}
