//! The JSON envelope wrapped around every Status.io response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StatusioError};

/// Value of `status.error` on success.
const NO_ERROR: &str = "no";

/// The `status` object of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// `"no"` on success, `"yes"` otherwise.
    #[serde(default)]
    pub error: String,
    /// Human-readable outcome, e.g. `"OK"`.
    #[serde(default)]
    pub message: String,
}

/// A decoded Status.io response.
///
/// Application-level failures are not turned into errors when decoding; check
/// [`ApiResponse::is_success`] or use [`ApiResponse::into_result`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct ApiResponse<T = Value> {
    /// Outcome reported by the API.
    #[serde(default)]
    pub status: ResponseStatus,

    /// Payload, absent on most failures.
    #[serde(default)]
    pub result: Option<T>,

    /// Any other top-level fields (e.g. `subscriber_id` on subscriber add).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    /// Returns true if the API reported `status.error == "no"`.
    pub fn is_success(&self) -> bool {
        self.status.error == NO_ERROR
    }

    /// Look up an extra top-level string field.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Convert an application-level failure into [`StatusioError::Api`].
    ///
    /// A successful response without a `result` yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusioError::Api`] when `status.error` is not `"no"`.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.is_success() {
            Ok(self.result)
        } else {
            Err(StatusioError::Api {
                message: if self.status.message.is_empty() {
                    format!("status.error = '{}'", self.status.error)
                } else {
                    self.status.message
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = r#"{"status": {"error": "no", "message": "OK"}, "result": [1, 2]}"#;
        let response: ApiResponse<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        assert_eq!(response.into_result().unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"status": {"error": "yes", "message": "Invalid statuspage_id"}}"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_success());
        assert!(response.result.is_none());
        match response.into_result() {
            Err(StatusioError::Api { message }) => assert_eq!(message, "Invalid statuspage_id"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_extra_fields() {
        let json = r#"{"status": {"error": "no", "message": "OK"}, "subscriber_id": "s1"}"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.extra_str("subscriber_id"), Some("s1"));
        assert!(!response.extra.contains_key("status"));
    }

    #[test]
    fn test_missing_status_is_not_success() {
        let response: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.is_success());
    }
}
