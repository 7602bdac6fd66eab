//! Status.io API client.
//!
//! Low-level HTTP client that handles authentication, dispatch, and the
//! table-driven operation invoker. Typed wrappers live on the model types.

use std::env;
use std::sync::Arc;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Result, StatusioError};
use crate::operation::{Operation, OperationSpec, Verb};
use crate::request::{build_url, Params};
use crate::response::ApiResponse;

const DEFAULT_BASE_URL: &str = "https://api.status.io";
const DEFAULT_API_VERSION: u32 = 2;
const USER_AGENT: &str = concat!("statusio-rs/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API id.
pub const API_ID_HEADER: &str = "x-api-id";
/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

struct Credentials {
    api_id: String,
    api_key: String,
}

/// Low-level Status.io API client.
///
/// Holds the credentials and the versioned base URL. Every call goes through
/// [`StatusioClient::invoke`], which looks up the operation table, fills in
/// defaults, and decodes the response envelope.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use statusio::StatusioClient;
///
/// # fn example() -> statusio::Result<()> {
/// // Create from environment variables
/// let client = StatusioClient::from_env()?;
///
/// // Or configure manually
/// let client = StatusioClient::new("api-id", "api-key")?;
/// assert_eq!(client.base_url().as_str(), "https://api.status.io/v2");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StatusioClient {
    http: Client,
    base_url: Arc<Url>,
    credentials: Arc<Credentials>,
}

impl std::fmt::Debug for StatusioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusioClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl StatusioClient {
    /// Create a client from environment variables.
    ///
    /// Uses `STATUSIO_API_ID` and `STATUSIO_API_KEY` for authentication, and
    /// optionally `STATUSIO_API_VERSION` (defaults to `2`) and
    /// `STATUSIO_API_URL` (defaults to `https://api.status.io`).
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is not set or the version is not a
    /// number.
    pub fn from_env() -> Result<Self> {
        let api_id = env::var("STATUSIO_API_ID").map_err(|_| {
            StatusioError::ConfigMissing("STATUSIO_API_ID environment variable not set".to_string())
        })?;
        let api_key = env::var("STATUSIO_API_KEY").map_err(|_| {
            StatusioError::ConfigMissing(
                "STATUSIO_API_KEY environment variable not set".to_string(),
            )
        })?;

        let version = match env::var("STATUSIO_API_VERSION") {
            Ok(raw) => raw.trim().parse().map_err(|_| StatusioError::InvalidParameter {
                name: "STATUSIO_API_VERSION".to_string(),
                reason: format!("'{raw}' is not an integer"),
            })?,
            Err(_) => DEFAULT_API_VERSION,
        };

        let base_url =
            env::var("STATUSIO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::with_options(&api_id, &api_key, version, &base_url)
    }

    /// Create a client for API version 2 on `https://api.status.io`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_id: &str, api_key: &str) -> Result<Self> {
        Self::with_options(api_id, api_key, DEFAULT_API_VERSION, DEFAULT_BASE_URL)
    }

    /// Create a client with an explicit API version and host.
    ///
    /// The effective base URL is `{base_url}/v{version}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_options(api_id: &str, api_key: &str, version: u32, base_url: &str) -> Result<Self> {
        let versioned = format!("{}/v{version}", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&versioned)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(StatusioError::Transport)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            credentials: Arc::new(Credentials {
                api_id: api_id.to_string(),
                api_key: api_key.to_string(),
            }),
        })
    }

    /// Get the versioned base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send one request.
    ///
    /// GET and DELETE carry `payload` in the query string; POST and PATCH send
    /// it as a JSON body. The response is returned whatever its HTTP status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusioError::Transport`] if no response was received.
    #[tracing::instrument(skip(self, payload))]
    pub async fn dispatch(&self, url: Url, verb: Verb, payload: Option<&Params>) -> Result<Response> {
        let request = if verb.sends_body() {
            let empty = Params::new();
            self.http
                .request(verb.method(), url)
                .json(payload.unwrap_or(&empty))
        } else {
            let url = build_url(url.as_str(), &[], payload)?;
            self.http.request(verb.method(), url)
        };

        let result = request
            .header(API_ID_HEADER, &self.credentials.api_id)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()
            .await;

        match result {
            Ok(response) => {
                tracing::debug!(status = %response.status(), "received response");
                Ok(response)
            }
            Err(err) => {
                tracing::error!(error = %err, "request did not complete");
                Err(StatusioError::Transport(err))
            }
        }
    }

    /// Run an operation from the table.
    ///
    /// `segments` are the positional identifiers named by the operation (for
    /// reads, usually the status page id followed by an item id). Omitted
    /// optional parameters take their table defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not fit the operation, the
    /// request fails in transit, or the body is not a JSON envelope. An error
    /// reported by the API itself is returned inside the [`ApiResponse`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use statusio::{Operation, Params, StatusioClient};
    ///
    /// # async fn example() -> statusio::Result<()> {
    /// let client = StatusioClient::from_env()?;
    /// let response: statusio::ApiResponse = client
    ///     .invoke(
    ///         Operation::SubscriberAdd,
    ///         &[],
    ///         Params::new()
    ///             .with("statuspage_id", "568d8a3e3cada8c2490000dd")
    ///             .with("method", "email")
    ///             .with("address", "ops@example.com"),
    ///     )
    ///     .await?;
    /// println!("{:?}", response.extra_str("subscriber_id"));
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self, operation, params), fields(operation = %operation))]
    pub async fn invoke<T: DeserializeOwned + Send>(
        &self,
        operation: Operation,
        segments: &[&str],
        params: Params,
    ) -> Result<ApiResponse<T>> {
        let spec = operation.spec();
        let params = complete_params(spec, segments, params)?;

        let mut path: Vec<&str> = spec.path.split('/').collect();
        path.extend_from_slice(segments);
        let url = build_url(self.base_url.as_str(), &path, None)?;

        let response = self.dispatch(url, spec.verb, Some(&params)).await?;
        Self::decode(response).await
    }

    /// Decode a response body into the JSON envelope.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(decoded) => {
                if !decoded.is_success() {
                    tracing::warn!(
                        http_status = status.as_u16(),
                        message = %decoded.status.message,
                        "API reported an error"
                    );
                }
                Ok(decoded)
            }
            Err(err) => {
                // Failure envelopes may carry a result that does not fit `T`.
                if let Ok(loose) = serde_json::from_str::<ApiResponse>(&body) {
                    if !loose.is_success() {
                        return Ok(ApiResponse {
                            status: loose.status,
                            result: None,
                            extra: loose.extra,
                        });
                    }
                }

                if status.is_success() {
                    Err(StatusioError::Parse(err))
                } else {
                    Err(StatusioError::Http {
                        status_code: status.as_u16(),
                        body,
                    })
                }
            }
        }
    }
}

/// Check arguments against the table row and fill in defaults.
fn complete_params(spec: &OperationSpec, segments: &[&str], mut params: Params) -> Result<Params> {
    if segments.len() != spec.segments.len() {
        return Err(StatusioError::InvalidArguments {
            operation: spec.name,
            expected: spec.segments.len(),
            actual: segments.len(),
        });
    }

    if let Some((name, _)) = spec
        .segments
        .iter()
        .zip(segments)
        .find(|(_, value)| value.is_empty())
    {
        return Err(StatusioError::InvalidParameter {
            name: (*name).to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if let Some(unknown) = params.keys().find(|key| spec.param(key).is_none()) {
        return Err(StatusioError::UnknownParameter {
            operation: spec.name,
            name: unknown.to_string(),
        });
    }

    for param in spec.params {
        match param.default {
            Some(default) => params.entry_or_default(param.name, default),
            None if params.contains_key(param.name) => {}
            None => {
                return Err(StatusioError::MissingParameter {
                    operation: spec.name,
                    name: param.name,
                })
            }
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ParamValue;

    #[test]
    fn test_client_debug() {
        let client = StatusioClient::new("test-id", "test-key").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("StatusioClient"));
        assert!(debug.contains("base_url"));
        // Credentials should not be in debug output
        assert!(!debug.contains("test-id"));
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn test_versioned_base_url() {
        let client = StatusioClient::new("id", "key").unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.status.io/v2");

        let client1 = StatusioClient::with_options("id", "key", 3, "http://localhost:8080").unwrap();
        let client2 = StatusioClient::with_options("id", "key", 3, "http://localhost:8080/").unwrap();
        assert_eq!(client1.base_url().as_str(), "http://localhost:8080/v3");
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = StatusioClient::with_options("id", "key", 2, "not a url");
        assert!(matches!(result, Err(StatusioError::UrlError(_))));
    }

    #[test]
    fn test_complete_params_fills_defaults() {
        let spec = Operation::SubscriberAdd.spec();
        let params = Params::new()
            .with("statuspage_id", "p1")
            .with("method", "email")
            .with("address", "a@example.com");

        let completed = complete_params(spec, &[], params).unwrap();
        assert_eq!(completed.get("silent"), Some(&ParamValue::from("1")));
        assert_eq!(completed.get("granular"), Some(&ParamValue::from("")));
        assert_eq!(completed.len(), 5);
    }

    #[test]
    fn test_complete_params_keeps_caller_values() {
        let spec = Operation::SubscriberAdd.spec();
        let params = Params::new()
            .with("statuspage_id", "p1")
            .with("method", "sms")
            .with("address", "+15555550100")
            .with("silent", false);

        let completed = complete_params(spec, &[], params).unwrap();
        assert_eq!(completed.get("silent"), Some(&ParamValue::from("0")));
    }

    #[test]
    fn test_complete_params_missing_required() {
        let spec = Operation::SubscriberAdd.spec();
        let params = Params::new().with("statuspage_id", "p1").with("method", "email");

        match complete_params(spec, &[], params) {
            Err(StatusioError::MissingParameter { operation, name }) => {
                assert_eq!(operation, "subscriber_add");
                assert_eq!(name, "address");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_complete_params_unknown_parameter() {
        let spec = Operation::IncidentDelete.spec();
        let params = Params::new()
            .with("statuspage_id", "p1")
            .with("incident_id", "i1")
            .with("force", true);

        assert!(matches!(
            complete_params(spec, &[], params),
            Err(StatusioError::UnknownParameter { ref name, .. }) if name == "force"
        ));
    }

    #[test]
    fn test_complete_params_segment_count() {
        let spec = Operation::IncidentSingle.spec();
        assert!(matches!(
            complete_params(spec, &["p1"], Params::new()),
            Err(StatusioError::InvalidArguments {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        assert!(matches!(
            complete_params(spec, &["p1", ""], Params::new()),
            Err(StatusioError::InvalidParameter { ref name, .. }) if name == "incident_id"
        ));
    }
}
