//! Update trait for modifying entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::StatusioClient;
use crate::error::Result;
use crate::response::ApiResponse;

/// Update an existing entity of a status page.
///
/// # Example
///
/// ```ignore
/// use statusio::{StatusioClient, Subscriber, SubscriberUpdate, Update};
///
/// let client = StatusioClient::from_env()?;
/// let response = Subscriber::update(
///     &client,
///     "568d8a3e3cada8c2490000dd",
///     "5a1c...",
///     SubscriberUpdate::new("new-address@example.com"),
/// ).await?;
/// assert!(response.is_success());
/// ```
#[async_trait]
pub trait Update: Sized {
    /// Parameters for the update.
    type Params: Send;

    /// Shape of the `result` field returned by the update.
    type Updated: DeserializeOwned + Send;

    /// Apply the update.
    ///
    /// # Arguments
    ///
    /// * `client` - The Status.io API client
    /// * `statuspage_id` - The status page the entity belongs to
    /// * `id` - The entity identifier
    /// * `params` - Update parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be encoded, the request
    /// fails, or the response is not a JSON envelope.
    async fn update(
        client: &StatusioClient,
        statuspage_id: &str,
        id: &str,
        params: Self::Params,
    ) -> Result<ApiResponse<Self::Updated>>;
}
