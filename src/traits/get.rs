//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::StatusioClient;
use crate::error::Result;
use crate::response::ApiResponse;

/// Fetch a single entity of a status page by ID.
///
/// # Example
///
/// ```ignore
/// use statusio::{StatusioClient, Incident, Get};
///
/// let client = StatusioClient::from_env()?;
/// let response = Incident::get(&client, "568d8a3e3cada8c2490000dd", "5a1c...").await?;
/// if let Some(incident) = response.result {
///     println!("{}", incident.name);
/// }
/// ```
#[async_trait]
pub trait Get: Sized {
    /// Fetch the entity.
    ///
    /// # Arguments
    ///
    /// * `client` - The Status.io API client
    /// * `statuspage_id` - The status page the entity belongs to
    /// * `id` - The entity identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a JSON
    /// envelope. A "not found" reported by the API comes back inside the
    /// envelope.
    async fn get(client: &StatusioClient, statuspage_id: &str, id: &str) -> Result<ApiResponse<Self>>;
}
