//! List trait for fetching the entities of a status page.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::StatusioClient;
use crate::error::Result;
use crate::response::ApiResponse;

/// List the entities of a status page.
///
/// Status.io does not paginate: one call returns everything, grouped the way
/// the endpoint groups it (see [`List::Listing`]).
///
/// # Example
///
/// ```ignore
/// use statusio::{StatusioClient, Component, List};
///
/// let client = StatusioClient::from_env()?;
/// let components = Component::list(&client, "568d8a3e3cada8c2490000dd").await?;
/// for component in components.result.unwrap_or_default() {
///     println!("{}", component.name);
/// }
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Shape of the `result` field for this listing.
    type Listing: DeserializeOwned + Send;

    /// List everything on the status page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a JSON
    /// envelope.
    async fn list(client: &StatusioClient, statuspage_id: &str) -> Result<ApiResponse<Self::Listing>>;
}
