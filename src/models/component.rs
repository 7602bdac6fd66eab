//! Component model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::StatusioClient;
use crate::error::Result;
use crate::models::common::combo;
use crate::models::status::StatusCode;
use crate::operation::Operation;
use crate::request::Params;
use crate::response::ApiResponse;
use crate::traits::List;

/// A component of a status page.
///
/// Components group containers (regions, data centers, ...). Incidents and
/// maintenances reference the pair as a `component-container` combo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// The component ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Containers the component is deployed in.
    #[serde(default)]
    pub containers: Vec<Container>,
}

/// A container of a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    /// The container ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Component {
    /// All `component-container` combos of this component.
    pub fn combos(&self) -> Vec<String> {
        self.containers
            .iter()
            .map(|container| combo(&self.id, &container.id))
            .collect()
    }

    /// Find a container by name (case-insensitive).
    pub fn container_named(&self, name: &str) -> Option<&Container> {
        self.containers
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Parameters for changing a component's status without an incident.
#[derive(Debug, Clone)]
pub struct ComponentStatusUpdate {
    /// Component ID.
    pub component: String,
    /// Container ID.
    pub container: String,
    /// Short message describing the change.
    pub details: String,
    /// New status.
    pub current_status: StatusCode,
}

impl ComponentStatusUpdate {
    fn into_params(self, statuspage_id: &str) -> Params {
        Params::new()
            .with("statuspage_id", statuspage_id)
            .with("component", self.component)
            .with("container", self.container)
            .with("details", self.details)
            .with("current_status", self.current_status)
    }
}

#[async_trait]
impl List for Component {
    type Listing = Vec<Component>;

    #[tracing::instrument(skip(client))]
    async fn list(client: &StatusioClient, statuspage_id: &str) -> Result<ApiResponse<Self::Listing>> {
        client
            .invoke(Operation::ComponentList, &[statuspage_id], Params::new())
            .await
    }
}

/// Change the status of one component/container pair.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn update_component_status(
    client: &StatusioClient,
    statuspage_id: &str,
    update: ComponentStatusUpdate,
) -> Result<ApiResponse> {
    client
        .invoke(
            Operation::ComponentStatusUpdate,
            &[],
            update.into_params(statuspage_id),
        )
        .await
}
