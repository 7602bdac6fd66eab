//! Incident model and trait implementations.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::StatusioClient;
use crate::error::Result;
use crate::models::common::{NotificationOptions, Reference};
use crate::models::status::StatusCode;
use crate::operation::Operation;
use crate::request::{ParamValue, Params};
use crate::response::ApiResponse;
use crate::traits::{Get, List, Update};

/// Progress of an incident investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum IncidentState {
    Investigating,
    Identified,
    Monitoring,
}

impl IncidentState {
    /// The wire code.
    pub fn code(self) -> u16 {
        match self {
            Self::Investigating => 100,
            Self::Identified => 200,
            Self::Monitoring => 300,
        }
    }

    /// Map a wire code back to a state.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            100 => Some(Self::Investigating),
            200 => Some(Self::Identified),
            300 => Some(Self::Monitoring),
            _ => None,
        }
    }
}

impl TryFrom<u16> for IncidentState {
    type Error = String;

    fn try_from(code: u16) -> std::result::Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown incident state {code}"))
    }
}

impl From<IncidentState> for u16 {
    fn from(state: IncidentState) -> Self {
        state.code()
    }
}

impl From<IncidentState> for ParamValue {
    fn from(state: IncidentState) -> Self {
        Self::from(state.code())
    }
}

impl fmt::Display for IncidentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Investigating => "Investigating",
            Self::Identified => "Identified",
            Self::Monitoring => "Monitoring",
        })
    }
}

/// A Status.io incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// The incident ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Incident title.
    #[serde(default)]
    pub name: String,

    /// When the incident was opened.
    #[serde(default)]
    pub datetime_open: Option<String>,

    /// When the incident was resolved.
    #[serde(default)]
    pub datetime_closed: Option<String>,

    /// Updates posted to the incident, oldest first.
    #[serde(default)]
    pub messages: Vec<IncidentMessage>,

    /// Affected components.
    #[serde(default, alias = "components")]
    pub components_affected: Vec<Reference>,

    /// Affected containers.
    #[serde(default, alias = "containers")]
    pub containers_affected: Vec<Reference>,
}

impl Incident {
    /// The most recent update.
    pub fn latest_message(&self) -> Option<&IncidentMessage> {
        self.messages.last()
    }

    /// Returns true once the incident has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.datetime_closed.is_some()
    }
}

/// One update posted to an incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentMessage {
    /// The message ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Message body.
    #[serde(default)]
    pub details: String,

    /// When the message was posted.
    #[serde(default)]
    pub datetime: Option<String>,

    /// Incident state code at the time.
    #[serde(default)]
    pub state: Option<u16>,

    /// Status code at the time.
    #[serde(default)]
    pub status: Option<u16>,
}

/// Result of the incident list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentListing {
    #[serde(default)]
    pub active_incidents: Vec<Incident>,
    #[serde(default)]
    pub resolved_incidents: Vec<Incident>,
}

/// Parameters for opening an incident.
#[derive(Debug, Clone)]
pub struct IncidentCreate {
    /// Incident title.
    pub name: String,
    /// First message.
    pub details: String,
    /// Affected `component-container` combos.
    pub infrastructure_affected: Vec<String>,
    /// Status shown for the affected infrastructure.
    pub current_status: StatusCode,
    /// Investigation state.
    pub current_state: IncidentState,
    /// Channels to notify.
    pub notify: NotificationOptions,
    /// Mark every component as affected.
    pub all_infrastructure_affected: bool,
    /// Subject of notifications; the API default is used when `None`.
    pub message_subject: Option<String>,
}

impl IncidentCreate {
    /// Start an incident with no infrastructure and no notifications.
    pub fn new(
        name: impl Into<String>,
        details: impl Into<String>,
        current_status: StatusCode,
        current_state: IncidentState,
    ) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
            infrastructure_affected: Vec::new(),
            current_status,
            current_state,
            notify: NotificationOptions::default(),
            all_infrastructure_affected: false,
            message_subject: None,
        }
    }

    /// Add an affected `component-container` combo.
    #[must_use]
    pub fn affecting(mut self, combo: impl Into<String>) -> Self {
        self.infrastructure_affected.push(combo.into());
        self
    }

    fn into_params(self, statuspage_id: &str) -> Params {
        let mut params = Params::new()
            .with("statuspage_id", statuspage_id)
            .with("incident_name", self.name)
            .with("incident_details", self.details)
            .with("infrastructure_affected", self.infrastructure_affected)
            .with("current_status", self.current_status)
            .with("current_state", self.current_state)
            .with("all_infrastructure_affected", self.all_infrastructure_affected);
        self.notify.apply(&mut params);
        if let Some(subject) = self.message_subject {
            params.insert("message_subject", subject);
        }
        params
    }
}

/// Parameters for posting an update to, or resolving, an incident.
#[derive(Debug, Clone)]
pub struct IncidentChange {
    /// Message body.
    pub details: String,
    /// Status shown for the affected infrastructure.
    pub current_status: StatusCode,
    /// Investigation state.
    pub current_state: IncidentState,
    /// Channels to notify.
    pub notify: NotificationOptions,
    /// Subject of notifications; the API default is used when `None`.
    pub message_subject: Option<String>,
}

impl IncidentChange {
    /// An update with no notifications.
    pub fn new(details: impl Into<String>, current_status: StatusCode, current_state: IncidentState) -> Self {
        Self {
            details: details.into(),
            current_status,
            current_state,
            notify: NotificationOptions::default(),
            message_subject: None,
        }
    }

    fn into_params(self, statuspage_id: &str, incident_id: &str) -> Params {
        let mut params = Params::new()
            .with("statuspage_id", statuspage_id)
            .with("incident_id", incident_id)
            .with("incident_details", self.details)
            .with("current_status", self.current_status)
            .with("current_state", self.current_state);
        self.notify.apply(&mut params);
        if let Some(subject) = self.message_subject {
            params.insert("message_subject", subject);
        }
        params
    }
}

#[async_trait]
impl List for Incident {
    type Listing = IncidentListing;

    #[tracing::instrument(skip(client))]
    async fn list(client: &StatusioClient, statuspage_id: &str) -> Result<ApiResponse<Self::Listing>> {
        client
            .invoke(Operation::IncidentList, &[statuspage_id], Params::new())
            .await
    }
}

#[async_trait]
impl Get for Incident {
    #[tracing::instrument(skip(client))]
    async fn get(client: &StatusioClient, statuspage_id: &str, id: &str) -> Result<ApiResponse<Self>> {
        client
            .invoke(Operation::IncidentSingle, &[statuspage_id, id], Params::new())
            .await
    }
}

#[async_trait]
impl Update for Incident {
    type Params = IncidentChange;
    type Updated = Value;

    #[tracing::instrument(skip(client, params))]
    async fn update(
        client: &StatusioClient,
        statuspage_id: &str,
        id: &str,
        params: Self::Params,
    ) -> Result<ApiResponse<Self::Updated>> {
        client
            .invoke(
                Operation::IncidentUpdate,
                &[],
                params.into_params(statuspage_id, id),
            )
            .await
    }
}

/// Open an incident. The result is the new incident ID.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client, incident))]
pub async fn create_incident(
    client: &StatusioClient,
    statuspage_id: &str,
    incident: IncidentCreate,
) -> Result<ApiResponse<String>> {
    client
        .invoke(
            Operation::IncidentCreate,
            &[],
            incident.into_params(statuspage_id),
        )
        .await
}

/// Resolve an incident with a closing message.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client, change))]
pub async fn resolve_incident(
    client: &StatusioClient,
    statuspage_id: &str,
    incident_id: &str,
    change: IncidentChange,
) -> Result<ApiResponse> {
    client
        .invoke(
            Operation::IncidentResolve,
            &[],
            change.into_params(statuspage_id, incident_id),
        )
        .await
}

/// Delete an incident.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn delete_incident(
    client: &StatusioClient,
    statuspage_id: &str,
    incident_id: &str,
) -> Result<ApiResponse> {
    let params = Params::new()
        .with("statuspage_id", statuspage_id)
        .with("incident_id", incident_id);
    client.invoke(Operation::IncidentDelete, &[], params).await
}

/// Fetch a single incident message.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn get_incident_message(
    client: &StatusioClient,
    statuspage_id: &str,
    message_id: &str,
) -> Result<ApiResponse<IncidentMessage>> {
    client
        .invoke(
            Operation::IncidentMessage,
            &[statuspage_id, message_id],
            Params::new(),
        )
        .await
}

/// List incident IDs of a page (the `incidents` endpoint).
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn list_incident_ids(client: &StatusioClient, statuspage_id: &str) -> Result<ApiResponse> {
    client
        .invoke(Operation::IncidentListById, &[statuspage_id], Params::new())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_deserialize() {
        let json = r#"{
            "_id": "i1",
            "name": "API outage",
            "datetime_open": "2024-01-01T00:00:00.000Z",
            "components_affected": [{"_id": "c1", "name": "API"}],
            "containers_affected": ["k1"],
            "messages": [
                {"_id": "m1", "details": "Looking into it", "state": 100, "status": 500},
                {"_id": "m2", "details": "Found it", "state": 200, "status": 500}
            ]
        }"#;
        let incident: Incident = serde_json::from_str(json).unwrap();
        assert_eq!(incident.id, "i1");
        assert!(!incident.is_resolved());
        assert_eq!(incident.latest_message().unwrap().id, "m2");
        assert_eq!(incident.components_affected[0].name.as_deref(), Some("API"));
        assert_eq!(incident.containers_affected[0].id, "k1");
    }

    #[test]
    fn test_listing_defaults() {
        let listing: IncidentListing =
            serde_json::from_str(r#"{"active_incidents": [{"_id": "i1"}]}"#).unwrap();
        assert_eq!(listing.active_incidents.len(), 1);
        assert!(listing.resolved_incidents.is_empty());
    }

    #[test]
    fn test_create_params() {
        let params = IncidentCreate::new(
            "Autotest",
            "Autotest details",
            StatusCode::DegradedPerformance,
            IncidentState::Investigating,
        )
        .affecting("c1-k1")
        .into_params("p1");

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({
                "statuspage_id": "p1",
                "incident_name": "Autotest",
                "incident_details": "Autotest details",
                "infrastructure_affected": ["c1-k1"],
                "current_status": 300,
                "current_state": 100,
                "all_infrastructure_affected": "0",
                "notify_email": "0",
                "notify_sms": "0",
                "notify_webhook": "0",
                "social": "0",
                "irc": "0",
                "hipchat": "0",
                "msteams": "0",
                "slack": "0"
            })
        );
    }

    #[test]
    fn test_change_params_with_subject() {
        let mut change = IncidentChange::new(
            "Fixed",
            StatusCode::Operational,
            IncidentState::Monitoring,
        );
        change.message_subject = Some("All clear".to_string());
        change.notify.email = true;

        let params = change.into_params("p1", "i1");
        assert_eq!(params.get("incident_id"), Some(&ParamValue::from("i1")));
        assert_eq!(params.get("current_state"), Some(&ParamValue::from(300u16)));
        assert_eq!(params.get("notify_email"), Some(&ParamValue::from("1")));
        assert_eq!(params.get("message_subject"), Some(&ParamValue::from("All clear")));
    }

    #[test]
    fn test_incident_state_codes() {
        assert_eq!(IncidentState::from_code(200), Some(IncidentState::Identified));
        assert_eq!(IncidentState::from_code(400), None);
        assert_eq!(IncidentState::Monitoring.to_string(), "Monitoring");
    }
}
