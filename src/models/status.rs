//! Status page summary and status codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::StatusioClient;
use crate::error::Result;
use crate::operation::Operation;
use crate::request::{ParamValue, Params};
use crate::response::ApiResponse;

/// Numeric status codes used for components, containers, and incidents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum StatusCode {
    Operational,
    PlannedMaintenance,
    DegradedPerformance,
    PartialServiceDisruption,
    ServiceDisruption,
    SecurityEvent,
}

impl StatusCode {
    /// The wire code, e.g. `100` for operational.
    pub fn code(self) -> u16 {
        match self {
            Self::Operational => 100,
            Self::PlannedMaintenance => 200,
            Self::DegradedPerformance => 300,
            Self::PartialServiceDisruption => 400,
            Self::ServiceDisruption => 500,
            Self::SecurityEvent => 600,
        }
    }

    /// Map a wire code back to a status.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            100 => Some(Self::Operational),
            200 => Some(Self::PlannedMaintenance),
            300 => Some(Self::DegradedPerformance),
            400 => Some(Self::PartialServiceDisruption),
            500 => Some(Self::ServiceDisruption),
            600 => Some(Self::SecurityEvent),
            _ => None,
        }
    }

    /// Label as shown on the status page.
    pub fn label(self) -> &'static str {
        match self {
            Self::Operational => "Operational",
            Self::PlannedMaintenance => "Planned Maintenance",
            Self::DegradedPerformance => "Degraded Performance",
            Self::PartialServiceDisruption => "Partial Service Disruption",
            Self::ServiceDisruption => "Service Disruption",
            Self::SecurityEvent => "Security Event",
        }
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = String;

    fn try_from(code: u16) -> std::result::Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown status code {code}"))
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl From<StatusCode> for ParamValue {
    fn from(status: StatusCode) -> Self {
        Self::from(status.code())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current state of a component or container on the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentState {
    /// Component or container ID.
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// When the state last changed.
    #[serde(default)]
    pub updated: Option<String>,

    /// Status label.
    #[serde(default)]
    pub status: Option<String>,

    /// Numeric status code.
    #[serde(default)]
    pub status_code: Option<u16>,

    /// Containers of this component (empty for containers themselves).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ComponentState>,
}

impl ComponentState {
    /// The status code, if it is a known one.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code.and_then(StatusCode::from_code)
    }

    /// Returns true unless the status code says otherwise.
    pub fn is_operational(&self) -> bool {
        self.status_code
            .map_or(true, |c| c == StatusCode::Operational.code())
    }
}

/// Overall page status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverallStatus {
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Active and upcoming maintenances, as listed on the summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceSummary {
    #[serde(default)]
    pub active: Vec<Value>,
    #[serde(default)]
    pub upcoming: Vec<Value>,
}

/// Result of the status summary endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Page-wide status.
    #[serde(default)]
    pub status_overall: OverallStatus,

    /// Per-component state.
    #[serde(default)]
    pub status: Vec<ComponentState>,

    /// Active incidents.
    #[serde(default)]
    pub incidents: Vec<Value>,

    /// Active and upcoming maintenances.
    #[serde(default)]
    pub maintenance: MaintenanceSummary,
}

impl StatusSummary {
    /// The overall status code, if it is a known one.
    pub fn overall(&self) -> Option<StatusCode> {
        self.status_overall
            .status_code
            .and_then(StatusCode::from_code)
    }

    /// Components that are not operational.
    pub fn degraded(&self) -> impl Iterator<Item = &ComponentState> {
        self.status.iter().filter(|c| !c.is_operational())
    }
}

/// Fetch the public status summary of a page.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn status_summary(
    client: &StatusioClient,
    statuspage_id: &str,
) -> Result<ApiResponse<StatusSummary>> {
    client
        .invoke(Operation::StatusSummary, &[statuspage_id], Params::new())
        .await
}
