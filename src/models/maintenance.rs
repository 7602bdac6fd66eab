//! Maintenance model and trait implementations.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::StatusioClient;
use crate::error::{Result, StatusioError};
use crate::models::common::{NotificationOptions, Reference};
use crate::operation::Operation;
use crate::request::Params;
use crate::response::ApiResponse;
use crate::traits::{Get, List, Update};

const DATE_FORMAT: &str = "%Y/%m/%d";
const TIME_FORMAT: &str = "%H:%M";

/// A Status.io maintenance window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    /// The maintenance ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Maintenance title.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub datetime_planned_start: Option<String>,

    #[serde(default)]
    pub datetime_planned_end: Option<String>,

    /// When the maintenance actually started.
    #[serde(default)]
    pub datetime_open: Option<String>,

    /// When the maintenance finished.
    #[serde(default)]
    pub datetime_closed: Option<String>,

    /// Updates posted to the maintenance, oldest first.
    #[serde(default)]
    pub messages: Vec<MaintenanceMessage>,

    #[serde(default, alias = "components")]
    pub components_affected: Vec<Reference>,

    #[serde(default, alias = "containers")]
    pub containers_affected: Vec<Reference>,
}

impl Maintenance {
    /// Returns true once the maintenance has finished.
    pub fn is_finished(&self) -> bool {
        self.datetime_closed.is_some()
    }
}

/// One update posted to a maintenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceMessage {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    #[serde(default)]
    pub details: String,

    #[serde(default)]
    pub datetime: Option<String>,
}

/// Result of the maintenance list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceListing {
    #[serde(default)]
    pub active_maintenances: Vec<Maintenance>,
    #[serde(default)]
    pub upcoming_maintenances: Vec<Maintenance>,
    #[serde(default)]
    pub resolved_maintenances: Vec<Maintenance>,
}

/// When subscribers hear about a scheduled maintenance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaintenanceReminders {
    /// Right away.
    pub now: bool,
    /// One hour before the start.
    pub one_hour: bool,
    /// One day before the start.
    pub one_day: bool,
    /// Three days before the start.
    pub three_days: bool,
}

/// Parameters for scheduling a maintenance.
#[derive(Debug, Clone)]
pub struct MaintenanceSchedule {
    /// Maintenance title.
    pub name: String,
    /// Description shown on the page.
    pub details: String,
    /// Affected `component-container` combos.
    pub infrastructure_affected: Vec<String>,
    /// Planned start, in the page's time zone.
    pub start: NaiveDateTime,
    /// Planned end, in the page's time zone.
    pub end: NaiveDateTime,
    /// Start and finish the maintenance automatically.
    pub automation: bool,
    /// Mark every component as affected.
    pub all_infrastructure_affected: bool,
    pub reminders: MaintenanceReminders,
    /// Subject of notifications; the API default is used when `None`.
    pub message_subject: Option<String>,
}

impl MaintenanceSchedule {
    /// A maintenance with no infrastructure, automation, or reminders.
    pub fn new(
        name: impl Into<String>,
        details: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
            infrastructure_affected: Vec::new(),
            start,
            end,
            automation: false,
            all_infrastructure_affected: false,
            reminders: MaintenanceReminders::default(),
            message_subject: None,
        }
    }

    /// Add an affected `component-container` combo.
    #[must_use]
    pub fn affecting(mut self, combo: impl Into<String>) -> Self {
        self.infrastructure_affected.push(combo.into());
        self
    }

    fn into_params(self, statuspage_id: &str) -> Result<Params> {
        if self.end < self.start {
            return Err(StatusioError::InvalidParameter {
                name: "date_planned_end".to_string(),
                reason: format!("end {} is before start {}", self.end, self.start),
            });
        }

        let mut params = Params::new()
            .with("statuspage_id", statuspage_id)
            .with("maintenance_name", self.name)
            .with("maintenance_details", self.details)
            .with("infrastructure_affected", self.infrastructure_affected)
            .with("date_planned_start", self.start.format(DATE_FORMAT).to_string())
            .with("time_planned_start", self.start.format(TIME_FORMAT).to_string())
            .with("date_planned_end", self.end.format(DATE_FORMAT).to_string())
            .with("time_planned_end", self.end.format(TIME_FORMAT).to_string())
            .with("automation", self.automation)
            .with("all_infrastructure_affected", self.all_infrastructure_affected)
            .with("maintenance_notify_now", self.reminders.now)
            .with("maintenance_notify_1_hr", self.reminders.one_hour)
            .with("maintenance_notify_24_hr", self.reminders.one_day)
            .with("maintenance_notify_72_hr", self.reminders.three_days);
        if let Some(subject) = self.message_subject {
            params.insert("message_subject", subject);
        }
        Ok(params)
    }
}

/// Parameters for starting, updating, or finishing a maintenance.
#[derive(Debug, Clone)]
pub struct MaintenanceChange {
    /// Message body.
    pub details: String,
    /// Channels to notify.
    pub notify: NotificationOptions,
    /// Subject of notifications; `Maintenance Notification` when `None`.
    pub message_subject: Option<String>,
}

impl MaintenanceChange {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
            notify: NotificationOptions::default(),
            message_subject: None,
        }
    }

    fn into_params(self, statuspage_id: &str, maintenance_id: &str) -> Params {
        let mut params = Params::new()
            .with("statuspage_id", statuspage_id)
            .with("maintenance_id", maintenance_id)
            .with("maintenance_details", self.details);
        self.notify.apply(&mut params);
        if let Some(subject) = self.message_subject {
            params.insert("message_subject", subject);
        }
        params
    }
}

#[async_trait]
impl List for Maintenance {
    type Listing = MaintenanceListing;

    #[tracing::instrument(skip(client))]
    async fn list(client: &StatusioClient, statuspage_id: &str) -> Result<ApiResponse<Self::Listing>> {
        client
            .invoke(Operation::MaintenanceList, &[statuspage_id], Params::new())
            .await
    }
}

#[async_trait]
impl Get for Maintenance {
    #[tracing::instrument(skip(client))]
    async fn get(client: &StatusioClient, statuspage_id: &str, id: &str) -> Result<ApiResponse<Self>> {
        client
            .invoke(
                Operation::MaintenanceSingle,
                &[statuspage_id, id],
                Params::new(),
            )
            .await
    }
}

#[async_trait]
impl Update for Maintenance {
    type Params = MaintenanceChange;
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
                Operation::MaintenanceUpdate,
                &[],
                params.into_params(statuspage_id, id),
            )
            .await
    }
}

/// Schedule a maintenance. The result is the new maintenance ID.
///
/// # Errors
///
/// Returns [`StatusioError::InvalidParameter`] if the window ends before it
/// starts, or an error if the request fails.
#[tracing::instrument(skip(client, schedule))]
pub async fn schedule_maintenance(
    client: &StatusioClient,
    statuspage_id: &str,
    schedule: MaintenanceSchedule,
) -> Result<ApiResponse<String>> {
    let params = schedule.into_params(statuspage_id)?;
    client
        .invoke(Operation::MaintenanceSchedule, &[], params)
        .await
}

/// Begin a scheduled maintenance.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client, change))]
pub async fn start_maintenance(
    client: &StatusioClient,
    statuspage_id: &str,
    maintenance_id: &str,
    change: MaintenanceChange,
) -> Result<ApiResponse> {
    client
        .invoke(
            Operation::MaintenanceStart,
            &[],
            change.into_params(statuspage_id, maintenance_id),
        )
        .await
}

/// Close an active maintenance.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client, change))]
pub async fn finish_maintenance(
    client: &StatusioClient,
    statuspage_id: &str,
    maintenance_id: &str,
    change: MaintenanceChange,
) -> Result<ApiResponse> {
    client
        .invoke(
            Operation::MaintenanceFinish,
            &[],
            change.into_params(statuspage_id, maintenance_id),
        )
        .await
}

/// Delete a maintenance.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn delete_maintenance(
    client: &StatusioClient,
    statuspage_id: &str,
    maintenance_id: &str,
) -> Result<ApiResponse> {
    let params = Params::new()
        .with("statuspage_id", statuspage_id)
        .with("maintenance_id", maintenance_id);
    client.invoke(Operation::MaintenanceDelete, &[], params).await
}

/// Fetch a single maintenance message.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn get_maintenance_message(
    client: &StatusioClient,
    statuspage_id: &str,
    message_id: &str,
) -> Result<ApiResponse<MaintenanceMessage>> {
    client
        .invoke(
            Operation::MaintenanceMessage,
            &[statuspage_id, message_id],
            Params::new(),
        )
        .await
}

/// List maintenance IDs of a page (the `maintenances` endpoint).
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn list_maintenance_ids(client: &StatusioClient, statuspage_id: &str) -> Result<ApiResponse> {
    client
        .invoke(
            Operation::MaintenanceListById,
            &[statuspage_id],
            Params::new(),
        )
        .await
}
