//! Status.io API client library.
//!
//! A Rust library for the Status.io REST API. Every endpoint is a row in a
//! declarative [`Operation`] table; [`StatusioClient::invoke`] turns a row,
//! its positional identifiers, and a [`Params`] mapping into one HTTP call
//! and decodes the JSON envelope into an [`ApiResponse`].
//!
//! # Quick Start
//!
//! ```no_run
//! use statusio::{Incident, List, StatusioClient};
//!
//! #[tokio::main]
//! async fn main() -> statusio::Result<()> {
//!     // Create client from environment variables
//!     let client = StatusioClient::from_env()?;
//!
//!     // Fetch the public summary of a page
//!     let summary = statusio::status_summary(&client, "568d8a3e3cada8c2490000dd")
//!         .await?
//!         .into_result()?;
//!     println!("{:?}", summary.and_then(|s| s.overall()));
//!
//!     // List incidents
//!     let incidents = Incident::list(&client, "568d8a3e3cada8c2490000dd").await?;
//!     if let Some(listing) = incidents.result {
//!         println!("{} active incidents", listing.active_incidents.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`build_url`], [`encode_parameters`] - URL assembly and query encoding
//! - [`Operation`] - the table of endpoints, verbs, and parameter defaults
//! - [`StatusioClient`] - authentication, dispatch, and the generic invoker
//! - [`Get`], [`List`], [`Update`] - typed access implemented by the models
//!
//! Errors that happen before a JSON envelope is available (bad arguments,
//! transport failures, unparseable bodies) are [`StatusioError`]s. Errors
//! the API reports in `status.error` stay in the [`ApiResponse`]; use
//! [`ApiResponse::into_result`] to turn them into an `Err`.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `STATUSIO_API_ID` (required) - Your API id
//! - `STATUSIO_API_KEY` (required) - Your API key
//! - `STATUSIO_API_VERSION` (optional) - API version (defaults to `2`)
//! - `STATUSIO_API_URL` (optional) - Host (defaults to `https://api.status.io`)

mod client;
mod error;
mod models;
mod operation;
mod request;
mod response;
mod traits;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{StatusioClient, API_ID_HEADER, API_KEY_HEADER};
pub use error::{Result, StatusioError};
pub use operation::{Operation, OperationSpec, ParamSpec, Verb};
pub use request::{build_url, encode_parameters, ParamValue, Params};
pub use response::{ApiResponse, ResponseStatus};

// Re-export traits
pub use traits::{Get, List, Update};

// Re-export models
pub use models::{
    // Shared types
    combo,
    NotificationOptions,
    Reference,
    // Status types
    ComponentState,
    MaintenanceSummary,
    OverallStatus,
    StatusCode,
    StatusSummary,
    // Component types
    Component,
    ComponentStatusUpdate,
    Container,
    // Incident types
    Incident,
    IncidentChange,
    IncidentCreate,
    IncidentListing,
    IncidentMessage,
    IncidentState,
    // Maintenance types
    Maintenance,
    MaintenanceChange,
    MaintenanceListing,
    MaintenanceMessage,
    MaintenanceReminders,
    MaintenanceSchedule,
    // Metric types
    MetricSeries,
    MetricUpdate,
    // Subscriber types
    Subscriber,
    SubscriberAdd,
    SubscriberListing,
    SubscriberMethod,
    SubscriberUpdate,
};

// Re-export convenience functions
pub use models::{status_summary, update_component_status};
pub use models::{
    create_incident, delete_incident, get_incident_message, list_incident_ids, resolve_incident,
};
pub use models::{
    delete_maintenance, finish_maintenance, get_maintenance_message, list_maintenance_ids,
    schedule_maintenance, start_maintenance,
};
pub use models::update_metric;
pub use models::{add_subscriber, remove_subscriber};
