//! Mock Status.io API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Status.io
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests,
//! enabling realistic workflow testing (open an incident, watch the summary
//! degrade, resolve it).
//!
//! # Example
//!
//! ```ignore
//! use statusio::mock_server::{Fixtures, MockServer};
//! use statusio::{status_summary, StatusioClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = StatusioClient::with_options("id", "key", 2, server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let summary = status_summary(&client, Fixtures::STATUSPAGE_ID).await.unwrap();
//!     assert!(summary.is_success());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::{MaintenanceTransition, MockError, MockResult, MockState, PageData};
