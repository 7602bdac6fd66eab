//! Mock Status.io API server.
//!
//! Provides an axum-based HTTP server that simulates the Status.io API.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;
use crate::{API_ID_HEADER, API_KEY_HEADER};

/// A mock Status.io API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation. Routes live under `/v2`.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_scenario()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server, without the version path.
    ///
    /// Pass this as the `base_url` of [`StatusioClient::with_options`] with
    /// version `2`.
    ///
    /// [`StatusioClient::with_options`]: crate::StatusioClient::with_options
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Status & component routes
            .route("/v2/status/summary/:statuspage_id", get(handlers::status_summary))
            .route("/v2/component/list/:statuspage_id", get(handlers::list_components))
            .route(
                "/v2/component/status/update",
                post(handlers::update_component_status),
            )
            // Incident routes
            .route("/v2/incident/list/:statuspage_id", get(handlers::list_incidents))
            .route("/v2/incidents/:statuspage_id", get(handlers::list_incident_ids))
            .route(
                "/v2/incident/message/:statuspage_id/:message_id",
                get(handlers::get_incident_message),
            )
            .route(
                "/v2/incident/:statuspage_id/:incident_id",
                get(handlers::get_incident),
            )
            .route("/v2/incident/create", post(handlers::create_incident))
            .route("/v2/incident/update", post(handlers::update_incident))
            .route("/v2/incident/resolve", post(handlers::resolve_incident))
            .route("/v2/incident/delete", post(handlers::delete_incident))
            // Maintenance routes
            .route(
                "/v2/maintenance/list/:statuspage_id",
                get(handlers::list_maintenances),
            )
            .route(
                "/v2/maintenances/:statuspage_id",
                get(handlers::list_maintenance_ids),
            )
            .route(
                "/v2/maintenance/message/:statuspage_id/:message_id",
                get(handlers::get_maintenance_message),
            )
            .route(
                "/v2/maintenance/:statuspage_id/:maintenance_id",
                get(handlers::get_maintenance),
            )
            .route(
                "/v2/maintenance/schedule",
                post(handlers::schedule_maintenance),
            )
            .route("/v2/maintenance/start", post(handlers::start_maintenance))
            .route("/v2/maintenance/update", post(handlers::update_maintenance))
            .route("/v2/maintenance/finish", post(handlers::finish_maintenance))
            .route("/v2/maintenance/delete", post(handlers::delete_maintenance))
            // Metric routes
            .route("/v2/metric/update", post(handlers::update_metric))
            // Subscriber routes
            .route(
                "/v2/subscriber/list/:statuspage_id",
                get(handlers::list_subscribers),
            )
            .route("/v2/subscriber/add", post(handlers::add_subscriber))
            .route("/v2/subscriber/update", patch(handlers::update_subscriber))
            .route(
                "/v2/subscriber/remove/:statuspage_id/:subscriber_id",
                delete(handlers::remove_subscriber),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_credentials,
            ))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Reject requests without valid `x-api-id`/`x-api-key` headers.
async fn require_credentials(
    State(state): State<Arc<RwLock<MockState>>>,
    request: Request,
    next: Next,
) -> Response {
    let api_id = header(&request, API_ID_HEADER);
    let api_key = header(&request, API_KEY_HEADER);

    let authorized = state
        .read()
        .await
        .authorize(api_id.as_deref(), api_key.as_deref());

    match authorized {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
