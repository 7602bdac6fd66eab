//! Status summary and component endpoint handlers.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde_json::{Map, Value};

use super::{envelope, Body, SharedState};
use crate::mock_server::state::{MockError, MockResult};

/// GET /v2/status/summary/{statuspage_id}
pub async fn status_summary(
    State(state): State<SharedState>,
    Path(statuspage_id): Path<String>,
) -> MockResult<Response> {
    let state = state.read().await;
    Ok(envelope(state.summary(&statuspage_id)?))
}

/// GET /v2/component/list/{statuspage_id}
pub async fn list_components(
    State(state): State<SharedState>,
    Path(statuspage_id): Path<String>,
) -> MockResult<Response> {
    let state = state.read().await;
    Ok(envelope(&state.page(&statuspage_id)?.components))
}

/// POST /v2/component/status/update
pub async fn update_component_status(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let component = body.text("component")?;
    let container = body.text("container")?;
    body.text("details")?;
    let code = body.code("current_status")?;
    if crate::StatusCode::from_code(code).is_none() {
        return Err(MockError::bad_request(format!("Unknown status code: {code}")));
    }

    let mut state = state.write().await;
    state.set_component_status(&statuspage_id, &component, &container, code)?;
    Ok(envelope(true))
}
