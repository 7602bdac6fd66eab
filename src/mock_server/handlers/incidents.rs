//! Incident endpoint handlers.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde_json::{json, Map, Value};

use super::{envelope, Body, SharedState};
use crate::mock_server::state::MockResult;

/// GET /v2/incident/list/{statuspage_id}
pub async fn list_incidents(
    State(state): State<SharedState>,
    Path(statuspage_id): Path<String>,
) -> MockResult<Response> {
    let state = state.read().await;
    let page = state.page(&statuspage_id)?;
    let (resolved, active): (Vec<_>, Vec<_>) = page.incidents.iter().partition(|i| i.is_resolved());
    Ok(envelope(json!({
        "active_incidents": active,
        "resolved_incidents": resolved,
    })))
}

/// GET /v2/incidents/{statuspage_id}
pub async fn list_incident_ids(
    State(state): State<SharedState>,
    Path(statuspage_id): Path<String>,
) -> MockResult<Response> {
    let state = state.read().await;
    let ids: Vec<&str> = state
        .page(&statuspage_id)?
        .incidents
        .iter()
        .map(|i| i.id.as_str())
        .collect();
    Ok(envelope(ids))
}

/// GET /v2/incident/message/{statuspage_id}/{message_id}
pub async fn get_incident_message(
    State(state): State<SharedState>,
    Path((statuspage_id, message_id)): Path<(String, String)>,
) -> MockResult<Response> {
    let state = state.read().await;
    Ok(envelope(state.incident_message(&statuspage_id, &message_id)?))
}

/// GET /v2/incident/{statuspage_id}/{incident_id}
pub async fn get_incident(
    State(state): State<SharedState>,
    Path((statuspage_id, incident_id)): Path<(String, String)>,
) -> MockResult<Response> {
    let state = state.read().await;
    Ok(envelope(state.incident(&statuspage_id, &incident_id)?))
}

/// POST /v2/incident/create
pub async fn create_incident(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let name = body.text("incident_name")?;
    let details = body.text("incident_details")?;
    let status = body.code("current_status")?;
    let current_state = body.code("current_state")?;

    let mut state = state.write().await;
    let incident_id = state.create_incident(
        &statuspage_id,
        &name,
        &details,
        &body.list("infrastructure_affected"),
        body.flag("all_infrastructure_affected"),
        status,
        current_state,
    )?;
    Ok(envelope(incident_id))
}

async fn post_message(state: SharedState, body: Body, resolve: bool) -> MockResult<Response> {
    let statuspage_id = body.text("statuspage_id")?;
    let incident_id = body.text("incident_id")?;
    let details = body.text("incident_details")?;
    let status = body.code("current_status")?;
    let current_state = body.code("current_state")?;

    let mut state = state.write().await;
    state.add_incident_message(
        &statuspage_id,
        &incident_id,
        &details,
        status,
        current_state,
        resolve,
    )?;
    Ok(envelope(true))
}

/// POST /v2/incident/update
pub async fn update_incident(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    post_message(state, Body(body), false).await
}

/// POST /v2/incident/resolve
pub async fn resolve_incident(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    post_message(state, Body(body), true).await
}

/// POST /v2/incident/delete
pub async fn delete_incident(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let incident_id = body.text("incident_id")?;

    let mut state = state.write().await;
    state.delete_incident(&statuspage_id, &incident_id)?;
    Ok(envelope(true))
}
