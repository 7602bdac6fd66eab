//! Maintenance endpoint handlers.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};

use super::{envelope, Body, SharedState};
use crate::mock_server::state::{MaintenanceTransition, MockError, MockResult};

fn planned(body: &Body, which: &str) -> MockResult<NaiveDateTime> {
    let date = body.text(&format!("date_planned_{which}"))?;
    let time = body.text(&format!("time_planned_{which}"))?;
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y/%m/%d %H:%M").map_err(|_| {
        MockError::bad_request(format!("Invalid planned {which}: {date} {time}"))
    })
}

/// GET /v2/maintenance/list/{statuspage_id}
pub async fn list_maintenances(
    State(state): State<SharedState>,
    Path(statuspage_id): Path<String>,
) -> MockResult<Response> {
    let state = state.read().await;
    let page = state.page(&statuspage_id)?;

    let mut active = Vec::new();
    let mut upcoming = Vec::new();
    let mut resolved = Vec::new();
    for maintenance in &page.maintenances {
        if maintenance.is_finished() {
            resolved.push(maintenance);
        } else if maintenance.datetime_open.is_some() {
            active.push(maintenance);
        } else {
            upcoming.push(maintenance);
        }
    }

    Ok(envelope(json!({
        "active_maintenances": active,
        "upcoming_maintenances": upcoming,
        "resolved_maintenances": resolved,
    })))
}

/// GET /v2/maintenances/{statuspage_id}
pub async fn list_maintenance_ids(
    State(state): State<SharedState>,
    Path(statuspage_id): Path<String>,
) -> MockResult<Response> {
    let state = state.read().await;
    let ids: Vec<&str> = state
        .page(&statuspage_id)?
        .maintenances
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    Ok(envelope(ids))
}

/// GET /v2/maintenance/message/{statuspage_id}/{message_id}
pub async fn get_maintenance_message(
    State(state): State<SharedState>,
    Path((statuspage_id, message_id)): Path<(String, String)>,
) -> MockResult<Response> {
    let state = state.read().await;
    Ok(envelope(state.maintenance_message(&statuspage_id, &message_id)?))
}

/// GET /v2/maintenance/{statuspage_id}/{maintenance_id}
pub async fn get_maintenance(
    State(state): State<SharedState>,
    Path((statuspage_id, maintenance_id)): Path<(String, String)>,
) -> MockResult<Response> {
    let state = state.read().await;
    Ok(envelope(state.maintenance(&statuspage_id, &maintenance_id)?))
}

/// POST /v2/maintenance/schedule
pub async fn schedule_maintenance(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let name = body.text("maintenance_name")?;
    let details = body.text("maintenance_details")?;
    let start = planned(&body, "start")?;
    let end = planned(&body, "end")?;

    let mut state = state.write().await;
    let maintenance_id = state.schedule_maintenance(
        &statuspage_id,
        &name,
        &details,
        &body.list("infrastructure_affected"),
        body.flag("all_infrastructure_affected"),
        start,
        end,
    )?;
    Ok(envelope(maintenance_id))
}

async fn transition(
    state: SharedState,
    body: Body,
    transition: MaintenanceTransition,
) -> MockResult<Response> {
    let statuspage_id = body.text("statuspage_id")?;
    let maintenance_id = body.text("maintenance_id")?;
    let details = body.text("maintenance_details")?;

    let mut state = state.write().await;
    state.transition_maintenance(&statuspage_id, &maintenance_id, &details, transition)?;
    Ok(envelope(true))
}

/// POST /v2/maintenance/start
pub async fn start_maintenance(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    transition(state, Body(body), MaintenanceTransition::Start).await
}

/// POST /v2/maintenance/update
pub async fn update_maintenance(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    transition(state, Body(body), MaintenanceTransition::Update).await
}

/// POST /v2/maintenance/finish
pub async fn finish_maintenance(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    transition(state, Body(body), MaintenanceTransition::Finish).await
}

/// POST /v2/maintenance/delete
pub async fn delete_maintenance(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let maintenance_id = body.text("maintenance_id")?;

    let mut state = state.write().await;
    state.delete_maintenance(&statuspage_id, &maintenance_id)?;
    Ok(envelope(true))
}
