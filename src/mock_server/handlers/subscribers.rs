//! Subscriber and metric endpoint handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use super::{envelope, Body, SharedState};
use crate::mock_server::state::{MockError, MockResult};
use crate::SubscriberMethod;

/// GET /v2/subscriber/list/{statuspage_id}
pub async fn list_subscribers(
    State(state): State<SharedState>,
    Path(statuspage_id): Path<String>,
) -> MockResult<Response> {
    let state = state.read().await;
    let page = state.page(&statuspage_id)?;

    let of = |method: SubscriberMethod| -> Vec<Value> {
        page.subscribers
            .iter()
            .filter(|(m, _)| *m == method)
            .filter_map(|(_, s)| serde_json::to_value(s).ok())
            .collect()
    };

    Ok(envelope(json!({
        "email": of(SubscriberMethod::Email),
        "sms": of(SubscriberMethod::Sms),
        "webhook": of(SubscriberMethod::Webhook),
    })))
}

/// POST /v2/subscriber/add
///
/// The new ID is returned next to `status`, not in `result`.
pub async fn add_subscriber(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let method: SubscriberMethod = body
        .text("method")?
        .parse()
        .map_err(|e: crate::StatusioError| MockError::bad_request(e.to_string()))?;
    let address = body.text("address")?;

    let mut state = state.write().await;
    let subscriber_id =
        state.add_subscriber(&statuspage_id, method, &address, body.list("granular"))?;

    Ok(Json(json!({
        "status": {"error": "no", "message": "OK"},
        "subscriber_id": subscriber_id
    }))
    .into_response())
}

/// PATCH /v2/subscriber/update
pub async fn update_subscriber(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let subscriber_id = body.text("subscriber_id")?;
    let address = body.text("address")?;

    let mut state = state.write().await;
    state.update_subscriber(&statuspage_id, &subscriber_id, &address, body.list("granular"))?;
    Ok(envelope(true))
}

/// DELETE /v2/subscriber/remove/{statuspage_id}/{subscriber_id}
pub async fn remove_subscriber(
    State(state): State<SharedState>,
    Path((statuspage_id, subscriber_id)): Path<(String, String)>,
) -> MockResult<Response> {
    let mut state = state.write().await;
    state.remove_subscriber(&statuspage_id, &subscriber_id)?;
    Ok(envelope(true))
}

/// POST /v2/metric/update
pub async fn update_metric(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> MockResult<Response> {
    let body = Body(body);
    let statuspage_id = body.text("statuspage_id")?;
    let metric_id = body.text("metric_id")?;

    for window in ["day", "week", "month"] {
        let dates = body.list(&format!("{window}_dates"));
        let values = body.list(&format!("{window}_values"));
        if dates.len() != values.len() {
            return Err(MockError::bad_request(format!(
                "{window}_dates and {window}_values differ in length"
            )));
        }
    }

    let mut state = state.write().await;
    state.update_metric(&statuspage_id, &metric_id, Value::Object(body.0))?;
    Ok(envelope(true))
}
