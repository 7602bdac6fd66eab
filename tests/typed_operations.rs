//! Execution tests for the typed operation layer.
//!
//! Uses wiremock to mock the Status.io API and check the request each typed
//! wrapper produces, then the decoded result.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use statusio::{
    add_subscriber, create_incident, delete_maintenance, finish_maintenance,
    get_maintenance_message, list_incident_ids, list_maintenance_ids, remove_subscriber,
    resolve_incident,
    schedule_maintenance, update_component_status, update_metric, Component,
    ComponentStatusUpdate, Get, Incident, IncidentChange, IncidentCreate, IncidentState, List,
    Maintenance, MaintenanceChange, MaintenanceSchedule, MetricSeries, MetricUpdate, StatusCode,
    StatusioClient, StatusioError, Subscriber, SubscriberAdd, SubscriberMethod, SubscriberUpdate,
    Update,
};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = "568d8a3e3cada8c2490000dd";

fn client(server: &MockServer) -> StatusioClient {
    StatusioClient::with_options("test-id", "test-key", 2, &server.uri()).unwrap()
}

fn ok_envelope(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": {"error": "no", "message": "OK"},
        "result": result
    }))
}

fn notify_off() -> serde_json::Value {
    json!({
        "notify_email": "0",
        "notify_sms": "0",
        "notify_webhook": "0",
        "social": "0",
        "irc": "0",
        "hipchat": "0",
        "msteams": "0",
        "slack": "0"
    })
}

// =============================================================================
// Components
// =============================================================================

#[tokio::test]
async fn test_list_components() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v2/component/list/{PAGE}")))
        .respond_with(ok_envelope(json!([
            {"_id": "c1", "name": "API", "containers": [{"_id": "k1", "name": "US East"}]}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let components = Component::list(&client(&mock_server), PAGE)
        .await
        .unwrap()
        .into_result()
        .unwrap()
        .unwrap();

    assert_eq!(components.len(), 1);
    assert_eq!(components[0].combos(), vec!["c1-k1"]);
}

#[tokio::test]
async fn test_update_component_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/component/status/update"))
        .and(body_json(json!({
            "statuspage_id": PAGE,
            "component": "c1",
            "container": "k1",
            "details": "Slow responses",
            "current_status": 300
        })))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = update_component_status(
        &client(&mock_server),
        PAGE,
        ComponentStatusUpdate {
            component: "c1".to_string(),
            container: "k1".to_string(),
            details: "Slow responses".to_string(),
            current_status: StatusCode::DegradedPerformance,
        },
    )
    .await
    .unwrap();

    assert!(response.is_success());
}

// =============================================================================
// Incidents
// =============================================================================

#[tokio::test]
async fn test_create_incident_sends_defaults() {
    let mock_server = MockServer::start().await;

    let mut expected = json!({
        "statuspage_id": PAGE,
        "infrastructure_affected": ["c1-k1", "c1-k2"],
        "incident_name": "API outage",
        "incident_details": "We are investigating.",
        "current_status": 500,
        "current_state": 100,
        "all_infrastructure_affected": "0",
        "message_subject": "Status Notification"
    });
    for (key, value) in notify_off().as_object().unwrap() {
        expected[key] = value.clone();
    }

    Mock::given(method("POST"))
        .and(path("/v2/incident/create"))
        .and(body_json(expected))
        .respond_with(ok_envelope(json!("i1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let incident = IncidentCreate::new(
        "API outage",
        "We are investigating.",
        StatusCode::ServiceDisruption,
        IncidentState::Investigating,
    )
    .affecting("c1-k1")
    .affecting("c1-k2");

    let id = create_incident(&client(&mock_server), PAGE, incident)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(id.as_deref(), Some("i1"));
}

#[tokio::test]
async fn test_update_and_resolve_incident() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/incident/update"))
        .and(body_partial_json(json!({
            "incident_id": "i1",
            "current_state": 200,
            "notify_email": "1",
            "message_subject": "Status Notification"
        })))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/incident/resolve"))
        .and(body_partial_json(json!({
            "incident_id": "i1",
            "current_status": 100,
            "current_state": 300,
            "message_subject": "Resolved"
        })))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);

    let mut change = IncidentChange::new(
        "Root cause identified",
        StatusCode::ServiceDisruption,
        IncidentState::Identified,
    );
    change.notify.email = true;
    let updated = Incident::update(&client, PAGE, "i1", change).await.unwrap();
    assert!(updated.is_success());

    let mut change = IncidentChange::new("Fixed", StatusCode::Operational, IncidentState::Monitoring);
    change.message_subject = Some("Resolved".to_string());
    let resolved = resolve_incident(&client, PAGE, "i1", change).await.unwrap();
    assert!(resolved.is_success());
}

#[tokio::test]
async fn test_list_and_get_incidents() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v2/incident/list/{PAGE}")))
        .respond_with(ok_envelope(json!({
            "active_incidents": [{"_id": "i1", "name": "API outage"}],
            "resolved_incidents": []
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v2/incident/{PAGE}/i1")))
        .respond_with(ok_envelope(json!({
            "_id": "i1",
            "name": "API outage",
            "messages": [{"_id": "m1", "details": "Investigating", "state": 100, "status": 500}]
        })))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);

    let listing = Incident::list(&client, PAGE).await.unwrap().result.unwrap();
    assert_eq!(listing.active_incidents[0].id, "i1");
    assert!(listing.resolved_incidents.is_empty());

    let incident = Incident::get(&client, PAGE, "i1").await.unwrap().result.unwrap();
    assert_eq!(incident.latest_message().unwrap().details, "Investigating");
}

// =============================================================================
// Maintenances
// =============================================================================

#[tokio::test]
async fn test_schedule_maintenance_formats_window() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/maintenance/schedule"))
        .and(body_json(json!({
            "statuspage_id": PAGE,
            "infrastructure_affected": ["c1-k1"],
            "maintenance_name": "DB upgrade",
            "maintenance_details": "Upgrading the primary.",
            "date_planned_start": "2030/01/15",
            "time_planned_start": "02:00",
            "date_planned_end": "2030/01/15",
            "time_planned_end": "04:30",
            "automation": "1",
            "all_infrastructure_affected": "0",
            "maintenance_notify_now": "0",
            "maintenance_notify_1_hr": "1",
            "maintenance_notify_24_hr": "0",
            "maintenance_notify_72_hr": "0",
            "message_subject": "Status Notification"
        })))
        .respond_with(ok_envelope(json!("m1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let day = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
    let mut schedule = MaintenanceSchedule::new(
        "DB upgrade",
        "Upgrading the primary.",
        day.and_hms_opt(2, 0, 0).unwrap(),
        day.and_hms_opt(4, 30, 0).unwrap(),
    )
    .affecting("c1-k1");
    schedule.automation = true;
    schedule.reminders.one_hour = true;

    let id = schedule_maintenance(&client(&mock_server), PAGE, schedule)
        .await
        .unwrap()
        .result;
    assert_eq!(id.as_deref(), Some("m1"));
}

#[tokio::test]
async fn test_maintenance_changes_default_subject() {
    let mock_server = MockServer::start().await;

    let mut expected = json!({
        "statuspage_id": PAGE,
        "maintenance_id": "m1",
        "maintenance_details": "All done",
        "message_subject": "Maintenance Notification"
    });
    for (key, value) in notify_off().as_object().unwrap() {
        expected[key] = value.clone();
    }

    Mock::given(method("POST"))
        .and(path("/v2/maintenance/finish"))
        .and(body_json(expected))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/maintenance/update"))
        .and(body_partial_json(json!({"maintenance_details": "Halfway"})))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let updated = Maintenance::update(&client, PAGE, "m1", MaintenanceChange::new("Halfway"))
        .await
        .unwrap();
    assert!(updated.is_success());

    let finished = finish_maintenance(&client, PAGE, "m1", MaintenanceChange::new("All done"))
        .await
        .unwrap();
    assert!(finished.is_success());
}

#[tokio::test]
async fn test_inverted_maintenance_window_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ok_envelope(json!("m1")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let day = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
    let schedule = MaintenanceSchedule::new(
        "x",
        "y",
        day.and_hms_opt(4, 0, 0).unwrap(),
        day.and_hms_opt(2, 0, 0).unwrap(),
    );

    let result = schedule_maintenance(&client(&mock_server), PAGE, schedule).await;
    assert!(matches!(result, Err(StatusioError::InvalidParameter { .. })));
}

#[tokio::test]
async fn test_list_maintenances() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v2/maintenance/list/{PAGE}")))
        .respond_with(ok_envelope(json!({
            "active_maintenances": [],
            "upcoming_maintenances": [{"_id": "m1", "name": "DB upgrade"}],
            "resolved_maintenances": [{"_id": "m0", "name": "Old", "datetime_closed": "2024-01-01T00:00:00.000Z"}]
        })))
        .mount(&mock_server)
        .await;

    let listing = Maintenance::list(&client(&mock_server), PAGE)
        .await
        .unwrap()
        .result
        .unwrap();
    assert_eq!(listing.upcoming_maintenances[0].name, "DB upgrade");
    assert!(listing.resolved_maintenances[0].is_finished());
}

#[tokio::test]
async fn test_ids_messages_and_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v2/incidents/{PAGE}")))
        .respond_with(ok_envelope(json!(["i1", "i2"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/maintenances/{PAGE}")))
        .respond_with(ok_envelope(json!(["m1"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/maintenance/message/{PAGE}/mm1")))
        .respond_with(ok_envelope(json!({"_id": "mm1", "details": "Starting now"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/maintenance/delete"))
        .and(body_json(json!({"statuspage_id": PAGE, "maintenance_id": "m1"})))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);

    let incidents = list_incident_ids(&client, PAGE).await.unwrap().result.unwrap();
    assert_eq!(incidents, json!(["i1", "i2"]));

    let maintenances = list_maintenance_ids(&client, PAGE).await.unwrap().result.unwrap();
    assert_eq!(maintenances, json!(["m1"]));

    let message = get_maintenance_message(&client, PAGE, "mm1")
        .await
        .unwrap()
        .result
        .unwrap();
    assert_eq!(message.details, "Starting now");

    assert!(delete_maintenance(&client, PAGE, "m1")
        .await
        .unwrap()
        .is_success());
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_update_metric() {
    let mock_server = MockServer::start().await;

    let start = Utc.with_ymd_and_hms(2014, 3, 28, 5, 43, 0).unwrap();
    let series = |value: f64| MetricSeries {
        average: value,
        start,
        dates: vec![start],
        values: vec![value],
    };

    Mock::given(method("POST"))
        .and(path("/v2/metric/update"))
        .and(body_partial_json(json!({
            "statuspage_id": PAGE,
            "metric_id": "mt1",
            "day_avg": 1.5,
            "day_start": 1_395_985_380_000i64,
            "day_dates": ["2014-03-28T05:43:00+00:00"],
            "day_values": [1.5],
            "month_values": [3.5]
        })))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let update = MetricUpdate {
        metric_id: "mt1".to_string(),
        day: series(1.5),
        week: series(2.5),
        month: series(3.5),
    };
    let response = update_metric(&client(&mock_server), PAGE, &update).await.unwrap();
    assert!(response.is_success());
}

// =============================================================================
// Subscribers
// =============================================================================

#[tokio::test]
async fn test_subscriber_lifecycle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/subscriber/add"))
        .and(body_json(json!({
            "statuspage_id": PAGE,
            "method": "sms",
            "address": "+15555550100",
            "silent": "1",
            "granular": ["c1-k1"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"error": "no", "message": "OK"},
            "subscriber_id": "s1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v2/subscriber/update"))
        .and(body_json(json!({
            "statuspage_id": PAGE,
            "subscriber_id": "s1",
            "address": "+15555550199",
            "granular": ""
        })))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v2/subscriber/remove/{PAGE}/s1")))
        .respond_with(ok_envelope(json!(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v2/subscriber/list/{PAGE}")))
        .respond_with(ok_envelope(json!({
            "email": [],
            "sms": [{"_id": "s1", "address": "+15555550199", "granular": ""}],
            "webhook": []
        })))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);

    let mut add = SubscriberAdd::new(SubscriberMethod::Sms, "+15555550100");
    add.granular.push("c1-k1".to_string());
    let added = add_subscriber(&client, PAGE, add).await.unwrap();
    assert_eq!(added.extra_str("subscriber_id"), Some("s1"));

    let updated = Subscriber::update(&client, PAGE, "s1", SubscriberUpdate::new("+15555550199"))
        .await
        .unwrap();
    assert!(updated.is_success());

    let listing = Subscriber::list(&client, PAGE).await.unwrap().result.unwrap();
    assert_eq!(listing.sms[0].address, "+15555550199");

    let removed = remove_subscriber(&client, PAGE, "s1").await.unwrap();
    assert!(removed.is_success());
}
