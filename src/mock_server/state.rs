//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Status.io API server.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    combo, Component, ComponentState, Incident, IncidentMessage, Maintenance, MaintenanceMessage,
    MaintenanceSummary, OverallStatus, Reference, StatusCode, StatusSummary, Subscriber,
    SubscriberMethod,
};

/// An error the mock API reports inside its response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError {
    /// HTTP status of the response.
    pub http_status: u16,
    /// Text placed in `status.message`.
    pub message: String,
}

impl MockError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            http_status: 400,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            http_status: 401,
            message: "Unauthorized: invalid API credentials".to_string(),
        }
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        Self {
            http_status: 404,
            message: format!("{what} not found: {id}"),
        }
    }
}

/// Result type of state operations.
pub type MockResult<T> = Result<T, MockError>;

/// Data of one status page.
#[derive(Debug, Default, Clone)]
pub struct PageData {
    /// Components with their containers.
    pub components: Vec<Component>,

    /// Current status code per `component-container` combo.
    pub statuses: HashMap<String, u16>,

    /// Incidents, active and resolved.
    pub incidents: Vec<Incident>,

    /// Maintenances in any state.
    pub maintenances: Vec<Maintenance>,

    /// Subscribers with their notification method.
    pub subscribers: Vec<(SubscriberMethod, Subscriber)>,

    /// Last payload received per metric ID.
    pub metrics: HashMap<String, Value>,
}

impl PageData {
    /// Status code of a combo; unknown combos are operational.
    pub fn status_of(&self, combo_id: &str) -> u16 {
        self.statuses
            .get(combo_id)
            .copied()
            .unwrap_or(StatusCode::Operational.code())
    }

    fn affected(&self, combos: &[String]) -> MockResult<(Vec<Reference>, Vec<Reference>)> {
        let mut components: Vec<Reference> = Vec::new();
        let mut containers: Vec<Reference> = Vec::new();

        for wanted in combos {
            let (component, container) = self
                .components
                .iter()
                .find_map(|c| {
                    c.containers
                        .iter()
                        .find(|k| combo(&c.id, &k.id) == *wanted)
                        .map(|k| (c, k))
                })
                .ok_or_else(|| MockError::bad_request(format!("Unknown infrastructure: {wanted}")))?;

            if !components.iter().any(|r| r.id == component.id) {
                components.push(Reference {
                    id: component.id.clone(),
                    name: Some(component.name.clone()),
                });
            }
            if !containers.iter().any(|r| r.id == container.id) {
                containers.push(Reference {
                    id: container.id.clone(),
                    name: Some(container.name.clone()),
                });
            }
        }

        Ok((components, containers))
    }

    fn all_combos(&self) -> Vec<String> {
        self.components.iter().flat_map(Component::combos).collect()
    }

    fn set_status(&mut self, combos: &[String], code: u16) {
        for combo_id in combos {
            self.statuses.insert(combo_id.clone(), code);
        }
    }

    fn incident_combos(incident: &Incident) -> Vec<String> {
        incident
            .components_affected
            .iter()
            .flat_map(|c| {
                incident
                    .containers_affected
                    .iter()
                    .map(move |k| combo(&c.id, &k.id))
            })
            .collect()
    }
}

/// What happens to a maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceTransition {
    Start,
    Update,
    Finish,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Status pages indexed by ID.
    pub pages: HashMap<String, PageData>,

    /// Optional API id/key pair. If set, requests must carry exactly these.
    pub credentials: Option<(String, String)>,

    next_id: u64,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn timestamp(at: NaiveDateTime) -> String {
    at.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a status page to the state.
    pub fn with_page(mut self, statuspage_id: &str, page: PageData) -> Self {
        self.pages.insert(statuspage_id.to_string(), page);
        self
    }

    /// Set the required API credentials.
    pub fn with_credentials(mut self, api_id: &str, api_key: &str) -> Self {
        self.credentials = Some((api_id.to_string(), api_key.to_string()));
        self
    }

    /// Check request credentials.
    ///
    /// Both must be present; when credentials are configured they must match.
    pub fn authorize(&self, api_id: Option<&str>, api_key: Option<&str>) -> MockResult<()> {
        match (api_id, api_key, &self.credentials) {
            (Some(id), Some(key), Some((want_id, want_key))) if id == want_id && key == want_key => {
                Ok(())
            }
            (Some(id), Some(key), None) if !id.is_empty() && !key.is_empty() => Ok(()),
            _ => Err(MockError::unauthorized()),
        }
    }

    /// Get a page by ID.
    pub fn page(&self, statuspage_id: &str) -> MockResult<&PageData> {
        self.pages
            .get(statuspage_id)
            .ok_or_else(|| MockError::not_found("Status page", statuspage_id))
    }

    fn page_mut(&mut self, statuspage_id: &str) -> MockResult<&mut PageData> {
        self.pages
            .get_mut(statuspage_id)
            .ok_or_else(|| MockError::not_found("Status page", statuspage_id))
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", self.next_id)
    }

    // =========================================================================
    // Status & components
    // =========================================================================

    /// Build the public summary of a page.
    pub fn summary(&self, statuspage_id: &str) -> MockResult<StatusSummary> {
        let page = self.page(statuspage_id)?;

        let status: Vec<ComponentState> = page
            .components
            .iter()
            .map(|component| {
                let containers: Vec<ComponentState> = component
                    .containers
                    .iter()
                    .map(|k| {
                        let code = page.status_of(&combo(&component.id, &k.id));
                        state_entry(&k.id, &k.name, code, Vec::new())
                    })
                    .collect();
                let worst = containers
                    .iter()
                    .filter_map(|k| k.status_code)
                    .max()
                    .unwrap_or(StatusCode::Operational.code());
                state_entry(&component.id, &component.name, worst, containers)
            })
            .collect();

        let overall = status
            .iter()
            .filter_map(|c| c.status_code)
            .max()
            .unwrap_or(StatusCode::Operational.code());

        let to_value = |items: Vec<&Maintenance>| -> Vec<Value> {
            items
                .into_iter()
                .filter_map(|m| serde_json::to_value(m).ok())
                .collect()
        };

        Ok(StatusSummary {
            status_overall: OverallStatus {
                updated: Some(now()),
                status: StatusCode::from_code(overall).map(|s| s.label().to_string()),
                status_code: Some(overall),
            },
            status,
            incidents: page
                .incidents
                .iter()
                .filter(|i| !i.is_resolved())
                .filter_map(|i| serde_json::to_value(i).ok())
                .collect(),
            maintenance: MaintenanceSummary {
                active: to_value(
                    page.maintenances
                        .iter()
                        .filter(|m| m.datetime_open.is_some() && !m.is_finished())
                        .collect(),
                ),
                upcoming: to_value(
                    page.maintenances
                        .iter()
                        .filter(|m| m.datetime_open.is_none())
                        .collect(),
                ),
            },
        })
    }

    /// Set the status of one component/container pair.
    pub fn set_component_status(
        &mut self,
        statuspage_id: &str,
        component_id: &str,
        container_id: &str,
        code: u16,
    ) -> MockResult<()> {
        let page = self.page_mut(statuspage_id)?;
        let combo_id = combo(component_id, container_id);
        if !page.all_combos().contains(&combo_id) {
            return Err(MockError::not_found("Component/container", &combo_id));
        }
        page.statuses.insert(combo_id, code);
        Ok(())
    }

    // =========================================================================
    // Incidents
    // =========================================================================

    /// Open an incident and return its ID.
    #[allow(clippy::too_many_arguments)]
    pub fn create_incident(
        &mut self,
        statuspage_id: &str,
        name: &str,
        details: &str,
        combos: &[String],
        all_infrastructure: bool,
        status: u16,
        state: u16,
    ) -> MockResult<String> {
        let incident_id = self.next_id();
        let message_id = self.next_id();
        let page = self.page_mut(statuspage_id)?;

        let combos = if all_infrastructure {
            page.all_combos()
        } else {
            combos.to_vec()
        };
        let (components, containers) = page.affected(&combos)?;
        page.set_status(&combos, status);

        let opened = now();
        page.incidents.push(Incident {
            id: incident_id.clone(),
            name: name.to_string(),
            datetime_open: Some(opened.clone()),
            datetime_closed: None,
            messages: vec![IncidentMessage {
                id: message_id,
                details: details.to_string(),
                datetime: Some(opened),
                state: Some(state),
                status: Some(status),
            }],
            components_affected: components,
            containers_affected: containers,
        });

        Ok(incident_id)
    }

    /// Post a message to an incident, resolving it when `resolve` is set.
    pub fn add_incident_message(
        &mut self,
        statuspage_id: &str,
        incident_id: &str,
        details: &str,
        status: u16,
        state: u16,
        resolve: bool,
    ) -> MockResult<()> {
        let message_id = self.next_id();
        let page = self.page_mut(statuspage_id)?;

        let index = page
            .incidents
            .iter()
            .position(|i| i.id == incident_id)
            .ok_or_else(|| MockError::not_found("Incident", incident_id))?;
        if page.incidents[index].is_resolved() {
            return Err(MockError::bad_request(format!(
                "Incident already resolved: {incident_id}"
            )));
        }

        let combos = PageData::incident_combos(&page.incidents[index]);
        page.set_status(&combos, status);

        let incident = &mut page.incidents[index];
        let posted = now();
        incident.messages.push(IncidentMessage {
            id: message_id,
            details: details.to_string(),
            datetime: Some(posted.clone()),
            state: Some(state),
            status: Some(status),
        });
        if resolve {
            incident.datetime_closed = Some(posted);
        }
        Ok(())
    }

    /// Delete an incident.
    pub fn delete_incident(&mut self, statuspage_id: &str, incident_id: &str) -> MockResult<()> {
        let page = self.page_mut(statuspage_id)?;
        let before = page.incidents.len();
        page.incidents.retain(|i| i.id != incident_id);
        if page.incidents.len() == before {
            return Err(MockError::not_found("Incident", incident_id));
        }
        Ok(())
    }

    /// Get an incident by ID.
    pub fn incident(&self, statuspage_id: &str, incident_id: &str) -> MockResult<&Incident> {
        self.page(statuspage_id)?
            .incidents
            .iter()
            .find(|i| i.id == incident_id)
            .ok_or_else(|| MockError::not_found("Incident", incident_id))
    }

    /// Find an incident message by ID.
    pub fn incident_message(
        &self,
        statuspage_id: &str,
        message_id: &str,
    ) -> MockResult<&IncidentMessage> {
        self.page(statuspage_id)?
            .incidents
            .iter()
            .flat_map(|i| i.messages.iter())
            .find(|m| m.id == message_id)
            .ok_or_else(|| MockError::not_found("Incident message", message_id))
    }

    // =========================================================================
    // Maintenances
    // =========================================================================

    /// Schedule a maintenance and return its ID.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule_maintenance(
        &mut self,
        statuspage_id: &str,
        name: &str,
        details: &str,
        combos: &[String],
        all_infrastructure: bool,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> MockResult<String> {
        if end < start {
            return Err(MockError::bad_request("Planned end is before planned start"));
        }

        let maintenance_id = self.next_id();
        let message_id = self.next_id();
        let page = self.page_mut(statuspage_id)?;

        let combos = if all_infrastructure {
            page.all_combos()
        } else {
            combos.to_vec()
        };
        let (components, containers) = page.affected(&combos)?;

        page.maintenances.push(Maintenance {
            id: maintenance_id.clone(),
            name: name.to_string(),
            datetime_planned_start: Some(timestamp(start)),
            datetime_planned_end: Some(timestamp(end)),
            datetime_open: None,
            datetime_closed: None,
            messages: vec![MaintenanceMessage {
                id: message_id,
                details: details.to_string(),
                datetime: Some(now()),
            }],
            components_affected: components,
            containers_affected: containers,
        });

        Ok(maintenance_id)
    }

    /// Start, update, or finish a maintenance.
    pub fn transition_maintenance(
        &mut self,
        statuspage_id: &str,
        maintenance_id: &str,
        details: &str,
        transition: MaintenanceTransition,
    ) -> MockResult<()> {
        let message_id = self.next_id();
        let page = self.page_mut(statuspage_id)?;

        let maintenance = page
            .maintenances
            .iter_mut()
            .find(|m| m.id == maintenance_id)
            .ok_or_else(|| MockError::not_found("Maintenance", maintenance_id))?;

        let started = maintenance.datetime_open.is_some();
        let posted = now();
        match transition {
            MaintenanceTransition::Start if started => {
                return Err(MockError::bad_request("Maintenance already started"));
            }
            MaintenanceTransition::Finish if !started || maintenance.is_finished() => {
                return Err(MockError::bad_request("Maintenance is not in progress"));
            }
            MaintenanceTransition::Start => maintenance.datetime_open = Some(posted.clone()),
            MaintenanceTransition::Finish => maintenance.datetime_closed = Some(posted.clone()),
            MaintenanceTransition::Update => {}
        }

        maintenance.messages.push(MaintenanceMessage {
            id: message_id,
            details: details.to_string(),
            datetime: Some(posted),
        });
        Ok(())
    }

    /// Delete a maintenance.
    pub fn delete_maintenance(&mut self, statuspage_id: &str, maintenance_id: &str) -> MockResult<()> {
        let page = self.page_mut(statuspage_id)?;
        let before = page.maintenances.len();
        page.maintenances.retain(|m| m.id != maintenance_id);
        if page.maintenances.len() == before {
            return Err(MockError::not_found("Maintenance", maintenance_id));
        }
        Ok(())
    }

    /// Get a maintenance by ID.
    pub fn maintenance(&self, statuspage_id: &str, maintenance_id: &str) -> MockResult<&Maintenance> {
        self.page(statuspage_id)?
            .maintenances
            .iter()
            .find(|m| m.id == maintenance_id)
            .ok_or_else(|| MockError::not_found("Maintenance", maintenance_id))
    }

    /// Find a maintenance message by ID.
    pub fn maintenance_message(
        &self,
        statuspage_id: &str,
        message_id: &str,
    ) -> MockResult<&MaintenanceMessage> {
        self.page(statuspage_id)?
            .maintenances
            .iter()
            .flat_map(|m| m.messages.iter())
            .find(|m| m.id == message_id)
            .ok_or_else(|| MockError::not_found("Maintenance message", message_id))
    }

    // =========================================================================
    // Metrics & subscribers
    // =========================================================================

    /// Store a metric payload.
    pub fn update_metric(&mut self, statuspage_id: &str, metric_id: &str, data: Value) -> MockResult<()> {
        self.page_mut(statuspage_id)?
            .metrics
            .insert(metric_id.to_string(), data);
        Ok(())
    }

    /// Add a subscriber and return its ID.
    pub fn add_subscriber(
        &mut self,
        statuspage_id: &str,
        method: SubscriberMethod,
        address: &str,
        granular: Vec<String>,
    ) -> MockResult<String> {
        let subscriber_id = self.next_id();
        let page = self.page_mut(statuspage_id)?;

        if page
            .subscribers
            .iter()
            .any(|(m, s)| *m == method && s.address == address)
        {
            return Err(MockError::bad_request(format!("Already subscribed: {address}")));
        }

        page.subscribers.push((
            method,
            Subscriber {
                id: subscriber_id.clone(),
                address: address.to_string(),
                granular,
            },
        ));
        Ok(subscriber_id)
    }

    /// Change a subscriber's address and subscriptions.
    pub fn update_subscriber(
        &mut self,
        statuspage_id: &str,
        subscriber_id: &str,
        address: &str,
        granular: Vec<String>,
    ) -> MockResult<()> {
        let page = self.page_mut(statuspage_id)?;
        let (_, subscriber) = page
            .subscribers
            .iter_mut()
            .find(|(_, s)| s.id == subscriber_id)
            .ok_or_else(|| MockError::not_found("Subscriber", subscriber_id))?;
        subscriber.address = address.to_string();
        subscriber.granular = granular;
        Ok(())
    }

    /// Remove a subscriber.
    pub fn remove_subscriber(&mut self, statuspage_id: &str, subscriber_id: &str) -> MockResult<()> {
        let page = self.page_mut(statuspage_id)?;
        let before = page.subscribers.len();
        page.subscribers.retain(|(_, s)| s.id != subscriber_id);
        if page.subscribers.len() == before {
            return Err(MockError::not_found("Subscriber", subscriber_id));
        }
        Ok(())
    }
}

fn state_entry(id: &str, name: &str, code: u16, containers: Vec<ComponentState>) -> ComponentState {
    ComponentState {
        id: id.to_string(),
        name: name.to_string(),
        updated: None,
        status: StatusCode::from_code(code).map(|s| s.label().to_string()),
        status_code: Some(code),
        containers,
    }
}
