//! The Status.io operation table.
//!
//! Each API call is a row: path, verb, positional path identifiers, and the
//! accepted parameters with their defaults. [`StatusioClient::invoke`] reads
//! the row and does the rest.
//!
//! [`StatusioClient::invoke`]: crate::StatusioClient::invoke

use std::fmt;

use reqwest::Method;

/// HTTP verbs used by the Status.io API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Read.
    Get,
    /// Create or act; JSON body.
    Post,
    /// Partial update; JSON body.
    Patch,
    /// Remove.
    Delete,
}

impl Verb {
    /// The matching `reqwest` method.
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }

    /// Whether the payload travels as a JSON body (otherwise as a query string).
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Patch)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// A parameter accepted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Wire name of the parameter.
    pub name: &'static str,
    /// Value used when the caller omits it. `None` means required.
    pub default: Option<&'static str>,
}

impl ParamSpec {
    /// Returns true if callers must supply this parameter.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Static description of one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// Canonical snake_case name.
    pub name: &'static str,
    /// Path under the versioned base URL.
    pub path: &'static str,
    /// HTTP verb.
    pub verb: Verb,
    /// Names of the positional identifiers appended to `path`.
    pub segments: &'static [&'static str],
    /// Accepted payload parameters.
    pub params: &'static [ParamSpec],
}

impl OperationSpec {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Every Status.io API call this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    StatusSummary,
    ComponentList,
    ComponentStatusUpdate,
    IncidentList,
    IncidentListById,
    IncidentMessage,
    IncidentSingle,
    IncidentCreate,
    IncidentUpdate,
    IncidentResolve,
    IncidentDelete,
    MaintenanceList,
    MaintenanceListById,
    MaintenanceMessage,
    MaintenanceSingle,
    MaintenanceSchedule,
    MaintenanceStart,
    MaintenanceUpdate,
    MaintenanceFinish,
    MaintenanceDelete,
    MetricUpdate,
    SubscriberList,
    SubscriberAdd,
    SubscriberUpdate,
    SubscriberRemove,
}

const STATUS_NOTIFICATION: &str = "Status Notification";
const MAINTENANCE_NOTIFICATION: &str = "Maintenance Notification";

const PAGE: &[&str] = &["statuspage_id"];

macro_rules! req {
    ($name:expr) => {
        ParamSpec {
            name: $name,
            default: None,
        }
    };
}

macro_rules! opt {
    ($name:expr, $default:expr) => {
        ParamSpec {
            name: $name,
            default: Some($default),
        }
    };
}

macro_rules! notify_flags {
    ($($head:expr),* ; $subject:expr) => {
        &[
            $($head,)*
            opt!("notify_email", "0"),
            opt!("notify_sms", "0"),
            opt!("notify_webhook", "0"),
            opt!("social", "0"),
            opt!("irc", "0"),
            opt!("hipchat", "0"),
            opt!("msteams", "0"),
            opt!("slack", "0"),
            opt!("message_subject", $subject),
        ]
    };
}

const INCIDENT_CHANGE_PARAMS: &[ParamSpec] = notify_flags!(
    req!("statuspage_id"),
    req!("incident_id"),
    req!("incident_details"),
    req!("current_status"),
    req!("current_state");
    STATUS_NOTIFICATION
);

const MAINTENANCE_CHANGE_PARAMS: &[ParamSpec] = notify_flags!(
    req!("statuspage_id"),
    req!("maintenance_id"),
    req!("maintenance_details");
    MAINTENANCE_NOTIFICATION
);

const fn get(name: &'static str, path: &'static str, segments: &'static [&'static str]) -> OperationSpec {
    OperationSpec {
        name,
        path,
        verb: Verb::Get,
        segments,
        params: &[],
    }
}

const fn post(name: &'static str, path: &'static str, params: &'static [ParamSpec]) -> OperationSpec {
    OperationSpec {
        name,
        path,
        verb: Verb::Post,
        segments: &[],
        params,
    }
}

static TABLE: [OperationSpec; 25] = [
    get("status_summary", "status/summary", PAGE),
    get("component_list", "component/list", PAGE),
    post(
        "component_status_update",
        "component/status/update",
        &[
            req!("statuspage_id"),
            req!("component"),
            req!("container"),
            req!("details"),
            req!("current_status"),
        ],
    ),
    get("incident_list", "incident/list", PAGE),
    get("incident_list_by_id", "incidents", PAGE),
    get(
        "incident_message",
        "incident/message",
        &["statuspage_id", "message_id"],
    ),
    get("incident_single", "incident", &["statuspage_id", "incident_id"]),
    post(
        "incident_create",
        "incident/create",
        notify_flags!(
            req!("statuspage_id"),
            req!("infrastructure_affected"),
            req!("incident_name"),
            req!("incident_details"),
            req!("current_status"),
            req!("current_state"),
            opt!("all_infrastructure_affected", "0");
            STATUS_NOTIFICATION
        ),
    ),
    post("incident_update", "incident/update", INCIDENT_CHANGE_PARAMS),
    post("incident_resolve", "incident/resolve", INCIDENT_CHANGE_PARAMS),
    post(
        "incident_delete",
        "incident/delete",
        &[
            req!("statuspage_id"),
            req!("incident_id"),
        ],
    ),
    get("maintenance_list", "maintenance/list", PAGE),
    get("maintenance_list_by_id", "maintenances", PAGE),
    get(
        "maintenance_message",
        "maintenance/message",
        &["statuspage_id", "message_id"],
    ),
    get(
        "maintenance_single",
        "maintenance",
        &["statuspage_id", "maintenance_id"],
    ),
    post(
        "maintenance_schedule",
        "maintenance/schedule",
        &[
            req!("statuspage_id"),
            req!("infrastructure_affected"),
            req!("maintenance_name"),
            req!("maintenance_details"),
            req!("date_planned_start"),
            req!("time_planned_start"),
            req!("date_planned_end"),
            req!("time_planned_end"),
            opt!("automation", "0"),
            opt!("all_infrastructure_affected", "0"),
            opt!("maintenance_notify_now", "0"),
            opt!("maintenance_notify_1_hr", "0"),
            opt!("maintenance_notify_24_hr", "0"),
            opt!("maintenance_notify_72_hr", "0"),
            opt!("message_subject", STATUS_NOTIFICATION),
        ],
    ),
    post("maintenance_start", "maintenance/start", MAINTENANCE_CHANGE_PARAMS),
    post("maintenance_update", "maintenance/update", MAINTENANCE_CHANGE_PARAMS),
    post("maintenance_finish", "maintenance/finish", MAINTENANCE_CHANGE_PARAMS),
    post(
        "maintenance_delete",
        "maintenance/delete",
        &[
            req!("statuspage_id"),
            req!("maintenance_id"),
        ],
    ),
    post(
        "metric_update",
        "metric/update",
        &[
            req!("statuspage_id"),
            req!("metric_id"),
            req!("day_avg"),
            req!("day_start"),
            req!("day_dates"),
            req!("day_values"),
            req!("week_avg"),
            req!("week_start"),
            req!("week_dates"),
            req!("week_values"),
            req!("month_avg"),
            req!("month_start"),
            req!("month_dates"),
            req!("month_values"),
        ],
    ),
    get("subscriber_list", "subscriber/list", PAGE),
    post(
        "subscriber_add",
        "subscriber/add",
        &[
            req!("statuspage_id"),
            req!("method"),
            req!("address"),
            opt!("silent", "1"),
            opt!("granular", ""),
        ],
    ),
    OperationSpec {
        name: "subscriber_update",
        path: "subscriber/update",
        verb: Verb::Patch,
        segments: &[],
        params: &[
            req!("statuspage_id"),
            req!("subscriber_id"),
            req!("address"),
            opt!("granular", ""),
        ],
    },
    OperationSpec {
        name: "subscriber_remove",
        path: "subscriber/remove",
        verb: Verb::Delete,
        segments: &["statuspage_id", "subscriber_id"],
        params: &[],
    },
];

impl Operation {
    /// All operations, in table order.
    pub const ALL: [Self; 25] = [
        Self::StatusSummary,
        Self::ComponentList,
        Self::ComponentStatusUpdate,
        Self::IncidentList,
        Self::IncidentListById,
        Self::IncidentMessage,
        Self::IncidentSingle,
        Self::IncidentCreate,
        Self::IncidentUpdate,
        Self::IncidentResolve,
        Self::IncidentDelete,
        Self::MaintenanceList,
        Self::MaintenanceListById,
        Self::MaintenanceMessage,
        Self::MaintenanceSingle,
        Self::MaintenanceSchedule,
        Self::MaintenanceStart,
        Self::MaintenanceUpdate,
        Self::MaintenanceFinish,
        Self::MaintenanceDelete,
        Self::MetricUpdate,
        Self::SubscriberList,
        Self::SubscriberAdd,
        Self::SubscriberUpdate,
        Self::SubscriberRemove,
    ];

    /// The table row for this operation.
    pub fn spec(self) -> &'static OperationSpec {
        // Variants are declared in table order.
        &TABLE[self as usize]
    }

    /// Canonical snake_case name, e.g. `incident_create`.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Resolve an operation from its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
