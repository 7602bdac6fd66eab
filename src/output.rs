//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Incident, Maintenance, StatusCode, StatusSummary};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn status_label(code: Option<u16>, fallback: Option<&str>) -> String {
    match code.and_then(StatusCode::from_code) {
        Some(status) => status.label().to_string(),
        None => fallback.unwrap_or("Unknown").to_string(),
    }
}

impl PrettyPrint for StatusSummary {
    fn pretty_print(&self) -> String {
        let overall = status_label(
            self.status_overall.status_code,
            self.status_overall.status.as_deref(),
        );
        let header = format!("Status: {}", overall);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref updated) = self.status_overall.updated {
            lines.push(format!("Updated:        {}", updated));
        }

        for component in &self.status {
            lines.push(format!(
                "{:<15} {}",
                format!("{}:", component.name),
                status_label(component.status_code, component.status.as_deref())
            ));
            for container in &component.containers {
                lines.push(format!(
                    "  {:<13} {}",
                    format!("{}:", container.name),
                    status_label(container.status_code, container.status.as_deref())
                ));
            }
        }

        lines.push(format!("Incidents:      {} active", self.incidents.len()));
        lines.push(format!(
            "Maintenance:    {} active, {} upcoming",
            self.maintenance.active.len(),
            self.maintenance.upcoming.len()
        ));

        lines.join("\n")
    }
}

impl PrettyPrint for Incident {
    fn pretty_print(&self) -> String {
        let header = format!("Incident: {}", self.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("ID:             {}", self.id)];

        if let Some(ref opened) = self.datetime_open {
            lines.push(format!("Opened:         {}", opened));
        }

        if let Some(ref closed) = self.datetime_closed {
            lines.push(format!("Resolved:       {}", closed));
        }

        if !self.components_affected.is_empty() {
            let names: Vec<&str> = self
                .components_affected
                .iter()
                .map(|c| c.name.as_deref().unwrap_or(&c.id))
                .collect();
            lines.push(format!("Components:     {}", names.join(", ")));
        }

        if let Some(latest) = self.latest_message() {
            lines.push(format!("Latest:         {}", latest.details));
            if let Some(status) = latest.status.and_then(StatusCode::from_code) {
                lines.push(format!("Status:         {}", status));
            }
        }

        lines.push(format!("Messages:       {}", self.messages.len()));

        lines.join("\n")
    }
}

impl PrettyPrint for Maintenance {
    fn pretty_print(&self) -> String {
        let header = format!("Maintenance: {}", self.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("ID:             {}", self.id)];

        if let Some(ref start) = self.datetime_planned_start {
            lines.push(format!("Planned Start:  {}", start));
        }

        if let Some(ref end) = self.datetime_planned_end {
            lines.push(format!("Planned End:    {}", end));
        }

        if let Some(ref closed) = self.datetime_closed {
            lines.push(format!("Finished:       {}", closed));
        }

        if let Some(latest) = self.messages.last() {
            lines.push(format!("Latest:         {}", latest.details));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_pretty_print_format() {
        let summary: StatusSummary = serde_json::from_value(serde_json::json!({
            "status_overall": {"status": "Operational", "status_code": 100},
            "status": [{
                "id": "c1",
                "name": "API",
                "status_code": 100,
                "containers": [{"id": "k1", "name": "US East", "status_code": 100}]
            }],
            "incidents": [],
            "maintenance": {"active": [], "upcoming": [{}]}
        }))
        .unwrap();

        let output = summary.pretty_print();
        assert!(output.starts_with("Status: Operational"));
        assert!(output.contains("API:"));
        assert!(output.contains("US East:"));
        assert!(output.contains("0 active, 1 upcoming"));
    }

    #[test]
    fn test_incident_pretty_print_format() {
        let incident: Incident = serde_json::from_value(serde_json::json!({
            "_id": "i1",
            "name": "API outage",
            "components_affected": [{"_id": "c1", "name": "API"}],
            "messages": [{"_id": "m1", "details": "Investigating", "status": 500}]
        }))
        .unwrap();

        let output = incident.pretty_print();
        assert!(output.starts_with("Incident: API outage"));
        assert!(output.contains("Components:     API"));
        assert!(output.contains("Status:         Service Disruption"));
    }
}
