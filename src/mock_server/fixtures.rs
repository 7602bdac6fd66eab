//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::NaiveDate;

use super::state::{MockState, PageData};
use crate::{Component, Container, Subscriber, SubscriberMethod};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Status page ID used by the default scenario.
    pub const STATUSPAGE_ID: &'static str = "568d8a3e3cada8c2490000dd";

    // =========================================================================
    // Component Fixtures
    // =========================================================================

    /// Create a component with the given `(id, name)` containers.
    pub fn component(id: &str, name: &str, containers: &[(&str, &str)]) -> Component {
        Component {
            id: id.to_string(),
            name: name.to_string(),
            containers: containers
                .iter()
                .map(|(id, name)| Container {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    // =========================================================================
    // Subscriber Fixtures
    // =========================================================================

    /// Create a subscriber following every component.
    pub fn subscriber(id: &str, address: &str) -> Subscriber {
        Subscriber {
            id: id.to_string(),
            address: address.to_string(),
            granular: vec![],
        }
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// A page with components and a subscriber, and nothing going on.
    pub fn quiet_page() -> PageData {
        PageData {
            components: vec![
                Self::component(
                    "5419a8ef0a2de5e4520001bc",
                    "API",
                    &[
                        ("5419a8ef0a2de5e4520001bd", "US East"),
                        ("5419a8ef0a2de5e4520001be", "EU West"),
                    ],
                ),
                Self::component(
                    "5419a8ef0a2de5e4520001c0",
                    "Website",
                    &[("5419a8ef0a2de5e4520001c1", "Global")],
                ),
            ],
            subscribers: vec![(
                SubscriberMethod::Email,
                Self::subscriber("5419a8ef0a2de5e4520001d0", "ops@example.com"),
            )],
            ..Default::default()
        }
    }

    /// Create a default set of test data for common scenarios.
    ///
    /// The default page has one resolved incident and one upcoming
    /// maintenance on top of [`Fixtures::quiet_page`].
    pub fn default_scenario() -> MockState {
        let mut state = MockState::new().with_page(Self::STATUSPAGE_ID, Self::quiet_page());
        let api_us_east = "5419a8ef0a2de5e4520001bc-5419a8ef0a2de5e4520001bd".to_string();

        // Fixture inputs are valid, so these cannot fail.
        if let Ok(incident_id) = state.create_incident(
            Self::STATUSPAGE_ID,
            "Elevated API error rates",
            "We are investigating elevated error rates.",
            &[api_us_east],
            false,
            300,
            100,
        ) {
            let _ = state.add_incident_message(
                Self::STATUSPAGE_ID,
                &incident_id,
                "Error rates are back to normal.",
                100,
                300,
                true,
            );
        }

        if let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(2030, 1, 15).and_then(|d| d.and_hms_opt(2, 0, 0)),
            NaiveDate::from_ymd_opt(2030, 1, 15).and_then(|d| d.and_hms_opt(4, 0, 0)),
        ) {
            let _ = state.schedule_maintenance(
                Self::STATUSPAGE_ID,
                "Database upgrade",
                "Upgrading the primary database cluster.",
                &[],
                true,
                start,
                end,
            );
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario() {
        let state = Fixtures::default_scenario();
        let page = state.page(Fixtures::STATUSPAGE_ID).unwrap();

        assert_eq!(page.components.len(), 2);
        assert_eq!(page.incidents.len(), 1);
        assert!(page.incidents[0].is_resolved());
        assert_eq!(page.maintenances.len(), 1);
        assert_eq!(page.maintenances[0].components_affected.len(), 2);
        assert!(page.statuses.values().all(|code| *code == 100));
    }
}
