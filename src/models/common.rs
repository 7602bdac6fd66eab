//! Types shared by several Status.io entities.

use serde::{Deserialize, Serialize};

use crate::request::Params;

/// Join a component and container ID into the `component-container` form
/// used by `infrastructure_affected` and `granular`.
pub fn combo(component_id: &str, container_id: &str) -> String {
    format!("{component_id}-{container_id}")
}

/// A reference to another entity, as embedded in incidents and maintenances.
///
/// The API sometimes embeds a bare ID and sometimes an `{_id, name}` object;
/// both decode into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawReference")]
pub struct Reference {
    /// The referenced ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name, when embedded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReference {
    Id(String),
    Object {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<RawReference> for Reference {
    fn from(raw: RawReference) -> Self {
        match raw {
            RawReference::Id(id) => Self { id, name: None },
            RawReference::Object { id, name } => Self { id, name },
        }
    }
}

/// Which channels to notify about an incident or maintenance change.
///
/// All channels are off by default, matching the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationOptions {
    pub email: bool,
    pub sms: bool,
    pub webhook: bool,
    pub social: bool,
    pub irc: bool,
    pub hipchat: bool,
    pub msteams: bool,
    pub slack: bool,
}

impl NotificationOptions {
    /// Notify nobody.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Notify on every channel.
    #[must_use]
    pub fn all() -> Self {
        Self {
            email: true,
            sms: true,
            webhook: true,
            social: true,
            irc: true,
            hipchat: true,
            msteams: true,
            slack: true,
        }
    }

    pub(crate) fn apply(&self, params: &mut Params) {
        params.insert("notify_email", self.email);
        params.insert("notify_sms", self.sms);
        params.insert("notify_webhook", self.webhook);
        params.insert("social", self.social);
        params.insert("irc", self.irc);
        params.insert("hipchat", self.hipchat);
        params.insert("msteams", self.msteams);
        params.insert("slack", self.slack);
    }
}
