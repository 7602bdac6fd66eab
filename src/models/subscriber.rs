//! Subscriber model and trait implementations.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::StatusioClient;
use crate::error::{Result, StatusioError};
use crate::operation::Operation;
use crate::request::Params;
use crate::response::ApiResponse;
use crate::traits::{List, Update};

/// How a subscriber is notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberMethod {
    Email,
    Sms,
    Webhook,
}

impl SubscriberMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Webhook => "webhook",
        }
    }
}

impl fmt::Display for SubscriberMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriberMethod {
    type Err = StatusioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "webhook" => Ok(Self::Webhook),
            other => Err(StatusioError::InvalidParameter {
                name: "method".to_string(),
                reason: format!("'{other}' is not one of email, sms, webhook"),
            }),
        }
    }
}

/// A status page subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    /// The subscriber ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Email address, phone number, or webhook URL.
    #[serde(default)]
    pub address: String,

    /// `component-container` combos the subscriber follows. Empty means all.
    #[serde(default, deserialize_with = "granular_list")]
    pub granular: Vec<String>,
}

// The API returns granular subscriptions either as a list or as an empty
// string.
fn granular_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
        Null(Option<()>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::Text(text) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Raw::Null(_) => Vec::new(),
    })
}

/// Result of the subscriber list endpoint, grouped by method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriberListing {
    #[serde(default)]
    pub email: Vec<Subscriber>,
    #[serde(default)]
    pub sms: Vec<Subscriber>,
    #[serde(default)]
    pub webhook: Vec<Subscriber>,
}

impl SubscriberListing {
    /// Every subscriber with its method.
    pub fn all(&self) -> impl Iterator<Item = (SubscriberMethod, &Subscriber)> {
        self.email
            .iter()
            .map(|s| (SubscriberMethod::Email, s))
            .chain(self.sms.iter().map(|s| (SubscriberMethod::Sms, s)))
            .chain(self.webhook.iter().map(|s| (SubscriberMethod::Webhook, s)))
    }
}

/// Parameters for adding a subscriber.
#[derive(Debug, Clone)]
pub struct SubscriberAdd {
    pub method: SubscriberMethod,
    pub address: String,
    /// Skip the welcome message.
    pub silent: bool,
    /// Restrict the subscription to these combos.
    pub granular: Vec<String>,
}

impl SubscriberAdd {
    /// A silent subscription to every component.
    pub fn new(method: SubscriberMethod, address: impl Into<String>) -> Self {
        Self {
            method,
            address: address.into(),
            silent: true,
            granular: Vec::new(),
        }
    }

    fn into_params(self, statuspage_id: &str) -> Params {
        let mut params = Params::new()
            .with("statuspage_id", statuspage_id)
            .with("method", self.method.as_str())
            .with("address", self.address)
            .with("silent", self.silent);
        if !self.granular.is_empty() {
            params.insert("granular", self.granular);
        }
        params
    }
}

/// Parameters for changing a subscriber.
#[derive(Debug, Clone)]
pub struct SubscriberUpdate {
    pub address: String,
    pub granular: Vec<String>,
}

impl SubscriberUpdate {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            granular: Vec::new(),
        }
    }

    fn into_params(self, statuspage_id: &str, subscriber_id: &str) -> Params {
        let mut params = Params::new()
            .with("statuspage_id", statuspage_id)
            .with("subscriber_id", subscriber_id)
            .with("address", self.address);
        if !self.granular.is_empty() {
            params.insert("granular", self.granular);
        }
        params
    }
}

#[async_trait]
impl List for Subscriber {
    type Listing = SubscriberListing;

    #[tracing::instrument(skip(client))]
    async fn list(client: &StatusioClient, statuspage_id: &str) -> Result<ApiResponse<Self::Listing>> {
        client
            .invoke(Operation::SubscriberList, &[statuspage_id], Params::new())
            .await
    }
}

#[async_trait]
impl Update for Subscriber {
    type Params = SubscriberUpdate;
    type Updated = Value;

    #[tracing::instrument(skip(client, params))]
    async fn update(
        client: &StatusioClient,
        statuspage_id: &str,
        id: &str,
        params: Self::Params,
    ) -> Result<ApiResponse<Self::Updated>> {
        client
            .invoke(
                Operation::SubscriberUpdate,
                &[],
                params.into_params(statuspage_id, id),
            )
            .await
    }
}

/// Add a subscriber.
///
/// The new ID comes back next to `status` rather than in `result`; read it
/// with `response.extra_str("subscriber_id")`.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client, subscriber), fields(method = %subscriber.method))]
pub async fn add_subscriber(
    client: &StatusioClient,
    statuspage_id: &str,
    subscriber: SubscriberAdd,
) -> Result<ApiResponse> {
    client
        .invoke(
            Operation::SubscriberAdd,
            &[],
            subscriber.into_params(statuspage_id),
        )
        .await
}

/// Remove a subscriber.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a JSON
/// envelope.
#[tracing::instrument(skip(client))]
pub async fn remove_subscriber(
    client: &StatusioClient,
    statuspage_id: &str,
    subscriber_id: &str,
) -> Result<ApiResponse> {
    client
        .invoke(
            Operation::SubscriberRemove,
            &[statuspage_id, subscriber_id],
            Params::new(),
        )
        .await
}
