use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A tenant's registration for callbacks on a set of lifecycle events.
///
/// Owned by the tenant and edited elsewhere; read-only on the dispatch path.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct WebhookSubscription {
    pub subscription_id: String,
    pub account_id: String,
    pub url: String,
    pub http_method: HttpMethod,
    pub subscribed_event_names: BTreeSet<String>,
}

impl WebhookSubscription {
    pub fn new(
        subscription_id: impl Into<String>,
        account_id: impl Into<String>,
        url: impl Into<String>,
        http_method: HttpMethod,
        events: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            account_id: account_id.into(),
            url: url.into(),
            http_method,
            subscribed_event_names: events.into_iter().map(Into::into).collect(),
        }
    }
}

/// The JSON body sent to a subscriber: `{"event": ..., "payload": {}}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct WebhookBody {
    pub event: String,
    pub payload: Value,
}

impl WebhookBody {
    pub fn for_event(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            payload: Value::Object(Map::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success { status: u16 },
    Failure { error: String },
}

/// The result of one delivery during one dispatch cycle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAttempt {
    pub subscription_id: String,
    pub event_name: String,
    pub transition_id: Uuid,
    pub order_id: String,
    pub url: String,
    pub outcome: DeliveryOutcome,
}

impl DeliveryAttempt {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Success { .. })
    }
}
