//! Webhook request DTOs.
//!
//! These types map directly to the JSON LINE posts to the webhook URL.
//! Only `destination` and `events` are required at the top level; event
//! fields are optional because their presence depends on the event type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a webhook request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Bot user id the events were sent to.
    pub destination: String,

    /// Events in delivery order. Empty for the console's URL verification.
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Event type (`message`, `follow`, `postback`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Present for `message` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<WebhookMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_event_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_context: Option<DeliveryContext>,

    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_token: Option<String>,

    /// Channel mode (`active` or `standby`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl WebhookEvent {
    /// User to push the reply to.
    pub fn recipient(&self) -> Option<&str> {
        self.source.as_ref()?.user_id.as_deref()
    }

    /// When LINE recorded the event.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp?)
    }

    /// Whether LINE is re-sending an event it failed to deliver before.
    pub fn is_redelivery(&self) -> bool {
        self.delivery_context
            .as_ref()
            .is_some_and(|c| c.is_redelivery)
    }
}

/// Message attached to a `message` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_token: Option<String>,

    #[serde(flatten)]
    pub content: MessageContent,
}

/// Type-specific message content, keyed on the message `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    /// A shared location. Coordinates are required.
    Location {
        latitude: f64,
        longitude: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },

    Text {
        text: String,
    },

    /// Stickers, images and anything else.
    #[serde(other)]
    Other,
}

/// Where the event came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// `user`, `group` or `room`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    pub is_redelivery: bool,
}
