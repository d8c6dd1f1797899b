//! LINE Messaging API integration.
//!
//! - [`webhook`]: inbound webhook payloads
//! - [`messages`]: outbound message bodies (text, quick replies, flex cards)
//! - [`LineClient`]: the push API client, behind the [`Messenger`] trait
//!
//! Webhook signature verification is not performed here.

mod client;
mod error;
pub mod messages;
pub mod webhook;

use async_trait::async_trait;

pub use client::{DEFAULT_PUSH_ENDPOINT, LineClient, LineConfig};
pub use error::PushError;
pub use messages::{Message, PushRequest};
pub use webhook::{WebhookEvent, WebhookMessage, WebhookPayload};

/// Delivers outbound messages to a user.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `request` and return the raw response body.
    async fn push(&self, request: &PushRequest) -> Result<Vec<u8>, PushError>;
}
