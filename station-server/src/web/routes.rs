//! HTTP route handlers.
//!
//! There is no server-side request deadline. The store and push clients
//! carry their own timeouts, so a slow upstream surfaces as a 500 naming
//! the failed call instead of cutting the request off mid-push.

use axum::body::Bytes;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::line::{PushError, PushRequest, WebhookPayload};
use crate::reply::{Inbound, select_reply};
use crate::stations::StoreError;

use super::state::AppState;

/// Largest accepted request body. Larger bodies are refused with 413
/// before the handler runs.
const MAX_BODY_BYTES: usize = 1 << 20;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/station", post(find_station))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Webhook endpoint: answer the first event with a push message.
///
/// On success the push API's response body is passed through unchanged.
async fn find_station(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    // Parse JSON manually so the error text reaches the caller
    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| AppError::Decode {
        message: e.to_string(),
    })?;

    let Some(event) = payload.events.first() else {
        tracing::info!(destination = %payload.destination, "webhook without events");
        return Ok(StatusCode::OK.into_response());
    };

    if payload.events.len() > 1 {
        tracing::warn!(
            skipped = payload.events.len() - 1,
            "only the first webhook event is answered"
        );
    }

    let recipient = event.recipient().ok_or_else(|| AppError::Decode {
        message: "event has no source user id".to_string(),
    })?;

    let inbound = Inbound::classify(event).map_err(|e| AppError::Decode {
        message: e.to_string(),
    })?;

    tracing::info!(
        event_type = %event.kind,
        event_id = event.webhook_event_id.as_deref(),
        received_at = ?event.received_at(),
        redelivery = event.is_redelivery(),
        ?inbound,
        "handling webhook event"
    );

    let messages = select_reply(inbound, state.store.as_ref(), &state.matcher).await?;
    let request = PushRequest::new(recipient, messages);
    let sent = state.messenger.push(&request).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], sent).into_response())
}

/// Application error type.
///
/// Every variant fails the request with a 500 and a plain-text body.
#[derive(Debug)]
pub enum AppError {
    /// Inbound webhook could not be understood
    Decode { message: String },
    /// Station lookup failed
    Store(StoreError),
    /// Reply could not be delivered
    Push(PushError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<PushError> for AppError {
    fn from(e: PushError) -> Self {
        AppError::Push(e)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Decode { message } => write!(f, "failed to decode JSON string: {message}"),
            AppError::Store(e) => write!(f, "failed to query stations: {e}"),
            AppError::Push(e) => write!(f, "failed to push message: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = %message, "request failed");

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
