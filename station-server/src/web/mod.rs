//! Web layer for the station finder.
//!
//! Exposes the webhook endpoint LINE calls and a health check.

mod routes;
mod state;

pub use routes::{AppError, create_router};
pub use state::AppState;
