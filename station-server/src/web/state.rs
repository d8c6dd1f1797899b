//! Application state for the web layer.

use std::sync::Arc;

use crate::line::Messenger;
use crate::proximity::MatcherConfig;
use crate::stations::StationStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests. Nothing in here
/// is mutated by request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where candidate stations come from
    pub store: Arc<dyn StationStore>,

    /// Outbound push delivery
    pub messenger: Arc<dyn Messenger>,

    /// Nearest-station matching parameters
    pub matcher: Arc<MatcherConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        store: impl StationStore + 'static,
        messenger: impl Messenger + 'static,
        matcher: MatcherConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            messenger: Arc::new(messenger),
            matcher: Arc::new(matcher),
        }
    }
}
