//! Reply selection.
//!
//! Every handled webhook event produces exactly one reply. The choice is a
//! single branch on the inbound message type:
//!
//! - a shared location runs the nearest-station search and answers with
//!   a station carousel, or the fallback text when too few are nearby
//! - anything else answers with the welcome text

use crate::domain::{Coordinate, InvalidCoordinate};
use crate::line::Message;
use crate::line::messages::{no_nearby_message, stations_carousel, welcome_message};
use crate::line::webhook::{MessageContent, WebhookEvent};
use crate::proximity::{MatchOutcome, MatcherConfig, nearest};
use crate::stations::{StationStore, StoreError};

/// What the bot received, as far as reply selection cares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inbound {
    /// The user shared a location.
    LocationReceived(Coordinate),
    /// Any other message or event.
    OtherMessageReceived,
}

impl Inbound {
    /// Classify an event by its message type.
    ///
    /// Fails only when a location message carries out-of-range coordinates.
    pub fn classify(event: &WebhookEvent) -> Result<Self, InvalidCoordinate> {
        match event.message.as_ref().map(|m| &m.content) {
            Some(MessageContent::Location {
                latitude,
                longitude,
                ..
            }) => Ok(Inbound::LocationReceived(Coordinate::new(
                *latitude, *longitude,
            )?)),
            _ => Ok(Inbound::OtherMessageReceived),
        }
    }
}

/// Build the messages answering `inbound`.
///
/// Only the location branch touches the store; a store failure aborts the
/// reply.
pub async fn select_reply(
    inbound: Inbound,
    store: &dyn StationStore,
    config: &MatcherConfig,
) -> Result<Vec<Message>, StoreError> {
    let origin = match inbound {
        Inbound::LocationReceived(origin) => origin,
        Inbound::OtherMessageReceived => return Ok(vec![welcome_message()]),
    };

    let bounds = config.bounding_box(origin);
    let candidates = store.stations_within(&bounds).await?;

    match nearest(origin, candidates, config) {
        MatchOutcome::Nearby(stations) => {
            tracing::info!(
                %origin,
                nearest_km = stations.first().map(|s| s.distance_km),
                "found nearby stations"
            );
            Ok(vec![stations_carousel(&stations)])
        }
        MatchOutcome::NoNearbyStations { candidates } => {
            tracing::info!(%origin, candidates, "not enough stations nearby");
            Ok(vec![no_nearby_message()])
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{BoundingBox, Station, VmType};
    use crate::line::messages::{NO_NEARBY_TEXT, WELCOME_TEXT};
    use crate::line::webhook::WebhookMessage;
    use crate::stations::MemoryStationStore;

    fn location_event(latitude: f64, longitude: f64) -> WebhookEvent {
        WebhookEvent {
            kind: "message".to_string(),
            message: Some(WebhookMessage {
                id: Some("1".to_string()),
                quote_token: None,
                content: MessageContent::Location {
                    latitude,
                    longitude,
                    title: None,
                    address: None,
                },
            }),
            ..Default::default()
        }
    }

    fn station(name: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            address: format!("{name} 路"),
            city: "台中市".to_string(),
            district: "西屯區".to_string(),
            location: name.to_string(),
            coordinate: Coordinate {
                latitude,
                longitude,
            },
            vm_type: VmType(1),
        }
    }

    /// Records the box it was queried with.
    struct RecordingStore {
        inner: MemoryStationStore,
        queried: Mutex<Vec<BoundingBox>>,
    }

    #[async_trait]
    impl StationStore for RecordingStore {
        async fn stations_within(&self, bounds: &BoundingBox) -> Result<Vec<Station>, StoreError> {
            self.queried.lock().unwrap().push(*bounds);
            self.inner.stations_within(bounds).await
        }
    }

    fn text_of(message: &Message) -> &str {
        match message {
            Message::Text { text, .. } => text,
            other => panic!("expected text message, got {other:?}"),
        }
    }

    #[test]
    fn classify_location() {
        let inbound = Inbound::classify(&location_event(24.16, 120.64)).unwrap();
        assert_eq!(
            inbound,
            Inbound::LocationReceived(Coordinate::new(24.16, 120.64).unwrap())
        );
    }

    #[test]
    fn classify_invalid_location() {
        let err = Inbound::classify(&location_event(95.0, 120.64)).unwrap_err();
        assert_eq!(err, InvalidCoordinate::Latitude(95.0));
    }

    #[test]
    fn classify_other() {
        let mut event = location_event(0.0, 0.0);
        event.message.as_mut().unwrap().content = MessageContent::Text {
            text: "hello".to_string(),
        };
        assert_eq!(
            Inbound::classify(&event).unwrap(),
            Inbound::OtherMessageReceived
        );

        let follow = WebhookEvent {
            kind: "follow".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Inbound::classify(&follow).unwrap(),
            Inbound::OtherMessageReceived
        );
    }

    #[tokio::test]
    async fn other_message_gets_welcome_without_store_query() {
        let store = RecordingStore {
            inner: MemoryStationStore::default(),
            queried: Mutex::new(Vec::new()),
        };

        let reply = select_reply(
            Inbound::OtherMessageReceived,
            &store,
            &MatcherConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(reply.len(), 1);
        assert_eq!(text_of(&reply[0]), WELCOME_TEXT);
        assert!(store.queried.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn location_queries_box_and_returns_carousel() {
        let store = RecordingStore {
            inner: MemoryStationStore::new(vec![
                station("c", 24.170, 120.640),
                station("a", 24.161, 120.640),
                station("far-away", 25.0, 121.5),
                station("b", 24.165, 120.640),
                station("d", 24.180, 120.640),
            ]),
            queried: Mutex::new(Vec::new()),
        };
        let origin = Coordinate::new(24.16, 120.64).unwrap();
        let config = MatcherConfig::default().with_margin(0.04);

        let reply = select_reply(Inbound::LocationReceived(origin), &store, &config)
            .await
            .unwrap();

        assert_eq!(store.queried.lock().unwrap()[0], origin.bounding_box(0.04));

        let json = serde_json::to_value(&reply).unwrap();
        let cards = json[0]["contents"]["contents"].as_array().unwrap();
        let titles: Vec<&str> = cards
            .iter()
            .map(|c| c["body"]["contents"][0]["text"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn too_few_stations_gets_fallback() {
        let store = MemoryStationStore::new(vec![
            station("a", 24.161, 120.640),
            station("b", 24.165, 120.640),
        ]);
        let origin = Coordinate::new(24.16, 120.64).unwrap();

        let reply = select_reply(
            Inbound::LocationReceived(origin),
            &store,
            &MatcherConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(text_of(&reply[0]), NO_NEARBY_TEXT);
    }
}
