//! Outbound message bodies.
//!
//! Builders for the three replies the bot sends:
//! - a flex carousel with one card per nearby station
//! - a fallback text when no station is close enough
//! - a welcome text with a "share location" quick reply

use serde::Serialize;

use crate::domain::Coordinate;
use crate::proximity::RankedStation;

/// Alt text shown in chat lists and notifications for flex messages.
pub const ALT_TEXT: &str = "sogorro";

/// Welcome text sent for anything that is not a location.
pub const WELCOME_TEXT: &str =
    "歡迎使用 sogorro！請分享您的位置，幫您找出最近的 GoStation® 換電站。";

/// Fallback text sent when too few stations are nearby.
pub const NO_NEARBY_TEXT: &str = "附近找不到營運中的 GoStation®，請換個位置再試一次。";

/// Label of the quick-reply button that opens the location picker.
pub const SHARE_LOCATION_LABEL: &str = "分享位置";

/// Label of the directions button on each station card.
pub const DIRECTIONS_LABEL: &str = "立即前往";

/// Body of a push API request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushRequest {
    /// Recipient user id
    pub to: String,
    pub messages: Vec<Message>,
}

impl PushRequest {
    pub fn new(to: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            to: to.into(),
            messages,
        }
    }
}

/// A message object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text {
        text: String,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: FlexContainer,
    },
}

/// Buttons shown above the keyboard with a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReplyItem {
    /// Always `action`
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub action: Action,
}

impl QuickReplyItem {
    pub fn new(action: Action) -> Self {
        Self {
            kind: "action",
            image_url: None,
            action,
        }
    }
}

/// What happens when a button is tapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Open a URL
    Uri { label: String, uri: String },
    /// Open the location picker
    Location { label: String },
}

/// Top-level flex container.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexContainer {
    Carousel { contents: Vec<Bubble> },
}

/// A single flex card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "bubble")]
pub struct Bubble {
    pub body: FlexComponent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FlexComponent>,
}

/// Flex building block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexComponent {
    Box(FlexBox),
    Text(FlexText),
    Button(FlexButton),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Baseline,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexBox {
    pub layout: Layout,
    pub contents: Vec<FlexComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
}

impl FlexBox {
    pub fn new(layout: Layout, contents: Vec<FlexComponent>) -> Self {
        Self {
            layout,
            contents,
            margin: None,
            spacing: None,
            flex: None,
        }
    }

    pub fn margin(mut self, margin: &'static str) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn spacing(mut self, spacing: &'static str) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn into_component(self) -> FlexComponent {
        FlexComponent::Box(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
    pub wrap: bool,
}

impl FlexText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            size: None,
            margin: None,
            weight: None,
            flex: None,
            wrap: false,
        }
    }

    pub fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }

    pub fn size(mut self, size: &'static str) -> Self {
        self.size = Some(size);
        self
    }

    pub fn margin(mut self, margin: &'static str) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = Some("bold");
        self
    }

    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn into_component(self) -> FlexComponent {
        FlexComponent::Text(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexButton {
    pub style: ButtonStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<&'static str>,
    pub action: Action,
}

/// Google Maps directions to `coordinate`.
pub fn directions_url(coordinate: &Coordinate) -> String {
    format!(
        "https://www.google.com.tw/maps/dir//{:.6},{:.6}",
        coordinate.latitude, coordinate.longitude
    )
}

/// Distance in kilometres as shown on the card.
pub fn format_distance(distance_km: f64) -> String {
    format!("{distance_km:.2} 公里")
}

/// A labelled baseline row: grey label on the left, value on the right.
fn info_row(label: &'static str, value: String, wrap: bool) -> FlexComponent {
    let mut value = FlexText::new(value).color("#666666").size("sm").flex(5);
    if wrap {
        value = value.wrap();
    }

    FlexBox::new(
        Layout::Baseline,
        vec![
            FlexText::new(label)
                .color("#aaaaaa")
                .size("sm")
                .flex(1)
                .into_component(),
            value.into_component(),
        ],
    )
    .spacing("sm")
    .into_component()
}

/// The card for one station.
pub fn station_bubble(ranked: &RankedStation) -> Bubble {
    let station = &ranked.station;

    let title = FlexText::new(station.location.clone())
        .bold()
        .size("xl")
        .wrap()
        .into_component();

    let kind = FlexBox::new(
        Layout::Baseline,
        vec![
            FlexText::new(station.vm_type.display_name())
                .size("sm")
                .color("#999999")
                .margin("md")
                .flex(0)
                .into_component(),
        ],
    )
    .margin("md")
    .into_component();

    let details = FlexBox::new(
        Layout::Vertical,
        vec![
            info_row("地址", station.address.clone(), true),
            info_row("距離", format_distance(ranked.distance_km), false),
        ],
    )
    .margin("lg")
    .spacing("sm")
    .into_component();

    let directions = FlexComponent::Button(FlexButton {
        style: ButtonStyle::Primary,
        height: Some("sm"),
        action: Action::Uri {
            label: DIRECTIONS_LABEL.to_string(),
            uri: directions_url(&station.coordinate),
        },
    });

    Bubble {
        body: FlexBox::new(Layout::Vertical, vec![title, kind, details]).into_component(),
        footer: Some(
            FlexBox::new(Layout::Vertical, vec![directions])
                .spacing("sm")
                .flex(0)
                .into_component(),
        ),
    }
}

/// One flex message with a card per station, in the given order.
pub fn stations_carousel(stations: &[RankedStation]) -> Message {
    Message::Flex {
        alt_text: ALT_TEXT.to_string(),
        contents: FlexContainer::Carousel {
            contents: stations.iter().map(station_bubble).collect(),
        },
    }
}

/// Quick reply offering the location picker.
pub fn share_location_quick_reply() -> QuickReply {
    QuickReply {
        items: vec![QuickReplyItem::new(Action::Location {
            label: SHARE_LOCATION_LABEL.to_string(),
        })],
    }
}

/// Greeting for anything that is not a shared location.
pub fn welcome_message() -> Message {
    Message::Text {
        text: WELCOME_TEXT.to_string(),
        quick_reply: Some(share_location_quick_reply()),
    }
}

/// Reply when fewer stations than required are nearby.
pub fn no_nearby_message() -> Message {
    Message::Text {
        text: NO_NEARBY_TEXT.to_string(),
        quick_reply: Some(share_location_quick_reply()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{Station, VmType};

    fn ranked(location: &str, vm_type: i64, distance_km: f64) -> RankedStation {
        RankedStation {
            station: Station {
                address: "Calle 3 Pantitlan".to_string(),
                city: "CDMX".to_string(),
                district: "Iztacalco".to_string(),
                location: location.to_string(),
                coordinate: Coordinate {
                    latitude: 19.427050,
                    longitude: -99.127571,
                },
                vm_type: VmType(vm_type),
            },
            distance_km,
        }
    }

    fn to_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn bubble_layout() {
        let bubble = to_json(&station_bubble(&ranked("Station Ermita", 1, 3.16)));

        assert_eq!(bubble["type"], "bubble");
        assert_eq!(bubble["body"]["type"], "box");
        assert_eq!(bubble["body"]["layout"], "vertical");

        let body = &bubble["body"]["contents"];
        assert_eq!(body[0]["type"], "text");
        assert_eq!(body[0]["text"], "Station Ermita");
        assert_eq!(body[0]["weight"], "bold");
        assert_eq!(body[1]["contents"][0]["text"], "GoStation®");
        assert_eq!(
            body[2]["contents"][0]["contents"][1]["text"],
            "Calle 3 Pantitlan"
        );
        assert_eq!(body[2]["contents"][1]["contents"][0]["text"], "距離");
        assert_eq!(body[2]["contents"][1]["contents"][1]["text"], "3.16 公里");

        let button = &bubble["footer"]["contents"][0];
        assert_eq!(button["type"], "button");
        assert_eq!(button["style"], "primary");
        assert_eq!(
            button["action"],
            json!({
                "type": "uri",
                "label": "立即前往",
                "uri": "https://www.google.com.tw/maps/dir//19.427050,-99.127571"
            })
        );
    }

    #[test]
    fn super_station_label() {
        let bubble = to_json(&station_bubble(&ranked("Station Pantitlan", 3, 1.28)));
        assert_eq!(
            bubble["body"]["contents"][1]["contents"][0]["text"],
            "Super GoStation®"
        );
    }

    #[test]
    fn carousel_keeps_order() {
        let stations = vec![
            ranked("first", 1, 0.2),
            ranked("second", 1, 0.5),
            ranked("third", 3, 1.0),
        ];
        let message = to_json(&stations_carousel(&stations));

        assert_eq!(message["type"], "flex");
        assert_eq!(message["altText"], "sogorro");
        assert_eq!(message["contents"]["type"], "carousel");

        let cards = message["contents"]["contents"].as_array().unwrap();
        let titles: Vec<&str> = cards
            .iter()
            .map(|c| c["body"]["contents"][0]["text"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn welcome_has_location_quick_reply() {
        let message = to_json(&welcome_message());

        assert_eq!(message["type"], "text");
        assert_eq!(message["text"], WELCOME_TEXT);
        assert_eq!(
            message["quickReply"]["items"][0],
            json!({"type": "action", "action": {"type": "location", "label": "分享位置"}})
        );
    }

    #[test]
    fn fallback_text() {
        let message = to_json(&no_nearby_message());
        assert_eq!(message["text"], NO_NEARBY_TEXT);
    }

    #[test]
    fn push_request_shape() {
        let request = PushRequest::new("U123", vec![welcome_message()]);
        let body = to_json(&request);

        assert_eq!(body["to"], "U123");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(0.0), "0.00 公里");
        assert_eq!(format_distance(1.005_1), "1.01 公里");
        assert_eq!(format_distance(12.3), "12.30 公里");
    }
}
