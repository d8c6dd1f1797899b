//! Process configuration read from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use crate::line::DEFAULT_PUSH_ENDPOINT;
use crate::proximity::{DEFAULT_MARGIN_DEGREES, DEFAULT_TOP_K, MatcherConfig};
use crate::stations::{DEFAULT_COLLECTION, StatusFilter};

/// Default listen port (Cloud Run sets `PORT`).
pub const DEFAULT_PORT: u16 = 8080;

/// Default Secret Manager secret holding the channel access token.
pub const DEFAULT_SECRET_NAME: &str = "linebot-access-token";

/// Error returned when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// How log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Falls back to the metadata server when unset.
    pub project_id: Option<String>,
    pub line_endpoint: String,
    /// Falls back to Secret Manager when unset.
    pub line_access_token: Option<String>,
    pub line_secret_name: String,
    pub firestore_collection: String,
    pub firestore_emulator_host: Option<String>,
    pub status: StatusFilter,
    /// Serve stations from this JSON file instead of Firestore.
    pub station_fixture: Option<PathBuf>,
    pub matcher: MatcherConfig,
    pub log_format: LogFormat,
    pub metadata_host: Option<String>,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let default_status = StatusFilter::default();
        let status = StatusFilter::new(
            get("STATION_STATUS_FIELD").unwrap_or(default_status.field),
            parse(&get, "STATION_STATUS_VALUE", "integer")?.unwrap_or(default_status.value),
        );

        let top_k: usize =
            parse(&get, "STATION_TOP_K", "positive integer")?.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(ConfigError::Invalid {
                name: "STATION_TOP_K",
                value: "0".to_string(),
                expected: "positive integer",
            });
        }

        let margin: f64 = parse(&get, "STATION_SEARCH_MARGIN", "number of degrees")?
            .unwrap_or(DEFAULT_MARGIN_DEGREES);
        if !margin.is_finite() || margin <= 0.0 {
            return Err(ConfigError::Invalid {
                name: "STATION_SEARCH_MARGIN",
                value: margin.to_string(),
                expected: "number of degrees",
            });
        }

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Text,
            Some(v) if v == "text" => LogFormat::Text,
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: v,
                    expected: "log format (text or json)",
                });
            }
        };

        Ok(Self {
            port: parse(&get, "PORT", "port")?.unwrap_or(DEFAULT_PORT),
            project_id: get("GOOGLE_CLOUD_PROJECT"),
            line_endpoint: get("LINE_API_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_PUSH_ENDPOINT.to_string()),
            line_access_token: get("LINEBOT_ACCESS_TOKEN").map(|t| t.trim().to_string()),
            line_secret_name: get("LINEBOT_SECRET_NAME")
                .unwrap_or_else(|| DEFAULT_SECRET_NAME.to_string()),
            firestore_collection: get("FIRESTORE_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            firestore_emulator_host: get("FIRESTORE_EMULATOR_HOST"),
            status,
            station_fixture: get("STATION_FIXTURE").map(PathBuf::from),
            matcher: MatcherConfig::new(top_k, margin),
            log_format,
            metadata_host: get("GCE_METADATA_HOST"),
        })
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(name)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                name,
                value,
                expected,
            })
        })
        .transpose()
}
