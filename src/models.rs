//! Data models for parsed access log records.

use serde::{Deserialize, Deserializer};

/// A single request outcome parsed from one JSON access log line.
///
/// Only the fields the detection core consumes are kept; anything else in
/// the log line is ignored. The record is transient and is dropped once the
/// sliding window and pool tracker have been fed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AccessRecord {
    /// Identifier of the upstream pool that served the request, if logged.
    #[serde(default)]
    pub pool: Option<String>,

    /// Response status code. nginx log formats emit this as either a JSON
    /// number or a string; an absent status becomes the empty string and is
    /// never classified as a server error.
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: String,
}

impl AccessRecord {
    /// Parses a raw log line. Malformed lines yield an error the caller is
    /// expected to discard; bad input must never take the watcher down.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Whether the status falls in the 5xx class.
    pub fn is_server_error(&self) -> bool {
        is_server_error(&self.status)
    }
}

/// Whether a status code string falls in the 5xx class. The single
/// classification site for both parsed records and windowed entries.
pub fn is_server_error(status: &str) -> bool {
    status.starts_with('5')
}

/// Accepts a status code given as a JSON number or string.
fn deserialize_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
