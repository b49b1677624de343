//! Data models for the link service
//!
//! [`LinkRecord`] is what the store holds under each slug; the remaining
//! types describe the admin API request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// URL shown in the admin listing for records whose payload cannot be decoded
pub const INVALID_DATA: &str = "Invalid Data";

/// Persisted value of a link. The slug is the storage key and is not repeated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Destination to redirect to
    pub url: String,

    /// Show the confirmation page instead of redirecting directly
    #[serde(default)]
    pub interstitial: bool,

    /// Successful resolutions so far
    #[serde(default)]
    pub visits: u64,

    /// Milliseconds since epoch of the last create/update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,

    /// Fields this service does not know about, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LinkRecord {
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Visit count carried by a stored payload, 0 if it cannot be read
    pub fn visits_of(raw: Option<&str>) -> u64 {
        #[derive(Deserialize)]
        struct Visits {
            #[serde(default)]
            visits: Option<u64>,
        }

        raw.and_then(|raw| serde_json::from_str::<Visits>(raw).ok())
            .and_then(|v| v.visits)
            .unwrap_or(0)
    }
}

/// One row of the admin listing
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    pub slug: String,
    pub url: String,
    pub interstitial: bool,
    pub visits: u64,
    pub updated_at: Option<i64>,
}

impl LinkEntry {
    /// Builds a listing row, masking undecodable payloads with a placeholder
    pub fn from_stored(slug: String, raw: &str) -> Self {
        match LinkRecord::decode(raw) {
            Ok(record) => LinkEntry {
                slug,
                url: record.url,
                interstitial: record.interstitial,
                visits: record.visits,
                updated_at: record.updated_at,
            },
            Err(_) => LinkEntry {
                slug,
                url: INVALID_DATA.to_string(),
                interstitial: false,
                visits: 0,
                updated_at: None,
            },
        }
    }
}

/// Admin API operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    List,
    /// `create` and `update` share the same upsert semantics
    Upsert,
    Delete,
    Unknown(String),
}

impl AdminAction {
    fn parse(action: &str) -> Self {
        match action {
            "list" => AdminAction::List,
            "create" | "update" => AdminAction::Upsert,
            "delete" => AdminAction::Delete,
            other => AdminAction::Unknown(other.to_string()),
        }
    }
}

/// JSON body posted to the admin path
///
/// # Example
/// ```json
/// {
///   "action": "create",
///   "slug": "docs",
///   "target": "https://example.com/docs",
///   "interstitial": true
/// }
/// ```
#[derive(Deserialize, Debug, Default)]
pub struct AdminRequest {
    #[serde(default)]
    pub action: Option<String>,
    /// String, number or boolean; see [`AdminRequest::slug`]
    #[serde(default)]
    pub slug: Value,
    #[serde(default)]
    pub target: Value,
    /// Any JSON value; interpreted with JavaScript truthiness
    #[serde(default)]
    pub interstitial: Value,
}

impl AdminRequest {
    pub fn action(&self) -> AdminAction {
        AdminAction::parse(self.action.as_deref().unwrap_or_default())
    }

    /// Slug as text, unless missing or falsy
    pub fn slug(&self) -> Option<String> {
        scalar_text(&self.slug)
    }

    /// Target URL as text, unless missing or falsy
    pub fn target(&self) -> Option<String> {
        scalar_text(&self.target)
    }

    pub fn interstitial(&self) -> bool {
        truthy(&self.interstitial)
    }
}

/// Text form of a truthy scalar (`123` becomes `"123"`). Falsy values,
/// arrays and objects yield `None`.
fn scalar_text(value: &Value) -> Option<String> {
    if !truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// JavaScript-style truthiness of a JSON value
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Response body of every admin API call
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AdminResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<LinkEntry>>,
}

impl AdminResponse {
    pub fn ok() -> Self {
        AdminResponse {
            success: true,
            error: None,
            data: None,
        }
    }

    pub fn listing(data: Vec<LinkEntry>) -> Self {
        AdminResponse {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(error: Option<String>) -> Self {
        AdminResponse {
            success: false,
            error,
            data: None,
        }
    }
}
