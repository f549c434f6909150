use crate::models::route::Waypoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Location update posted to the backend once per waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl UpdatePayload {
    pub fn new(vehicle_id: &str, waypoint: &Waypoint) -> Self {
        Self {
            id: vehicle_id.to_string(),
            lat: waypoint.lat,
            lng: waypoint.lng,
        }
    }
}

/// Reply from the backend. Only `triggeredSignal` is inspected; the traffic
/// backend fills it with the id of the signal it switched to green, or `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerResponse {
    #[serde(rename = "triggeredSignal", default)]
    pub triggered_signal: Option<Value>,
}

impl ServerResponse {
    pub fn outcome(&self) -> UpdateOutcome {
        match &self.triggered_signal {
            Some(value) if is_truthy(value) => UpdateOutcome::Triggered(signal_label(value)),
            _ => UpdateOutcome::Cruising,
        }
    }
}

/// Result of a single update exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 200 response carrying a truthy `triggeredSignal`.
    Triggered(String),
    /// 200 response without a triggered signal.
    Cruising,
    /// Any status other than 200.
    Failed(u16),
    /// Transport failure, timeout or unreadable body.
    Error(String),
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Triggered(_) | UpdateOutcome::Cruising)
    }
}

/// Interprets the body of a 200 response. An empty body counts as cruising.
pub fn parse_success_body(body: &str) -> UpdateOutcome {
    if body.trim().is_empty() {
        return UpdateOutcome::Cruising;
    }
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return UpdateOutcome::Error(format!("invalid JSON in response: {}", e)),
    };
    if !value.is_object() {
        return UpdateOutcome::Error(format!("expected a JSON object in response, got {}", value));
    }
    match serde_json::from_value::<ServerResponse>(value) {
        Ok(response) => response.outcome(),
        Err(e) => UpdateOutcome::Error(format!("unexpected response shape: {}", e)),
    }
}

/// `null`, `false`, zero, and empty strings/arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn signal_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
