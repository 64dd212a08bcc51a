//! Wire contract between panels, the relay and game clients.
//!
//! Game clients speak JSON objects tagged by `type`. Panels speak
//! `[eventName, payload]` arrays.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while decoding or encoding relay traffic.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("power value is not a number: {0}")]
    InvalidPower(Value),

    #[error("failed to serialize outbound message: {0}")]
    Serialize(String),
}

// ---------------------------------------------------------------------------
// Relay → Client
// ---------------------------------------------------------------------------

/// Message pushed to every connected game client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    Effect { effect: String },
}

impl ClientCommand {
    pub fn effect(effect: impl Into<String>) -> Self {
        ClientCommand::Effect {
            effect: effect.into(),
        }
    }

    /// Serialize to the JSON text frame sent over the client socket.
    pub fn to_json(&self) -> Result<String, RelayError> {
        serde_json::to_string(self).map_err(|e| RelayError::Serialize(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Client → Relay
// ---------------------------------------------------------------------------

/// A decoded message from a game client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientReport {
    /// Telemetry forwarded to every panel.
    Power(Number),
    /// Handshake, logged only.
    Hello,
    /// Anything else. `kind` holds the `type` field when there was one.
    Unknown { kind: Option<String> },
}

impl ClientReport {
    /// Decode a client text frame.
    ///
    /// Only invalid JSON and a non-numeric `power` are errors; a valid JSON
    /// value without a recognised `type` decodes to [`ClientReport::Unknown`].
    ///
    /// Panels are only ever sent numeric power. A `power` message carrying
    /// anything else (a string, an object, nothing) is rejected here instead
    /// of being passed through as-is.
    pub fn decode(text: &str) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_str(text)?;

        let kind = match value.get("type").and_then(Value::as_str) {
            Some(kind) => kind,
            None => return Ok(ClientReport::Unknown { kind: None }),
        };

        match kind {
            "power" => match value.get("power") {
                Some(Value::Number(n)) => Ok(ClientReport::Power(n.clone())),
                other => Err(RelayError::InvalidPower(
                    other.cloned().unwrap_or(Value::Null),
                )),
            },
            "hello" => Ok(ClientReport::Hello),
            other => Ok(ClientReport::Unknown {
                kind: Some(other.to_string()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Panel channel
// ---------------------------------------------------------------------------

/// Name of the panel event requesting an effect.
pub const EFFECT_EVENT: &str = "effect";
/// Name of the panel event carrying power telemetry.
pub const POWER_EVENT: &str = "power";

/// Payload of an `effect` request from a panel.
#[derive(Debug, Clone, Deserialize)]
pub struct EffectRequest {
    pub effect: String,
}

/// Named event on the panel channel, framed as `[name, payload]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEvent(pub String, pub Value);

impl PanelEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        PanelEvent(name.into(), payload)
    }

    pub fn power(power: Number) -> Self {
        PanelEvent::new(POWER_EVENT, Value::Number(power))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn payload(&self) -> &Value {
        &self.1
    }

    /// Parse a panel text frame. `None` when the frame is not an event.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"["error","serialization failed"]"#.to_string())
    }
}

/// A request decoded from a panel frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRequest {
    Effect(String),
    /// Well-formed event the relay has no handler for.
    Unhandled(String),
    /// `effect` event without a string `effect` field.
    InvalidEffect(Value),
}

impl From<PanelEvent> for PanelRequest {
    fn from(event: PanelEvent) -> Self {
        let PanelEvent(name, payload) = event;
        if name != EFFECT_EVENT {
            return PanelRequest::Unhandled(name);
        }
        match serde_json::from_value::<EffectRequest>(payload.clone()) {
            Ok(req) => PanelRequest::Effect(req.effect),
            Err(_) => PanelRequest::InvalidEffect(payload),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
