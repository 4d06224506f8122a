//! Inbound event translation.
//!
//! BotPenguin pushes deliveries to the subscribed callback URL as small JSON
//! documents (`{botId, platform, data?}`). This module maps one delivery to
//! one normalized output envelope, keyed by the trigger event the
//! subscription was registered for.
//!
//! Translation is a pure mapping and never fails: unrecognized event types
//! fall back to a generic envelope instead of raising, so a delivery is
//! always acknowledged and always yields exactly one envelope.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::error::ValidationError;

/// Application tag stamped on every outbound envelope.
pub const APP_NAME: &str = "botpenguin";

// ============================================================================
// Trigger Events
// ============================================================================

/// The push events a webhook subscription can be registered for.
///
/// Each event carries a fixed wire hook name, a domain event label for the
/// envelope, and the key its payload is published under.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::events::TriggerEvent;
///
/// let event: TriggerEvent = "newLeadHook".parse().unwrap();
/// assert_eq!(event, TriggerEvent::NewLead);
/// assert_eq!(event.event_label(), "contact.created");
/// assert_eq!(event.payload_key(), "contact");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
    /// A new contact was created
    NewLead,
    /// An incoming message arrived
    NewMessage,
    /// A WhatsApp order was placed
    NewOrder,
}

impl TriggerEvent {
    /// All subscribable events, in presentation order.
    pub fn all() -> [TriggerEvent; 3] {
        [Self::NewLead, Self::NewMessage, Self::NewOrder]
    }

    /// Wire name of the hook, as the remote registry keys it.
    pub fn hook_name(&self) -> &'static str {
        match self {
            Self::NewLead => "newLeadHook",
            Self::NewMessage => "newMessageHook",
            Self::NewOrder => "newOrderHook",
        }
    }

    /// Domain event label published on the envelope.
    pub fn event_label(&self) -> &'static str {
        match self {
            Self::NewLead => "contact.created",
            Self::NewMessage => "message.received",
            Self::NewOrder => "order.created",
        }
    }

    /// Envelope key the delivery payload is published under.
    pub fn payload_key(&self) -> &'static str {
        match self {
            Self::NewLead => "contact",
            Self::NewMessage => "message",
            Self::NewOrder => "order",
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hook_name())
    }
}

impl FromStr for TriggerEvent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newLeadHook" => Ok(Self::NewLead),
            "newMessageHook" => Ok(Self::NewMessage),
            "newOrderHook" => Ok(Self::NewOrder),
            other => Err(ValidationError::InvalidFormat {
                field: "event_type".to_string(),
                message: format!("unknown trigger event '{}'", other),
            }),
        }
    }
}

// ============================================================================
// Event Envelope
// ============================================================================

/// Normalized output produced for one inbound delivery.
///
/// The payload is published under an event-specific key (`contact`,
/// `message`, `order`, or `data` for unrecognized events), so it lives in a
/// flattened one-entry map. `botId` and `platform` mirror the delivery and
/// are omitted from serialization when the delivery did not carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEnvelope {
    /// Domain event label (e.g. `contact.created`)
    pub event: String,

    /// Originating application tag, always [`APP_NAME`]
    pub app: String,

    /// Bot the delivery was scoped to, when present
    #[serde(rename = "botId", skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<Value>,

    /// Messaging platform tag, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Value>,

    /// Event-keyed payload
    #[serde(flatten)]
    pub payload: Map<String, Value>,

    /// When the delivery was translated
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    /// The key the payload is published under.
    pub fn payload_key(&self) -> Option<&str> {
        self.payload.keys().next().map(String::as_str)
    }

    /// The payload value.
    pub fn payload_value(&self) -> Option<&Value> {
        self.payload.values().next()
    }
}

// ============================================================================
// Translation
// ============================================================================

/// Translate one inbound delivery into its output envelope.
///
/// The payload is the delivery's `data` field when it carries one, otherwise
/// the whole delivery document. Event types outside [`TriggerEvent`] map to
/// the `unknown`/`data` pairing rather than failing.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::events::translate;
/// use serde_json::json;
///
/// let body = json!({"botId": "b1", "platform": "whatsapp", "data": {"name": "Jane"}});
/// let envelope = translate("newLeadHook", &body);
///
/// assert_eq!(envelope.event, "contact.created");
/// assert_eq!(envelope.payload_key(), Some("contact"));
/// assert_eq!(envelope.payload_value(), Some(&json!({"name": "Jane"})));
/// ```
pub fn translate(event_type: &str, body: &Value) -> EventEnvelope {
    let (label, key) = match event_type.parse::<TriggerEvent>() {
        Ok(event) => (event.event_label(), event.payload_key()),
        Err(_) => ("unknown", "data"),
    };

    // A null `data` falls back to the whole delivery, same as a missing one.
    let payload_value = match body.get("data") {
        Some(Value::Null) | None => body.clone(),
        Some(value) => value.clone(),
    };

    let mut payload = Map::new();
    payload.insert(key.to_string(), payload_value);

    EventEnvelope {
        event: label.to_string(),
        app: APP_NAME.to_string(),
        bot_id: body.get("botId").cloned(),
        platform: body.get("platform").cloned(),
        payload,
        timestamp: Utc::now(),
    }
}

/// Translate a raw delivery body as received on the HTTP endpoint.
///
/// Delivery is fire-and-forget: a body that is not valid JSON is treated as
/// an empty delivery, so the caller can always acknowledge immediately and
/// still emit exactly one envelope.
pub fn translate_delivery(event_type: &str, body: &Bytes) -> EventEnvelope {
    info!(event_type, bytes = body.len(), "Inbound webhook delivery received");
    let value = serde_json::from_slice(body).unwrap_or(Value::Null);
    translate(event_type, &value)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
