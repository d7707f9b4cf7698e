use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::InvalidPayloadError;
use crate::message::{ApnMessage, Sound};

/// Top-level payload keys custom data may not use.
pub const RESERVED_KEYS: &[&str] = &["aps"];

/// APNs notification payload.
///
/// Only produced by [`build_payload`], so a `Payload` always satisfies the
/// wire invariants: no top-level `null` values and no custom key shadowing
/// `aps`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    aps: Aps,
    #[serde(flatten)]
    custom: Map<String, Value>,
}

/// The reserved `aps` dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<Sound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "thread-id", skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    pub content_available: Option<u8>,
    #[serde(rename = "mutable-content", skip_serializing_if = "Option::is_none")]
    pub mutable_content: Option<u8>,
}

impl Payload {
    pub fn aps(&self) -> &Aps {
        &self.aps
    }

    /// Custom top-level entries, in insertion order.
    pub fn custom(&self) -> &Map<String, Value> {
        &self.custom
    }

    pub fn to_value(&self) -> Result<Value, InvalidPayloadError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, InvalidPayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// When an alert field makes it into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    /// Empty strings and empty lists are left out.
    NonEmpty,
    /// Any set value is sent, including `""`.
    Set,
}

struct AlertField {
    key: &'static str,
    presence: Presence,
    value: fn(&ApnMessage) -> Option<Value>,
}

impl AlertField {
    fn emit(&self, message: &ApnMessage) -> Option<Value> {
        let value = (self.value)(message)?;
        match self.presence {
            Presence::Set => Some(value),
            Presence::NonEmpty if is_empty(&value) => None,
            Presence::NonEmpty => Some(value),
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

// `*-loc-key` fields are `Set`: APNs treats a present empty key differently
// from a missing one.
fn alert_fields() -> [AlertField; 9] {
    [
        AlertField {
            key: "title",
            presence: Presence::NonEmpty,
            value: |m| m.title.clone().map(Value::from),
        },
        AlertField {
            key: "subtitle",
            presence: Presence::NonEmpty,
            value: |m| m.subtitle.clone().map(Value::from),
        },
        AlertField {
            key: "body",
            presence: Presence::NonEmpty,
            value: |m| m.body.clone().map(Value::from),
        },
        AlertField {
            key: "launch-image",
            presence: Presence::NonEmpty,
            value: |m| m.launch_image.clone().map(Value::from),
        },
        AlertField {
            key: "title-loc-args",
            presence: Presence::NonEmpty,
            value: |m| Some(Value::from(m.title_loc_args.clone())),
        },
        AlertField {
            key: "title-loc-key",
            presence: Presence::Set,
            value: |m| m.title_loc_key.clone().map(Value::from),
        },
        AlertField {
            key: "action-loc-key",
            presence: Presence::Set,
            value: |m| m.action_loc_key.clone().map(Value::from),
        },
        AlertField {
            key: "loc-args",
            presence: Presence::NonEmpty,
            value: |m| Some(Value::from(m.loc_args.clone())),
        },
        AlertField {
            key: "loc-key",
            presence: Presence::NonEmpty,
            value: |m| m.loc_key.clone().map(Value::from),
        },
    ]
}

fn build_alert(message: &ApnMessage) -> Option<Map<String, Value>> {
    let alert: Map<String, Value> = alert_fields()
        .iter()
        .filter_map(|field| field.emit(message).map(|value| (field.key.to_string(), value)))
        .collect();

    (!alert.is_empty()).then_some(alert)
}

fn merge_custom(custom: &Map<String, Value>) -> Result<Map<String, Value>, InvalidPayloadError> {
    let mut merged = Map::with_capacity(custom.len());
    for (key, value) in custom {
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(InvalidPayloadError::ReservedKey { key: key.clone() });
        }
        if value.is_null() {
            return Err(InvalidPayloadError::NullValue { key: key.clone() });
        }
        merged.insert(key.clone(), value.clone());
    }
    Ok(merged)
}

/// Translate a message into its APNs payload.
///
/// Fails only when custom data uses a reserved key or holds a top-level
/// `null`; nothing is returned in that case.
pub fn build_payload(message: &ApnMessage) -> Result<Payload, InvalidPayloadError> {
    let custom = merge_custom(&message.custom)?;

    let aps = Aps {
        alert: build_alert(message),
        badge: message.badge,
        sound: message.sound.clone(),
        category: message.category.clone(),
        thread_id: message.thread_id.clone(),
        content_available: message.content_available.then_some(1),
        mutable_content: message.mutable_content.then_some(1),
    };

    Ok(Payload { aps, custom })
}
