use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::InvalidPayloadError;
use crate::message::ApnMessage;
use crate::payload::{build_payload, Payload};

/// APNs Notification Priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Immediate delivery
    High,
    /// Delivery scheduled around the device's power state
    Normal,
}

impl Priority {
    /// Value of the `apns-priority` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "10",
            Priority::Normal => "5",
        }
    }
}

/// Value of the `apns-push-type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushType {
    Alert,
    Background,
    Location,
    Voip,
    Complication,
    Fileprovider,
    Mdm,
}

impl PushType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushType::Alert => "alert",
            PushType::Background => "background",
            PushType::Location => "location",
            PushType::Voip => "voip",
            PushType::Complication => "complication",
            PushType::Fileprovider => "fileprovider",
            PushType::Mdm => "mdm",
        }
    }
}

/// Request headers sent alongside every payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationOptions {
    /// The topic of the remote notification, typically the app's bundle ID.
    pub apns_topic: Option<String>,
    pub apns_priority: Option<Priority>,
    /// A UNIX epoch date expressed in seconds (UTC).
    pub apns_expiration: Option<i64>,
    pub apns_collapse_id: Option<String>,
    pub apns_push_type: Option<PushType>,
}

/// One payload addressed to one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub payload: Arc<Payload>,
    pub device_token: String,
    pub options: NotificationOptions,
}

/// Fan a message out to every device token.
///
/// The payload is built once and shared by all requests; token order is
/// preserved. No payload is built when there are no tokens.
pub fn expand<I, T>(
    message: &ApnMessage,
    tokens: I,
    options: &NotificationOptions,
) -> Result<Vec<DispatchRequest>, InvalidPayloadError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let payload = Arc::new(build_payload(message)?);

    Ok(tokens
        .into_iter()
        .map(|device_token| DispatchRequest {
            payload: Arc::clone(&payload),
            device_token,
            options: options.clone(),
        })
        .collect())
}
