use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InvalidPayloadError;

/// Sound played when the notification arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sound {
    /// Name of a sound file in the app bundle, or `"default"`.
    Named(String),
    /// Critical alert sound, delivered even when the device is muted.
    Critical(CriticalSound),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalSound {
    /// Always `1` for a critical alert.
    pub critical: u8,
    pub name: String,
    /// Between `0.0` (silent) and `1.0` (full volume).
    pub volume: f64,
}

impl Sound {
    pub fn named(name: impl Into<String>) -> Self {
        Sound::Named(name.into())
    }

    pub fn critical(name: impl Into<String>, volume: f64) -> Self {
        Sound::Critical(CriticalSound {
            critical: 1,
            name: name.into(),
            volume,
        })
    }
}

impl From<&str> for Sound {
    fn from(name: &str) -> Self {
        Sound::named(name)
    }
}

impl From<String> for Sound {
    fn from(name: String) -> Self {
        Sound::Named(name)
    }
}

/// Notification content handed to the APN channel.
///
/// Every field is optional. Unset fields never reach the wire payload, so
/// the device keeps its own defaults for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApnMessage {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub launch_image: Option<String>,
    pub title_loc_key: Option<String>,
    pub title_loc_args: Vec<String>,
    pub action_loc_key: Option<String>,
    pub loc_key: Option<String>,
    pub loc_args: Vec<String>,
    /// `None` leaves the badge unchanged; `Some(0)` clears it.
    pub badge: Option<u32>,
    pub sound: Option<Sound>,
    pub category: Option<String>,
    pub thread_id: Option<String>,
    pub content_available: bool,
    pub mutable_content: bool,
    /// App-specific data merged into the top level of the payload.
    pub custom: Map<String, Value>,
}

impl ApnMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_launch_image(mut self, launch_image: impl Into<String>) -> Self {
        self.launch_image = Some(launch_image.into());
        self
    }

    pub fn with_title_loc_key(mut self, key: impl Into<String>) -> Self {
        self.title_loc_key = Some(key.into());
        self
    }

    pub fn with_title_loc_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_loc_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action_loc_key(mut self, key: impl Into<String>) -> Self {
        self.action_loc_key = Some(key.into());
        self
    }

    pub fn with_loc_key(mut self, key: impl Into<String>) -> Self {
        self.loc_key = Some(key.into());
        self
    }

    pub fn with_loc_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loc_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_badge(mut self, badge: u32) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_sound(mut self, sound: impl Into<Sound>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Wake the app for a background fetch.
    pub fn with_content_available(mut self, content_available: bool) -> Self {
        self.content_available = content_available;
        self
    }

    /// Let a notification service extension modify the content.
    pub fn with_mutable_content(mut self, mutable_content: bool) -> Self {
        self.mutable_content = mutable_content;
        self
    }

    /// Add a custom top-level value. Reserved keys are rejected when the
    /// payload is built.
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// Add any serializable value as custom data.
    pub fn try_with_custom<T>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, InvalidPayloadError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.custom.insert(key.into(), value);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_builder_sets_fields() {
        let message = ApnMessage::new()
            .with_title("New follower")
            .with_body("alice started following you")
            .with_badge(3)
            .with_sound("default")
            .with_thread_id("followers")
            .with_mutable_content(true);

        assert_eq!(message.title.as_deref(), Some("New follower"));
        assert_eq!(message.badge, Some(3));
        assert_eq!(message.sound, Some(Sound::Named("default".to_string())));
        assert_eq!(message.thread_id.as_deref(), Some("followers"));
        assert!(message.mutable_content);
        assert!(!message.content_available);
    }

    #[test]
    fn test_custom_keeps_insertion_order() {
        let message = ApnMessage::new()
            .with_custom("zeta", 1)
            .with_custom("alpha", "two")
            .with_custom("mid", json!({"nested": true}));

        let keys: Vec<&str> = message.custom.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_try_with_custom_serializes_value() {
        let mut extra = BTreeMap::new();
        extra.insert("post_id", 42);

        let message = ApnMessage::new()
            .try_with_custom("extra", &extra)
            .unwrap();

        assert_eq!(message.custom["extra"], json!({"post_id": 42}));
    }

    #[test]
    fn test_try_with_custom_rejects_unserializable_value() {
        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], "non-string map key");

        let result = ApnMessage::new().try_with_custom("bad", &bad);

        assert!(matches!(result, Err(InvalidPayloadError::Serialization(_))));
    }

    #[test]
    fn test_critical_sound_serialization() {
        let sound = Sound::critical("alarm.caf", 0.8);
        let json = serde_json::to_value(&sound).unwrap();
        assert_eq!(json, json!({"critical": 1, "name": "alarm.caf", "volume": 0.8}));

        let named = serde_json::to_value(Sound::named("default")).unwrap();
        assert_eq!(named, json!("default"));
    }

    #[test]
    fn test_message_deserializes_with_defaults() {
        let message: ApnMessage =
            serde_json::from_value(json!({"title": "Hi", "custom": {"k": "v"}})).unwrap();

        assert_eq!(message.title.as_deref(), Some("Hi"));
        assert!(message.loc_args.is_empty());
        assert_eq!(message.custom["k"], json!("v"));
    }
}
