use serde::Deserialize;

use crate::dispatch::{NotificationOptions, Priority, PushType};

/// APNs Configuration
///
/// Holds the per-request settings of the channel. Credentials stay with the
/// transport client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApnsConfig {
    /// Bundle ID used as `apns-topic`.
    pub topic: Option<String>,
    #[serde(default)]
    pub production: bool,
    pub priority: Option<Priority>,
    pub expiration: Option<i64>,
    pub collapse_id: Option<String>,
    pub push_type: Option<PushType>,
}

impl ApnsConfig {
    /// Load configuration from `APNS_*` environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("APNS_").from_env::<ApnsConfig>()
    }

    /// Get APNs API endpoint based on environment, for transport implementations
    pub fn endpoint(&self) -> &str {
        if self.production {
            "api.push.apple.com"
        } else {
            "api.sandbox.push.apple.com"
        }
    }

    pub fn notification_options(&self) -> NotificationOptions {
        NotificationOptions {
            apns_topic: self.topic.clone(),
            apns_priority: self.priority,
            apns_expiration: self.expiration,
            apns_collapse_id: self.collapse_id.clone(),
            apns_push_type: self.push_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: &[&str] = &[
        "APNS_TOPIC",
        "APNS_PRODUCTION",
        "APNS_PRIORITY",
        "APNS_EXPIRATION",
        "APNS_COLLAPSE_ID",
        "APNS_PUSH_TYPE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = ApnsConfig::from_env().unwrap();

        assert_eq!(config, ApnsConfig::default());
        assert_eq!(config.endpoint(), "api.sandbox.push.apple.com");
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_reads_all_fields() {
        clear_env();
        std::env::set_var("APNS_TOPIC", "com.example.app");
        std::env::set_var("APNS_PRODUCTION", "true");
        std::env::set_var("APNS_PRIORITY", "normal");
        std::env::set_var("APNS_EXPIRATION", "1700000000");
        std::env::set_var("APNS_COLLAPSE_ID", "inbox");
        std::env::set_var("APNS_PUSH_TYPE", "background");

        let config = ApnsConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.topic.as_deref(), Some("com.example.app"));
        assert!(config.production);
        assert_eq!(config.priority, Some(Priority::Normal));
        assert_eq!(config.expiration, Some(1_700_000_000));
        assert_eq!(config.collapse_id.as_deref(), Some("inbox"));
        assert_eq!(config.push_type, Some(PushType::Background));
        assert_eq!(config.endpoint(), "api.push.apple.com");
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_rejects_malformed_value() {
        clear_env();
        std::env::set_var("APNS_EXPIRATION", "tomorrow");

        let result = ApnsConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_notification_options() {
        let config = ApnsConfig {
            topic: Some("com.example.app".to_string()),
            priority: Some(Priority::High),
            push_type: Some(PushType::Alert),
            ..Default::default()
        };

        let options = config.notification_options();

        assert_eq!(options.apns_topic.as_deref(), Some("com.example.app"));
        assert_eq!(options.apns_priority, Some(Priority::High));
        assert_eq!(options.apns_push_type, Some(PushType::Alert));
        assert!(options.apns_expiration.is_none());
        assert!(options.apns_collapse_id.is_none());
    }
}
