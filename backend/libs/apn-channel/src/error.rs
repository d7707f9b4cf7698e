use thiserror::Error;

use crate::response::ResponseCollection;

/// Boxed error produced by transport collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The message could not be turned into an APNs payload.
///
/// Raised before anything is sent. Not retryable: the message itself is
/// malformed.
#[derive(Error, Debug)]
pub enum InvalidPayloadError {
    #[error("custom key `{key}` is reserved by the APNs payload")]
    ReservedKey { key: String },

    #[error("custom key `{key}` has a null value")]
    NullValue { key: String },

    #[error("failed to serialize payload value: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One or more devices rejected the notification.
///
/// The display text is the deduplicated list of reasons joined with `"; "`.
/// The full set of failed responses stays available for per-device handling,
/// e.g. retrying only the tokens in [`DeliveryFailure::failed_tokens`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DeliveryFailure {
    message: String,
    responses: ResponseCollection,
}

impl DeliveryFailure {
    /// Build the aggregated failure from a collection of unsuccessful responses.
    pub fn with_unsuccessful(responses: ResponseCollection) -> Self {
        let mut reasons: Vec<&str> = Vec::new();
        for reason in responses.iter().map(|response| response.reason_text()) {
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
        let message = reasons.join("; ");

        Self { message, responses }
    }

    /// Deduplicated, human readable summary.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every failed response, in delivery order and not deduplicated.
    pub fn responses(&self) -> &ResponseCollection {
        &self.responses
    }

    pub fn into_responses(self) -> ResponseCollection {
        self.responses
    }

    /// Tokens of the devices that rejected the notification.
    pub fn failed_tokens(&self) -> Vec<&str> {
        self.responses.device_tokens()
    }
}

/// Error returned by [`crate::ApnChannel::send`].
///
/// Transport failures (the round-trip never completed) are kept apart from
/// per-device delivery failures.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("invalid APNs payload: {0}")]
    InvalidPayload(#[from] InvalidPayloadError),

    #[error("could not send APNs notification: {0}")]
    Delivery(#[from] DeliveryFailure),

    #[error("APNs transport failed: {0}")]
    Transport(#[source] BoxError),
}

impl ChannelError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ChannelError::Transport(err.into())
    }

    /// The delivery failure, if this error came from rejected devices.
    pub fn as_delivery_failure(&self) -> Option<&DeliveryFailure> {
        match self {
            ChannelError::Delivery(failure) => Some(failure),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ApnsResponse;

    fn failed(token: &str) -> ApnsResponse {
        ApnsResponse::new(token, 400)
    }

    #[test]
    fn test_message_deduplicates_in_first_seen_order() {
        let responses: ResponseCollection = vec![
            failed("t1").with_error_reason("BadDeviceToken"),
            failed("t2").with_error_reason("Unregistered"),
            failed("t3").with_error_reason("BadDeviceToken"),
        ]
        .into_iter()
        .collect();

        let failure = DeliveryFailure::with_unsuccessful(responses);

        assert_eq!(failure.message(), "BadDeviceToken; Unregistered");
        assert_eq!(failure.to_string(), "BadDeviceToken; Unregistered");
        assert_eq!(failure.responses().len(), 3);
    }

    #[test]
    fn test_missing_reasons_collapse_to_empty_text() {
        let responses: ResponseCollection = vec![failed("t1"), failed("t2")].into_iter().collect();

        let failure = DeliveryFailure::with_unsuccessful(responses);

        assert_eq!(failure.message(), "");
        assert_eq!(failure.failed_tokens(), vec!["t1", "t2"]);
    }

    #[test]
    fn test_reserved_key_display() {
        let err = InvalidPayloadError::ReservedKey {
            key: "aps".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "custom key `aps` is reserved by the APNs payload"
        );
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = ChannelError::transport(io);

        assert!(matches!(err, ChannelError::Transport(_)));
        assert!(err.as_delivery_failure().is_none());
        assert_eq!(err.to_string(), "APNs transport failed: connection refused");
        assert!(std::error::Error::source(&err).is_some());
    }
}
