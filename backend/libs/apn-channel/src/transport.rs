use async_trait::async_trait;

use crate::dispatch::DispatchRequest;
use crate::error::BoxError;
use crate::message::ApnMessage;
use crate::response::ApnsResponse;

/// HTTP/2 client that talks to APNs.
///
/// Implementations own connection handling, authentication, timeouts and
/// any per-device parallelism. `deliver` resolves once every registered
/// request has an answer, or fails as a whole.
#[async_trait]
pub trait TransportClient: Send {
    /// Queue requests for the next `deliver` call.
    fn register(&mut self, requests: Vec<DispatchRequest>);

    /// Deliver every registered request, one response per request.
    async fn deliver(&mut self) -> Result<Vec<ApnsResponse>, BoxError>;
}

pub type DynTransportClient = Box<dyn TransportClient>;

/// Hands out a transport client for each send.
pub trait ClientFactory: Send + Sync {
    fn instance(&self) -> Result<DynTransportClient, BoxError>;
}

impl<F> ClientFactory for F
where
    F: Fn() -> Result<DynTransportClient, BoxError> + Send + Sync,
{
    fn instance(&self) -> Result<DynTransportClient, BoxError> {
        self()
    }
}

/// Something that can receive APN notifications.
///
/// Returns the device tokens to notify; an empty list means the recipient
/// has no registered devices and the send is skipped.
pub trait ApnRecipient {
    fn route_apn_tokens(&self, message: &ApnMessage) -> Vec<String>;
}

impl ApnRecipient for str {
    fn route_apn_tokens(&self, _message: &ApnMessage) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl ApnRecipient for String {
    fn route_apn_tokens(&self, message: &ApnMessage) -> Vec<String> {
        self.as_str().route_apn_tokens(message)
    }
}

impl ApnRecipient for [String] {
    fn route_apn_tokens(&self, _message: &ApnMessage) -> Vec<String> {
        self.to_vec()
    }
}

impl ApnRecipient for Vec<String> {
    fn route_apn_tokens(&self, message: &ApnMessage) -> Vec<String> {
        self.as_slice().route_apn_tokens(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullClient;

    #[async_trait]
    impl TransportClient for NullClient {
        fn register(&mut self, _requests: Vec<DispatchRequest>) {}

        async fn deliver(&mut self) -> Result<Vec<ApnsResponse>, BoxError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_closure_is_a_factory() {
        let factory = || -> Result<DynTransportClient, BoxError> { Ok(Box::new(NullClient)) };

        assert!(factory.instance().is_ok());
    }

    #[test]
    fn test_token_lists_route_themselves() {
        let message = ApnMessage::new();

        assert_eq!("abc".route_apn_tokens(&message), vec!["abc".to_string()]);

        let tokens = vec!["t1".to_string(), "t2".to_string()];
        assert_eq!(tokens.route_apn_tokens(&message), tokens);

        assert!(Vec::<String>::new().route_apn_tokens(&message).is_empty());
    }
}
