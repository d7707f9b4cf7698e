use tracing::{debug, info};

use crate::config::ApnsConfig;
use crate::dispatch::{expand, NotificationOptions};
use crate::error::{ChannelError, DeliveryFailure, Result};
use crate::message::ApnMessage;
use crate::response::ResponseCollection;
use crate::transport::{ApnRecipient, ClientFactory};

/// Sends [`ApnMessage`]s to every APNs device of a recipient.
///
/// Holds no per-send state, so one channel can serve concurrent sends.
#[derive(Debug, Clone)]
pub struct ApnChannel<F> {
    client_factory: F,
    options: NotificationOptions,
}

impl<F> ApnChannel<F>
where
    F: ClientFactory,
{
    pub fn new(client_factory: F) -> Self {
        Self {
            client_factory,
            options: NotificationOptions::default(),
        }
    }

    pub fn from_config(client_factory: F, config: &ApnsConfig) -> Self {
        Self::new(client_factory).with_options(config.notification_options())
    }

    /// Request headers attached to every notification
    pub fn with_options(mut self, options: NotificationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &NotificationOptions {
        &self.options
    }

    /// Send the message to all devices of `recipient`.
    ///
    /// Returns `Ok(())` without contacting APNs when the recipient has no
    /// device tokens. Any rejected device, even when others accepted the
    /// notification, fails the whole send with [`ChannelError::Delivery`].
    /// A transport that answers fewer or more requests than it was given
    /// fails with [`ChannelError::Transport`].
    pub async fn send<R>(&self, recipient: &R, message: &ApnMessage) -> Result<()>
    where
        R: ApnRecipient + ?Sized,
    {
        let tokens = recipient.route_apn_tokens(message);
        if tokens.is_empty() {
            debug!("No APNs device tokens routed, skipping send");
            return Ok(());
        }

        let mut client = self
            .client_factory
            .instance()
            .map_err(ChannelError::Transport)?;

        let requests = expand(message, tokens, &self.options)?;
        let device_count = requests.len();
        debug!(
            device_count,
            token_prefix = %token_prefix(&requests[0].device_token),
            "Dispatching APNs notification"
        );

        client.register(requests);
        let responses = client.deliver().await.map_err(ChannelError::Transport)?;
        if responses.len() != device_count {
            return Err(ChannelError::transport(format!(
                "expected {device_count} APNs responses, got {}",
                responses.len()
            )));
        }

        if let Some(failure) = ResponseCollection::from(responses)
            .only_unsuccessful()
            .unless_empty(DeliveryFailure::with_unsuccessful)
        {
            debug!(
                device_count,
                failed = failure.responses().len(),
                "APNs rejected notification"
            );
            return Err(failure.into());
        }

        info!(device_count, "APNs notification sent successfully");
        Ok(())
    }
}

fn token_prefix(device_token: &str) -> String {
    device_token.chars().take(8).collect()
}
