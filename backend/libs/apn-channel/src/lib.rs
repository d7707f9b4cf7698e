/// APN Notification Channel
///
/// This library turns application notifications into Apple Push Notification
/// service (APNs) payloads and sends them to every device of a recipient.
///
/// It handles:
/// - Building the `aps` payload, omitting unset fields and merging custom data
/// - Fanning one notification out to all device tokens of a recipient
/// - Collecting per-device responses into a single `DeliveryFailure`
/// - Loading request options (topic, priority, expiration) from the environment
///
/// The HTTP/2 transport and device token lookup are supplied by the caller
/// through `ClientFactory`, `TransportClient` and `ApnRecipient`.
pub mod channel;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod payload;
pub mod response;
pub mod transport;

pub use channel::ApnChannel;
pub use config::ApnsConfig;
pub use dispatch::{expand, DispatchRequest, NotificationOptions, Priority, PushType};
pub use error::{BoxError, ChannelError, DeliveryFailure, InvalidPayloadError, Result};
pub use message::{ApnMessage, CriticalSound, Sound};
pub use payload::{build_payload, Aps, Payload};
pub use response::{ApnsResponse, ResponseCollection};
pub use transport::{ApnRecipient, ClientFactory, DynTransportClient, TransportClient};
