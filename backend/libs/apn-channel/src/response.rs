use serde::{Deserialize, Serialize};

/// HTTP status APNs answers with when it accepts a notification.
pub const STATUS_OK: u16 = 200;

/// Outcome of delivering one notification to one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnsResponse {
    /// The device token targeted.
    pub device_token: String,
    /// HTTP status code returned by APNs.
    pub status_code: u16,
    /// APNs-assigned notification ID.
    pub apns_id: Option<String>,
    /// HTTP reason phrase of the status line.
    pub reason_phrase: Option<String>,
    /// `reason` field of the APNs error body, e.g. `BadDeviceToken`.
    pub error_reason: Option<String>,
    /// Descriptive error text supplied by the transport.
    pub error_description: Option<String>,
}

impl ApnsResponse {
    pub fn new(device_token: impl Into<String>, status_code: u16) -> Self {
        Self {
            device_token: device_token.into(),
            status_code,
            apns_id: None,
            reason_phrase: None,
            error_reason: None,
            error_description: None,
        }
    }

    pub fn with_apns_id(mut self, apns_id: impl Into<String>) -> Self {
        self.apns_id = Some(apns_id.into());
        self
    }

    pub fn with_reason_phrase(mut self, reason_phrase: impl Into<String>) -> Self {
        self.reason_phrase = Some(reason_phrase.into());
        self
    }

    pub fn with_error_reason(mut self, error_reason: impl Into<String>) -> Self {
        self.error_reason = Some(error_reason.into());
        self
    }

    pub fn with_error_description(mut self, error_description: impl Into<String>) -> Self {
        self.error_description = Some(error_description.into());
        self
    }

    pub fn is_successful(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// Human readable reason for a failed delivery.
    ///
    /// Error description, then reason phrase, then error reason; the first
    /// non-empty one wins. Empty when none is available.
    pub fn reason_text(&self) -> &str {
        [
            &self.error_description,
            &self.reason_phrase,
            &self.error_reason,
        ]
        .into_iter()
        .filter_map(|text| text.as_deref())
        .find(|text| !text.is_empty())
        .unwrap_or("")
    }
}

/// Ordered per-device responses of one send call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCollection {
    responses: Vec<ApnsResponse>,
}

impl ResponseCollection {
    pub fn new(responses: Vec<ApnsResponse>) -> Self {
        Self { responses }
    }

    /// Keep only the responses of devices that rejected the notification.
    pub fn only_unsuccessful(self) -> Self {
        self.responses
            .into_iter()
            .filter(|response| !response.is_successful())
            .collect()
    }

    /// Run `action` with the collection unless it is empty.
    pub fn unless_empty<F, R>(self, action: F) -> Option<R>
    where
        F: FnOnce(Self) -> R,
    {
        if self.is_empty() {
            None
        } else {
            Some(action(self))
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ApnsResponse> {
        self.responses.iter()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn device_tokens(&self) -> Vec<&str> {
        self.responses
            .iter()
            .map(|response| response.device_token.as_str())
            .collect()
    }

    pub fn into_vec(self) -> Vec<ApnsResponse> {
        self.responses
    }
}

impl From<Vec<ApnsResponse>> for ResponseCollection {
    fn from(responses: Vec<ApnsResponse>) -> Self {
        Self::new(responses)
    }
}

impl FromIterator<ApnsResponse> for ResponseCollection {
    fn from_iter<I: IntoIterator<Item = ApnsResponse>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ResponseCollection {
    type Item = ApnsResponse;
    type IntoIter = std::vec::IntoIter<ApnsResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResponseCollection {
    type Item = &'a ApnsResponse;
    type IntoIter = std::slice::Iter<'a, ApnsResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.iter()
    }
}
