//! Queue message model shared by the source consumer, the enricher and the sinks.

pub mod codec;

use std::collections::HashMap;

/// Transaction id header.
pub const REQUEST_ID: &str = "X-Request-Id";
/// Publishing system header.
pub const ORIGIN_SYSTEM_ID: &str = "Origin-System-Id";
/// Bridging-loop marker header.
pub const ORIGIN_REGION: &str = "Origin-Region";
pub const MESSAGE_TIMESTAMP: &str = "Message-Timestamp";
pub const NATIVE_HASH: &str = "Native-Hash";
pub const CONTENT_TYPE: &str = "Content-Type";

/// A message read from the source queue.
///
/// Header names are case-sensitive. The body is opaque to the bridge and is
/// forwarded byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Message {
    pub fn new(headers: HashMap<String, String>, body: impl Into<String>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Header value, treating an empty string the same as an absent header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_string(), value.into());
    }

    /// The transaction id, if the message carries one.
    pub fn transaction_id(&self) -> Option<&str> {
        self.header(REQUEST_ID)
    }
}
