//! Regional loop prevention and transaction-id enrichment.
//!
//! Two bridges deployed back to back (`eu -> us` and `us -> eu`) stamp every
//! forwarded message with the region it is travelling to. When such a message
//! reaches the bridge configured with that same region it has completed a
//! round trip and is dropped.

use crate::core::message::{Message, ORIGIN_REGION, REQUEST_ID};
use crate::error::ConfigError;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::str::FromStr;

const GENERATED_TID_PREFIX: &str = "tid_";
const GENERATED_TID_SUFFIX: &str = "_kafka_bridge";
const GENERATED_TID_TOKEN_LEN: usize = 10;

/// Prefixes accepted as well-formed transaction ids.
const TID_PREFIXES: [&str; 2] = ["tid", "SYNTHETIC-REQ-MON"];

/// Deployment region of a bridge in a two-region topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Region {
    Eu,
    Us,
}

impl Region {
    /// The region on the far side of the bridge.
    pub fn opposite(self) -> Self {
        match self {
            Self::Eu => Self::Us,
            Self::Us => Self::Eu,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eu => "eu",
            Self::Us => "us",
        }
    }

    /// Parse an optional configured region; blank means "no region".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, ConfigError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(None),
            Some(value) => Self::from_str(value)
                .map(Some)
                .map_err(|_| ConfigError::UnknownRegion(value.to_string())),
        }
    }
}

/// What enrichment did to a message's transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionId {
    /// The message already carried this id.
    Existing(String),
    /// The id was missing; this one was synthesized.
    Generated(String),
}

impl TransactionId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Existing(tid) | Self::Generated(tid) => tid,
        }
    }

    pub fn was_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Whether a message should leave this bridge.
///
/// Without a configured region every message is forwardable. With one, a
/// message whose `Origin-Region` equals it has already been around the loop.
pub fn is_forwardable(message: &Message, region: Option<Region>) -> bool {
    match region {
        None => true,
        Some(region) => message.header(ORIGIN_REGION) != Some(region.as_str()),
    }
}

/// Ensure the message carries a transaction id and, when a region is
/// configured, stamp it with the opposite region.
pub fn enrich(message: &mut Message, region: Option<Region>) -> TransactionId {
    let tid = match message.transaction_id() {
        Some(existing) => TransactionId::Existing(existing.to_string()),
        None => {
            let generated = generate_transaction_id();
            message.set_header(REQUEST_ID, generated.clone());
            TransactionId::Generated(generated)
        }
    };

    if let Some(region) = region {
        message.set_header(ORIGIN_REGION, region.opposite().as_str());
    }

    tid
}

/// `tid_<10 alphanumeric chars>_kafka_bridge`
pub fn generate_transaction_id() -> String {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_TID_TOKEN_LEN)
        .map(char::from)
        .collect();
    format!("{GENERATED_TID_PREFIX}{token}{GENERATED_TID_SUFFIX}")
}

/// Format check only; non-conforming ids are still forwarded untouched.
pub fn is_well_formed_transaction_id(tid: &str) -> bool {
    TID_PREFIXES.iter().any(|prefix| {
        tid.strip_prefix(prefix).is_some_and(|rest| {
            rest.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
    })
}
