// ABOUTME: Extractor module - decoders turning opaque payloads into named
// ABOUTME: parameters, plus the bundled transfer and value extractors.

mod transfer;
mod value;

pub use transfer::*;
pub use value::*;

#[cfg(test)]
mod transfer_test;

use async_trait::async_trait;

use crate::error::ExtractorError;
use crate::payload::{NamedParam, ParamName, Payload, Principal};

/// Well-known parameter names emitted by the bundled extractors.
pub mod names {
    use crate::payload::ParamName;

    pub fn from() -> ParamName {
        ParamName::named("from")
    }

    pub fn to() -> ParamName {
        ParamName::named("to")
    }

    pub fn amount() -> ParamName {
        ParamName::named("amount")
    }

    pub fn price_feed_round_id() -> ParamName {
        ParamName::named("priceFeedRoundId")
    }

    pub fn price_feed_updated_at() -> ParamName {
        ParamName::named("priceFeedUpdatedAt")
    }
}

/// A pure decoder from payload to named parameters.
///
/// Extraction must depend only on the payload and the extractor's own narrow
/// configuration (e.g. an oracle reference) - identical inputs yield identical
/// outputs across repeated calls.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Identity of this extractor instance, used in registry logs.
    fn address(&self) -> Principal;

    /// Decode the payload, or fail with
    /// [`ExtractorError::UnsupportedSelector`] for unrecognized kinds.
    async fn extract(&self, payload: &Payload) -> Result<Vec<NamedParam>, ExtractorError>;
}

/// An extracted parameter set: ordered as produced, looked up by name.
#[derive(Debug, Clone)]
pub struct ExtractedParams {
    params: Vec<NamedParam>,
}

impl ExtractedParams {
    pub fn new(params: Vec<NamedParam>) -> Self {
        Self { params }
    }

    /// Resolve a name against the set. First occurrence wins.
    pub fn get(&self, name: &ParamName) -> Option<&[u8]> {
        self.params
            .iter()
            .find(|p| p.name == *name)
            .map(|p| p.value.as_slice())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
