// ABOUTME: Transfer extractor - decodes transfer-style calls into the
// ABOUTME: [from, to, amount] parameters approval policies consume.

use async_trait::async_trait;

use crate::error::ExtractorError;
use crate::extractor::{Extractor, names};
use crate::payload::{NamedParam, Payload, Principal};
use crate::wire::{self, selectors};

/// Decodes two- and three-argument transfer calls into `from`, `to`, `amount`.
///
/// For the two-argument `transfer(to, amount)` form, `from` is the payload
/// sender.
pub struct TransferExtractor {
    address: Principal,
}

impl TransferExtractor {
    pub fn new(address: Principal) -> Self {
        Self { address }
    }
}

#[async_trait]
impl Extractor for TransferExtractor {
    fn address(&self) -> Principal {
        self.address
    }

    async fn extract(&self, payload: &Payload) -> Result<Vec<NamedParam>, ExtractorError> {
        let (from, to, amount) = if payload.selector == selectors::transfer() {
            let (to, amount) = wire::decode_transfer(&payload.data)
                .ok_or_else(|| ExtractorError::Malformed("bad transfer call data".into()))?;
            (payload.sender, to, amount)
        } else if payload.selector == selectors::transfer_from() {
            wire::decode_transfer_from(&payload.data)
                .ok_or_else(|| ExtractorError::Malformed("bad transfer_from call data".into()))?
        } else {
            return Err(ExtractorError::UnsupportedSelector(payload.selector));
        };

        Ok(vec![
            NamedParam::new(names::from(), wire::encode_principal(from)),
            NamedParam::new(names::to(), wire::encode_principal(to)),
            NamedParam::new(names::amount(), wire::encode_u128(amount)),
        ])
    }
}
