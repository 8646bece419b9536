// ABOUTME: Value extractor - decodes the raw transfer amount and optionally
// ABOUTME: converts it through a configured price feed.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ExtractorError;
use crate::extractor::{Extractor, names};
use crate::oracle::PriceFeed;
use crate::payload::{NamedParam, Payload, Principal};
use crate::wire::{self, selectors};

/// Extracts the transfer amount, optionally priced through an oracle.
///
/// Without a feed it emits a single `amount` parameter carrying the raw
/// value. With a feed it emits `amount = floor(raw * price / 10^decimals)`
/// plus the feed's round id and update timestamp so downstream policies can
/// run their own staleness checks. The conversion deliberately ignores the
/// transferred asset's own decimal count; callers must account for it.
pub struct ValueExtractor {
    address: Principal,
    owner: Principal,
    feed: RwLock<Option<Arc<dyn PriceFeed>>>,
}

impl ValueExtractor {
    pub fn new(address: Principal, owner: Principal) -> Self {
        Self {
            address,
            owner,
            feed: RwLock::new(None),
        }
    }

    /// Point the extractor at a price source. Owner-gated; rejects setting
    /// the feed already in place.
    pub async fn set_price_feed(
        &self,
        caller: Principal,
        feed: Arc<dyn PriceFeed>,
    ) -> Result<(), ExtractorError> {
        if caller != self.owner {
            return Err(ExtractorError::NotOwner);
        }
        let mut current = self.feed.write().await;
        if let Some(existing) = current.as_ref()
            && existing.address() == feed.address()
        {
            return Err(ExtractorError::UnchangedValue);
        }
        tracing::info!(extractor = %self.address, feed = %feed.address(), "price feed updated");
        *current = Some(feed);
        Ok(())
    }

    fn raw_amount(&self, payload: &Payload) -> Result<u128, ExtractorError> {
        if payload.selector == selectors::transfer() {
            let (_, amount) = wire::decode_transfer(&payload.data)
                .ok_or_else(|| ExtractorError::Malformed("bad transfer call data".into()))?;
            Ok(amount)
        } else if payload.selector == selectors::transfer_from() {
            let (_, _, amount) = wire::decode_transfer_from(&payload.data)
                .ok_or_else(|| ExtractorError::Malformed("bad transfer_from call data".into()))?;
            Ok(amount)
        } else {
            Err(ExtractorError::UnsupportedSelector(payload.selector))
        }
    }
}

#[async_trait]
impl Extractor for ValueExtractor {
    fn address(&self) -> Principal {
        self.address
    }

    async fn extract(&self, payload: &Payload) -> Result<Vec<NamedParam>, ExtractorError> {
        let raw = self.raw_amount(payload)?;

        let feed = self.feed.read().await.clone();
        let Some(feed) = feed else {
            return Ok(vec![NamedParam::new(names::amount(), wire::encode_u128(raw))]);
        };

        let round = feed.latest_round().await?;
        let scale = 10u128
            .checked_pow(u32::from(feed.decimals()))
            .ok_or(ExtractorError::ConversionOverflow)?;
        let amount = raw
            .checked_mul(round.price)
            .ok_or(ExtractorError::ConversionOverflow)?
            / scale;

        Ok(vec![
            NamedParam::new(names::amount(), wire::encode_u128(amount)),
            NamedParam::new(
                names::price_feed_round_id(),
                wire::encode_u64(round.round_id),
            ),
            NamedParam::new(
                names::price_feed_updated_at(),
                wire::encode_u64(round.updated_at),
            ),
        ])
    }
}
