// ABOUTME: Price-source interface for oracle-backed unit conversion.
// ABOUTME: Provides the PriceFeed trait and a fixed-price implementation.

use async_trait::async_trait;

use crate::error::OracleError;
use crate::payload::Principal;

/// A single oracle observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRound {
    /// Latest price, scaled by `10^decimals`.
    pub price: u128,

    /// Monotonic round identifier, surfaced for downstream staleness checks.
    pub round_id: u64,

    /// Unix timestamp of the last update, surfaced alongside `round_id`.
    pub updated_at: u64,
}

/// An external price source consulted by the value extractor.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Identity of this feed, used for the re-registration no-op guard.
    fn address(&self) -> Principal;

    /// Number of decimal places in reported prices.
    fn decimals(&self) -> u8;

    /// Read the latest observation.
    ///
    /// Implementations backed by real transports should wrap their failures
    /// in [`OracleError::Backend`] so callers see one error shape.
    async fn latest_round(&self) -> Result<PriceRound, OracleError>;
}

/// A price feed that always reports the same round.
pub struct FixedPriceFeed {
    address: Principal,
    decimals: u8,
    round: PriceRound,
}

impl FixedPriceFeed {
    pub fn new(address: Principal, decimals: u8, price: u128) -> Self {
        Self {
            address,
            decimals,
            round: PriceRound {
                price,
                round_id: 1,
                updated_at: 0,
            },
        }
    }

    /// Override the reported round metadata.
    pub fn with_round(mut self, round_id: u64, updated_at: u64) -> Self {
        self.round.round_id = round_id;
        self.round.updated_at = updated_at;
        self
    }
}

#[async_trait]
impl PriceFeed for FixedPriceFeed {
    fn address(&self) -> Principal {
        self.address
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    async fn latest_round(&self) -> Result<PriceRound, OracleError> {
        Ok(self.round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_feed_reports_constant_round() {
        let feed = FixedPriceFeed::new(Principal::derived("feed"), 8, 1_234_567_890);
        assert_eq!(feed.decimals(), 8);

        let round = tokio_test::block_on(feed.latest_round()).unwrap();
        assert_eq!(round.price, 1_234_567_890);
        assert_eq!(round.round_id, 1);
        assert_eq!(round.updated_at, 0);
    }

    #[test]
    fn test_with_round_overrides_metadata() {
        let feed =
            FixedPriceFeed::new(Principal::derived("feed"), 8, 5).with_round(17, 1_700_000_000);

        let round = tokio_test::block_on(feed.latest_round()).unwrap();
        assert_eq!(round.price, 5);
        assert_eq!(round.round_id, 17);
        assert_eq!(round.updated_at, 1_700_000_000);
    }
}
