// ABOUTME: Volume-threshold policy - gates a single extracted amount against
// ABOUTME: an owner-managed [min, max] range with reconfiguration guards.

use serde::Deserialize;
use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::error::PolicyError;
use crate::payload::{Principal, Selector};
use crate::policy::{Policy, PolicyId, Verdict};
use crate::wire;

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: u128,
    max: u128,
}

#[derive(Deserialize)]
struct ThresholdConfig {
    #[serde(deserialize_with = "de_u128")]
    min_amount: u128,

    #[serde(deserialize_with = "de_u128")]
    max_amount: u128,
}

/// Accept amounts as JSON numbers or decimal strings; token quantities
/// routinely exceed what a JSON number can carry losslessly.
fn de_u128<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct AmountVisitor;

    impl serde::de::Visitor<'_> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("an unsigned amount as a number or decimal string")
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(v as u128)
        }

        fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<u128, E> {
            v.parse().map_err(serde::de::Error::custom)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

/// Policy rejecting amounts outside an owner-managed `[min, max]` range.
///
/// Both bounds are inclusive. `max == 0` means "no upper bound"; there is no
/// equivalent sentinel for `min` because `min == 0` already admits everything.
pub struct VolumeThresholdPolicy {
    id: PolicyId,
    owner: Principal,
    bounds: RwLock<Option<Bounds>>,
}

impl VolumeThresholdPolicy {
    pub fn new(owner: Principal) -> Self {
        Self {
            id: PolicyId::new(),
            owner,
            bounds: RwLock::new(None),
        }
    }

    fn check_owner(&self, caller: Principal) -> Result<(), PolicyError> {
        if caller != self.owner {
            return Err(PolicyError::NotOwner);
        }
        Ok(())
    }

    /// Current `(min, max)` pair, if configured.
    pub async fn bounds(&self) -> Option<(u128, u128)> {
        (*self.bounds.read().await).map(|b| (b.min, b.max))
    }

    /// Replace the minimum. Owner-gated; rejects the current value and any
    /// value that would violate `max > min`.
    pub async fn set_min(&self, caller: Principal, value: u128) -> Result<(), PolicyError> {
        self.check_owner(caller)?;
        let mut bounds = self.bounds.write().await;
        let bounds = bounds.as_mut().ok_or(PolicyError::NotConfigured)?;
        if value == bounds.min {
            return Err(PolicyError::UnchangedValue);
        }
        if bounds.max != 0 && value >= bounds.max {
            return Err(PolicyError::InvalidThresholds {
                min: value,
                max: bounds.max,
            });
        }
        bounds.min = value;
        tracing::info!(policy = %self.id, min = value, "volume threshold minimum updated");
        Ok(())
    }

    /// Replace the maximum. Owner-gated; rejects the current value and any
    /// nonzero value that would violate `max > min`. Zero disables the bound.
    pub async fn set_max(&self, caller: Principal, value: u128) -> Result<(), PolicyError> {
        self.check_owner(caller)?;
        let mut bounds = self.bounds.write().await;
        let bounds = bounds.as_mut().ok_or(PolicyError::NotConfigured)?;
        if value == bounds.max {
            return Err(PolicyError::UnchangedValue);
        }
        if value != 0 && value <= bounds.min {
            return Err(PolicyError::InvalidThresholds {
                min: bounds.min,
                max: value,
            });
        }
        bounds.max = value;
        tracing::info!(policy = %self.id, max = value, "volume threshold maximum updated");
        Ok(())
    }
}

#[async_trait]
impl Policy for VolumeThresholdPolicy {
    fn id(&self) -> PolicyId {
        self.id
    }

    fn name(&self) -> &str {
        "volume-threshold"
    }

    async fn configure(&self, init: serde_json::Value) -> Result<(), PolicyError> {
        let config: ThresholdConfig = serde_json::from_value(init)
            .map_err(|e| PolicyError::InvalidConfig(e.to_string()))?;
        if config.max_amount <= config.min_amount {
            return Err(PolicyError::InvalidThresholds {
                min: config.min_amount,
                max: config.max_amount,
            });
        }
        let mut bounds = self.bounds.write().await;
        if bounds.is_some() {
            return Err(PolicyError::AlreadyConfigured);
        }
        *bounds = Some(Bounds {
            min: config.min_amount,
            max: config.max_amount,
        });
        tracing::info!(
            policy = %self.id,
            min = config.min_amount,
            max = config.max_amount,
            "volume threshold configured"
        );
        Ok(())
    }

    async fn run(
        &self,
        _caller: Principal,
        _subject: Principal,
        _selector: Selector,
        params: &[Vec<u8>],
        _context: &[u8],
    ) -> Result<Verdict, PolicyError> {
        let bounds = (*self.bounds.read().await).ok_or(PolicyError::NotConfigured)?;
        let amount = match params {
            [value] => wire::decode_u128(value)
                .ok_or_else(|| PolicyError::BadParameters("amount must be 16 bytes".into()))?,
            _ => {
                return Err(PolicyError::BadParameters(format!(
                    "expected 1 parameter, got {}",
                    params.len()
                )));
            }
        };
        if amount < bounds.min {
            return Ok(Verdict::Rejected);
        }
        if bounds.max != 0 && amount > bounds.max {
            return Ok(Verdict::Rejected);
        }
        Ok(Verdict::Continue)
    }
}
