// ABOUTME: Policy module - the capability contract rules implement to vote on
// ABOUTME: operations, plus the bundled signature and threshold policies.

mod signature;
mod threshold;

pub use signature::*;
pub use threshold::*;

#[cfg(test)]
mod threshold_test;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::PolicyError;
use crate::payload::{Principal, Selector};

/// Verdict rendered by a policy pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Terminal: accept the operation without consulting later policies.
    Allowed,

    /// Terminal: veto the operation.
    Rejected,

    /// Defer to the next registered policy, or to the engine default.
    Continue,
}

/// Unique identity of a policy instance, carried in rejection errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolicyId(Uuid);

impl PolicyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PolicyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pluggable rule that votes on operations.
///
/// The per-operation lifecycle is: `run` (side-effect-free pre-check), then -
/// only if the whole chain was accepted - `post_run` (commit hook, at most
/// once, invoked by the engine with the same positional parameters).
#[async_trait]
pub trait Policy: Send + Sync {
    /// Stable identity of this instance.
    fn id(&self) -> PolicyId;

    /// Human-readable policy name for logs.
    fn name(&self) -> &str;

    /// One-time attachment configuration. A second call must fail with
    /// [`PolicyError::AlreadyConfigured`].
    async fn configure(&self, init: serde_json::Value) -> Result<(), PolicyError>;

    /// Side-effect-free pre-check over positional parameters.
    ///
    /// `params` is ordered per this policy's registered output format;
    /// `context` is the opaque caller-supplied blob from the payload.
    async fn run(
        &self,
        caller: Principal,
        subject: Principal,
        selector: Selector,
        params: &[Vec<u8>],
        context: &[u8],
    ) -> Result<Verdict, PolicyError>;

    /// Commit hook, invoked by the engine at most once per accepted operation
    /// with the same parameters `run` saw. May mutate policy-private state.
    async fn post_run(
        &self,
        caller: Principal,
        subject: Principal,
        selector: Selector,
        params: &[Vec<u8>],
        context: &[u8],
    ) -> Result<(), PolicyError> {
        let _ = (caller, subject, selector, params, context);
        Ok(())
    }
}
