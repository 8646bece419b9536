// ABOUTME: Defines all error types for the clearance library using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under ClearanceError.

use crate::payload::{ParamName, Principal, Selector};
use crate::policy::PolicyId;

/// Top-level error type for the clearance library.
#[derive(Debug, thiserror::Error)]
pub enum ClearanceError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Errors from the decision engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("caller is not the engine owner")]
    NotOwner,

    #[error("no extractor configured for selector {0}")]
    NoExtractorConfigured(Selector),

    #[error("selector {selector}: extracted set has no parameter {name}")]
    MissingParameter { selector: Selector, name: ParamName },

    #[error("selector {selector}: rejected by policy {policy}")]
    PolicyRunRejected { selector: Selector, policy: PolicyId },

    #[error("selector {selector}: no definitive verdict, default is deny")]
    DefaultDenied { selector: Selector },

    #[error("selector {selector}: policy {policy} pre-check failed: {source}")]
    PolicyFailed {
        selector: Selector,
        policy: PolicyId,
        #[source]
        source: PolicyError,
    },

    #[error("selector {selector}: policy {policy} commit hook failed: {source}")]
    CommitFailed {
        selector: Selector,
        policy: PolicyId,
        #[source]
        source: PolicyError,
    },

    #[error("extraction failed: {0}")]
    Extractor(#[from] ExtractorError),
}

/// Errors from policy configuration and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy is already configured")]
    AlreadyConfigured,

    #[error("policy has not been configured")]
    NotConfigured,

    #[error("caller is not the policy owner")]
    NotOwner,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid thresholds: max {max} must exceed min {min}")]
    InvalidThresholds { min: u128, max: u128 },

    #[error("new value equals the current value")]
    UnchangedValue,

    #[error("signer {0} is already authorized")]
    SignerAlreadyAuthorized(Principal),

    #[error("signer {0} is not authorized")]
    SignerNotAuthorized(Principal),

    #[error("bad positional parameters: {0}")]
    BadParameters(String),

    #[error("bad caller context: {0}")]
    BadContext(String),
}

/// Errors from payload extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("unsupported selector {0}")]
    UnsupportedSelector(Selector),

    #[error("malformed call data: {0}")]
    Malformed(String),

    #[error("caller is not the extractor owner")]
    NotOwner,

    #[error("new price feed equals the current feed")]
    UnchangedValue,

    #[error("amount conversion overflowed")]
    ConversionOverflow,

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Errors from price-source reads.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("price feed unavailable: {0}")]
    Unavailable(String),

    #[error("price feed backend failed: {0}")]
    Backend(#[source] anyhow::Error),
}
