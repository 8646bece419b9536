// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use clearance::prelude::*;` to get started quickly.

pub use crate::engine::{DefaultVerdict, Engine};
pub use crate::error::{
    ClearanceError, EngineError, ExtractorError, OracleError, PolicyError,
};
pub use crate::extractor::{
    ExtractedParams, Extractor, TransferExtractor, ValueExtractor, names,
};
pub use crate::oracle::{FixedPriceFeed, PriceFeed, PriceRound};
pub use crate::payload::{NamedParam, ParamName, Payload, Principal, Selector};
pub use crate::policy::{
    Policy, PolicyId, SignatureApprovalPolicy, TransferInfo, Verdict, VolumeThresholdPolicy,
    approval_digest,
};
pub use crate::wire::{ApprovalContext, selectors};
