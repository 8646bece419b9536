// ABOUTME: Root module for clearance - composable compliance engine library.
// ABOUTME: Re-exports all public types from submodules.

pub mod engine;
pub mod error;
pub mod extractor;
pub mod oracle;
pub mod payload;
pub mod policy;
pub mod prelude;
pub mod wire;

pub use error::ClearanceError;
