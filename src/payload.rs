// ABOUTME: Core value types shared across the pipeline - selectors, principals,
// ABOUTME: parameter names, and the Payload submitted for evaluation.

use sha2::{Digest, Sha256};

/// Fixed-width method identifier that routes a payload to its extractor.
///
/// Derived as the first four bytes of the SHA-256 of a human-readable
/// signature string, so signer and verifier agree without a shared registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Derive a selector from a signature string like `"transfer(principal,u128)"`.
    pub fn from_signature(signature: &str) -> Self {
        let digest = Sha256::digest(signature.as_bytes());
        Self([digest[0], digest[1], digest[2], digest[3]])
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Opaque principal identifier.
///
/// Authorized signers are identified by their raw ed25519 verifying-key
/// bytes; other principals (senders, targets, component addresses) are
/// arbitrary 32-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal(pub [u8; 32]);

impl Principal {
    pub const ZERO: Self = Self([0u8; 32]);

    /// Derive a principal from a human-readable label.
    pub fn derived(label: &str) -> Self {
        Self(Sha256::digest(label.as_bytes()).into())
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..")
    }
}

/// Fixed-width hash of a human-readable parameter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamName(pub [u8; 32]);

impl ParamName {
    /// Hash a human-readable name like `"amount"` into a parameter name.
    pub fn named(name: &str) -> Self {
        Self(Sha256::digest(name.as_bytes()).into())
    }
}

impl std::fmt::Display for ParamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..")
    }
}

/// A proposed state-changing operation submitted for compliance evaluation.
///
/// Immutable; one per evaluated operation.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Which operation kind this payload describes.
    pub selector: Selector,

    /// Raw argument bytes, decoded by the extractor registered for `selector`.
    pub data: Vec<u8>,

    /// The principal attempting the operation.
    pub sender: Principal,

    /// Opaque bytes supplied alongside the call, passed through to policies.
    pub context: Vec<u8>,
}

impl Payload {
    pub fn new(
        selector: Selector,
        data: Vec<u8>,
        sender: Principal,
        context: Vec<u8>,
    ) -> Self {
        Self {
            selector,
            data,
            sender,
            context,
        }
    }
}

/// A single named value produced by an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedParam {
    /// Hashed parameter identifier.
    pub name: ParamName,

    /// Opaquely encoded value; the consuming policy knows the encoding.
    pub value: Vec<u8>,
}

impl NamedParam {
    pub fn new(name: ParamName, value: Vec<u8>) -> Self {
        Self { name, value }
    }
}
