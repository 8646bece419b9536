// ABOUTME: Deterministic fixed-width byte codec for parameter values, transfer
// ABOUTME: call data, and the signature-approval context blob.

use crate::payload::{Principal, Selector};

/// Well-known selectors recognized by the bundled extractors.
pub mod selectors {
    use super::Selector;

    /// `transfer(to, amount)` - the sender moves value to `to`.
    pub fn transfer() -> Selector {
        Selector::from_signature("transfer(principal,u128)")
    }

    /// `transfer_from(from, to, amount)` - delegated transfer.
    pub fn transfer_from() -> Selector {
        Selector::from_signature("transfer_from(principal,principal,u128)")
    }
}

/// Encode a u64 as 8 big-endian bytes.
pub fn encode_u64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Decode 8 big-endian bytes into a u64.
pub fn decode_u64(bytes: &[u8]) -> Option<u64> {
    Some(u64::from_be_bytes(bytes.try_into().ok()?))
}

/// Encode a u128 as 16 big-endian bytes.
pub fn encode_u128(value: u128) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Decode 16 big-endian bytes into a u128.
pub fn decode_u128(bytes: &[u8]) -> Option<u128> {
    Some(u128::from_be_bytes(bytes.try_into().ok()?))
}

/// Encode a principal as its 32 raw bytes.
pub fn encode_principal(principal: Principal) -> Vec<u8> {
    principal.0.to_vec()
}

/// Decode 32 bytes into a principal.
pub fn decode_principal(bytes: &[u8]) -> Option<Principal> {
    Some(Principal(bytes.try_into().ok()?))
}

/// Build call data for `transfer(to, amount)`: 32-byte `to` + 16-byte amount.
pub fn encode_transfer(to: Principal, amount: u128) -> Vec<u8> {
    let mut data = Vec::with_capacity(48);
    data.extend_from_slice(&to.0);
    data.extend_from_slice(&amount.to_be_bytes());
    data
}

/// Decode `transfer(to, amount)` call data. Requires the exact 48-byte layout.
pub fn decode_transfer(data: &[u8]) -> Option<(Principal, u128)> {
    if data.len() != 48 {
        return None;
    }
    let to = decode_principal(&data[..32])?;
    let amount = decode_u128(&data[32..])?;
    Some((to, amount))
}

/// Build call data for `transfer_from(from, to, amount)`:
/// 32-byte `from` + 32-byte `to` + 16-byte amount.
pub fn encode_transfer_from(from: Principal, to: Principal, amount: u128) -> Vec<u8> {
    let mut data = Vec::with_capacity(80);
    data.extend_from_slice(&from.0);
    data.extend_from_slice(&to.0);
    data.extend_from_slice(&amount.to_be_bytes());
    data
}

/// Decode `transfer_from(from, to, amount)` call data. Requires the exact
/// 80-byte layout.
pub fn decode_transfer_from(data: &[u8]) -> Option<(Principal, Principal, u128)> {
    if data.len() != 80 {
        return None;
    }
    let from = decode_principal(&data[..32])?;
    let to = decode_principal(&data[32..64])?;
    let amount = decode_u128(&data[64..])?;
    Some((from, to, amount))
}

/// Caller-supplied context for the signature-approval policy.
///
/// Fixed 104-byte layout: 8-byte big-endian expiry, 32-byte signer key,
/// 64-byte ed25519 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalContext {
    /// Unix timestamp after which the approval is dead.
    pub expires_at: u64,

    /// Raw ed25519 verifying-key bytes of the claimed signer.
    pub signer: [u8; 32],

    /// Signature over the policy's approval digest.
    pub signature: [u8; 64],
}

impl ApprovalContext {
    pub const ENCODED_LEN: usize = 104;

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::ENCODED_LEN);
        bytes.extend_from_slice(&self.expires_at.to_be_bytes());
        bytes.extend_from_slice(&self.signer);
        bytes.extend_from_slice(&self.signature);
        bytes
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        Some(Self {
            expires_at: decode_u64(&bytes[..8])?,
            signer: bytes[8..40].try_into().ok()?,
            signature: bytes[40..].try_into().ok()?,
        })
    }
}
