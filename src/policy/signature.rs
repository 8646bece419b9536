// ABOUTME: Signature-approval policy - vets transfers against ed25519-signed,
// ABOUTME: domain-separated approvals with per-sender nonce replay protection.

use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use ed25519_dalek::{Signature, VerifyingKey};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::PolicyError;
use crate::payload::{Principal, Selector};
use crate::policy::{Policy, PolicyId, Verdict};
use crate::wire::{self, ApprovalContext};

const DOMAIN_TAG: &[u8] = b"clearance.approval.domain.v1";
const TRANSFER_INFO_TAG: &[u8] = b"clearance.approval.transfer_info.v1";

/// The message a grantor signs to approve one specific transfer.
///
/// `nonce` is always the policy's stored counter for `from`, never caller
/// input; that binding is what makes an approval single-use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferInfo {
    pub from: Principal,
    pub to: Principal,
    pub amount: u128,
    pub nonce: u64,
    pub expires_at: u64,
}

/// Structured digest a grantor signs and this policy verifies, reproducible
/// byte-for-byte from the domain separator and the transfer fields.
pub fn approval_digest(domain_separator: &[u8; 32], info: &TransferInfo) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(TRANSFER_INFO_TAG);
    hasher.update(domain_separator);
    hasher.update(info.from.0);
    hasher.update(info.to.0);
    hasher.update(info.amount.to_be_bytes());
    hasher.update(info.nonce.to_be_bytes());
    hasher.update(info.expires_at.to_be_bytes());
    hasher.finalize().into()
}

#[derive(Deserialize)]
struct SignatureConfig {
    domain_name: String,
    domain_version: String,
}

struct SignerState {
    domain_separator: [u8; 32],
    signers: HashSet<Principal>,
    nonces: HashMap<Principal, u64>,
}

/// Policy allowing transfers only when accompanied by a fresh, unexpired
/// approval signed by an authorized grantor.
///
/// Never returns `Allowed` - it vets and defers the terminal decision, so a
/// later policy (or the engine default) still has its say.
pub struct SignatureApprovalPolicy {
    id: PolicyId,
    owner: Principal,
    state: RwLock<Option<SignerState>>,
}

impl SignatureApprovalPolicy {
    pub fn new(owner: Principal) -> Self {
        Self {
            id: PolicyId::new(),
            owner,
            state: RwLock::new(None),
        }
    }

    fn check_owner(&self, caller: Principal) -> Result<(), PolicyError> {
        if caller != self.owner {
            return Err(PolicyError::NotOwner);
        }
        Ok(())
    }

    /// Domain separator binding approvals to this instance. Grantors need it
    /// to produce a digest this policy will accept.
    pub async fn domain_separator(&self) -> Result<[u8; 32], PolicyError> {
        let state = self.state.read().await;
        let state = state.as_ref().ok_or(PolicyError::NotConfigured)?;
        Ok(state.domain_separator)
    }

    /// The nonce the next approval for `sender` must be signed over.
    pub async fn next_nonce(&self, sender: Principal) -> Result<u64, PolicyError> {
        let state = self.state.read().await;
        let state = state.as_ref().ok_or(PolicyError::NotConfigured)?;
        Ok(state.nonces.get(&sender).copied().unwrap_or(0))
    }

    /// Authorize a grantor. Owner-gated; fails if already present.
    pub async fn add_signer(&self, caller: Principal, signer: Principal) -> Result<(), PolicyError> {
        self.check_owner(caller)?;
        let mut state = self.state.write().await;
        let state = state.as_mut().ok_or(PolicyError::NotConfigured)?;
        if !state.signers.insert(signer) {
            return Err(PolicyError::SignerAlreadyAuthorized(signer));
        }
        tracing::info!(policy = %self.id, %signer, "signer authorized");
        Ok(())
    }

    /// Revoke a grantor. Owner-gated; fails if absent.
    pub async fn remove_signer(
        &self,
        caller: Principal,
        signer: Principal,
    ) -> Result<(), PolicyError> {
        self.check_owner(caller)?;
        let mut state = self.state.write().await;
        let state = state.as_mut().ok_or(PolicyError::NotConfigured)?;
        if !state.signers.remove(&signer) {
            return Err(PolicyError::SignerNotAuthorized(signer));
        }
        tracing::info!(policy = %self.id, %signer, "signer revoked");
        Ok(())
    }

    fn decode_transfer_params(
        params: &[Vec<u8>],
    ) -> Result<(Principal, Principal, u128), PolicyError> {
        match params {
            [from, to, amount] => {
                let from = wire::decode_principal(from)
                    .ok_or_else(|| PolicyError::BadParameters("from must be 32 bytes".into()))?;
                let to = wire::decode_principal(to)
                    .ok_or_else(|| PolicyError::BadParameters("to must be 32 bytes".into()))?;
                let amount = wire::decode_u128(amount)
                    .ok_or_else(|| PolicyError::BadParameters("amount must be 16 bytes".into()))?;
                Ok((from, to, amount))
            }
            _ => Err(PolicyError::BadParameters(format!(
                "expected 3 parameters, got {}",
                params.len()
            ))),
        }
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[async_trait]
impl Policy for SignatureApprovalPolicy {
    fn id(&self) -> PolicyId {
        self.id
    }

    fn name(&self) -> &str {
        "signature-approval"
    }

    async fn configure(&self, init: serde_json::Value) -> Result<(), PolicyError> {
        let config: SignatureConfig = serde_json::from_value(init)
            .map_err(|e| PolicyError::InvalidConfig(e.to_string()))?;
        let mut state = self.state.write().await;
        if state.is_some() {
            return Err(PolicyError::AlreadyConfigured);
        }

        // Mixing the instance id into the separator makes approvals for one
        // deployment worthless against any other, even with identical
        // name/version strings.
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TAG);
        hasher.update((config.domain_name.len() as u64).to_be_bytes());
        hasher.update(config.domain_name.as_bytes());
        hasher.update((config.domain_version.len() as u64).to_be_bytes());
        hasher.update(config.domain_version.as_bytes());
        hasher.update(self.id.to_string().as_bytes());

        *state = Some(SignerState {
            domain_separator: hasher.finalize().into(),
            signers: HashSet::new(),
            nonces: HashMap::new(),
        });
        tracing::info!(
            policy = %self.id,
            domain = %config.domain_name,
            version = %config.domain_version,
            "signature approval policy configured"
        );
        Ok(())
    }

    async fn run(
        &self,
        _caller: Principal,
        _subject: Principal,
        _selector: Selector,
        params: &[Vec<u8>],
        context: &[u8],
    ) -> Result<Verdict, PolicyError> {
        let state = self.state.read().await;
        let state = state.as_ref().ok_or(PolicyError::NotConfigured)?;

        let (from, to, amount) = Self::decode_transfer_params(params)?;
        let approval = ApprovalContext::decode(context).ok_or_else(|| {
            PolicyError::BadContext(format!(
                "expected {} bytes of approval context",
                ApprovalContext::ENCODED_LEN
            ))
        })?;

        if now_unix() >= approval.expires_at {
            tracing::debug!(policy = %self.id, %from, "approval expired");
            return Ok(Verdict::Rejected);
        }

        // The nonce comes from our own counter, never from the caller.
        let info = TransferInfo {
            from,
            to,
            amount,
            nonce: state.nonces.get(&from).copied().unwrap_or(0),
            expires_at: approval.expires_at,
        };
        let digest = approval_digest(&state.domain_separator, &info);

        let Ok(key) = VerifyingKey::from_bytes(&approval.signer) else {
            return Ok(Verdict::Rejected);
        };
        let signature = Signature::from_bytes(&approval.signature);
        if key.verify_strict(&digest, &signature).is_err() {
            tracing::debug!(policy = %self.id, %from, "approval signature invalid");
            return Ok(Verdict::Rejected);
        }
        if !state.signers.contains(&Principal(approval.signer)) {
            tracing::debug!(policy = %self.id, %from, "approval signer not authorized");
            return Ok(Verdict::Rejected);
        }
        Ok(Verdict::Continue)
    }

    async fn post_run(
        &self,
        _caller: Principal,
        _subject: Principal,
        _selector: Selector,
        params: &[Vec<u8>],
        _context: &[u8],
    ) -> Result<(), PolicyError> {
        let (from, _, _) = Self::decode_transfer_params(params)?;
        let mut state = self.state.write().await;
        let state = state.as_mut().ok_or(PolicyError::NotConfigured)?;
        let nonce = state.nonces.entry(from).or_insert(0);
        *nonce += 1;
        tracing::debug!(policy = %self.id, %from, nonce = *nonce, "approval consumed");
        Ok(())
    }
}
