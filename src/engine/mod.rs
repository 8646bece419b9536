// ABOUTME: Decision engine - registries of extractors and policies, the
// ABOUTME: enforce dispatch algorithm, and the atomic accept/commit phase.


use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::EngineError;
use crate::extractor::{ExtractedParams, Extractor};
use crate::payload::{ParamName, Payload, Principal, Selector};
use crate::policy::{Policy, Verdict};

/// Terminal result applied when no policy renders a definitive verdict.
///
/// Deployment-time configuration; the engine never assumes a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultVerdict {
    Allow,
    Deny,
}

struct PolicyRegistration {
    policy: Arc<dyn Policy>,
    output_format: Vec<ParamName>,
}

/// The decision engine: routes payloads through extractors and ordered
/// policy chains, committing evaluated policies only on acceptance.
pub struct Engine {
    owner: Principal,
    default_verdict: DefaultVerdict,
    extractors: RwLock<HashMap<Selector, Arc<dyn Extractor>>>,
    policies: RwLock<HashMap<(Principal, Selector), Vec<PolicyRegistration>>>,
}

impl Engine {
    pub fn new(owner: Principal, default_verdict: DefaultVerdict) -> Self {
        Self {
            owner,
            default_verdict,
            extractors: RwLock::new(HashMap::new()),
            policies: RwLock::new(HashMap::new()),
        }
    }

    pub fn owner(&self) -> Principal {
        self.owner
    }

    pub fn default_verdict(&self) -> DefaultVerdict {
        self.default_verdict
    }

    fn check_owner(&self, caller: Principal) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::NotOwner);
        }
        Ok(())
    }

    /// Register the extractor for a selector, replacing any previous mapping.
    /// Owner-gated.
    pub async fn set_extractor(
        &self,
        caller: Principal,
        selector: Selector,
        extractor: Arc<dyn Extractor>,
    ) -> Result<(), EngineError> {
        self.check_owner(caller)?;
        let address = extractor.address();
        let replaced = self
            .extractors
            .write()
            .await
            .insert(selector, extractor)
            .is_some();
        tracing::info!(%selector, extractor = %address, replaced, "extractor registered");
        Ok(())
    }

    /// Append a policy to the ordered chain for `(target, selector)`.
    /// Owner-gated. Registration order is evaluation order.
    pub async fn add_policy(
        &self,
        caller: Principal,
        target: Principal,
        selector: Selector,
        policy: Arc<dyn Policy>,
        output_format: Vec<ParamName>,
    ) -> Result<(), EngineError> {
        self.check_owner(caller)?;
        let id = policy.id();
        let name = policy.name().to_string();
        let mut policies = self.policies.write().await;
        let chain = policies.entry((target, selector)).or_default();
        chain.push(PolicyRegistration {
            policy,
            output_format,
        });
        tracing::info!(
            %target,
            %selector,
            policy = %id,
            name = %name,
            position = chain.len() - 1,
            "policy registered"
        );
        Ok(())
    }

    /// Number of policies registered for `(target, selector)`.
    pub async fn policy_count(&self, target: Principal, selector: Selector) -> usize {
        self.policies
            .read()
            .await
            .get(&(target, selector))
            .map_or(0, Vec::len)
    }

    /// Evaluate a payload against the chain registered for
    /// `(target, payload.selector)`.
    ///
    /// Returns `Ok(())` only after every evaluated policy's pre-check came
    /// back non-rejecting and every commit hook ran; any failure at any stage
    /// aborts the whole unit with nothing committed after the failure point,
    /// and the caller must not perform the protected action.
    pub async fn enforce(&self, payload: &Payload, target: Principal) -> Result<(), EngineError> {
        let selector = payload.selector;
        let extractor = self
            .extractors
            .read()
            .await
            .get(&selector)
            .cloned()
            .ok_or(EngineError::NoExtractorConfigured(selector))?;

        let extracted = ExtractedParams::new(extractor.extract(payload).await?);

        let chain: Vec<(Arc<dyn Policy>, Vec<ParamName>)> = self
            .policies
            .read()
            .await
            .get(&(target, selector))
            .map(|regs| {
                regs.iter()
                    .map(|r| (Arc::clone(&r.policy), r.output_format.clone()))
                    .collect()
            })
            .unwrap_or_default();

        if chain.is_empty() {
            return self.apply_default(selector);
        }

        // Pre-check phase: strict registration order, halt on the first
        // definitive verdict.
        let mut evaluated: Vec<(Arc<dyn Policy>, Vec<Vec<u8>>)> = Vec::new();
        let mut accepted = false;
        for (policy, output_format) in &chain {
            let params: Vec<Vec<u8>> = output_format
                .iter()
                .map(|name| {
                    extracted
                        .get(name)
                        .map(<[u8]>::to_vec)
                        .ok_or(EngineError::MissingParameter {
                            selector,
                            name: *name,
                        })
                })
                .collect::<Result<_, _>>()?;

            let verdict = policy
                .run(payload.sender, target, selector, &params, &payload.context)
                .await
                .map_err(|source| EngineError::PolicyFailed {
                    selector,
                    policy: policy.id(),
                    source,
                })?;
            evaluated.push((Arc::clone(policy), params));

            match verdict {
                Verdict::Rejected => {
                    tracing::warn!(%selector, policy = %policy.id(), "operation rejected");
                    return Err(EngineError::PolicyRunRejected {
                        selector,
                        policy: policy.id(),
                    });
                }
                Verdict::Allowed => {
                    accepted = true;
                    break;
                }
                Verdict::Continue => {}
            }
        }
        if !accepted {
            self.apply_default(selector)?;
        }

        // Commit phase: every evaluated policy, same order, same parameters.
        for (policy, params) in &evaluated {
            policy
                .post_run(payload.sender, target, selector, params, &payload.context)
                .await
                .map_err(|source| EngineError::CommitFailed {
                    selector,
                    policy: policy.id(),
                    source,
                })?;
        }
        tracing::debug!(%selector, %target, policies = evaluated.len(), "operation accepted");
        Ok(())
    }

    fn apply_default(&self, selector: Selector) -> Result<(), EngineError> {
        match self.default_verdict {
            DefaultVerdict::Allow => Ok(()),
            DefaultVerdict::Deny => {
                tracing::warn!(%selector, "operation denied by default verdict");
                Err(EngineError::DefaultDenied { selector })
            }
        }
    }
}
