// ABOUTME: Tests for VolumeThresholdPolicy - boundaries, sentinel, and
// ABOUTME: reconfiguration guards.

use super::*;
use crate::error::PolicyError;
use crate::payload::{Principal, Selector};
use crate::wire;

fn owner() -> Principal {
    Principal::derived("threshold-owner")
}

async fn configured(min: u64, max: u64) -> VolumeThresholdPolicy {
    let policy = VolumeThresholdPolicy::new(owner());
    policy
        .configure(serde_json::json!({ "min_amount": min, "max_amount": max }))
        .await
        .unwrap();
    policy
}

async fn run_amount(policy: &VolumeThresholdPolicy, amount: u128) -> Verdict {
    policy
        .run(
            Principal::derived("sender"),
            Principal::derived("target"),
            Selector::from_signature("transfer(principal,u128)"),
            &[wire::encode_u128(amount)],
            &[],
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_boundaries_inclusive() {
    let policy = configured(100, 200).await;

    assert_eq!(run_amount(&policy, 99).await, Verdict::Rejected);
    assert_eq!(run_amount(&policy, 100).await, Verdict::Continue);
    assert_eq!(run_amount(&policy, 101).await, Verdict::Continue);
    assert_eq!(run_amount(&policy, 199).await, Verdict::Continue);
    assert_eq!(run_amount(&policy, 200).await, Verdict::Continue);
    assert_eq!(run_amount(&policy, 201).await, Verdict::Rejected);
}

#[tokio::test]
async fn test_zero_max_disables_upper_bound() {
    let policy = configured(100, 200).await;
    policy.set_max(owner(), 0).await.unwrap();

    assert_eq!(run_amount(&policy, u128::MAX).await, Verdict::Continue);
    assert_eq!(run_amount(&policy, 99).await, Verdict::Rejected);
}

#[tokio::test]
async fn test_configure_requires_max_above_min() {
    let policy = VolumeThresholdPolicy::new(owner());
    let result = policy
        .configure(serde_json::json!({ "min_amount": 200, "max_amount": 100 }))
        .await;
    assert!(matches!(
        result,
        Err(PolicyError::InvalidThresholds { min: 200, max: 100 })
    ));

    let equal = policy
        .configure(serde_json::json!({ "min_amount": 100, "max_amount": 100 }))
        .await;
    assert!(matches!(equal, Err(PolicyError::InvalidThresholds { .. })));
}

#[tokio::test]
async fn test_configure_exactly_once() {
    let policy = configured(100, 200).await;
    let again = policy
        .configure(serde_json::json!({ "min_amount": 1, "max_amount": 2 }))
        .await;
    assert!(matches!(again, Err(PolicyError::AlreadyConfigured)));
}

#[tokio::test]
async fn test_configure_accepts_string_amounts() {
    let policy = VolumeThresholdPolicy::new(owner());
    policy
        .configure(serde_json::json!({
            "min_amount": "100000000000000000000",
            "max_amount": "200000000000000000000"
        }))
        .await
        .unwrap();
    assert_eq!(
        policy.bounds().await,
        Some((100_000_000_000_000_000_000, 200_000_000_000_000_000_000))
    );
}

#[tokio::test]
async fn test_set_max_guards() {
    let policy = configured(100, 200).await;

    assert!(matches!(
        policy.set_max(owner(), 200).await,
        Err(PolicyError::UnchangedValue)
    ));
    assert!(matches!(
        policy.set_max(owner(), 100).await,
        Err(PolicyError::InvalidThresholds { .. })
    ));
    assert!(matches!(
        policy.set_max(owner(), 50).await,
        Err(PolicyError::InvalidThresholds { .. })
    ));

    policy.set_max(owner(), 300).await.unwrap();
    assert_eq!(policy.bounds().await, Some((100, 300)));
}

#[tokio::test]
async fn test_set_min_guards() {
    let policy = configured(100, 200).await;

    assert!(matches!(
        policy.set_min(owner(), 100).await,
        Err(PolicyError::UnchangedValue)
    ));
    assert!(matches!(
        policy.set_min(owner(), 200).await,
        Err(PolicyError::InvalidThresholds { .. })
    ));

    policy.set_min(owner(), 150).await.unwrap();
    assert_eq!(policy.bounds().await, Some((150, 200)));
}

#[tokio::test]
async fn test_owner_gating() {
    let policy = configured(100, 200).await;
    let stranger = Principal::derived("stranger");

    assert!(matches!(
        policy.set_min(stranger, 150).await,
        Err(PolicyError::NotOwner)
    ));
    assert!(matches!(
        policy.set_max(stranger, 300).await,
        Err(PolicyError::NotOwner)
    ));
}

#[tokio::test]
async fn test_run_requires_configuration() {
    let policy = VolumeThresholdPolicy::new(owner());
    let result = policy
        .run(
            Principal::ZERO,
            Principal::ZERO,
            Selector::from_signature("transfer(principal,u128)"),
            &[wire::encode_u128(150)],
            &[],
        )
        .await;
    assert!(matches!(result, Err(PolicyError::NotConfigured)));
}

#[tokio::test]
async fn test_run_rejects_bad_parameters() {
    let policy = configured(100, 200).await;
    let result = policy
        .run(
            Principal::ZERO,
            Principal::ZERO,
            Selector::from_signature("transfer(principal,u128)"),
            &[vec![1, 2, 3]],
            &[],
        )
        .await;
    assert!(matches!(result, Err(PolicyError::BadParameters(_))));

    let none = policy
        .run(
            Principal::ZERO,
            Principal::ZERO,
            Selector::from_signature("transfer(principal,u128)"),
            &[],
            &[],
        )
        .await;
    assert!(matches!(none, Err(PolicyError::BadParameters(_))));
}
