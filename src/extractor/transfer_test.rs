// ABOUTME: Tests for TransferExtractor - selector dispatch and the
// ABOUTME: [from, to, amount] output set.

use super::*;
use crate::error::ExtractorError;
use crate::payload::{Payload, Principal, Selector};
use crate::wire::{self, selectors};

fn extractor() -> TransferExtractor {
    TransferExtractor::new(Principal::derived("transfer-extractor"))
}

#[tokio::test]
async fn test_transfer_uses_sender_as_from() {
    let sender = Principal::derived("sender");
    let to = Principal::derived("recipient");
    let payload = Payload::new(
        selectors::transfer(),
        wire::encode_transfer(to, 42),
        sender,
        Vec::new(),
    );

    let params = extractor().extract(&payload).await.unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params[0].name, names::from());
    assert_eq!(params[0].value, wire::encode_principal(sender));
    assert_eq!(params[1].name, names::to());
    assert_eq!(params[1].value, wire::encode_principal(to));
    assert_eq!(params[2].name, names::amount());
    assert_eq!(params[2].value, wire::encode_u128(42));
}

#[tokio::test]
async fn test_transfer_from_decodes_all_three() {
    let from = Principal::derived("payer");
    let to = Principal::derived("recipient");
    let payload = Payload::new(
        selectors::transfer_from(),
        wire::encode_transfer_from(from, to, 7),
        Principal::derived("relayer"),
        Vec::new(),
    );

    let params = extractor().extract(&payload).await.unwrap();
    assert_eq!(params[0].value, wire::encode_principal(from));
    assert_eq!(params[1].value, wire::encode_principal(to));
    assert_eq!(params[2].value, wire::encode_u128(7));
}

#[tokio::test]
async fn test_unrecognized_selector() {
    let payload = Payload::new(
        Selector::from_signature("mint(principal,u128)"),
        Vec::new(),
        Principal::derived("sender"),
        Vec::new(),
    );

    let result = extractor().extract(&payload).await;
    assert!(matches!(
        result,
        Err(ExtractorError::UnsupportedSelector(_))
    ));
}

#[tokio::test]
async fn test_malformed_call_data() {
    let payload = Payload::new(
        selectors::transfer(),
        vec![0u8; 10],
        Principal::derived("sender"),
        Vec::new(),
    );

    let result = extractor().extract(&payload).await;
    assert!(matches!(result, Err(ExtractorError::Malformed(_))));
}
