use std::{sync::atomic::Ordering, time::Duration};

use assay::assay;
use cysic::{
    chain::broadcast::{ConfirmationPolicy, InclusionStatus},
    error::{ChainClientError, TxError},
};

mod utils;
use utils::*;

#[assay]
async fn zero_code_returns_hash() {
    let (client, service) = init_test_client();

    let hash = client
        .exchange_to_platform_token(&test_signer(1), 5)
        .await
        .unwrap();

    let (_, _, raw) = service.last_tx();
    assert_eq!(hash.len(), 64);
    assert_eq!(hash, hash.to_uppercase());
    assert_eq!(
        hash,
        cysic::tx::builder::tx_hash(&prost::Message::encode_to_vec(&raw))
    );
}

#[assay]
async fn non_zero_code_is_rejected_with_raw_log() {
    let (client, service) = init_test_client();
    *service.broadcast.lock().unwrap() = BroadcastBehavior::Respond {
        code: 32,
        raw_log: "account sequence mismatch, expected 8, got 3: incorrect account sequence"
            .to_string(),
    };

    let err = client
        .send(&test_signer(1), &bech32(2), GAS_COIN, 1)
        .await
        .unwrap_err();

    match err {
        ChainClientError::Tx(err @ TxError::Rejected { .. }) => {
            assert_eq!(err.expected_sequence(), Some(8));
            if let TxError::Rejected { code, raw_log, .. } = err {
                assert_eq!(code, 32);
                assert!(raw_log.starts_with("account sequence mismatch"));
            }
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[assay]
async fn mempool_errors_become_rejections() {
    let (client, service) = init_test_client();
    *service.broadcast.lock().unwrap() = BroadcastBehavior::Fail("mempool is full".to_string());

    let err = client
        .send(&test_signer(1), &bech32(2), GAS_COIN, 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ChainClientError::Tx(TxError::Rejected { code: 20, .. })
    ));

    *service.broadcast.lock().unwrap() = BroadcastBehavior::Fail("connection reset".to_string());
    let err = client
        .send(&test_signer(1), &bech32(2), GAS_COIN, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainClientError::Tx(TxError::Broadcast(_))));
}

#[assay]
async fn wait_gives_up_after_ten_not_found_answers() {
    let (client, service) = init_test_client();

    let status = client.wait_for_inclusion("ABCDEF").await.unwrap();

    assert_eq!(status, InclusionStatus::Pending);
    assert_eq!(service.get_tx_calls.load(Ordering::SeqCst), 10);
}

#[assay]
async fn wait_treats_height_zero_as_pending() {
    let (client, service) = init_test_client();
    *service.get_tx.lock().unwrap() = GetTxBehavior::Unindexed;

    let policy = ConfirmationPolicy {
        attempts: 3,
        interval: Duration::from_millis(1),
    };
    let status = client.wait_for_inclusion_with("ABCDEF", policy).await.unwrap();

    assert_eq!(status, InclusionStatus::Pending);
    assert_eq!(service.get_tx_calls.load(Ordering::SeqCst), 3);
}

#[assay]
async fn wait_stops_at_inclusion_or_error() {
    let (client, service) = init_test_client();
    *service.get_tx.lock().unwrap() = GetTxBehavior::Included(77);

    let status = client.wait_for_inclusion("ABCDEF").await.unwrap();
    assert_eq!(
        status,
        InclusionStatus::Included {
            height: 77,
            code: 0,
            raw_log: "[]".to_string()
        }
    );
    assert_eq!(service.get_tx_calls.load(Ordering::SeqCst), 1);

    *service.get_tx.lock().unwrap() = GetTxBehavior::Fail("boom".to_string());
    let err = client.wait_for_inclusion("ABCDEF").await.unwrap_err();
    assert!(matches!(
        err,
        ChainClientError::Tx(TxError::Confirmation { .. })
    ));
    assert_eq!(service.get_tx_calls.load(Ordering::SeqCst), 2);
}
