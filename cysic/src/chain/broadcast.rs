//! Submitting signed transactions and polling for their inclusion in a block.
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    cosmos_modules::abci::TxResponse,
    error::{GrpcError, TxError},
    tx::{builder::tx_hash, SignedTx},
};

use super::service::ChainService;

/// Cosmos SDK `ErrTxInMempoolCache`
pub const CODE_TX_IN_MEMPOOL_CACHE: u32 = 19;
/// Cosmos SDK `ErrMempoolIsFull`
pub const CODE_MEMPOOL_IS_FULL: u32 = 20;
/// Cosmos SDK `ErrTxTooLarge`
pub const CODE_TX_TOO_LARGE: u32 = 21;

const SDK_CODESPACE: &str = "sdk";

/// A transaction the node admitted to its mempool
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastResult {
    pub hash: String,
    pub code: u32,
    pub log: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InclusionStatus {
    /// Committed at `height`. A non-zero `code` means the transaction failed during execution.
    Included {
        height: i64,
        code: u32,
        raw_log: String,
    },
    /// Still not in a block after every attempt
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        ConfirmationPolicy {
            attempts: 10,
            interval: Duration::from_secs(1),
        }
    }
}

/// Maps the gRPC errors Tendermint uses for mempool admission failures to the response the
/// node would have returned, keyed by the locally computed hash.
pub fn check_tendermint_error(err: &GrpcError, tx_bytes: &[u8]) -> Option<TxResponse> {
    let status = match err {
        GrpcError::Request(status) => status,
        _ => return None,
    };
    let message = status.message().to_lowercase();
    let code = if message.contains("tx already exists in cache") {
        CODE_TX_IN_MEMPOOL_CACHE
    } else if message.contains("mempool is full") {
        CODE_MEMPOOL_IS_FULL
    } else if message.contains("tx too large") {
        CODE_TX_TOO_LARGE
    } else {
        return None;
    };

    Some(TxResponse {
        txhash: tx_hash(tx_bytes),
        code,
        codespace: SDK_CODESPACE.to_string(),
        raw_log: status.message().to_string(),
        ..Default::default()
    })
}

/// Submits `tx` in sync mode. Only a zero result code is a success; any other code, including
/// the reclassified mempool errors, comes back as [`TxError::Rejected`].
pub async fn broadcast(
    service: &dyn ChainService,
    tx: &SignedTx,
) -> Result<BroadcastResult, TxError> {
    let tx_bytes = tx.to_bytes();
    let response = match service.broadcast_tx(tx_bytes.clone()).await {
        Ok(response) => response,
        Err(err) => match check_tendermint_error(&err, &tx_bytes) {
            Some(response) => response,
            None => return Err(TxError::Broadcast(err)),
        },
    };

    if response.code != 0 {
        warn!(
            "tx {} rejected with code {} ({}): {}",
            response.txhash, response.code, response.codespace, response.raw_log
        );
        return Err(TxError::Rejected {
            code: response.code,
            codespace: response.codespace,
            raw_log: response.raw_log,
        });
    }

    info!("broadcast tx {}", response.txhash);
    Ok(BroadcastResult {
        hash: response.txhash,
        code: response.code,
        log: response.raw_log,
    })
}

/// Polls for `hash` until it lands in a block or `policy.attempts` lookups have been made.
/// Not-found answers and height-zero responses count as "not yet"; any other error stops the
/// loop.
pub async fn wait_for_inclusion(
    service: &dyn ChainService,
    hash: &str,
    policy: ConfirmationPolicy,
) -> Result<InclusionStatus, TxError> {
    for attempt in 1..=policy.attempts {
        match service.get_tx(hash).await {
            Ok(Some(response)) if response.height > 0 => {
                debug!("tx {} included at height {}", hash, response.height);
                return Ok(InclusionStatus::Included {
                    height: response.height,
                    code: response.code,
                    raw_log: response.raw_log,
                });
            }
            Ok(_) => debug!("wait tx {} packed, attempt {}/{}", hash, attempt, policy.attempts),
            Err(source) if source.is_not_found() => {
                debug!("wait tx {} packed, attempt {}/{}", hash, attempt, policy.attempts)
            }
            Err(source) => {
                warn!("error when get tx: {}, err: {}", hash, source);
                return Err(TxError::Confirmation {
                    hash: hash.to_string(),
                    source,
                });
            }
        }

        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    warn!("tx {} not included after {} attempts", hash, policy.attempts);
    Ok(InclusionStatus::Pending)
}
