#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use cysic::{
    account::AccountInfo,
    chain::{client::ChainClient, config::ChainClientConfig, service::ChainService},
    cosmos_modules::{
        abci::TxResponse,
        base::Coin,
        distribution::QueryDelegationTotalRewardsResponse,
        staking::{DelegationResponse, Validator},
        tx::{AuthInfo, TxBody, TxRaw},
    },
    error::{AccountError, GrpcError},
    Signer,
};
use prost::Message;

/// Chain ID to use for tests
pub const CHAIN_ID: &str = "cysicmint_9001-1";

/// Gas
pub const GAS_COIN: &str = "CYS";
pub const GAS_PRICE: u64 = 10;
pub const GAS_LIMIT: u64 = 30_000_000;

pub const ACCOUNT_NUMBER: u64 = 42;
pub const ACCOUNT_SEQUENCE: u64 = 3;

pub enum BroadcastBehavior {
    Respond { code: u32, raw_log: String },
    Fail(String),
}

pub enum GetTxBehavior {
    NotFound,
    Unindexed,
    Included(i64),
    Fail(String),
}

/// In-memory [`ChainService`] that records every call
pub struct StubChainService {
    pub account: Mutex<Option<AccountInfo>>,
    pub balances: Mutex<Vec<Coin>>,
    pub delegations: Mutex<Vec<DelegationResponse>>,
    pub rewards: Mutex<QueryDelegationTotalRewardsResponse>,
    pub broadcast: Mutex<BroadcastBehavior>,
    pub get_tx: Mutex<GetTxBehavior>,
    pub broadcasts: Mutex<Vec<Vec<u8>>>,
    pub account_calls: AtomicUsize,
    pub broadcast_calls: AtomicUsize,
    pub get_tx_calls: AtomicUsize,
}

impl StubChainService {
    pub fn new() -> Self {
        StubChainService {
            account: Mutex::new(Some(AccountInfo {
                address: String::new(),
                pub_key: None,
                account_number: ACCOUNT_NUMBER,
                sequence: ACCOUNT_SEQUENCE,
                code_hash: None,
            })),
            balances: Mutex::new(Vec::new()),
            delegations: Mutex::new(Vec::new()),
            rewards: Mutex::new(QueryDelegationTotalRewardsResponse::default()),
            broadcast: Mutex::new(BroadcastBehavior::Respond {
                code: 0,
                raw_log: "[]".to_string(),
            }),
            get_tx: Mutex::new(GetTxBehavior::NotFound),
            broadcasts: Mutex::new(Vec::new()),
            account_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
            get_tx_calls: AtomicUsize::new(0),
        }
    }

    pub fn total_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
            + self.broadcast_calls.load(Ordering::SeqCst)
            + self.get_tx_calls.load(Ordering::SeqCst)
    }

    /// Decodes the last broadcast transaction
    pub fn last_tx(&self) -> (TxBody, AuthInfo, TxRaw) {
        let bytes = self
            .broadcasts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("nothing was broadcast");
        let raw = TxRaw::decode(bytes.as_slice()).unwrap();
        let body = TxBody::decode(raw.body_bytes.as_slice()).unwrap();
        let auth_info = AuthInfo::decode(raw.auth_info_bytes.as_slice()).unwrap();

        (body, auth_info, raw)
    }
}

#[async_trait]
impl ChainService for StubChainService {
    async fn query_account(&self, address: &str) -> Result<AccountInfo, AccountError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        match self.account.lock().unwrap().clone() {
            Some(account) => Ok(AccountInfo {
                address: address.to_string(),
                ..account
            }),
            None => Err(AccountError::NotFound(address.to_string())),
        }
    }

    async fn all_balances(&self, _address: &str) -> Result<Vec<Coin>, GrpcError> {
        Ok(self.balances.lock().unwrap().clone())
    }

    async fn validator(&self, _address: &str) -> Result<Option<Validator>, GrpcError> {
        Ok(None)
    }

    async fn validators(&self, _offset: u64, _limit: u64) -> Result<(Vec<Validator>, u64), GrpcError> {
        Ok((Vec::new(), 0))
    }

    async fn delegator_delegations(
        &self,
        _delegator: &str,
    ) -> Result<Vec<DelegationResponse>, GrpcError> {
        Ok(self.delegations.lock().unwrap().clone())
    }

    async fn delegation_total_rewards(
        &self,
        _delegator: &str,
    ) -> Result<QueryDelegationTotalRewardsResponse, GrpcError> {
        Ok(self.rewards.lock().unwrap().clone())
    }

    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> Result<TxResponse, GrpcError> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        let hash = cysic::tx::builder::tx_hash(&tx_bytes);
        self.broadcasts.lock().unwrap().push(tx_bytes);

        match &*self.broadcast.lock().unwrap() {
            BroadcastBehavior::Respond { code, raw_log } => Ok(TxResponse {
                txhash: hash,
                code: *code,
                codespace: if *code == 0 { String::new() } else { "sdk".to_string() },
                raw_log: raw_log.clone(),
                ..Default::default()
            }),
            BroadcastBehavior::Fail(message) => {
                Err(GrpcError::Request(tonic::Status::unknown(message.clone())))
            }
        }
    }

    async fn get_tx(&self, hash: &str) -> Result<Option<TxResponse>, GrpcError> {
        self.get_tx_calls.fetch_add(1, Ordering::SeqCst);

        match &*self.get_tx.lock().unwrap() {
            GetTxBehavior::NotFound => Err(GrpcError::Request(tonic::Status::not_found(format!(
                "tx not found: {}",
                hash
            )))),
            GetTxBehavior::Unindexed => Ok(Some(TxResponse::default())),
            GetTxBehavior::Included(height) => Ok(Some(TxResponse {
                txhash: hash.to_string(),
                height: *height,
                raw_log: "[]".to_string(),
                ..Default::default()
            })),
            GetTxBehavior::Fail(message) => {
                Err(GrpcError::Request(tonic::Status::internal(message.clone())))
            }
        }
    }
}

pub fn test_config() -> ChainClientConfig {
    let mut config =
        ChainClientConfig::new("localhost:9090", CHAIN_ID, GAS_COIN, GAS_PRICE).with_gas_limit(GAS_LIMIT);
    config.confirmation_interval_ms = 0;

    config
}

pub fn init_test_client() -> (ChainClient, Arc<StubChainService>) {
    let service = Arc::new(StubChainService::new());
    let client = ChainClient::with_service(test_config(), service.clone());

    (client, service)
}

pub fn test_signer(seed: u8) -> Signer {
    let mut key = [0u8; 32];
    key[31] = seed;

    Signer::from_raw_key(&key).unwrap()
}

pub fn bech32(seed: u8) -> String {
    test_signer(seed).cosmos_address().unwrap()
}
