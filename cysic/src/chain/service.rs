//! The network seam between the client and a node.
//!
//! [`ChainService`] is the narrow set of remote calls the rest of the crate needs.
//! [`GrpcChainService`] implements it over a [`ChainConnector`]; tests swap in a stub.
use std::sync::Arc;

use async_trait::async_trait;
use tonic::Code;
use tracing::{debug, warn};

use crate::{
    account::AccountInfo,
    cosmos_modules::{
        abci::TxResponse,
        auth, bank,
        base::Coin,
        distribution, query::PageRequest, staking,
        tx::{BroadcastMode, BroadcastTxRequest, GetTxRequest},
    },
    error::{AccountError, GrpcError},
};

use super::connector::{
    AuthQueryClient, BankQueryClient, ChainConnector, DistributionQueryClient, StakingQueryClient,
    TxServiceClient,
};

#[async_trait]
pub trait ChainService: Send + Sync {
    /// Account number and sequence for `address`, which must be bech32.
    async fn query_account(&self, address: &str) -> Result<AccountInfo, AccountError>;

    async fn all_balances(&self, address: &str) -> Result<Vec<Coin>, GrpcError>;

    /// `None` when the node does not know the validator
    async fn validator(&self, address: &str) -> Result<Option<staking::Validator>, GrpcError>;

    /// One page of validators and the total count.
    async fn validators(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<staking::Validator>, u64), GrpcError>;

    async fn delegator_delegations(
        &self,
        delegator: &str,
    ) -> Result<Vec<staking::DelegationResponse>, GrpcError>;

    async fn delegation_total_rewards(
        &self,
        delegator: &str,
    ) -> Result<distribution::QueryDelegationTotalRewardsResponse, GrpcError>;

    /// Submits signed bytes in sync mode: the response reflects mempool admission only.
    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> Result<TxResponse, GrpcError>;

    /// `None` while the node has not indexed the transaction.
    async fn get_tx(&self, hash: &str) -> Result<Option<TxResponse>, GrpcError>;

    async fn close(&self) {}
}

#[derive(Clone, Debug)]
pub struct GrpcChainService {
    connector: Arc<ChainConnector>,
}

impl GrpcChainService {
    pub fn new(connector: Arc<ChainConnector>) -> Self {
        GrpcChainService { connector }
    }

    pub fn connector(&self) -> &Arc<ChainConnector> {
        &self.connector
    }

    /// Drops the channel when the transport itself failed, so the next call redials.
    async fn request_error(&self, status: tonic::Status) -> GrpcError {
        if status.code() == Code::Unavailable {
            self.connector.mark_unhealthy().await;
        }

        GrpcError::Request(status)
    }
}

#[async_trait]
impl ChainService for GrpcChainService {
    async fn query_account(&self, address: &str) -> Result<AccountInfo, AccountError> {
        let mut query_client = self.connector.client::<AuthQueryClient>().await?;
        let request = auth::QueryAccountRequest {
            address: address.to_string(),
        };
        let response = match query_client.account(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => {
                return Err(account_query_error(address, self.request_error(status).await))
            }
        };

        match response.account {
            Some(any) => any.try_into(),
            None => Err(AccountError::Empty(format!("no account data for {}", address))),
        }
    }

    async fn all_balances(&self, address: &str) -> Result<Vec<Coin>, GrpcError> {
        let mut query_client = self.connector.client::<BankQueryClient>().await?;
        let request = bank::QueryAllBalancesRequest {
            address: address.to_string(),
            ..Default::default()
        };
        let response = match query_client.all_balances(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => return Err(self.request_error(status).await),
        };

        Ok(response.balances)
    }

    async fn validator(&self, address: &str) -> Result<Option<staking::Validator>, GrpcError> {
        let mut query_client = self.connector.client::<StakingQueryClient>().await?;
        let request = staking::QueryValidatorRequest {
            validator_addr: address.to_string(),
        };
        let result = match query_client.validator(request).await {
            Ok(response) => Ok(response.into_inner().validator),
            Err(status) => Err(self.request_error(status).await),
        };

        not_found_as_none(result)
    }

    async fn validators(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<staking::Validator>, u64), GrpcError> {
        let mut query_client = self.connector.client::<StakingQueryClient>().await?;
        let request = staking::QueryValidatorsRequest {
            pagination: Some(PageRequest {
                offset,
                limit,
                count_total: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let response = match query_client.validators(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => return Err(self.request_error(status).await),
        };
        let total = response
            .pagination
            .map(|page| page.total)
            .unwrap_or(response.validators.len() as u64);

        Ok((response.validators, total))
    }

    async fn delegator_delegations(
        &self,
        delegator: &str,
    ) -> Result<Vec<staking::DelegationResponse>, GrpcError> {
        let mut query_client = self.connector.client::<StakingQueryClient>().await?;
        let request = staking::QueryDelegatorDelegationsRequest {
            delegator_addr: delegator.to_string(),
            ..Default::default()
        };
        let response = match query_client.delegator_delegations(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => return Err(self.request_error(status).await),
        };

        Ok(response.delegation_responses)
    }

    async fn delegation_total_rewards(
        &self,
        delegator: &str,
    ) -> Result<distribution::QueryDelegationTotalRewardsResponse, GrpcError> {
        let mut query_client = self.connector.client::<DistributionQueryClient>().await?;
        let request = distribution::QueryDelegationTotalRewardsRequest {
            delegator_address: delegator.to_string(),
        };
        match query_client.delegation_total_rewards(request).await {
            Ok(response) => Ok(response.into_inner()),
            Err(status) => Err(self.request_error(status).await),
        }
    }

    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> Result<TxResponse, GrpcError> {
        let mut service_client = self.connector.client::<TxServiceClient>().await?;
        let request = BroadcastTxRequest {
            tx_bytes,
            mode: BroadcastMode::Sync.into(),
        };
        let response = match service_client.broadcast_tx(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => {
                warn!("broadcast failed: {}", status);
                return Err(self.request_error(status).await);
            }
        };

        response
            .tx_response
            .ok_or_else(|| GrpcError::EmptyResponse("broadcast returned no tx response".to_string()))
    }

    async fn get_tx(&self, hash: &str) -> Result<Option<TxResponse>, GrpcError> {
        let mut service_client = self.connector.client::<TxServiceClient>().await?;
        let request = GetTxRequest {
            hash: hash.to_string(),
        };
        let result = match service_client.get_tx(request).await {
            Ok(response) => Ok(response.into_inner().tx_response),
            Err(status) => Err(self.request_error(status).await),
        };

        not_found_as_none(result)
    }

    async fn close(&self) {
        self.connector.close().await;
    }
}

/// An unknown address is reported as [`AccountError::NotFound`] rather than a transport error.
pub(crate) fn account_query_error(address: &str, err: GrpcError) -> AccountError {
    if err.is_not_found() {
        AccountError::NotFound(address.to_string())
    } else {
        err.into()
    }
}

/// Folds a not-found answer into an empty result.
pub(crate) fn not_found_as_none<T>(
    result: Result<Option<T>, GrpcError>,
) -> Result<Option<T>, GrpcError> {
    match result {
        Err(err) if err.is_not_found() => {
            debug!("not found: {}", err);
            Ok(None)
        }
        other => other,
    }
}
