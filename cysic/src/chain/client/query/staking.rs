//! Query methods for the [Staking module](https://github.com/cosmos/cosmos-sdk/blob/main/proto/cosmos/staking/v1beta1/query.proto).
use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    chain::client::ChainClient,
    coin::{sum_by_denom, Coin},
    cosmos_modules::staking::{DelegationResponse, Validator},
    error::ChainClientError,
};

use super::{DelegatorSummary, ValidatorCoins};

impl ChainClient {
    /// Gets a validator by its `cysicvaloper` address, `None` if the chain does not know it
    pub async fn get_validator(&self, address: &str) -> Result<Option<Validator>, ChainClientError> {
        self.codec().validate_validator(address)?;

        Ok(self.service.validator(address).await?)
    }

    /// One page of validators of any status, and the total number of validators
    pub async fn get_validator_list(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Validator>, u64), ChainClientError> {
        Ok(self.service.validators(offset, limit).await?)
    }

    /// Delegated balances of a hex or bech32 delegator, grouped by validator
    pub async fn query_delegator_delegations(
        &self,
        delegator: &str,
    ) -> Result<DelegatorSummary, ChainClientError> {
        let delegator = self.codec().to_account(delegator)?;
        let responses = self
            .service
            .delegator_delegations(&delegator)
            .await
            .map_err(|err| {
                warn!("could not query delegations of {}: {}", delegator, err);
                err
            })?;

        group_delegations(responses)
    }
}

pub(crate) fn group_delegations(
    responses: Vec<DelegationResponse>,
) -> Result<DelegatorSummary, ChainClientError> {
    let mut by_validator = BTreeMap::<String, Vec<Coin>>::new();
    for response in responses {
        let (delegation, balance) = match (response.delegation, response.balance) {
            (Some(delegation), Some(balance)) => (delegation, balance),
            _ => continue,
        };
        by_validator
            .entry(delegation.validator_address)
            .or_default()
            .push(balance.try_into()?);
    }

    let mut validators = Vec::with_capacity(by_validator.len());
    for (validator_address, coins) in by_validator {
        validators.push(ValidatorCoins {
            validator_address,
            coins: sum_by_denom(&coins)?,
        });
    }
    let total = sum_by_denom(validators.iter().flat_map(|v| v.coins.iter()))?;

    Ok(DelegatorSummary { validators, total })
}
