//! Query methods for the [Distribution module](https://github.com/cosmos/cosmos-sdk/blob/main/proto/cosmos/distribution/v1beta1/query.proto).
use tracing::warn;

use crate::{
    chain::client::ChainClient,
    coin::{sum_by_denom, Coin},
    cosmos_modules::{base::DecCoin, distribution::QueryDelegationTotalRewardsResponse},
    error::ChainClientError,
};

use super::{DelegatorSummary, ValidatorCoins};

impl ChainClient {
    /// Pending rewards of a hex or bech32 delegator, grouped by validator. Decimal amounts are
    /// rounded to the nearest integer.
    pub async fn query_delegation_rewards(
        &self,
        delegator: &str,
    ) -> Result<DelegatorSummary, ChainClientError> {
        let delegator = self.codec().to_account(delegator)?;
        let response = self
            .service
            .delegation_total_rewards(&delegator)
            .await
            .map_err(|err| {
                warn!("could not query delegation rewards of {}: {}", delegator, err);
                err
            })?;

        summarize_rewards(response)
    }
}

pub(crate) fn summarize_rewards(
    response: QueryDelegationTotalRewardsResponse,
) -> Result<DelegatorSummary, ChainClientError> {
    let mut validators = Vec::with_capacity(response.rewards.len());
    for reward in response.rewards {
        validators.push(ValidatorCoins {
            validator_address: reward.validator_address,
            coins: round_dec_coins(&reward.reward)?,
        });
    }
    validators.sort_by(|a, b| a.validator_address.cmp(&b.validator_address));

    Ok(DelegatorSummary {
        validators,
        total: round_dec_coins(&response.total)?,
    })
}

fn round_dec_coins(coins: &[DecCoin]) -> Result<Vec<Coin>, ChainClientError> {
    let coins = coins
        .iter()
        .map(Coin::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sum_by_denom(&coins)?)
}
