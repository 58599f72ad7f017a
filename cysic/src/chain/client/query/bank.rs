//! Query methods for the [Bank module](https://github.com/cosmos/cosmos-sdk/blob/main/proto/cosmos/bank/v1beta1/query.proto).
use tracing::warn;

use crate::{
    chain::client::ChainClient,
    coin::{Coin, DECIMALS, format_units},
    error::ChainClientError,
};

impl ChainClient {
    /// Balance of `denom` held by `address`, scaled down by 18 decimals. `"0"` when the address
    /// holds none.
    pub async fn get_balance(&self, address: &str, denom: &str) -> Result<String, ChainClientError> {
        let balance = self
            .get_balance_list(address)
            .await?
            .into_iter()
            .find(|coin| coin.denom == denom)
            .map(|coin| format_units(coin.amount, DECIMALS))
            .unwrap_or_else(|| "0".to_string());

        Ok(balance)
    }

    /// All balances of a hex or bech32 address, in base units
    pub async fn get_balance_list(&self, address: &str) -> Result<Vec<Coin>, ChainClientError> {
        let address = self.codec().to_account(address).map_err(|err| {
            warn!("error when convert addr: {} to cosmos address, err: {}", address, err);
            err
        })?;
        let balances = self.service.all_balances(&address).await.map_err(|err| {
            warn!("could not query balances of {}: {}", address, err);
            err
        })?;

        let mut coins = Vec::<Coin>::new();
        for b in balances {
            coins.push(b.try_into()?)
        }

        Ok(coins)
    }
}
