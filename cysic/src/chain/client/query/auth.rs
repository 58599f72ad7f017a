//! Query methods for the [Auth module](https://github.com/cosmos/cosmos-sdk/blob/main/proto/cosmos/auth/v1beta1/query.proto).
use tracing::warn;

use crate::{
    account::AccountInfo, chain::client::ChainClient, error::ChainClientError, keys::Signer,
};

impl ChainClient {
    /// Gets the on-chain account of `signer`
    pub async fn get_account(&self, signer: &Signer) -> Result<AccountInfo, ChainClientError> {
        let address = signer.account_address(self.codec())?;

        Ok(self.service.query_account(&address).await?)
    }

    /// Gets the account for a hex or bech32 address
    pub async fn get_account_by_address(
        &self,
        address: &str,
    ) -> Result<AccountInfo, ChainClientError> {
        let address = self.codec().to_account(address).map_err(|err| {
            warn!("error when convert addr: {} to cosmos address, err: {}", address, err);
            err
        })?;

        Ok(self.service.query_account(&address).await?)
    }
}
