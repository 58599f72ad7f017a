use crate::{
    error::ChainClientError,
    keys::Signer,
    tx::govtoken::{MsgExchangeToGovToken, MsgExchangeToPlatformToken},
};

use super::ChainClient;

impl ChainClient {
    /// Exchanges `amount` base units of the platform token for governance tokens.
    pub async fn exchange_to_gov_token(
        &self,
        signer: &Signer,
        amount: u128,
    ) -> Result<String, ChainClientError> {
        let msg = MsgExchangeToGovToken {
            sender: signer.account_address(self.codec())?,
            amount: amount.to_string(),
        };

        self.broadcast_msg(signer, msg).await
    }

    /// Exchanges `amount` base units of the governance token back to platform tokens.
    pub async fn exchange_to_platform_token(
        &self,
        signer: &Signer,
        amount: u128,
    ) -> Result<String, ChainClientError> {
        let msg = MsgExchangeToPlatformToken {
            sender: signer.account_address(self.codec())?,
            amount: amount.to_string(),
        };

        self.broadcast_msg(signer, msg).await
    }
}
