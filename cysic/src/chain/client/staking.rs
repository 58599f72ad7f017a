use crate::{
    coin::Coin,
    error::ChainClientError,
    keys::Signer,
    tx::{delegate, distribution::MsgWithdrawDelegatorReward, staking},
};

use super::ChainClient;

impl ChainClient {
    /// Delegates `amount` base units of the governance token to `validator`.
    pub async fn delegate_gov_token(
        &self,
        signer: &Signer,
        validator: &str,
        amount: u128,
    ) -> Result<String, ChainClientError> {
        let msg = staking::MsgDelegate {
            delegator_address: signer.account_address(self.codec())?,
            validator_address: validator.to_string(),
            amount: Some(Coin::new(amount, &self.config.gov_token).into()),
        };

        self.broadcast_msg(signer, msg).await
    }

    /// Undelegates `amount` base units of the governance token from `validator`.
    pub async fn undelegate_gov_token(
        &self,
        signer: &Signer,
        validator: &str,
        amount: u128,
    ) -> Result<String, ChainClientError> {
        let msg = staking::MsgUndelegate {
            delegator_address: signer.account_address(self.codec())?,
            validator_address: validator.to_string(),
            amount: Some(Coin::new(amount, &self.config.gov_token).into()),
        };

        self.broadcast_msg(signer, msg).await
    }

    /// Stakes ve-tokens with `validator`, with the signer's hex address as the worker.
    pub async fn delegate_ve_token(
        &self,
        signer: &Signer,
        validator: &str,
        token: &str,
        amount: u128,
    ) -> Result<String, ChainClientError> {
        let msg = delegate::MsgDelegate {
            worker: signer.eth_address(),
            validator: validator.to_string(),
            token: token.to_string(),
            amount: amount.to_string(),
        };

        self.broadcast_msg(signer, msg).await
    }

    pub async fn withdraw_delegator_reward(
        &self,
        signer: &Signer,
        validator: &str,
    ) -> Result<String, ChainClientError> {
        let msg = MsgWithdrawDelegatorReward {
            delegator_address: signer.account_address(self.codec())?,
            validator_address: validator.to_string(),
        };

        self.broadcast_msg(signer, msg).await
    }
}
