use tracing::warn;

use crate::{
    chain::broadcast::{broadcast, wait_for_inclusion, ConfirmationPolicy, InclusionStatus},
    coin::Coin,
    error::{ChainClientError, MsgError},
    keys::Signer,
    tx::{
        bank::{balanced_multi_send, MsgSend},
        ChainMsg,
    },
};

use super::ChainClient;

impl ChainClient {
    /// Validates, signs and broadcasts a single message. Returns the tx hash.
    pub async fn broadcast_msg<M: Into<ChainMsg>>(
        &self,
        signer: &Signer,
        msg: M,
    ) -> Result<String, ChainClientError> {
        self.broadcast_msgs(signer, vec![msg.into()]).await
    }

    /// Validates, signs and broadcasts `msgs` as one transaction. Returns the tx hash once the
    /// node has admitted it to its mempool; use [`ChainClient::wait_for_inclusion`] to wait for
    /// a block.
    pub async fn broadcast_msgs(
        &self,
        signer: &Signer,
        msgs: Vec<ChainMsg>,
    ) -> Result<String, ChainClientError> {
        let tx = self
            .builder
            .build(self.service.as_ref(), signer, &msgs)
            .await?;
        let result = broadcast(self.service.as_ref(), &tx).await?;

        Ok(result.hash)
    }

    /// Polls with the configured attempts and interval.
    pub async fn wait_for_inclusion(&self, hash: &str) -> Result<InclusionStatus, ChainClientError> {
        self.wait_for_inclusion_with(hash, self.config.confirmation_policy())
            .await
    }

    pub async fn wait_for_inclusion_with(
        &self,
        hash: &str,
        policy: ConfirmationPolicy,
    ) -> Result<InclusionStatus, ChainClientError> {
        Ok(wait_for_inclusion(self.service.as_ref(), hash, policy).await?)
    }

    /// Sends `amount` base units of `denom` to a hex or bech32 address.
    pub async fn send(
        &self,
        signer: &Signer,
        to: &str,
        denom: &str,
        amount: u128,
    ) -> Result<String, ChainClientError> {
        let msg = MsgSend {
            from_address: signer.account_address(self.codec())?,
            to_address: self.recipient(to)?,
            amount: vec![Coin::new(amount, denom).into()],
        };

        self.broadcast_msg(signer, msg).await
    }

    /// Sends the same amount of one denom to every recipient in a single multi-send.
    pub async fn multi_send(
        &self,
        signer: &Signer,
        recipients: &[String],
        denom: &str,
        amount: u128,
    ) -> Result<String, ChainClientError> {
        let mut outputs = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            outputs.push((self.recipient(recipient)?, Coin::new(amount, denom)));
        }
        let msg = balanced_multi_send(&signer.account_address(self.codec())?, outputs)?;

        self.broadcast_msg(signer, msg).await
    }

    /// Sends `amounts[i]` of `denoms[i]` to `recipients[i]`. The input holds, per denom, the sum
    /// of every output in that denom. All three slices must have the same length.
    pub async fn multi_send_with_different_amounts(
        &self,
        signer: &Signer,
        recipients: &[String],
        denoms: &[String],
        amounts: &[u128],
    ) -> Result<String, ChainClientError> {
        if recipients.len() != denoms.len() || denoms.len() != amounts.len() {
            return Err(MsgError::LengthMismatch {
                recipients: recipients.len(),
                denoms: denoms.len(),
                amounts: amounts.len(),
            }
            .into());
        }

        let mut outputs = Vec::with_capacity(recipients.len());
        for ((recipient, denom), amount) in recipients.iter().zip(denoms).zip(amounts) {
            outputs.push((self.recipient(recipient)?, Coin::new(*amount, denom)));
        }
        let msg = balanced_multi_send(&signer.account_address(self.codec())?, outputs)?;

        self.broadcast_msg(signer, msg).await
    }

    fn recipient(&self, address: &str) -> Result<String, ChainClientError> {
        self.codec().to_account(address).map_err(|err| {
            warn!("error when convert addr: {} to cosmos address, err: {}", address, err);
            err.into()
        })
    }
}
