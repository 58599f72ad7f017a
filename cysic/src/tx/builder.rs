//! Turns a signer and a batch of messages into one signed, wire-ready transaction.
use prost::Message;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{
    address::AddressCodec,
    chain::service::ChainService,
    coin::Coin,
    cosmos_modules::{
        signing::SignMode,
        tx::{mode_info, AuthInfo, Fee, ModeInfo, SignDoc, SignerInfo, TxBody, TxRaw},
    },
    error::TxError,
    keys::{Signer, ETH_SECP256K1_PUB_KEY_TYPE_URL},
};

use super::ChainMsg;

/// Gas limit used when none is configured
pub const DEFAULT_GAS_LIMIT: u64 = 15_000_000;

/// Chain parameters every transaction is built with
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct TxConfig {
    pub chain_id: String,
    pub gas_coin: String,
    /// Price per unit of gas, in base units of the gas coin
    pub gas_price: u64,
    pub gas_limit: u64,
    /// Type URL of `eth_secp256k1` public keys
    pub pub_key_type_url: String,
}

impl TxConfig {
    pub fn new(chain_id: &str, gas_coin: &str, gas_price: u64) -> Self {
        TxConfig {
            chain_id: chain_id.to_string(),
            gas_coin: gas_coin.to_string(),
            gas_price,
            gas_limit: DEFAULT_GAS_LIMIT,
            pub_key_type_url: ETH_SECP256K1_PUB_KEY_TYPE_URL.to_string(),
        }
    }
}

/// The sequence to sign with: the signer's override when it is ahead of the chain.
pub fn effective_sequence(on_chain: u64, nonce: Option<u64>) -> u64 {
    match nonce {
        Some(nonce) if nonce > on_chain => nonce,
        _ => on_chain,
    }
}

/// Uppercase hex SHA-256 of the encoded transaction, as reported by the node.
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}

#[derive(Clone, Debug)]
pub struct TxBuilder {
    config: TxConfig,
    codec: AddressCodec,
}

impl TxBuilder {
    pub fn new(config: TxConfig, codec: AddressCodec) -> Self {
        TxBuilder { config, codec }
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    /// `gas_price * gas_limit` of the gas coin. Both factors are integers so no rounding occurs.
    pub fn fee(&self) -> Coin {
        Coin {
            amount: self.config.gas_price as u128 * self.config.gas_limit as u128,
            denom: self.config.gas_coin.clone(),
        }
    }

    /// Runs every message's stateless checks, stopping at the first failure.
    pub fn validate(&self, msgs: &[ChainMsg]) -> Result<(), TxError> {
        if msgs.is_empty() {
            return Err(TxError::EmptyTx);
        }

        for (index, msg) in msgs.iter().enumerate() {
            if let Err(source) = msg.validate_basic(&self.codec) {
                warn!("{} at index {} failed validation: {}", msg.type_url(), index, source);
                return Err(TxError::Validation { index, source });
            }
        }

        Ok(())
    }

    /// Assembles the body and auth info for `msgs` signed by `signer` at the given account
    /// number and sequence. No network access.
    pub fn unsigned(
        &self,
        signer: &Signer,
        msgs: &[ChainMsg],
        account_number: u64,
        sequence: u64,
    ) -> Result<UnsignedTx, TxError> {
        self.validate(msgs)?;
        let fee_payer = signer.account_address(&self.codec)?;

        // Build tx body.
        let body = TxBody {
            messages: msgs.iter().map(ChainMsg::to_any).collect(),
            ..Default::default()
        };

        // Create signer info.
        let signer_info = SignerInfo {
            public_key: Some(signer.public_key_any(&self.config.pub_key_type_url)?),
            mode_info: Some(ModeInfo {
                sum: Some(mode_info::Sum::Single(mode_info::Single {
                    mode: SignMode::Direct.into(),
                })),
            }),
            sequence,
        };

        // Compute auth info from signer info by associating a fee.
        let auth_info = AuthInfo {
            signer_infos: vec![signer_info],
            fee: Some(Fee {
                amount: vec![self.fee().into()],
                gas_limit: self.config.gas_limit,
                payer: fee_payer,
                ..Default::default()
            }),
            ..Default::default()
        };

        Ok(UnsignedTx {
            body_bytes: body.encode_to_vec(),
            auth_info_bytes: auth_info.encode_to_vec(),
            chain_id: self.config.chain_id.clone(),
            account_number,
            sequence,
        })
    }

    /// Validates `msgs`, looks up the signer's account and signs.
    ///
    /// Validation happens before the account lookup, so an invalid batch never reaches the
    /// network.
    pub async fn build(
        &self,
        service: &dyn ChainService,
        signer: &Signer,
        msgs: &[ChainMsg],
    ) -> Result<SignedTx, TxError> {
        self.validate(msgs)?;

        let address = signer.account_address(&self.codec)?;
        let account = service.query_account(&address).await.map_err(|err| {
            warn!("error when get account info on chain, addr: {}, err: {}", address, err);
            TxError::AccountLookup(err)
        })?;
        let sequence = effective_sequence(account.sequence, signer.nonce());
        debug!(
            "signing {} msg(s) for {} with account number {} and sequence {} (on chain {})",
            msgs.len(),
            address,
            account.account_number,
            sequence,
            account.sequence
        );

        self.unsigned(signer, msgs, account.account_number, sequence)?
            .sign(signer)
    }
}

/// Body and auth info awaiting a signature
#[derive(Clone, Debug, PartialEq)]
pub struct UnsignedTx {
    body_bytes: Vec<u8>,
    auth_info_bytes: Vec<u8>,
    chain_id: String,
    account_number: u64,
    sequence: u64,
}

impl UnsignedTx {
    pub fn sign_doc(&self) -> SignDoc {
        SignDoc {
            body_bytes: self.body_bytes.clone(),
            auth_info_bytes: self.auth_info_bytes.clone(),
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
        }
    }

    /// Canonical `SIGN_MODE_DIRECT` bytes
    pub fn sign_bytes(&self) -> Vec<u8> {
        self.sign_doc().encode_to_vec()
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn account_number(&self) -> u64 {
        self.account_number
    }

    pub fn sign(self, signer: &Signer) -> Result<SignedTx, TxError> {
        let signature = signer.sign(&self.sign_bytes())?;
        Ok(self.with_signature(signature))
    }

    /// Attaches a signature produced elsewhere over [`UnsignedTx::sign_bytes`].
    pub fn with_signature(self, signature: Vec<u8>) -> SignedTx {
        SignedTx {
            raw: TxRaw {
                body_bytes: self.body_bytes,
                auth_info_bytes: self.auth_info_bytes,
                signatures: vec![signature],
            },
            sequence: self.sequence,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignedTx {
    raw: TxRaw,
    sequence: u64,
}

impl SignedTx {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.raw.encode_to_vec()
    }

    pub fn hash(&self) -> String {
        tx_hash(&self.to_bytes())
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn raw(&self) -> &TxRaw {
        &self.raw
    }

    pub fn body(&self) -> Result<TxBody, prost::DecodeError> {
        TxBody::decode(self.raw.body_bytes.as_slice())
    }

    pub fn auth_info(&self) -> Result<AuthInfo, prost::DecodeError> {
        AuthInfo::decode(self.raw.auth_info_bytes.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        keys::recover_personal_signer,
        tx::bank::MsgSend,
    };
    use assay::assay;

    fn signer() -> Signer {
        let mut key = [0u8; 32];
        key[31] = 1;
        Signer::from_raw_key(&key).unwrap()
    }

    fn send(signer: &Signer) -> ChainMsg {
        MsgSend {
            from_address: signer.cosmos_address().unwrap(),
            to_address: signer.cosmos_address().unwrap(),
            amount: vec![Coin::new(5, "CYS").into()],
        }
        .into()
    }

    fn builder() -> TxBuilder {
        let mut config = TxConfig::new("cysicmint_9001-1", "CYS", 10);
        config.gas_limit = 30_000_000;
        TxBuilder::new(config, AddressCodec::default())
    }

    #[assay]
    fn fee_is_gas_price_times_limit() {
        assert_eq!(builder().fee(), Coin::new(300_000_000, "CYS"));
        assert_eq!(
            TxBuilder::new(TxConfig::new("c", "CYS", 1), AddressCodec::default())
                .fee()
                .amount,
            15_000_000
        );
    }

    #[assay]
    fn effective_sequence_prefers_larger_override() {
        assert_eq!(effective_sequence(4, None), 4);
        assert_eq!(effective_sequence(4, Some(9)), 9);
        assert_eq!(effective_sequence(4, Some(4)), 4);
        assert_eq!(effective_sequence(4, Some(2)), 4);
    }

    #[assay]
    fn unsigned_tx_carries_fee_payer_and_single_direct_signer() {
        let signer = signer();
        let tx = builder()
            .unsigned(&signer, &[send(&signer)], 3, 11)
            .unwrap()
            .sign(&signer)
            .unwrap();

        let auth_info = tx.auth_info().unwrap();
        let fee = auth_info.fee.unwrap();
        assert_eq!(fee.gas_limit, 30_000_000);
        assert_eq!(fee.payer, signer.cosmos_address().unwrap());
        assert_eq!(fee.amount[0].amount, "300000000");
        assert_eq!(fee.amount[0].denom, "CYS");

        assert_eq!(auth_info.signer_infos.len(), 1);
        let signer_info = &auth_info.signer_infos[0];
        assert_eq!(signer_info.sequence, 11);
        assert_eq!(
            signer_info.public_key.as_ref().unwrap().type_url,
            ETH_SECP256K1_PUB_KEY_TYPE_URL
        );
        match signer_info.mode_info.as_ref().unwrap().sum.as_ref().unwrap() {
            mode_info::Sum::Single(single) => assert_eq!(single.mode, SignMode::Direct as i32),
            other => panic!("unexpected mode info {:?}", other),
        }

        assert_eq!(tx.raw().signatures.len(), 1);
        assert_eq!(tx.raw().signatures[0].len(), 65);
        assert_eq!(tx.body().unwrap().messages[0].type_url, "/cosmos.bank.v1beta1.MsgSend");
        assert_eq!(tx.hash().len(), 64);
        assert_eq!(tx.hash(), tx.hash().to_uppercase());
    }

    #[assay]
    fn signature_covers_sign_doc() {
        let signer = signer();
        let unsigned = builder().unsigned(&signer, &[send(&signer)], 3, 0).unwrap();
        let sign_bytes = unsigned.sign_bytes();
        let tx = unsigned.sign(&signer).unwrap();

        // eth_secp256k1 signs keccak256(sign bytes); recover with the same digest
        let digest = crate::keys::keccak256(&sign_bytes);
        let signature = &tx.raw().signatures[0];
        let recovered = {
            use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
            let key = VerifyingKey::recover_from_prehash(
                &digest,
                &Signature::from_slice(&signature[..64]).unwrap(),
                RecoveryId::from_byte(signature[64]).unwrap(),
            )
            .unwrap();
            k256::PublicKey::from(&key)
        };
        assert_eq!(
            k256::PublicKey::from_sec1_bytes(&signer.public_key_bytes()).unwrap(),
            recovered
        );

        // personal messages use a different digest
        assert_ne!(
            recover_personal_signer(&sign_bytes, signature).ok(),
            Some(*signer.address())
        );
    }

    #[assay]
    fn empty_and_invalid_batches_are_rejected() {
        let signer = signer();
        assert!(matches!(
            builder().unsigned(&signer, &[], 0, 0),
            Err(TxError::EmptyTx)
        ));

        let bad: ChainMsg = MsgSend {
            from_address: signer.cosmos_address().unwrap(),
            to_address: "nope".to_string(),
            amount: vec![Coin::new(5, "CYS").into()],
        }
        .into();
        assert!(matches!(
            builder().unsigned(&signer, &[send(&signer), bad], 0, 0),
            Err(TxError::Validation { index: 1, .. })
        ));
    }
}
