//! Messages for the Cysic `govtoken` module.
//!
//! The governance token (CGT) is minted by exchanging the platform token (CYS) and can be
//! exchanged back. Amounts are integer strings.
use prost::Message;

use crate::{address::AddressCodec, error::MsgError};

use super::{check_account, check_not_empty, check_positive_amount, check_validator, ModuleMsg};

#[derive(Clone, PartialEq, Message)]
pub struct MsgMint {
    #[prost(string, tag = "1")]
    pub owner: String,
    #[prost(string, tag = "2")]
    pub recipient: String,
    #[prost(string, tag = "3")]
    pub amount: String,
}

impl ModuleMsg for MsgMint {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgMint";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "owner", &self.owner)?;
        check_account(codec, "recipient", &self.recipient)?;
        check_positive_amount(&self.amount)
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgBurn {
    #[prost(string, tag = "1")]
    pub burner: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

impl ModuleMsg for MsgBurn {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgBurn";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "burner", &self.burner)?;
        check_positive_amount(&self.amount)
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgChangeOwner {
    #[prost(string, tag = "1")]
    pub old_owner: String,
    #[prost(string, tag = "2")]
    pub new_owner: String,
}

impl ModuleMsg for MsgChangeOwner {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgChangeOwner";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "old owner", &self.old_owner)?;
        check_account(codec, "new owner", &self.new_owner)
    }
}

/// Exchanges platform tokens for governance tokens.
#[derive(Clone, PartialEq, Message)]
pub struct MsgExchangeToGovToken {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

impl ModuleMsg for MsgExchangeToGovToken {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgExchangeToGovToken";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "sender", &self.sender)?;
        check_positive_amount(&self.amount)
    }
}

/// Exchanges governance tokens back into platform tokens.
#[derive(Clone, PartialEq, Message)]
pub struct MsgExchangeToPlatformToken {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

impl ModuleMsg for MsgExchangeToPlatformToken {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgExchangeToPlatformToken";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "sender", &self.sender)?;
        check_positive_amount(&self.amount)
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgSetExchangeRate {
    #[prost(string, tag = "1")]
    pub owner: String,
    #[prost(uint64, tag = "2")]
    pub rate: u64,
}

impl ModuleMsg for MsgSetExchangeRate {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgSetExchangeRate";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "owner", &self.owner)?;
        if self.rate == 0 {
            return Err(MsgError::InvalidRate);
        }

        Ok(())
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgStakeAsValidator {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub amount: String,
    #[prost(string, tag = "3")]
    pub validator_name: String,
    #[prost(string, tag = "4")]
    pub validator_description: String,
    #[prost(string, tag = "5")]
    pub commission_rate: String,
    #[prost(string, tag = "6")]
    pub max_commission_rate: String,
    #[prost(string, tag = "7")]
    pub max_change_commission_rate: String,
    #[prost(string, tag = "8")]
    pub min_self_delegation: String,
    #[prost(string, tag = "9")]
    pub validator_pubkey: String,
}

impl ModuleMsg for MsgStakeAsValidator {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgStakeAsValidator";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "sender", &self.sender)?;
        check_positive_amount(&self.amount)?;
        check_not_empty("validator name", &self.validator_name)?;
        check_not_empty("validator description", &self.validator_description)?;
        check_not_empty("commission rate", &self.commission_rate)?;
        check_not_empty("max commission rate", &self.max_commission_rate)?;
        check_not_empty("max change commission rate", &self.max_change_commission_rate)?;
        check_positive_amount(&self.min_self_delegation)?;
        check_not_empty("validator pubkey", &self.validator_pubkey)
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgDelegateToValidator {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub validator_address: String,
    #[prost(string, tag = "3")]
    pub amount: String,
}

impl ModuleMsg for MsgDelegateToValidator {
    const TYPE_URL: &'static str = "/cysicmint.govtoken.v1.MsgDelegateToValidator";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "sender", &self.sender)?;
        check_positive_amount(&self.amount)?;
        check_validator(codec, "validator", &self.validator_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Signer;
    use assay::assay;

    fn sender() -> String {
        Signer::from_hex_key("0x0000000000000000000000000000000000000000000000000000000000000002")
            .unwrap()
            .cosmos_address()
            .unwrap()
    }

    #[assay]
    fn exchange_amount_must_be_positive() {
        let codec = AddressCodec::default();
        let mut msg = MsgExchangeToGovToken {
            sender: sender(),
            amount: "1000000000000000000".to_string(),
        };
        msg.validate_basic(&codec).unwrap();

        for bad in ["0", "-1", "", "1.5"] {
            msg.amount = bad.to_string();
            assert!(matches!(msg.validate_basic(&codec), Err(MsgError::Coins(_))));
        }

        let back = MsgExchangeToPlatformToken {
            sender: "not an address".to_string(),
            amount: "1".to_string(),
        };
        assert!(matches!(
            back.validate_basic(&codec),
            Err(MsgError::Address { field: "sender", .. })
        ));
    }

    #[assay]
    fn exchange_rate_must_be_set() {
        let codec = AddressCodec::default();
        let msg = MsgSetExchangeRate {
            owner: sender(),
            rate: 0,
        };

        assert!(matches!(msg.validate_basic(&codec), Err(MsgError::InvalidRate)));
    }

    #[assay]
    fn stake_as_validator_checks_every_field() {
        let codec = AddressCodec::default();
        let mut msg = MsgStakeAsValidator {
            sender: sender(),
            amount: "10".to_string(),
            validator_name: "node-1".to_string(),
            validator_description: "a validator".to_string(),
            commission_rate: "0.1".to_string(),
            max_commission_rate: "0.2".to_string(),
            max_change_commission_rate: "0.01".to_string(),
            min_self_delegation: "1".to_string(),
            validator_pubkey: "pubkey".to_string(),
        };
        msg.validate_basic(&codec).unwrap();

        msg.validator_description.clear();
        assert!(matches!(
            msg.validate_basic(&codec),
            Err(MsgError::Empty("validator description"))
        ));
    }
}
