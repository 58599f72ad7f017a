//! Messages for the [Staking module](https://github.com/cosmos/cosmos-sdk/blob/main/proto/cosmos/staking/v1beta1/tx.proto).
use crate::{address::AddressCodec, error::MsgError};

use super::{check_account, check_coin, check_validator, ModuleMsg};

pub use crate::cosmos_modules::staking::{MsgDelegate, MsgUndelegate};

impl ModuleMsg for MsgDelegate {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgDelegate";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "delegator", &self.delegator_address)?;
        check_validator(codec, "validator", &self.validator_address)?;
        match &self.amount {
            Some(coin) => check_coin(coin),
            None => Err(MsgError::Empty("amount")),
        }
    }
}

impl ModuleMsg for MsgUndelegate {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgUndelegate";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "delegator", &self.delegator_address)?;
        check_validator(codec, "validator", &self.validator_address)?;
        match &self.amount {
            Some(coin) => check_coin(coin),
            None => Err(MsgError::Empty("amount")),
        }
    }
}
