//! Messages for the [Distribution module](https://github.com/cosmos/cosmos-sdk/blob/main/proto/cosmos/distribution/v1beta1/tx.proto).
use crate::{address::AddressCodec, error::MsgError};

use super::{check_account, check_validator, ModuleMsg};

pub use crate::cosmos_modules::distribution::MsgWithdrawDelegatorReward;

impl ModuleMsg for MsgWithdrawDelegatorReward {
    const TYPE_URL: &'static str = "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward";

    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
        check_account(codec, "delegator", &self.delegator_address)?;
        check_validator(codec, "validator", &self.validator_address)
    }
}
