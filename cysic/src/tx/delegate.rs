//! Messages for the Cysic `delegate` module, which stakes ve-tokens on behalf of a worker.
//!
//! The worker is identified by its hex address rather than a bech32 account.
use prost::Message;

use crate::{address::AddressCodec, error::MsgError};

use super::{check_hex, check_not_empty, ModuleMsg};

#[derive(Clone, PartialEq, Message)]
pub struct MsgDelegate {
    #[prost(string, tag = "1")]
    pub worker: String,
    #[prost(string, tag = "2")]
    pub validator: String,
    #[prost(string, tag = "3")]
    pub token: String,
    #[prost(string, tag = "4")]
    pub amount: String,
}

impl ModuleMsg for MsgDelegate {
    const TYPE_URL: &'static str = "/cysicmint.delegate.v1.MsgDelegate";

    fn validate_basic(&self, _codec: &AddressCodec) -> Result<(), MsgError> {
        check_hex("worker", &self.worker)?;
        check_not_empty("validator", &self.validator)?;
        check_not_empty("token", &self.token)?;
        check_not_empty("amount", &self.amount)
    }
}
