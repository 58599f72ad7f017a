//! Messages the chain accepts and the transaction builder that signs them.
//!
//! Each message type implements [`ModuleMsg`], which pairs its protobuf type URL with the same
//! stateless checks the chain runs in `ValidateBasic`. [`ChainMsg`] collects them so a batch of
//! mixed messages can be validated and packed uniformly.
use prost::Message;

use crate::{
    address::AddressCodec,
    coin::{parse_amount, validate_denom},
    cosmos_modules::base,
    error::{AddressError, MsgError},
    Any,
};

pub mod bank;
pub mod builder;
pub mod delegate;
pub mod distribution;
pub mod govtoken;
pub mod staking;

pub use builder::{SignedTx, TxBuilder, TxConfig, UnsignedTx};

/// Represents an arbitrary chain module Msg
pub trait ModuleMsg: Message + Sized {
    const TYPE_URL: &'static str;

    /// Stateless sanity checks, run before any network call.
    fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError>;

    fn to_any(&self) -> Any {
        Any {
            type_url: Self::TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        }
    }
}

macro_rules! chain_msgs {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Every message this crate knows how to validate and sign
        #[derive(Clone, Debug, PartialEq)]
        pub enum ChainMsg {
            $($variant($ty)),*
        }

        impl ChainMsg {
            pub fn type_url(&self) -> &'static str {
                match self {
                    $(ChainMsg::$variant(_) => <$ty as ModuleMsg>::TYPE_URL),*
                }
            }

            pub fn validate_basic(&self, codec: &AddressCodec) -> Result<(), MsgError> {
                match self {
                    $(ChainMsg::$variant(msg) => msg.validate_basic(codec)),*
                }
            }

            pub fn to_any(&self) -> Any {
                match self {
                    $(ChainMsg::$variant(msg) => msg.to_any()),*
                }
            }
        }

        $(
            impl From<$ty> for ChainMsg {
                fn from(msg: $ty) -> Self {
                    ChainMsg::$variant(msg)
                }
            }
        )*
    };
}

chain_msgs! {
    Send(bank::MsgSend),
    MultiSend(bank::MsgMultiSend),
    Delegate(staking::MsgDelegate),
    Undelegate(staking::MsgUndelegate),
    WithdrawDelegatorReward(distribution::MsgWithdrawDelegatorReward),
    DelegateVeToken(delegate::MsgDelegate),
    Mint(govtoken::MsgMint),
    Burn(govtoken::MsgBurn),
    ChangeOwner(govtoken::MsgChangeOwner),
    ExchangeToGovToken(govtoken::MsgExchangeToGovToken),
    ExchangeToPlatformToken(govtoken::MsgExchangeToPlatformToken),
    SetExchangeRate(govtoken::MsgSetExchangeRate),
    StakeAsValidator(govtoken::MsgStakeAsValidator),
    DelegateToValidator(govtoken::MsgDelegateToValidator),
}

pub(crate) fn check_account(
    codec: &AddressCodec,
    field: &'static str,
    address: &str,
) -> Result<(), MsgError> {
    codec
        .validate_account(address)
        .map_err(|source| MsgError::Address { field, source })
}

pub(crate) fn check_validator(
    codec: &AddressCodec,
    field: &'static str,
    address: &str,
) -> Result<(), MsgError> {
    codec
        .validate_validator(address)
        .map_err(|source| MsgError::Address { field, source })
}

pub(crate) fn check_hex(field: &'static str, address: &str) -> Result<(), MsgError> {
    if crate::address::is_hex_address(address) {
        Ok(())
    } else {
        Err(MsgError::Address {
            field,
            source: AddressError::Unrecognized(address.to_string()),
        })
    }
}

pub(crate) fn check_not_empty(field: &'static str, value: &str) -> Result<(), MsgError> {
    if value.is_empty() {
        Err(MsgError::Empty(field))
    } else {
        Ok(())
    }
}

/// An integer amount string that must be strictly positive.
pub(crate) fn check_positive_amount(amount: &str) -> Result<(), MsgError> {
    match parse_amount(amount) {
        Ok(a) if a > 0 => Ok(()),
        _ => Err(MsgError::Coins(format!(
            "amount '{}' cannot be zero or negative",
            amount
        ))),
    }
}

pub(crate) fn check_coin(coin: &base::Coin) -> Result<(), MsgError> {
    validate_denom(&coin.denom).map_err(|err| MsgError::Coins(err.to_string()))?;
    check_positive_amount(&coin.amount)
}

/// A non-empty coin list sorted by denom without duplicates, all amounts positive.
pub(crate) fn check_coins(coins: &[base::Coin]) -> Result<(), MsgError> {
    if coins.is_empty() {
        return Err(MsgError::Coins("no coins".to_string()));
    }

    for coin in coins {
        check_coin(coin)?;
    }

    if coins.windows(2).any(|pair| pair[0].denom >= pair[1].denom) {
        return Err(MsgError::Coins("denoms must be sorted and unique".to_string()));
    }

    Ok(())
}
