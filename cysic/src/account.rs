use prost::Message;

use crate::{cosmos_modules::auth, error::AccountError, Any};

/// Ethermint account: a base account plus the hash of its contract code.
#[derive(Clone, PartialEq, Message)]
pub struct EthAccount {
    #[prost(message, optional, tag = "1")]
    pub base_account: Option<auth::BaseAccount>,
    #[prost(string, tag = "2")]
    pub code_hash: String,
}

/// On-chain account metadata needed to sign for an address
#[derive(Clone, Debug, PartialEq)]
pub struct AccountInfo {
    pub address: String,
    pub pub_key: Option<Any>,
    pub account_number: u64,
    pub sequence: u64,
    /// Set for Ethermint accounts
    pub code_hash: Option<String>,
}

impl From<auth::BaseAccount> for AccountInfo {
    fn from(account: auth::BaseAccount) -> Self {
        AccountInfo {
            address: account.address,
            pub_key: account.pub_key,
            account_number: account.account_number,
            sequence: account.sequence,
            code_hash: None,
        }
    }
}

impl TryFrom<EthAccount> for AccountInfo {
    type Error = AccountError;

    fn try_from(account: EthAccount) -> Result<AccountInfo, Self::Error> {
        let base_account = match account.base_account {
            Some(b) => b,
            None => return Err(AccountError::Empty("field base_account is None".into())),
        };

        Ok(AccountInfo {
            code_hash: Some(account.code_hash),
            ..base_account.into()
        })
    }
}

impl TryFrom<Any> for AccountInfo {
    type Error = AccountError;

    /// Decodes a plain `BaseAccount` by type URL and anything else as an `EthAccount`.
    fn try_from(any: Any) -> Result<AccountInfo, Self::Error> {
        if any.type_url.ends_with(".BaseAccount") {
            return Ok(auth::BaseAccount::decode(any.value.as_slice())?.into());
        }

        EthAccount::decode(any.value.as_slice())?.try_into()
    }
}
