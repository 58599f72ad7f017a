use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    address::{AddressCodec, ACCOUNT_PREFIX, VALIDATOR_PREFIX},
    chain::broadcast::ConfirmationPolicy,
    coin::validate_denom,
    error::ConfigError,
    keys::ETH_SECP256K1_PUB_KEY_TYPE_URL,
    tx::{builder::DEFAULT_GAS_LIMIT, TxConfig},
};

/// Denom of the governance token
pub const GOV_TOKEN: &str = "CGT";

/// Per-deployment client parameters. Keys are kebab-case in TOML, e.g.
///
/// ```toml
/// grpc-addr = "http://localhost:9090"
/// chain-id = "cysicmint_9001-1"
/// gas-coin = "CYS"
/// gas-price = 10
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainClientConfig {
    #[serde(rename = "grpc-addr")]
    pub grpc_address: String,
    pub chain_id: String,
    pub gas_coin: String,
    pub gas_price: u64,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    #[serde(default = "default_account_prefix")]
    pub account_prefix: String,
    #[serde(default = "default_validator_prefix")]
    pub validator_prefix: String,
    #[serde(default = "default_gov_token")]
    pub gov_token: String,
    #[serde(default = "default_pub_key_type_url")]
    pub pub_key_type_url: String,
    #[serde(default = "default_confirmation_attempts")]
    pub confirmation_attempts: u32,
    #[serde(default = "default_confirmation_interval_ms")]
    pub confirmation_interval_ms: u64,
}

impl Default for ChainClientConfig {
    fn default() -> Self {
        ChainClientConfig::new("http://localhost:9090", "cysicmint_9001-1", "CYS", 10)
    }
}

impl ChainClientConfig {
    pub fn new(grpc_address: &str, chain_id: &str, gas_coin: &str, gas_price: u64) -> Self {
        ChainClientConfig {
            grpc_address: grpc_address.to_string(),
            chain_id: chain_id.to_string(),
            gas_coin: gas_coin.to_string(),
            gas_price,
            gas_limit: default_gas_limit(),
            account_prefix: default_account_prefix(),
            validator_prefix: default_validator_prefix(),
            gov_token: default_gov_token(),
            pub_key_type_url: default_pub_key_type_url(),
            confirmation_attempts: default_confirmation_attempts(),
            confirmation_interval_ms: default_confirmation_interval_ms(),
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ChainClientConfig = toml::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grpc_address.is_empty() {
            return Err(ConfigError::Invalid("grpc-addr cannot be empty".to_string()));
        }
        if self.chain_id.is_empty() {
            return Err(ConfigError::Invalid("chain-id cannot be empty".to_string()));
        }
        validate_denom(&self.gas_coin)
            .map_err(|err| ConfigError::Invalid(format!("gas-coin: {}", err)))?;
        if self.gas_limit == 0 {
            return Err(ConfigError::Invalid("gas-limit must be positive".to_string()));
        }
        if self.confirmation_attempts == 0 {
            return Err(ConfigError::Invalid(
                "confirmation-attempts must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn address_codec(&self) -> AddressCodec {
        AddressCodec::new(&self.account_prefix, &self.validator_prefix)
    }

    pub fn tx_config(&self) -> TxConfig {
        TxConfig {
            chain_id: self.chain_id.clone(),
            gas_coin: self.gas_coin.clone(),
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            pub_key_type_url: self.pub_key_type_url.clone(),
        }
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            attempts: self.confirmation_attempts,
            interval: Duration::from_millis(self.confirmation_interval_ms),
        }
    }
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_account_prefix() -> String {
    ACCOUNT_PREFIX.to_string()
}

fn default_validator_prefix() -> String {
    VALIDATOR_PREFIX.to_string()
}

fn default_gov_token() -> String {
    GOV_TOKEN.to_string()
}

fn default_pub_key_type_url() -> String {
    ETH_SECP256K1_PUB_KEY_TYPE_URL.to_string()
}

fn default_confirmation_attempts() -> u32 {
    10
}

fn default_confirmation_interval_ms() -> u64 {
    1000
}
