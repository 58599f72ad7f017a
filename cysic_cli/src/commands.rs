//! CysicCli Subcommands
//!
//! Query commands only need an endpoint. Transaction commands also need a key, given with
//! `--private-key` or `--mnemonic` (or the `CYSIC_PRIVATE_KEY` / `CYSIC_MNEMONIC` environment
//! variables).

mod keys;
mod query;
mod tx;

use crate::{config::CysicCliConfig, error::Error, prelude::*};
use abscissa_core::{Command, Configurable, FrameworkError, Runnable};
use clap::{Args, Parser};
use cysic::{
    chain::client::ChainClient,
    coin::{parse_units, DECIMALS},
    keys::DEFAULT_HD_PATH,
    Signer,
};
use std::{fmt, future::Future, path::PathBuf, process};

/// CysicCli Configuration Filename
pub const CONFIG_FILE: &str = "cysic.toml";

/// CysicCli Subcommands
/// Subcommands need to be listed in an enum.
#[derive(Command, Debug, Parser, Runnable)]
pub enum CysicCliCmd {
    /// Convert an address between hex and bech32
    Convert(keys::ConvertCmd),
    /// Sign a message with the Ethereum personal-message scheme
    SignMessage(keys::SignMessageCmd),
    /// Verify a personal-message signature against an address
    VerifyMessage(keys::VerifyMessageCmd),
    /// Show an on-chain account
    Account(query::AccountCmd),
    /// Show the balance of one denom, or all balances
    Balance(query::BalanceCmd),
    /// List validators
    Validators(query::ValidatorsCmd),
    /// Show delegations grouped by validator
    Delegations(query::DelegationsCmd),
    /// Show pending rewards grouped by validator
    Rewards(query::RewardsCmd),
    /// Send tokens
    Send(tx::SendCmd),
    /// Delegate governance tokens to a validator
    Delegate(tx::DelegateCmd),
    /// Undelegate governance tokens from a validator
    Undelegate(tx::UndelegateCmd),
    /// Withdraw rewards from a validator
    WithdrawReward(tx::WithdrawRewardCmd),
    /// Exchange platform tokens for governance tokens
    ExchangeToGov(tx::ExchangeToGovCmd),
    /// Exchange governance tokens for platform tokens
    ExchangeToPlatform(tx::ExchangeToPlatformCmd),
    /// Wait for a transaction to be included in a block
    Wait(tx::WaitCmd),
}

/// Entry point for the application. It needs to be a struct to allow using subcommands!
#[derive(Command, Debug, Parser)]
#[clap(author, about, version)]
pub struct EntryPoint {
    #[clap(subcommand)]
    cmd: CysicCliCmd,

    /// Enable verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Use the specified config file
    #[clap(short, long)]
    pub config: Option<String>,

    /// gRPC endpoint of the node
    #[clap(long, global = true)]
    pub grpc_addr: Option<String>,

    /// Chain ID
    #[clap(long, global = true)]
    pub chain_id: Option<String>,

    /// Gas price in base units of the gas coin
    #[clap(long, global = true)]
    pub gas_price: Option<u64>,

    /// Gas limit
    #[clap(long, global = true)]
    pub gas_limit: Option<u64>,
}

impl Runnable for EntryPoint {
    fn run(&self) {
        self.cmd.run()
    }
}

/// This trait allows you to define how application configuration is loaded.
impl Configurable<CysicCliConfig> for EntryPoint {
    /// Location of the configuration file. A missing default file is ignored.
    fn config_path(&self) -> Option<PathBuf> {
        let filename = self
            .config
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| CONFIG_FILE.into());

        if filename.exists() {
            Some(filename)
        } else {
            None
        }
    }

    /// Apply the global flags on top of the file.
    fn process_config(&self, mut config: CysicCliConfig) -> Result<CysicCliConfig, FrameworkError> {
        if let Some(grpc_addr) = &self.grpc_addr {
            config.chain.grpc_address = grpc_addr.clone();
        }
        if let Some(chain_id) = &self.chain_id {
            config.chain.chain_id = chain_id.clone();
        }
        if let Some(gas_price) = self.gas_price {
            config.chain.gas_price = gas_price;
        }
        if let Some(gas_limit) = self.gas_limit {
            config.chain.gas_limit = gas_limit;
        }

        Ok(config)
    }
}

/// Key selection shared by every signing command
#[derive(Args)]
pub struct KeyArgs {
    /// Hex encoded private key
    #[clap(long, env = "CYSIC_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// BIP-39 mnemonic
    #[clap(long, env = "CYSIC_MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Mnemonic passphrase
    #[clap(long, default_value = "")]
    pub passphrase: String,

    /// HD derivation path
    #[clap(long, default_value = DEFAULT_HD_PATH)]
    pub hd_path: String,

    /// eth_secp256k1 or secp256k1
    #[clap(long, default_value = "eth_secp256k1")]
    pub algorithm: String,

    /// Sequence override, used when ahead of the on-chain sequence
    #[clap(long)]
    pub nonce: Option<u64>,
}

impl fmt::Debug for KeyArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyArgs")
            .field("hd_path", &self.hd_path)
            .field("algorithm", &self.algorithm)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}

impl KeyArgs {
    /// Builds the signer, applying the nonce override if given.
    pub fn signer(&self) -> Result<Signer, Error> {
        let mut signer = match (&self.private_key, &self.mnemonic) {
            (Some(key), None) => {
                let key = key.trim();
                let bytes = hex::decode(key.strip_prefix("0x").unwrap_or(key))
                    .map_err(|err| Error::Args(format!("invalid private key: {}", err)))?;
                Signer::from_raw_key_with_algorithm(&bytes, self.algorithm.parse()?)?
            }
            (None, Some(phrase)) => {
                Signer::from_mnemonic(phrase, &self.passphrase, &self.hd_path, &self.algorithm)?
            }
            (Some(_), Some(_)) => {
                return Err(Error::Args(
                    "pass either --private-key or --mnemonic, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(Error::Args(
                    "a key is required: pass --private-key or --mnemonic".to_string(),
                ))
            }
        };
        signer.set_nonce(self.nonce);

        Ok(signer)
    }
}

/// Builds a client from the loaded config.
pub(crate) fn client() -> Result<ChainClient, Error> {
    Ok(ChainClient::new(APP.config().chain.clone())?)
}

/// Parses a token amount like `1.5` into base units.
pub(crate) fn amount(value: &str) -> Result<u128, Error> {
    Ok(parse_units(value, DECIMALS)?)
}

/// Runs `future` on the application's tokio runtime and exits non-zero on error.
pub(crate) fn run_async<F>(future: F)
where
    F: Future<Output = Result<(), Error>>,
{
    abscissa_tokio::run(&APP, future)
        .unwrap_or_else(|e| {
            status_err!("executor exited with error: {}", e);
            process::exit(1);
        })
        .unwrap_or_else(|e| {
            status_err!("{}", e);
            process::exit(1);
        });
}

/// Runs a command that needs no network access.
pub(crate) fn run_local(result: Result<(), Error>) {
    if let Err(e) = result {
        status_err!("{}", e);
        process::exit(1);
    }
}
