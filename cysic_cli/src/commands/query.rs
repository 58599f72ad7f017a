//! Read-only chain queries
use crate::{
    commands::{client, run_async},
    error::Error,
};
use abscissa_core::{Command, Runnable};
use clap::Parser;
use cysic::coin::{format_units, DECIMALS};

/// `account` subcommand
#[derive(Command, Debug, Parser)]
pub struct AccountCmd {
    /// Hex or bech32 address
    pub address: String,
}

impl Runnable for AccountCmd {
    fn run(&self) {
        run_async(async {
            let account = client()?.get_account_by_address(&self.address).await?;
            println!("address: {}", account.address);
            println!("account number: {}", account.account_number);
            println!("sequence: {}", account.sequence);
            if let Some(code_hash) = account.code_hash {
                println!("code hash: {}", code_hash);
            }

            Ok(())
        });
    }
}

/// `balance` subcommand
#[derive(Command, Debug, Parser)]
pub struct BalanceCmd {
    /// Hex or bech32 address
    pub address: String,

    /// Only show this denom
    #[clap(long)]
    pub denom: Option<String>,
}

impl Runnable for BalanceCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            match &self.denom {
                Some(denom) => {
                    let balance = client.get_balance(&self.address, denom).await?;
                    println!("{} {}", balance, denom);
                }
                None => {
                    for coin in client.get_balance_list(&self.address).await? {
                        println!("{} {}", format_units(coin.amount, DECIMALS), coin.denom);
                    }
                }
            }

            Ok(())
        });
    }
}

/// `validators` subcommand
#[derive(Command, Debug, Parser)]
pub struct ValidatorsCmd {
    /// Show a single validator by operator address
    #[clap(long)]
    pub address: Option<String>,

    #[clap(long, default_value = "0")]
    pub offset: u64,

    #[clap(long, default_value = "100")]
    pub limit: u64,
}

impl Runnable for ValidatorsCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            if let Some(address) = &self.address {
                match client.get_validator(address).await? {
                    Some(validator) => println!(
                        "{}\t{}\t{}\tjailed={}",
                        validator.operator_address,
                        validator.description.map(|d| d.moniker).unwrap_or_default(),
                        validator.tokens,
                        validator.jailed
                    ),
                    None => return Err(Error::Args(format!("validator {} not found", address))),
                }

                return Ok(());
            }

            let (validators, total) = client.get_validator_list(self.offset, self.limit).await?;
            for validator in validators {
                println!(
                    "{}\t{}\t{}\tjailed={}",
                    validator.operator_address,
                    validator.description.map(|d| d.moniker).unwrap_or_default(),
                    validator.tokens,
                    validator.jailed
                );
            }
            println!("total: {}", total);

            Ok(())
        });
    }
}

/// `delegations` subcommand
#[derive(Command, Debug, Parser)]
pub struct DelegationsCmd {
    /// Hex or bech32 delegator address
    pub address: String,
}

impl Runnable for DelegationsCmd {
    fn run(&self) {
        run_async(async {
            let summary = client()?.query_delegator_delegations(&self.address).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            Ok(())
        });
    }
}

/// `rewards` subcommand
#[derive(Command, Debug, Parser)]
pub struct RewardsCmd {
    /// Hex or bech32 delegator address
    pub address: String,
}

impl Runnable for RewardsCmd {
    fn run(&self) {
        run_async(async {
            let summary = client()?.query_delegation_rewards(&self.address).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            Ok(())
        });
    }
}
