//! Commands that sign and broadcast a transaction. Amounts are whole tokens with up to 18
//! decimals, e.g. `1.5`.
use crate::{
    commands::{amount, client, run_async, KeyArgs},
    error::Error,
};
use abscissa_core::{Command, Runnable};
use clap::Parser;
use cysic::chain::{broadcast::InclusionStatus, client::ChainClient};

/// `send` subcommand
#[derive(Command, Debug, Parser)]
pub struct SendCmd {
    /// Hex or bech32 recipient
    pub to: String,

    pub amount: String,

    #[clap(long, default_value = "CYS")]
    pub denom: String,

    /// Wait for the transaction to be included in a block
    #[clap(long)]
    pub wait: bool,

    #[clap(flatten)]
    pub key: KeyArgs,
}

impl Runnable for SendCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            let signer = self.key.signer()?;
            let hash = client
                .send(&signer, &self.to, &self.denom, amount(&self.amount)?)
                .await?;
            report(&client, &hash, self.wait).await
        });
    }
}

/// `delegate` subcommand
#[derive(Command, Debug, Parser)]
pub struct DelegateCmd {
    /// Validator operator address
    pub validator: String,

    pub amount: String,

    /// Delegate this ve-token through the delegate module instead of staking the governance
    /// token
    #[clap(long)]
    pub ve_token: Option<String>,

    #[clap(long)]
    pub wait: bool,

    #[clap(flatten)]
    pub key: KeyArgs,
}

impl Runnable for DelegateCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            let signer = self.key.signer()?;
            let amount = amount(&self.amount)?;
            let hash = match &self.ve_token {
                Some(token) => {
                    client
                        .delegate_ve_token(&signer, &self.validator, token, amount)
                        .await?
                }
                None => {
                    client
                        .delegate_gov_token(&signer, &self.validator, amount)
                        .await?
                }
            };
            report(&client, &hash, self.wait).await
        });
    }
}

/// `undelegate` subcommand
#[derive(Command, Debug, Parser)]
pub struct UndelegateCmd {
    /// Validator operator address
    pub validator: String,

    pub amount: String,

    #[clap(long)]
    pub wait: bool,

    #[clap(flatten)]
    pub key: KeyArgs,
}

impl Runnable for UndelegateCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            let signer = self.key.signer()?;
            let hash = client
                .undelegate_gov_token(&signer, &self.validator, amount(&self.amount)?)
                .await?;
            report(&client, &hash, self.wait).await
        });
    }
}

/// `withdraw-reward` subcommand
#[derive(Command, Debug, Parser)]
pub struct WithdrawRewardCmd {
    /// Validator operator address
    pub validator: String,

    #[clap(long)]
    pub wait: bool,

    #[clap(flatten)]
    pub key: KeyArgs,
}

impl Runnable for WithdrawRewardCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            let signer = self.key.signer()?;
            let hash = client
                .withdraw_delegator_reward(&signer, &self.validator)
                .await?;
            report(&client, &hash, self.wait).await
        });
    }
}

/// `exchange-to-gov` subcommand
#[derive(Command, Debug, Parser)]
pub struct ExchangeToGovCmd {
    pub amount: String,

    #[clap(long)]
    pub wait: bool,

    #[clap(flatten)]
    pub key: KeyArgs,
}

impl Runnable for ExchangeToGovCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            let signer = self.key.signer()?;
            let hash = client
                .exchange_to_gov_token(&signer, amount(&self.amount)?)
                .await?;
            report(&client, &hash, self.wait).await
        });
    }
}

/// `exchange-to-platform` subcommand
#[derive(Command, Debug, Parser)]
pub struct ExchangeToPlatformCmd {
    pub amount: String,

    #[clap(long)]
    pub wait: bool,

    #[clap(flatten)]
    pub key: KeyArgs,
}

impl Runnable for ExchangeToPlatformCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            let signer = self.key.signer()?;
            let hash = client
                .exchange_to_platform_token(&signer, amount(&self.amount)?)
                .await?;
            report(&client, &hash, self.wait).await
        });
    }
}

/// `wait` subcommand
#[derive(Command, Debug, Parser)]
pub struct WaitCmd {
    /// Transaction hash
    pub hash: String,
}

impl Runnable for WaitCmd {
    fn run(&self) {
        run_async(async {
            let client = client()?;
            print_status(client.wait_for_inclusion(&self.hash).await?);

            Ok(())
        });
    }
}

async fn report(client: &ChainClient, hash: &str, wait: bool) -> Result<(), Error> {
    println!("{}", hash);
    if wait {
        print_status(client.wait_for_inclusion(hash).await?);
    }

    Ok(())
}

fn print_status(status: InclusionStatus) {
    match status {
        InclusionStatus::Included {
            height,
            code,
            raw_log,
        } => {
            println!("included at height {} with code {}", height, code);
            if code != 0 {
                println!("{}", raw_log);
            }
        }
        InclusionStatus::Pending => println!("not yet included"),
    }
}
