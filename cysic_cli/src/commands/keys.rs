//! Offline key and address commands
use crate::{
    commands::{run_local, KeyArgs},
    error::Error,
    prelude::*,
};
use abscissa_core::{Command, Runnable};
use clap::Parser;
use cysic::keys::verify_personal_signature;

/// `convert` subcommand
#[derive(Command, Debug, Parser)]
pub struct ConvertCmd {
    /// Hex, account or validator address
    pub address: String,

    /// Also print the validator operator address
    #[clap(long)]
    pub validator: bool,
}

impl Runnable for ConvertCmd {
    fn run(&self) {
        run_local(self.convert());
    }
}

impl ConvertCmd {
    fn convert(&self) -> Result<(), Error> {
        let codec = APP.config().chain.address_codec();
        let (hex, bech32) = codec.convert(&self.address)?;
        println!("{}", hex);
        println!("{}", bech32);
        if self.validator {
            println!("{}", codec.to_validator(&self.address)?);
        }

        Ok(())
    }
}

/// `sign-message` subcommand
#[derive(Command, Debug, Parser)]
pub struct SignMessageCmd {
    /// Message to sign, as UTF-8 text
    pub message: String,

    #[clap(flatten)]
    pub key: KeyArgs,
}

impl Runnable for SignMessageCmd {
    fn run(&self) {
        run_local(self.sign());
    }
}

impl SignMessageCmd {
    fn sign(&self) -> Result<(), Error> {
        let signer = self.key.signer()?;
        let signature = signer.personal_sign(self.message.as_bytes())?;
        println!("0x{}", hex::encode(signature));

        Ok(())
    }
}

/// `verify-message` subcommand
#[derive(Command, Debug, Parser)]
pub struct VerifyMessageCmd {
    /// Claimed signer, hex or bech32
    pub address: String,

    /// Message that was signed, as UTF-8 text
    pub message: String,

    /// 65 byte hex signature
    pub signature: String,
}

impl Runnable for VerifyMessageCmd {
    fn run(&self) {
        run_local(self.verify());
    }
}

impl VerifyMessageCmd {
    fn verify(&self) -> Result<(), Error> {
        let signature = self.signature.trim();
        let signature = hex::decode(signature.strip_prefix("0x").unwrap_or(signature))
            .map_err(|err| Error::Args(format!("invalid signature: {}", err)))?;

        if verify_personal_signature(&self.address, self.message.as_bytes(), &signature) {
            println!("valid");
            Ok(())
        } else {
            Err(Error::Args(format!(
                "signature was not produced by {}",
                self.address
            )))
        }
    }
}
