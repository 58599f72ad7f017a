//! Client library for the Cysic chain, a Cosmos SDK network with Ethereum-style accounts.
//!
//! [`chain::client::ChainClient`] is the entry point: it queries accounts, balances, validators
//! and rewards over gRPC, and signs and broadcasts transactions with a [`keys::Signer`].
pub use cosmrs;
pub use error::ChainClientError;
pub use prost_types::Any;

pub mod account;
pub mod address;
pub mod chain;
pub mod coin;
pub mod error;
pub mod keys;
pub mod tx;

pub use address::AddressCodec;
pub use coin::Coin;
pub use keys::{Signer, SigningAlgorithm};

/// Re-export of the Cosmos SDK proto modules used by this crate
pub mod cosmos_modules {
    pub use cosmos_sdk_proto::cosmos::{
        auth::v1beta1 as auth, bank::v1beta1 as bank, base::abci::v1beta1 as abci,
        base::query::v1beta1 as query, base::v1beta1 as base, crypto::secp256k1,
        distribution::v1beta1 as distribution, staking::v1beta1 as staking,
        tx::signing::v1beta1 as signing, tx::v1beta1 as tx,
    };
}
