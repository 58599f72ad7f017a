//! Errors raised by CLI commands before or around library calls
use cysic::error::{AddressError, ChainClientError, CoinError, KeyError};
use thiserror::Error;

/// CLI error
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the client library
    #[error("{0}")]
    Client(#[from] ChainClientError),
    /// Invalid address argument
    #[error("{0}")]
    Address(#[from] AddressError),
    /// Invalid key material
    #[error("{0}")]
    Key(#[from] KeyError),
    /// Malformed amount argument
    #[error("{0}")]
    Amount(#[from] CoinError),
    /// Missing or conflicting arguments
    #[error("{0}")]
    Args(String),
    /// Error serializing output
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
