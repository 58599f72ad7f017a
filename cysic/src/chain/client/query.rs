//! Read-only queries. Each module file wraps the gRPC queries of one Cosmos SDK module.
use serde::{Deserialize, Serialize};

use crate::coin::Coin;

pub mod auth;
pub mod bank;
pub mod distribution;
pub mod staking;

/// Coins held with (or owed by) one validator
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ValidatorCoins {
    pub validator_address: String,
    pub coins: Vec<Coin>,
}

/// Per-validator breakdown plus the per-denom total across all validators
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct DelegatorSummary {
    pub validators: Vec<ValidatorCoins>,
    pub total: Vec<Coin>,
}
