use std::{collections::BTreeMap, fmt};

use cosmrs::Denom;
use serde::{Deserialize, Serialize};

use crate::{cosmos_modules::base, error::CoinError};

/// Decimal places of every token on the chain
pub const DECIMALS: u32 = 18;

/// A single-denomination amount in base units.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Coin {
    pub amount: u128,
    pub denom: String,
}

impl Coin {
    pub fn new(amount: u128, denom: &str) -> Self {
        Coin {
            amount,
            denom: denom.to_string(),
        }
    }

    /// Checks the denom format and that the amount is positive.
    pub fn validate(&self) -> Result<(), CoinError> {
        validate_denom(&self.denom)?;
        if self.amount == 0 {
            return Err(CoinError::Amount(self.to_string()));
        }

        Ok(())
    }

    /// The amount scaled down by 18 decimals, e.g. `1.5` for 1.5 * 10^18 base units.
    pub fn display_amount(&self) -> String {
        format_units(self.amount, DECIMALS)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl From<Coin> for base::Coin {
    fn from(coin: Coin) -> Self {
        base::Coin {
            amount: coin.amount.to_string(),
            denom: coin.denom,
        }
    }
}

impl From<&Coin> for base::Coin {
    fn from(coin: &Coin) -> Self {
        base::Coin {
            amount: coin.amount.to_string(),
            denom: coin.denom.clone(),
        }
    }
}

impl TryFrom<base::Coin> for Coin {
    type Error = CoinError;

    fn try_from(coin: base::Coin) -> Result<Coin, Self::Error> {
        Coin::try_from(&coin)
    }
}

impl TryFrom<&base::Coin> for Coin {
    type Error = CoinError;

    fn try_from(coin: &base::Coin) -> Result<Coin, Self::Error> {
        Ok(Coin {
            amount: parse_amount(&coin.amount)?,
            denom: coin.denom.clone(),
        })
    }
}

impl TryFrom<&base::DecCoin> for Coin {
    type Error = CoinError;

    /// Rounds the decimal amount to the nearest integer, ties to even.
    fn try_from(coin: &base::DecCoin) -> Result<Coin, Self::Error> {
        Ok(Coin {
            amount: round_dec_amount(&coin.amount)?,
            denom: coin.denom.clone(),
        })
    }
}

pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    denom
        .parse::<Denom>()
        .map(|_| ())
        .map_err(|_| CoinError::Denom(denom.to_string()))
}

/// Parses an integer amount, treating the empty string as zero.
pub fn parse_amount(amount: &str) -> Result<u128, CoinError> {
    if amount.is_empty() {
        return Ok(0);
    }

    amount
        .parse::<u128>()
        .map_err(|_| CoinError::Amount(amount.to_string()))
}

/// Sums amounts per denom. The result is ordered by denom.
pub fn sum_by_denom<'a, I>(coins: I) -> Result<Vec<Coin>, CoinError>
where
    I: IntoIterator<Item = &'a Coin>,
{
    let mut totals = BTreeMap::<String, u128>::new();
    for coin in coins {
        let total = totals.entry(coin.denom.clone()).or_insert(0);
        *total = total.checked_add(coin.amount).ok_or(CoinError::Overflow)?;
    }

    Ok(totals
        .into_iter()
        .map(|(denom, amount)| Coin { amount, denom })
        .collect())
}

/// Formats base units as a decimal string with trailing zeros trimmed.
pub fn format_units(amount: u128, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let integer = amount / scale;
    let fraction = amount % scale;

    if fraction == 0 {
        return integer.to_string();
    }

    let fraction = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", integer, fraction.trim_end_matches('0'))
}

/// Parses a decimal string like `1.5` into base units. More than `decimals` fractional digits
/// is an error.
pub fn parse_units(value: &str, decimals: u32) -> Result<u128, CoinError> {
    let invalid = || CoinError::Amount(value.to_string());
    let (integer, fraction) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };

    if (integer.is_empty() && fraction.is_empty())
        || fraction.len() > decimals as usize
        || !integer.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let scale = 10u128.pow(decimals);
    let integer = if integer.is_empty() {
        0
    } else {
        integer.parse::<u128>().map_err(|_| invalid())?
    };
    let fraction = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        padded.parse::<u128>().map_err(|_| invalid())?
    };

    integer
        .checked_mul(scale)
        .and_then(|i| i.checked_add(fraction))
        .ok_or(CoinError::Overflow)
}

/// Rounds a `DecCoin` amount to an integer, ties to even.
///
/// Over gRPC the amount is the decimal's integer representation scaled by 10^18. Strings that
/// contain a decimal point are read as plain decimals.
pub fn round_dec_amount(amount: &str) -> Result<u128, CoinError> {
    let scaled = if amount.contains('.') {
        parse_units(amount, DECIMALS)?
    } else {
        parse_amount(amount)?
    };

    let scale = 10u128.pow(DECIMALS);
    let quotient = scaled / scale;
    let remainder = scaled % scale;
    let half = scale / 2;

    let rounded = if remainder > half || (remainder == half && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };

    Ok(rounded)
}
