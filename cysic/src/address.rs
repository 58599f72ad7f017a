//! Conversion between the hex (Ethereum) and bech32 (Cosmos) forms of Cysic addresses.
//!
//! Account and validator identifiers are 20 bytes. Hex addresses map onto bech32 account
//! addresses byte for byte, so the same key controls `0x...` and `cysic1...`.
use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::AddressError, keys::keccak256};

/// Bech32 prefix for account addresses
pub const ACCOUNT_PREFIX: &str = "cysic";
/// Bech32 prefix for validator operator addresses
pub const VALIDATOR_PREFIX: &str = "cysicvaloper";
/// Length of an account identifier in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Maximum address length accepted by the Cosmos SDK address format check
const MAX_ADDRESS_LENGTH: usize = 255;

/// Stateless address converter for one chain's pair of bech32 prefixes.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct AddressCodec {
    pub account_prefix: String,
    pub validator_prefix: String,
}

impl Default for AddressCodec {
    fn default() -> Self {
        AddressCodec {
            account_prefix: ACCOUNT_PREFIX.to_string(),
            validator_prefix: VALIDATOR_PREFIX.to_string(),
        }
    }
}

impl AddressCodec {
    pub fn new(account_prefix: &str, validator_prefix: &str) -> Self {
        AddressCodec {
            account_prefix: account_prefix.to_string(),
            validator_prefix: validator_prefix.to_string(),
        }
    }

    /// Returns the raw bytes behind a hex, account or validator address.
    ///
    /// The validator prefix is checked first since the account prefix is a prefix of it.
    pub fn decode(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }

        if is_hex_address(address) {
            return decode_hex_address(address);
        }

        let bytes = if address.starts_with(&self.validator_prefix) {
            decode_bech32(address, &self.validator_prefix)?
        } else if address.starts_with(&self.account_prefix) {
            decode_bech32(address, &self.account_prefix)?
        } else {
            debug!("unrecognized address format: {}", address);
            return Err(AddressError::Unrecognized(address.to_string()));
        };

        Ok(bytes)
    }

    /// Converts any supported form into both the checksummed hex and the bech32 account address.
    pub fn convert(&self, address: &str) -> Result<(String, String), AddressError> {
        let bytes = self.decode(address)?;

        Ok((
            to_checksum_address(&bytes_to_address(&bytes)),
            self.encode_account(&bytes)?,
        ))
    }

    /// Converts any supported form into a bech32 account address.
    pub fn to_account(&self, address: &str) -> Result<String, AddressError> {
        let bytes = self.decode(address)?;
        self.encode_account(&bytes)
    }

    /// Converts any supported form into an EIP-55 checksummed hex address.
    pub fn to_hex(&self, address: &str) -> Result<String, AddressError> {
        let bytes = self.decode(address)?;
        Ok(to_checksum_address(&bytes_to_address(&bytes)))
    }

    /// Converts any supported form into a bech32 validator operator address.
    pub fn to_validator(&self, address: &str) -> Result<String, AddressError> {
        let bytes = self.decode(address)?;
        self.encode_validator(&bytes)
    }

    pub fn encode_account(&self, bytes: &[u8]) -> Result<String, AddressError> {
        encode_bech32(&self.account_prefix, bytes)
    }

    pub fn encode_validator(&self, bytes: &[u8]) -> Result<String, AddressError> {
        encode_bech32(&self.validator_prefix, bytes)
    }

    /// Checks that `address` is a well-formed bech32 account address.
    pub fn validate_account(&self, address: &str) -> Result<(), AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        decode_bech32(address, &self.account_prefix).map(|_| ())
    }

    /// Checks that `address` is a well-formed bech32 validator operator address.
    pub fn validate_validator(&self, address: &str) -> Result<(), AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        decode_bech32(address, &self.validator_prefix).map(|_| ())
    }
}

/// Whether `s` is 40 hex digits with an optional `0x` prefix.
pub fn is_hex_address(s: &str) -> bool {
    let s = strip_hex_prefix(s);
    s.len() == 2 * ADDRESS_LENGTH && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Keeps the last 20 bytes of `bytes`, left-padding shorter input with zeros.
pub fn bytes_to_address(bytes: &[u8]) -> [u8; ADDRESS_LENGTH] {
    let mut address = [0u8; ADDRESS_LENGTH];
    if bytes.len() > ADDRESS_LENGTH {
        address.copy_from_slice(&bytes[bytes.len() - ADDRESS_LENGTH..]);
    } else {
        address[ADDRESS_LENGTH - bytes.len()..].copy_from_slice(bytes);
    }

    address
}

/// EIP-55 mixed-case hex encoding of a 20 byte address.
pub fn to_checksum_address(address: &[u8; ADDRESS_LENGTH]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());
    let mut checksummed = String::with_capacity(2 + lower.len());
    checksummed.push_str("0x");

    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn decode_hex_address(address: &str) -> Result<Vec<u8>, AddressError> {
    hex::decode(strip_hex_prefix(address))
        .map_err(|_| AddressError::Unrecognized(address.to_string()))
}

fn decode_bech32(address: &str, prefix: &str) -> Result<Vec<u8>, AddressError> {
    let (hrp, data, _variant) = bech32::decode(address)?;
    if hrp != prefix {
        return Err(AddressError::Prefix {
            expected: prefix.to_string(),
            found: hrp,
        });
    }

    let bytes = Vec::<u8>::from_base32(&data)?;
    if bytes.is_empty() || bytes.len() > MAX_ADDRESS_LENGTH {
        return Err(AddressError::Length(bytes.len()));
    }

    Ok(bytes)
}

fn encode_bech32(prefix: &str, bytes: &[u8]) -> Result<String, AddressError> {
    if bytes.is_empty() || bytes.len() > MAX_ADDRESS_LENGTH {
        return Err(AddressError::Length(bytes.len()));
    }

    Ok(bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)?)
}
