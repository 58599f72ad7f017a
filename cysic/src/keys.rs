//! In-memory signing keys.
//!
//! Cysic accounts use Ethermint-style `eth_secp256k1` keys: the address is the last 20 bytes of
//! the Keccak-256 hash of the uncompressed public key, and signatures are 65 byte recoverable
//! `r || s || v`. Plain Cosmos `secp256k1` keys are supported as well.
use std::{fmt, str::FromStr};

use bip32::{DerivationPath, Mnemonic, XPrv};
use k256::{
    ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use prost::Message;
use tiny_keccak::{Hasher, Keccak};
use tracing::debug;

use crate::{
    address::{bytes_to_address, to_checksum_address, AddressCodec, ADDRESS_LENGTH},
    cosmos_modules::secp256k1,
    error::{AddressError, KeyError},
    Any,
};

/// Size of a raw secp256k1 private key
pub const PRIVATE_KEY_LENGTH: usize = 32;
/// Public key type URL of Ethermint-style keys on the Cysic chain
pub const ETH_SECP256K1_PUB_KEY_TYPE_URL: &str = "/cysicmint.crypto.v1.ethsecp256k1.PubKey";
/// HD path used by Ethereum wallets (coin type 60)
pub const DEFAULT_HD_PATH: &str = "m/44'/60'/0'/0/0";

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Signing algorithms a [`Signer`] can be created with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// Keccak-256 digests, recoverable signatures, Ethereum addresses
    #[default]
    EthSecp256k1,
    /// SHA-256 digests, compact signatures, RIPEMD-160 addresses
    Secp256k1,
}

impl SigningAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::EthSecp256k1 => "eth_secp256k1",
            SigningAlgorithm::Secp256k1 => "secp256k1",
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eth_secp256k1" => Ok(SigningAlgorithm::EthSecp256k1),
            "secp256k1" => Ok(SigningAlgorithm::Secp256k1),
            other => Err(KeyError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A private key together with the address it controls.
///
/// The optional nonce overrides the on-chain sequence when it is strictly greater, which lets a
/// caller pipeline several transactions before the first one is included.
#[derive(Clone)]
pub struct Signer {
    algorithm: SigningAlgorithm,
    signing_key: SigningKey,
    address: [u8; ADDRESS_LENGTH],
    nonce: Option<u64>,
}

impl Signer {
    /// Creates an `eth_secp256k1` signer from a 32 byte private key.
    pub fn from_raw_key(key: &[u8]) -> Result<Self, KeyError> {
        Self::from_raw_key_with_algorithm(key, SigningAlgorithm::EthSecp256k1)
    }

    pub fn from_raw_key_with_algorithm(
        key: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<Self, KeyError> {
        if key.len() != PRIVATE_KEY_LENGTH {
            return Err(KeyError::InvalidKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_LENGTH,
                key.len()
            )));
        }

        let signing_key =
            SigningKey::from_slice(key).map_err(|err| KeyError::InvalidKey(err.to_string()))?;
        let address = match algorithm {
            SigningAlgorithm::EthSecp256k1 => eth_address(signing_key.verifying_key()),
            SigningAlgorithm::Secp256k1 => {
                let account_id = cosmrs::crypto::secp256k1::SigningKey::from_slice(key)
                    .and_then(|k| k.public_key().account_id(crate::address::ACCOUNT_PREFIX))
                    .map_err(|err| KeyError::InvalidKey(err.to_string()))?;
                bytes_to_address(&account_id.to_bytes())
            }
        };

        Ok(Signer {
            algorithm,
            signing_key,
            address,
            nonce: None,
        })
    }

    /// Creates a signer from a hex encoded private key, with or without a `0x` prefix.
    pub fn from_hex_key(key: &str) -> Result<Self, KeyError> {
        let key = key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let bytes = hex::decode(key).map_err(|err| KeyError::InvalidKey(err.to_string()))?;

        Self::from_raw_key(&bytes)
    }

    /// Derives a signer from a BIP-39 mnemonic and BIP-32 path, e.g. `m/44'/60'/0'/0/0`.
    ///
    /// `algorithm` is either `eth_secp256k1` or `secp256k1`.
    pub fn from_mnemonic(
        phrase: &str,
        passphrase: &str,
        hd_path: &str,
        algorithm: &str,
    ) -> Result<Self, KeyError> {
        let algorithm = algorithm.parse::<SigningAlgorithm>()?;
        let mnemonic = Mnemonic::new(phrase.trim(), Default::default())
            .map_err(|err| KeyError::KeyDerivationFailed(format!("invalid mnemonic: {}", err)))?;
        let seed = mnemonic.to_seed(passphrase);
        let derivation_path = hd_path.parse::<DerivationPath>().map_err(|err| {
            KeyError::KeyDerivationFailed(format!("invalid hd path {}: {}", hd_path, err))
        })?;
        let xprv = XPrv::derive_from_path(seed, &derivation_path)
            .map_err(|err| KeyError::KeyDerivationFailed(err.to_string()))?;

        Self::from_raw_key_with_algorithm(&xprv.to_bytes(), algorithm)
    }

    /// Sets the nonce override used as sequence when it exceeds the on-chain sequence.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn set_nonce(&mut self, nonce: Option<u64>) {
        self.nonce = nonce;
    }

    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// The raw 20 byte address
    pub fn address(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.address
    }

    /// EIP-55 checksummed hex address
    pub fn eth_address(&self) -> String {
        to_checksum_address(&self.address)
    }

    /// Bech32 account address with the `cysic` prefix
    pub fn cosmos_address(&self) -> Result<String, AddressError> {
        self.account_address(&AddressCodec::default())
    }

    pub fn account_address(&self, codec: &AddressCodec) -> Result<String, AddressError> {
        codec.encode_account(&self.address)
    }

    /// SEC1 compressed public key
    pub fn public_key_bytes(&self) -> Vec<u8> {
        k256::PublicKey::from(self.signing_key.verifying_key())
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// Public key packed for a `SignerInfo`. `eth_type_url` is used for `eth_secp256k1` keys.
    pub fn public_key_any(&self, eth_type_url: &str) -> Result<Any, KeyError> {
        match self.algorithm {
            SigningAlgorithm::EthSecp256k1 => Ok(Any {
                type_url: eth_type_url.to_string(),
                value: secp256k1::PubKey {
                    key: self.public_key_bytes(),
                }
                .encode_to_vec(),
            }),
            SigningAlgorithm::Secp256k1 => {
                cosmrs::crypto::secp256k1::SigningKey::from_slice(&self.signing_key.to_bytes())
                    .and_then(|k| k.public_key().to_any())
                    .map_err(|err| KeyError::PublicKey(err.to_string()))
            }
        }
    }

    /// Signs `msg` the way the chain verifies signatures for this key type.
    ///
    /// `eth_secp256k1` keys hash `msg` with Keccak-256 unless it already is a 32 byte digest and
    /// return `r || s || v`. `secp256k1` keys hash with SHA-256 and return `r || s`.
    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, KeyError> {
        match self.algorithm {
            SigningAlgorithm::EthSecp256k1 => {
                if msg.len() == 32 {
                    self.sign_digest(msg)
                } else {
                    self.sign_digest(&keccak256(msg))
                }
            }
            SigningAlgorithm::Secp256k1 => {
                let signature: Signature =
                    k256::ecdsa::signature::Signer::try_sign(&self.signing_key, msg)
                        .map_err(|err| KeyError::Signing(err.to_string()))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    /// Ethereum `personal_sign` over `message`. Only `eth_secp256k1` keys can sign, since the
    /// recovered signer is compared against the Keccak-derived address.
    pub fn personal_sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        if self.algorithm != SigningAlgorithm::EthSecp256k1 {
            return Err(KeyError::UnsupportedAlgorithm(self.algorithm.to_string()));
        }
        self.sign_digest(&hash_personal_message(message))
    }

    /// Checks a `personal_sign` signature against this signer's address.
    pub fn verify_personal_signature(&self, message: &[u8], signature: &[u8]) -> bool {
        verify_personal_signature(&self.eth_address(), message, signature)
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, KeyError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|err| KeyError::Signing(err.to_string()))?;

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());

        Ok(bytes)
    }
}

// Never print key material.
impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("algorithm", &self.algorithm)
            .field("address", &self.eth_address())
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Compute the Keccak-256 hash of input bytes.
pub fn keccak256<T: AsRef<[u8]>>(bytes: T) -> [u8; 32] {
    let mut output = [0u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(bytes.as_ref());
    hasher.finalize(&mut output);

    output
}

/// Hash of `"\x19Ethereum Signed Message:\n" + len(message) + message`.
pub fn hash_personal_message<T: AsRef<[u8]>>(message: T) -> [u8; 32] {
    let message = message.as_ref();
    let len_string = message.len().to_string();

    let mut eth_message =
        Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + len_string.len() + message.len());
    eth_message.extend_from_slice(PERSONAL_MESSAGE_PREFIX.as_bytes());
    eth_message.extend_from_slice(len_string.as_bytes());
    eth_message.extend_from_slice(message);

    keccak256(&eth_message)
}

/// Recovers the address that produced a `personal_sign` signature.
///
/// Accepts recovery ids in either `{0, 1}` or `{27, 28}` form. The caller's signature is left
/// untouched.
pub fn recover_personal_signer(
    message: &[u8],
    signature: &[u8],
) -> Result<[u8; ADDRESS_LENGTH], KeyError> {
    if signature.len() != 65 {
        return Err(KeyError::Signing(format!(
            "expected 65 byte signature, got {}",
            signature.len()
        )));
    }

    let v = if signature[64] > 1 {
        signature[64].wrapping_sub(27)
    } else {
        signature[64]
    };
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| KeyError::Signing(format!("invalid recovery id {}", signature[64])))?;
    let signature = Signature::from_slice(&signature[..64])
        .map_err(|err| KeyError::Signing(err.to_string()))?;
    let verifying_key = VerifyingKey::recover_from_prehash(
        &hash_personal_message(message),
        &signature,
        recovery_id,
    )
    .map_err(|err| KeyError::Signing(err.to_string()))?;

    Ok(eth_address(&verifying_key))
}

/// Whether `signature` over `message` was produced by `address` (hex or bech32).
pub fn verify_personal_signature(address: &str, message: &[u8], signature: &[u8]) -> bool {
    let claimed = match AddressCodec::default().decode(address) {
        Ok(bytes) => bytes_to_address(&bytes),
        Err(err) => {
            debug!("invalid address {}: {}", address, err);
            return false;
        }
    };

    match recover_personal_signer(message, signature) {
        Ok(recovered) => recovered == claimed,
        Err(err) => {
            debug!("invalid signature: {}", err);
            false
        }
    }
}

fn eth_address(verifying_key: &VerifyingKey) -> [u8; ADDRESS_LENGTH] {
    let point = k256::PublicKey::from(verifying_key).to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);

    bytes_to_address(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn key_one() -> [u8; 32] {
        let mut key = [0u8; 32];
        key[31] = 1;
        key
    }

    #[assay]
    fn derives_address_from_raw_key() {
        let signer = Signer::from_raw_key(&key_one()).unwrap();

        assert_eq!(
            signer.eth_address(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        let account = signer.cosmos_address().unwrap();
        assert!(account.starts_with("cysic1"));
        assert_eq!(
            AddressCodec::default().to_hex(&account).unwrap(),
            signer.eth_address()
        );
    }

    #[assay]
    fn rejects_malformed_raw_keys() {
        assert!(matches!(
            Signer::from_raw_key(&[1u8; 31]),
            Err(KeyError::InvalidKey(_))
        ));
        assert!(matches!(
            Signer::from_raw_key(&[0u8; 32]),
            Err(KeyError::InvalidKey(_))
        ));
        assert!(Signer::from_hex_key("0xzz").is_err());
        assert!(Signer::from_hex_key(
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        )
        .is_ok());
    }

    #[assay]
    fn derives_from_mnemonic() {
        let signer =
            Signer::from_mnemonic(MNEMONIC, "", DEFAULT_HD_PATH, "eth_secp256k1").unwrap();
        assert_eq!(
            signer.eth_address(),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );

        // same seed, different path
        let other = Signer::from_mnemonic(MNEMONIC, "", "m/44'/1'/1'/0/1", "eth_secp256k1").unwrap();
        assert_ne!(other.address(), signer.address());

        // passphrase changes the seed
        let salted = Signer::from_mnemonic(MNEMONIC, "pass", DEFAULT_HD_PATH, "eth_secp256k1").unwrap();
        assert_ne!(salted.address(), signer.address());

        let cosmos = Signer::from_mnemonic(MNEMONIC, "", DEFAULT_HD_PATH, "secp256k1").unwrap();
        assert_eq!(cosmos.algorithm(), SigningAlgorithm::Secp256k1);
        assert_ne!(cosmos.address(), signer.address());
    }

    #[assay]
    fn mnemonic_errors() {
        assert!(matches!(
            Signer::from_mnemonic(MNEMONIC, "", DEFAULT_HD_PATH, "ed25519"),
            Err(KeyError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            Signer::from_mnemonic("abandon abandon", "", DEFAULT_HD_PATH, "eth_secp256k1"),
            Err(KeyError::KeyDerivationFailed(_))
        ));
        assert!(matches!(
            Signer::from_mnemonic(MNEMONIC, "", "44/60/x", "eth_secp256k1"),
            Err(KeyError::KeyDerivationFailed(_))
        ));
    }

    #[assay]
    fn personal_sign_round_trip() {
        let signer = Signer::from_raw_key(&key_one()).unwrap();
        let other = Signer::from_mnemonic(MNEMONIC, "", DEFAULT_HD_PATH, "eth_secp256k1").unwrap();
        let message = b"hello cysic";

        let signature = signer.personal_sign(message).unwrap();
        assert_eq!(signature.len(), 65);
        assert!(signature[64] <= 1);

        assert!(signer.verify_personal_signature(message, &signature));
        assert!(verify_personal_signature(
            &signer.eth_address().to_lowercase(),
            message,
            &signature
        ));
        assert!(verify_personal_signature(
            &signer.cosmos_address().unwrap(),
            message,
            &signature
        ));
        assert!(!verify_personal_signature(&other.eth_address(), message, &signature));
        assert!(!signer.verify_personal_signature(b"another message", &signature));

        // Electrum style v is normalized without touching the caller's bytes
        let mut electrum = signature.clone();
        electrum[64] += 27;
        assert!(signer.verify_personal_signature(message, &electrum));
        assert_eq!(electrum[64], signature[64] + 27);

        assert!(!signer.verify_personal_signature(message, &signature[..64]));
    }

    #[assay]
    fn personal_sign_requires_eth_keys() {
        let cosmos =
            Signer::from_raw_key_with_algorithm(&key_one(), SigningAlgorithm::Secp256k1).unwrap();

        match cosmos.personal_sign(b"hello cysic") {
            Err(KeyError::UnsupportedAlgorithm(name)) => assert_eq!(name, "secp256k1"),
            other => panic!("unexpected result {:?}", other),
        }

        // a signature from the same scalar as an eth key does not match the cosmos address
        let eth = Signer::from_raw_key(&key_one()).unwrap();
        let signature = eth.personal_sign(b"hello cysic").unwrap();
        assert!(!cosmos.verify_personal_signature(b"hello cysic", &signature));
    }

    #[assay]
    fn sign_hashes_non_digest_input() {
        let signer = Signer::from_raw_key(&key_one()).unwrap();
        let msg = b"sign bytes longer than a digest";

        assert_eq!(
            signer.sign(msg).unwrap(),
            signer.sign(&keccak256(msg)).unwrap()
        );

        let cosmos =
            Signer::from_raw_key_with_algorithm(&key_one(), SigningAlgorithm::Secp256k1).unwrap();
        assert_eq!(cosmos.sign(msg).unwrap().len(), 64);
    }

    #[assay]
    fn debug_hides_key() {
        let signer = Signer::from_raw_key(&key_one()).unwrap().with_nonce(7);
        let printed = format!("{:?}", signer);

        assert!(printed.contains("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"));
        assert!(printed.contains("Some(7)"));
        assert!(!printed.contains("0000000000000000000000000000000000000000000000000000000000000001"));
    }

    #[assay]
    fn keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
