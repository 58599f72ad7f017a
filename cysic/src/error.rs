use thiserror::Error;

// Higher level error: ChainClientError
#[derive(Debug, Error)]
pub enum ChainClientError {
    #[error("{0}")]
    Account(#[from] AccountError),
    #[error("{0}")]
    Address(#[from] AddressError),
    #[error("{0}")]
    Coin(#[from] CoinError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Grpc(#[from] GrpcError),
    #[error("{0}")]
    Key(#[from] KeyError),
    #[error("{0}")]
    ModuleQuery(String),
    #[error("{0}")]
    Msg(#[from] MsgError),
    #[error("{0}")]
    Tx(#[from] TxError),
}

// Lower level errors; should be used by higher level errors
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("expected a valid hex or bech32 address, got '{0}'")]
    Unrecognized(String),
    #[error("expected bech32 prefix '{expected}', got '{found}'")]
    Prefix { expected: String, found: String },
    #[error("invalid bech32 address: {0}")]
    Bech32(#[from] bech32::Error),
    #[error("invalid address length: {0} bytes")]
    Length(usize),
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("key derivation failed: {0}")]
    KeyDerivationFailed(String),
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    #[error("error signing message: {0}")]
    Signing(String),
    #[error("error encoding public key: {0}")]
    PublicKey(String),
}

#[derive(Debug, Error)]
pub enum GrpcError {
    #[error("{0}")]
    Connection(#[from] tonic::transport::Error),
    #[error("invalid gRPC endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("{0}")]
    Request(#[from] tonic::Status),
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

impl GrpcError {
    /// Whether the node reported that the requested item does not exist (yet).
    pub fn is_not_found(&self) -> bool {
        match self {
            GrpcError::Request(status) => {
                status.code() == tonic::Code::NotFound || status.message().contains("not found")
            }
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("account {0} not found")]
    NotFound(String),
    #[error("empty account data: {0}")]
    Empty(String),
    #[error("error decoding account data: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("{0}")]
    Grpc(#[from] GrpcError),
}

#[derive(Debug, Error)]
pub enum CoinError {
    #[error("invalid amount '{0}'")]
    Amount(String),
    #[error("invalid denom '{0}'")]
    Denom(String),
    #[error("amount overflow")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum MsgError {
    #[error("invalid {field} address: {source}")]
    Address {
        field: &'static str,
        #[source]
        source: AddressError,
    },
    #[error("invalid coins: {0}")]
    Coins(String),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("multi-send must have exactly one input, got {0}")]
    MultipleSenders(usize),
    #[error("exchange rate must be positive")]
    InvalidRate,
    #[error("sum of inputs ({inputs}) does not match sum of outputs ({outputs})")]
    Unbalanced { inputs: String, outputs: String },
    #[error("params length not equal, recipients: {recipients}, denoms: {denoms}, amounts: {amounts}")]
    LengthMismatch {
        recipients: usize,
        denoms: usize,
        amounts: usize,
    },
}

#[derive(Debug, Error)]
pub enum TxError {
    #[error("message {index} failed validation: {source}")]
    Validation {
        index: usize,
        #[source]
        source: MsgError,
    },
    #[error("no messages to send")]
    EmptyTx,
    #[error("error looking up signer account: {0}")]
    AccountLookup(#[from] AccountError),
    #[error("address error: {0}")]
    Address(#[from] AddressError),
    #[error("error signing transaction: {0}")]
    Signing(#[from] KeyError),
    #[error("error broadcasting transaction: {0}")]
    Broadcast(GrpcError),
    #[error("transaction rejected with code {code} ({codespace}): {raw_log}")]
    Rejected {
        code: u32,
        codespace: String,
        raw_log: String,
    },
    #[error("error waiting for transaction {hash}: {source}")]
    Confirmation {
        hash: String,
        #[source]
        source: GrpcError,
    },
}

impl TxError {
    /// The sequence the node expected, if this is an account sequence mismatch rejection.
    pub fn expected_sequence(&self) -> Option<u64> {
        match self {
            TxError::Rejected { raw_log, .. } => expected_sequence(raw_log),
            _ => None,
        }
    }
}

fn expected_sequence(raw_log: &str) -> Option<u64> {
    raw_log.lines().find_map(|line| {
        let start = line.find("account sequence mismatch, expected ")?;
        let s = &line[start + "account sequence mismatch, expected ".len()..];
        let end = s.find(',')?;
        s[..end].parse().ok()
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading file: {0}")]
    FileIO(#[from] std::io::Error),
    #[error("error parsing toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}
