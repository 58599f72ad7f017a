//! CysicCli Config
//!
//! Read from `cysic.toml` in the working directory, or the file passed with `--config`.
//! Every value can be overridden with a global flag.
use cysic::chain::config::ChainClientConfig;
use serde::{Deserialize, Serialize};

/// CysicCli Configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CysicCliConfig {
    /// Connection and fee parameters for the target chain
    #[serde(default)]
    pub chain: ChainClientConfig,
}
