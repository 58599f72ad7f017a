use std::sync::Arc;

use tracing::debug;

use crate::{
    address::AddressCodec,
    chain::{
        config::ChainClientConfig,
        connector::ChainConnector,
        service::{ChainService, GrpcChainService},
    },
    error::ChainClientError,
    tx::TxBuilder,
};

pub mod govtoken;
pub mod query;
pub mod staking;
pub mod tx;

/// Facade over one node. Every write operation validates, signs and broadcasts a single
/// transaction and returns its hash; reads are plain gRPC queries reshaped into crate types.
pub struct ChainClient {
    config: ChainClientConfig,
    builder: TxBuilder,
    service: Arc<dyn ChainService>,
}

impl ChainClient {
    /// Creates a client for `config.grpc_address`. Nothing is dialled until the first call.
    pub fn new(config: ChainClientConfig) -> Result<Self, ChainClientError> {
        config.validate()?;
        let connector = ChainConnector::new(&config.grpc_address)?;
        debug!(
            "creating chain client for {} on {}",
            config.chain_id,
            connector.endpoint()
        );

        Ok(Self::with_service(
            config,
            Arc::new(GrpcChainService::new(Arc::new(connector))),
        ))
    }

    /// Creates a client over any [`ChainService`] implementation.
    pub fn with_service(config: ChainClientConfig, service: Arc<dyn ChainService>) -> Self {
        let builder = TxBuilder::new(config.tx_config(), config.address_codec());

        ChainClient {
            config,
            builder,
            service,
        }
    }

    pub fn config(&self) -> &ChainClientConfig {
        &self.config
    }

    pub fn codec(&self) -> &AddressCodec {
        self.builder.codec()
    }

    pub fn builder(&self) -> &TxBuilder {
        &self.builder
    }

    pub fn service(&self) -> &Arc<dyn ChainService> {
        &self.service
    }

    /// Releases the connection. The client stays usable and redials on the next call.
    pub async fn close(&self) {
        self.service.close().await;
    }
}
