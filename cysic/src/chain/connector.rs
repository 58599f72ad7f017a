//! A single lazily dialled gRPC channel, shared by every query and broadcast client.
use http::Uri;
use tokio::sync::Mutex;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info, warn};

use crate::{
    cosmos_modules::{auth, bank, distribution, staking, tx},
    error::GrpcError,
};

/// The auth module's query client proto definition
pub type AuthQueryClient = auth::query_client::QueryClient<Channel>;
/// The bank module's query client proto definition
pub type BankQueryClient = bank::query_client::QueryClient<Channel>;
/// The distribution module's query client proto definition
pub type DistributionQueryClient = distribution::query_client::QueryClient<Channel>;
/// The staking module's query client proto definition
pub type StakingQueryClient = staking::query_client::QueryClient<Channel>;
/// The tx service client proto definition
pub type TxServiceClient = tx::service_client::ServiceClient<Channel>;

/// Generated gRPC clients that can be layered over an existing channel
pub trait GrpcClient {
    fn from_channel(channel: Channel) -> Self;
}

macro_rules! grpc_clients {
    ($($client:ty),* $(,)?) => {
        $(
            impl GrpcClient for $client {
                fn from_channel(channel: Channel) -> Self {
                    Self::new(channel)
                }
            }
        )*
    };
}

grpc_clients!(
    AuthQueryClient,
    BankQueryClient,
    DistributionQueryClient,
    StakingQueryClient,
    TxServiceClient,
);

/// Owns the connection to one node. The channel is dialled on first use and dialled again
/// after [`ChainConnector::mark_unhealthy`] or [`ChainConnector::close`].
#[derive(Debug)]
pub struct ChainConnector {
    endpoint: String,
    channel: Mutex<Option<Channel>>,
}

impl ChainConnector {
    /// Normalizes `endpoint` without connecting. Bare `host:port` inputs get an `http` scheme;
    /// connections are plaintext.
    pub fn new(endpoint: &str) -> Result<Self, GrpcError> {
        Ok(ChainConnector {
            endpoint: parse_or_build_grpc_endpoint(endpoint)?,
            channel: Mutex::new(None),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the live channel, dialling a fresh one if there is none. A failed dial is
    /// retried once.
    pub async fn ensure_connected(&self) -> Result<Channel, GrpcError> {
        let mut guard = self.channel.lock().await;
        if let Some(channel) = guard.as_ref() {
            return Ok(channel.clone());
        }

        let channel = match self.dial().await {
            Ok(channel) => channel,
            Err(err) => {
                warn!("failed to connect to {}, retrying once: {}", self.endpoint, err);
                self.dial().await?
            }
        };
        info!("connected to {}", self.endpoint);
        *guard = Some(channel.clone());

        Ok(channel)
    }

    async fn dial(&self) -> Result<Channel, GrpcError> {
        debug!("dialling gRPC endpoint {}", self.endpoint);
        Ok(Endpoint::from_shared(self.endpoint.clone())
            .map_err(|err| GrpcError::InvalidEndpoint(err.to_string()))?
            .connect()
            .await?)
    }

    pub async fn client<T: GrpcClient>(&self) -> Result<T, GrpcError> {
        Ok(T::from_channel(self.ensure_connected().await?))
    }

    /// Drops the current channel so the next call dials again.
    pub async fn mark_unhealthy(&self) {
        if self.channel.lock().await.take().is_some() {
            warn!("connection to {} marked unhealthy", self.endpoint);
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.channel.lock().await.is_some()
    }

    #[cfg(test)]
    pub(crate) async fn set_channel(&self, channel: Channel) {
        *self.channel.lock().await = Some(channel);
    }

    pub async fn close(&self) {
        if self.channel.lock().await.take().is_some() {
            debug!("closed connection to {}", self.endpoint);
        }
    }
}

pub(crate) fn parse_or_build_grpc_endpoint(input: &str) -> Result<String, GrpcError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GrpcError::InvalidEndpoint("endpoint is empty".to_string()));
    }

    let invalid = |err: &dyn std::fmt::Display| GrpcError::InvalidEndpoint(format!("{}: {}", input, err));
    let mut uri = input.parse::<Uri>().map_err(|err| invalid(&err))?;

    match uri.scheme_str() {
        None => {
            uri = Uri::builder()
                .scheme("http")
                .authority(input)
                .path_and_query("/")
                .build()
                .map_err(|err| invalid(&err))?;
        }
        Some("http") => {}
        Some(scheme) => {
            return Err(GrpcError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}', only plaintext http is supported",
                input, scheme
            )))
        }
    }

    if uri.authority().is_none() {
        return Err(GrpcError::InvalidEndpoint(format!("{}: missing host", input)));
    }

    Ok(uri.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    #[assay]
    fn valid_output() {
        assert_eq!(
            parse_or_build_grpc_endpoint("localhost:9090").unwrap(),
            "http://localhost:9090/"
        );
        assert_eq!(
            parse_or_build_grpc_endpoint("http://127.0.0.1:9090").unwrap(),
            "http://127.0.0.1:9090/"
        );
        assert_eq!(
            parse_or_build_grpc_endpoint(" test.com:9090 ").unwrap(),
            "http://test.com:9090/"
        );

        assert!(parse_or_build_grpc_endpoint("").is_err());
        assert!(parse_or_build_grpc_endpoint("tcp://test.com:9090").is_err());
        assert!(parse_or_build_grpc_endpoint("https://test.com:9090").is_err());
        assert!(parse_or_build_grpc_endpoint("not a uri").is_err());
    }

    #[assay]
    async fn starts_disconnected() {
        let connector = ChainConnector::new("localhost:9090").unwrap();
        assert_eq!(connector.endpoint(), "http://localhost:9090/");
        assert!(!connector.is_connected().await);

        connector.mark_unhealthy().await;
        connector.close().await;
        assert!(!connector.is_connected().await);
    }

    #[assay]
    async fn failed_dial_caches_nothing() {
        // nothing listens on port 1
        let connector = ChainConnector::new("127.0.0.1:1").unwrap();

        assert!(matches!(
            connector.ensure_connected().await,
            Err(GrpcError::Connection(_))
        ));
        assert!(!connector.is_connected().await);
        assert!(connector.client::<TxServiceClient>().await.is_err());
    }

    #[assay]
    async fn unhealthy_channel_is_redialled() {
        let connector = ChainConnector::new("127.0.0.1:1").unwrap();
        connector
            .set_channel(Endpoint::from_static("http://127.0.0.1:1").connect_lazy())
            .await;

        // a live channel is reused without dialling
        assert!(connector.ensure_connected().await.is_ok());
        assert!(connector.is_connected().await);

        connector.mark_unhealthy().await;
        assert!(!connector.is_connected().await);

        // the next call dials again, which fails against a closed port
        assert!(matches!(
            connector.ensure_connected().await,
            Err(GrpcError::Connection(_))
        ));
        assert!(!connector.is_connected().await);
    }
}
