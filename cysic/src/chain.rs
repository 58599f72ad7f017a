//! Everything that talks to a node: configuration, the gRPC connection, the query and
//! broadcast services, and the [`client::ChainClient`] facade on top of them.
pub mod broadcast;
pub mod client;
pub mod config;
pub mod connector;
pub mod service;
