//! A pure topology resolver for declarative distributed-ledger network
//! configurations.
//!
//! This library turns a nested configuration document describing
//! organizations, peers, orderers, certificate authorities and channels into
//! a connected, queryable object graph. It is focused solely on static
//! resolution and performs no network I/O and no credential validation.
//! Lookups resolve on demand from the raw document, certificate material
//! comes from inline text or file references, and successive documents can
//! be merged into a single authoritative view.
//!
//! # Example
//! ```
//! use ledger_topology::TopologyResolver;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = TopologyResolver::from_json(r#"{
//!         "channels": {
//!             "mychannel": { "peers": { "peer0": { "endorsingPeer": true } } }
//!         },
//!         "peers": {
//!             "peer0": { "url": "grpc://localhost:7051" }
//!         }
//!     }"#)?;
//!
//!     let channel = resolver.channel("mychannel")?.expect("channel is defined");
//!     assert!(channel.peers[0].has_role("endorsingPeer"));
//!     Ok(())
//! }
//! ```

mod context;
mod document;
mod entity;
mod error;
mod pem;
mod resolver;

pub use context::ClientContext;
pub use document::{CertDescriptor, NetworkDocument};
pub use entity::{
    CertificateAuthority, Channel, ClientConfig, CredentialStore, CryptoStore, EventEndpoint,
    Orderer, Organization, Peer, TransportOptions,
};
pub use error::TopologyError;
pub use pem::resolve_pem;
pub use resolver::TopologyResolver;
