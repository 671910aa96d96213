//! Resolved network entities.
//!
//! These are the handles a lookup hands back to the caller: peers, orderers,
//! organizations, certificate authorities, channels and the client
//! configuration. Every lookup manufactures fresh instances from the raw
//! document; the resolver keeps none of them, so ownership rests entirely
//! with the caller that asked.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{Map, Value};
use url::Url;

/// Opaque ordered bag of transport options, carried through to the
/// connection layer unchanged. The option set is open-ended and
/// protocol-specific, so it is not modeled as a fixed struct.
pub type TransportOptions = Map<String, Value>;

/// A peer endpoint.
///
/// Role flags are not a property of the peer itself but of the peer's
/// membership in one channel: an instance resolved without channel context
/// carries no roles, and the same peer resolved for a different channel
/// carries that channel's flags only.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    /// Lookup name of the peer
    pub name: String,

    /// Network address of the transaction endpoint
    pub url: Url,

    /// Network address of the event-delivery endpoint, if any
    pub event_url: Option<Url>,

    /// TLS root certificate in PEM form, if configured
    pub tls_ca_cert: Option<String>,

    /// Transport options, passed through unchanged
    pub options: TransportOptions,

    roles: BTreeMap<String, bool>,
}

impl Peer {
    /// Creates a peer with no certificate, options or roles
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
            event_url: None,
            tls_ca_cert: None,
            options: TransportOptions::new(),
            roles: BTreeMap::new(),
        }
    }

    /// Sets one channel-scoped role flag
    pub fn set_role(&mut self, role: impl Into<String>, enabled: bool) {
        self.roles.insert(role.into(), enabled);
    }

    /// Returns the flag for `role`, or `None` when the role was never set
    pub fn role(&self, role: &str) -> Option<bool> {
        self.roles.get(role).copied()
    }

    /// True when `role` was set and enabled
    pub fn has_role(&self, role: &str) -> bool {
        self.role(role) == Some(true)
    }

    /// All roles set on this instance
    pub fn roles(&self) -> &BTreeMap<String, bool> {
        &self.roles
    }
}

/// An orderer endpoint.
///
/// The name comes from the orderer's own configuration entry and may differ
/// from the key the entry is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct Orderer {
    /// Name of the orderer
    pub name: String,

    /// Network address of the orderer
    pub url: Url,

    /// TLS root certificate in PEM form, if configured
    pub tls_ca_cert: Option<String>,

    /// Transport options, passed through unchanged
    pub options: TransportOptions,
}

impl Orderer {
    /// Creates an orderer with no certificate or options
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
            tls_ca_cert: None,
            options: TransportOptions::new(),
        }
    }
}

/// A peer's event-delivery endpoint, with the same certificate and
/// transport options as the peer it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct EventEndpoint {
    /// Name of the owning peer
    pub peer_name: String,

    /// Network address of the event-delivery endpoint
    pub url: Url,

    /// TLS root certificate in PEM form, if configured
    pub tls_ca_cert: Option<String>,

    /// Transport options, passed through unchanged
    pub options: TransportOptions,
}

/// A certificate authority reachable over HTTP
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateAuthority {
    /// Name of the certificate authority
    pub name: String,

    /// Base URL of the CA service
    pub url: Url,

    /// HTTP client options, passed through unchanged
    pub http_options: TransportOptions,

    /// TLS root certificate in PEM form, if configured
    pub tls_ca_cert: Option<String>,

    /// Enrollment identity used to bootstrap issuance; opaque here
    pub registrar: Option<Value>,
}

/// An organization and its resolved members
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    /// Name of the organization
    pub name: String,

    /// Membership-service-provider identifier
    pub mspid: String,

    /// Member peers that resolved
    pub peers: Vec<Peer>,

    /// Associated certificate authorities that resolved
    pub certificate_authorities: Vec<CertificateAuthority>,

    /// Administrator signing key in PEM form, if configured
    pub admin_private_key: Option<String>,

    /// Administrator certificate in PEM form, if configured
    pub admin_cert: Option<String>,
}

impl Organization {
    /// Creates an organization shell with no members
    pub fn new(name: impl Into<String>, mspid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mspid: mspid.into(),
            peers: Vec::new(),
            certificate_authorities: Vec::new(),
            admin_private_key: None,
            admin_cert: None,
        }
    }

    /// Attaches a member peer
    pub fn add_peer(&mut self, peer: Peer) {
        self.peers.push(peer);
    }

    /// Attaches an associated certificate authority
    pub fn add_certificate_authority(&mut self, ca: CertificateAuthority) {
        self.certificate_authorities.push(ca);
    }
}

/// A channel with its resolved member peers and orderers.
///
/// Peers carry this channel's role flags; orderers appear in the exact
/// order the channel definition lists them, since broadcast fan-out follows
/// that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Name of the channel
    pub name: String,

    /// Member peers with channel-scoped roles set
    pub peers: Vec<Peer>,

    /// Orderers in definition order
    pub orderers: Vec<Orderer>,
}

impl Channel {
    /// Creates an empty channel
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            peers: Vec::new(),
            orderers: Vec::new(),
        }
    }

    /// Attaches a member peer
    pub fn add_peer(&mut self, peer: Peer) {
        self.peers.push(peer);
    }

    /// Attaches an orderer at the end of the fan-out order
    pub fn add_orderer(&mut self, orderer: Orderer) {
        self.orderers.push(orderer);
    }
}

/// Client settings resolved from the document's `client` section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientConfig {
    /// Name of the organization this client is affiliated with
    pub organization: Option<String>,

    /// Credential-store settings with paths made absolute
    pub credential_store: Option<CredentialStore>,
}

/// Credential-store settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CredentialStore {
    /// Absolute base path of the store
    pub path: Option<PathBuf>,

    /// Nested crypto-store settings
    pub crypto_store: Option<CryptoStore>,

    /// Further settings carried through opaquely
    pub settings: Map<String, Value>,
}

/// Crypto-store settings nested inside the credential store
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CryptoStore {
    /// Absolute base path of the store
    pub path: Option<PathBuf>,

    /// Further settings carried through opaquely
    pub settings: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_default_unset() {
        let peer = Peer::new("peer0", "grpc://a:7051".parse().unwrap());
        assert!(peer.roles().is_empty());
        assert_eq!(peer.role("endorsingPeer"), None);
        assert!(!peer.has_role("endorsingPeer"));
    }

    #[test]
    fn test_role_flags_keep_explicit_false() {
        let mut peer = Peer::new("peer0", "grpc://a:7051".parse().unwrap());
        peer.set_role("endorsingPeer", true);
        peer.set_role("ledgerQuery", false);

        assert_eq!(peer.role("endorsingPeer"), Some(true));
        assert!(peer.has_role("endorsingPeer"));
        // explicitly disabled is distinct from never set
        assert_eq!(peer.role("ledgerQuery"), Some(false));
        assert!(!peer.has_role("ledgerQuery"));
        assert_eq!(peer.roles().len(), 2);
    }

    #[test]
    fn test_channel_preserves_attachment_order() {
        let mut channel = Channel::new("mychannel");
        for name in ["o2", "o1", "o3"] {
            channel.add_orderer(Orderer::new(name, "grpc://x:7050".parse().unwrap()));
        }

        let names: Vec<&str> = channel.orderers.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["o2", "o1", "o3"]);
    }
}
