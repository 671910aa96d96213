//! The raw network-configuration document.
//!
//! A document is a nested JSON mapping with six optional top-level sections.
//! Section entries are kept as raw [`serde_json::Value`]s and deserialized
//! into their typed views only when a lookup asks for them, so the document
//! itself stays the single source of truth: a merge is immediately visible
//! to the next lookup, with nothing stale cached in between.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// A parsed network-configuration document.
///
/// Names within each section are unique by construction of the underlying
/// map; when a caller assembles a document with duplicate keys the last
/// write wins. The document does not validate cross-references between
/// sections, that is the resolver's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDocument {
    /// Client affiliation and credential-store settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Value>,

    /// Channel definitions keyed by channel name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<Map<String, Value>>,

    /// Organization definitions keyed by organization name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Map<String, Value>>,

    /// Peer definitions keyed by peer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers: Option<Map<String, Value>>,

    /// Orderer definitions keyed by lookup name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderers: Option<Map<String, Value>>,

    /// Certificate-authority definitions keyed by CA name
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "certificateAuthorities")]
    pub certificate_authorities: Option<Map<String, Value>>,
}

impl NetworkDocument {
    /// Parses a document from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builds a document from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Looks up a raw entry in one of the named sections
    pub(crate) fn entry<'a>(
        section: &'a Option<Map<String, Value>>,
        name: &str,
    ) -> Option<&'a Value> {
        section.as_ref().and_then(|map| map.get(name))
    }

    /// Merges another document into this one with partial-overwrite
    /// semantics: each top-level section is replaced wholesale when the
    /// incoming document carries a non-empty value for it, and left
    /// untouched otherwise. Nested entries are never deep-merged.
    pub fn merge_from(&mut self, other: &NetworkDocument) {
        if other.client.as_ref().is_some_and(|v| !v.is_null()) {
            self.client = other.client.clone();
        }
        merge_section(&mut self.channels, &other.channels);
        merge_section(&mut self.organizations, &other.organizations);
        merge_section(&mut self.orderers, &other.orderers);
        merge_section(&mut self.peers, &other.peers);
        merge_section(
            &mut self.certificate_authorities,
            &other.certificate_authorities,
        );
    }
}

fn merge_section(target: &mut Option<Map<String, Value>>, incoming: &Option<Map<String, Value>>) {
    if incoming.as_ref().is_some_and(|map| !map.is_empty()) {
        *target = incoming.clone();
    }
}

/// Certificate material, either inline PEM text or a file reference.
///
/// When both are given the inline text wins; when neither is given the
/// certificate is simply absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertDescriptor {
    /// Inline PEM text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pem: Option<String>,

    /// Path of a PEM file, relative paths resolve against the client context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Typed view of one entry in the `peers` section
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PeerEntry {
    /// Network address of the peer's transaction endpoint
    pub url: Url,

    /// Network address of the peer's event-delivery endpoint
    #[serde(rename = "eventUrl")]
    pub event_url: Option<Url>,

    /// TLS root certificate for the peer's endpoints
    #[serde(rename = "tlsCACerts")]
    pub tls_ca_certs: Option<CertDescriptor>,

    /// Transport options passed through to the connection layer unchanged
    #[serde(rename = "grpcOptions", default)]
    pub grpc_options: Map<String, Value>,
}

/// Typed view of one entry in the `orderers` section.
///
/// The `name` field is the orderer's own name and may legitimately differ
/// from the key it is stored under; the entry name wins when present.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrdererEntry {
    /// Network address of the orderer
    pub url: Url,

    /// The orderer's own name
    pub name: Option<String>,

    /// TLS root certificate for the orderer endpoint
    #[serde(rename = "tlsCACerts")]
    pub tls_ca_certs: Option<CertDescriptor>,

    /// Transport options passed through unchanged
    #[serde(rename = "grpcOptions", default)]
    pub grpc_options: Map<String, Value>,
}

/// Typed view of one entry in the `certificateAuthorities` section
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CaEntry {
    /// Base URL of the certificate authority
    pub url: Url,

    /// HTTP client options passed through unchanged
    #[serde(rename = "httpOptions", default)]
    pub http_options: Map<String, Value>,

    /// TLS root certificate for the CA endpoint
    #[serde(rename = "tlsCACerts")]
    pub tls_ca_certs: Option<CertDescriptor>,

    /// Enrollment identity used to bootstrap issuance, opaque to this crate
    pub registrar: Option<Value>,
}

/// Typed view of one entry in the `organizations` section
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrganizationEntry {
    /// Membership-service-provider identifier
    pub mspid: String,

    /// Names of member peers
    #[serde(default)]
    pub peers: Vec<String>,

    /// Names of associated certificate authorities
    #[serde(rename = "certificateAuthorities", default)]
    pub certificate_authorities: Vec<String>,

    /// Administrator signing key
    #[serde(rename = "adminPrivateKey")]
    pub admin_private_key: Option<CertDescriptor>,

    /// Administrator certificate
    #[serde(rename = "signedCert")]
    pub signed_cert: Option<CertDescriptor>,
}

/// Typed view of one entry in the `channels` section
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChannelEntry {
    /// Member peers keyed by peer name, each mapped to its role descriptor
    /// (role name to boolean) for this channel
    #[serde(default)]
    pub peers: Map<String, Value>,

    /// Orderer names in document order; this order is observable downstream
    /// and must be preserved
    #[serde(default)]
    pub orderers: Vec<String>,
}

/// Typed view of the `client` section
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClientEntry {
    /// Name of the organization this client is affiliated with
    pub organization: Option<String>,

    /// Credential-store settings
    #[serde(rename = "credentialStore")]
    pub credential_store: Option<CredentialStoreEntry>,
}

/// Raw credential-store settings inside the `client` section
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CredentialStoreEntry {
    /// Base path of the credential store
    pub path: Option<String>,

    /// Nested crypto-store settings
    #[serde(rename = "cryptoStore")]
    pub crypto_store: Option<CryptoStoreEntry>,

    /// Any further settings, carried through opaquely
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// Raw crypto-store settings inside the credential store
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CryptoStoreEntry {
    /// Base path of the crypto store
    pub path: Option<String>,

    /// Any further settings, carried through opaquely
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> NetworkDocument {
        NetworkDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_all_sections() {
        let parsed = doc(json!({
            "client": { "organization": "Org1" },
            "channels": { "mychannel": {} },
            "organizations": { "Org1": { "mspid": "Org1MSP" } },
            "peers": { "peer0": { "url": "grpc://a:7051" } },
            "orderers": { "orderer0": { "url": "grpc://b:7050" } },
            "certificateAuthorities": { "ca0": { "url": "https://c:7054" } }
        }));

        assert!(parsed.client.is_some());
        assert!(parsed.channels.as_ref().unwrap().contains_key("mychannel"));
        assert!(parsed.organizations.as_ref().unwrap().contains_key("Org1"));
        assert!(parsed.peers.as_ref().unwrap().contains_key("peer0"));
        assert!(parsed.orderers.as_ref().unwrap().contains_key("orderer0"));
        assert!(parsed
            .certificate_authorities
            .as_ref()
            .unwrap()
            .contains_key("ca0"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let parsed = NetworkDocument::from_json(
            r#"{ "version": "1.0", "peers": { "peer0": { "url": "grpc://a:7051" } } }"#,
        )
        .unwrap();
        assert!(parsed.peers.is_some());
    }

    #[test]
    fn test_merge_replaces_present_sections_only() {
        let mut base = doc(json!({
            "peers": { "peer0": { "url": "grpc://a:7051" } },
            "channels": { "old": {} }
        }));
        let incoming = doc(json!({
            "channels": { "new": {} }
        }));

        base.merge_from(&incoming);

        let channels = base.channels.as_ref().unwrap();
        assert!(channels.contains_key("new"));
        assert!(!channels.contains_key("old"));
        // peers were absent from the incoming document and survive unchanged
        assert!(base.peers.as_ref().unwrap().contains_key("peer0"));
    }

    #[test]
    fn test_merge_ignores_empty_incoming_sections() {
        let mut base = doc(json!({
            "peers": { "peer0": { "url": "grpc://a:7051" } }
        }));
        let incoming = doc(json!({ "peers": {} }));

        base.merge_from(&incoming);

        assert!(base.peers.as_ref().unwrap().contains_key("peer0"));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut base = doc(json!({
            "peers": {
                "peer0": { "url": "grpc://a:7051" },
                "peer1": { "url": "grpc://b:7051" }
            }
        }));
        let incoming = doc(json!({
            "peers": { "peer0": { "url": "grpc://c:9051" } }
        }));

        base.merge_from(&incoming);

        // wholesale replace: peer1 is gone, not merged in
        let peers = base.peers.as_ref().unwrap();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers["peer0"]["url"], "grpc://c:9051");
    }
}
