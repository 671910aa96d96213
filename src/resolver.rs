//! Core topology resolution functionality.
//!
//! [`TopologyResolver`] owns a raw configuration document and turns named
//! lookups into live entity handles on demand. Resolution is pull-based and
//! uncached: every lookup re-resolves from the document, so a merged-in
//! document is visible to the very next call.
//!
//! References between sections are resolved best-effort. An unresolvable
//! name inside an organization or channel is skipped (and logged) instead of
//! failing the whole collection; the one fatal condition is a certificate
//! file that cannot be read.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::context::ClientContext;
use crate::document::{
    CaEntry, ChannelEntry, ClientEntry, NetworkDocument, OrdererEntry, OrganizationEntry,
    PeerEntry,
};
use crate::entity::{
    CertificateAuthority, Channel, ClientConfig, CredentialStore, CryptoStore, EventEndpoint,
    Orderer, Organization, Peer,
};
use crate::error::TopologyError;
use crate::pem::resolve_opt_pem;

/// Resolves named entities and channels out of a network-configuration
/// document.
///
/// The resolver holds only the raw document and a path-resolution context.
/// Entities are manufactured fresh on every lookup and owned by the caller;
/// nothing is cached, so the document stays the single source of truth.
#[derive(Debug, Clone, Default)]
pub struct TopologyResolver {
    document: NetworkDocument,
    context: ClientContext,
}

impl TopologyResolver {
    /// Creates a resolver over `document`, resolving relative paths against
    /// the process working directory
    pub fn new(document: NetworkDocument) -> Self {
        Self {
            document,
            context: ClientContext::new(),
        }
    }

    /// Creates a resolver with an explicit path-resolution context
    pub fn with_context(document: NetworkDocument, context: ClientContext) -> Self {
        Self { document, context }
    }

    /// Parses a resolver from JSON text
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        Ok(Self::new(NetworkDocument::from_json(json)?))
    }

    /// Builds a resolver from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, TopologyError> {
        Ok(Self::new(NetworkDocument::from_value(value)?))
    }

    /// The raw configuration document
    pub fn document(&self) -> &NetworkDocument {
        &self.document
    }

    /// The path-resolution context
    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// True when the document carries a client section
    pub fn has_client(&self) -> bool {
        self.document.client.as_ref().is_some_and(|v| !v.is_null())
    }

    /// Resolves the client section into affiliation and credential-store
    /// settings, with store paths made absolute at read time.
    ///
    /// Returns `Ok(None)` when the document has no client section.
    pub fn client_config(&self) -> Result<Option<ClientConfig>, TopologyError> {
        debug!("resolving client config");
        let Some(raw) = &self.document.client else {
            return Ok(None);
        };
        let Some(entry) = decode::<ClientEntry>("client", "client", raw) else {
            return Ok(None);
        };

        let mut config = ClientConfig {
            organization: entry.organization,
            credential_store: None,
        };
        if let Some(store) = entry.credential_store {
            let mut credential_store = CredentialStore {
                path: None,
                crypto_store: None,
                settings: store.settings,
            };
            if let Some(path) = store.path {
                credential_store.path = Some(self.context.resolve_path(path)?);
            }
            if let Some(crypto) = store.crypto_store {
                let mut crypto_store = CryptoStore {
                    path: None,
                    settings: crypto.settings,
                };
                if let Some(path) = crypto.path {
                    crypto_store.path = Some(self.context.resolve_path(path)?);
                }
                credential_store.crypto_store = Some(crypto_store);
            }
            config.credential_store = Some(credential_store);
        }
        Ok(Some(config))
    }

    /// Resolves a peer by name, with no channel context and therefore no
    /// role flags set
    pub fn peer(&self, name: &str) -> Result<Option<Peer>, TopologyError> {
        debug!(%name, "resolving peer");
        self.build_peer(name, None)
    }

    /// Resolves a peer by name with a channel-membership descriptor.
    ///
    /// Only boolean-typed entries of the descriptor become role flags on the
    /// returned peer; everything else in the descriptor is ignored and
    /// unmentioned roles stay unset.
    pub fn peer_with_roles(
        &self,
        name: &str,
        membership: &Map<String, Value>,
    ) -> Result<Option<Peer>, TopologyError> {
        debug!(%name, "resolving peer with channel membership");
        self.build_peer(name, Some(membership))
    }

    /// Resolves a peer's event-delivery endpoint.
    ///
    /// Absent when the peer is unknown or carries no event address.
    pub fn event_endpoint(&self, name: &str) -> Result<Option<EventEndpoint>, TopologyError> {
        debug!(%name, "resolving event endpoint");
        let Some(raw) = NetworkDocument::entry(&self.document.peers, name) else {
            return Ok(None);
        };
        let Some(entry) = decode::<PeerEntry>("peer", name, raw) else {
            return Ok(None);
        };
        let Some(url) = entry.event_url else {
            debug!(%name, "peer has no event address");
            return Ok(None);
        };

        Ok(Some(EventEndpoint {
            peer_name: name.to_string(),
            url,
            tls_ca_cert: resolve_opt_pem(entry.tls_ca_certs.as_ref(), &self.context)?,
            options: entry.grpc_options,
        }))
    }

    /// Resolves an orderer by lookup name. The returned orderer is named by
    /// its entry's own `name` field when present, which may differ from the
    /// lookup name.
    pub fn orderer(&self, name: &str) -> Result<Option<Orderer>, TopologyError> {
        debug!(%name, "resolving orderer");
        let Some(raw) = NetworkDocument::entry(&self.document.orderers, name) else {
            return Ok(None);
        };
        let Some(entry) = decode::<OrdererEntry>("orderer", name, raw) else {
            return Ok(None);
        };

        let mut orderer = Orderer::new(entry.name.unwrap_or_else(|| name.to_string()), entry.url);
        orderer.tls_ca_cert = resolve_opt_pem(entry.tls_ca_certs.as_ref(), &self.context)?;
        orderer.options = entry.grpc_options;
        Ok(Some(orderer))
    }

    /// Resolves a certificate authority by name. URL, HTTP options and
    /// registrar are passed through uninterpreted.
    pub fn certificate_authority(
        &self,
        name: &str,
    ) -> Result<Option<CertificateAuthority>, TopologyError> {
        debug!(%name, "resolving certificate authority");
        let Some(raw) = NetworkDocument::entry(&self.document.certificate_authorities, name)
        else {
            return Ok(None);
        };
        let Some(entry) = decode::<CaEntry>("certificateAuthority", name, raw) else {
            return Ok(None);
        };

        Ok(Some(CertificateAuthority {
            name: name.to_string(),
            url: entry.url,
            http_options: entry.http_options,
            tls_ca_cert: resolve_opt_pem(entry.tls_ca_certs.as_ref(), &self.context)?,
            registrar: entry.registrar,
        }))
    }

    /// Resolves an organization with its member peers and certificate
    /// authorities attached. Listed names that do not resolve are skipped.
    pub fn organization(&self, name: &str) -> Result<Option<Organization>, TopologyError> {
        debug!(%name, "resolving organization");
        let Some(raw) = NetworkDocument::entry(&self.document.organizations, name) else {
            return Ok(None);
        };
        let Some(entry) = decode::<OrganizationEntry>("organization", name, raw) else {
            return Ok(None);
        };

        let mut organization = Organization::new(name, entry.mspid);
        for peer_name in &entry.peers {
            match self.build_peer(peer_name, None)? {
                Some(peer) => organization.add_peer(peer),
                None => {
                    debug!(organization = %name, peer = %peer_name, "skipping unresolved peer reference");
                }
            }
        }
        for ca_name in &entry.certificate_authorities {
            match self.certificate_authority(ca_name)? {
                Some(ca) => organization.add_certificate_authority(ca),
                None => {
                    debug!(organization = %name, ca = %ca_name, "skipping unresolved certificate-authority reference");
                }
            }
        }
        organization.admin_private_key =
            resolve_opt_pem(entry.admin_private_key.as_ref(), &self.context)?;
        organization.admin_cert = resolve_opt_pem(entry.signed_cert.as_ref(), &self.context)?;
        Ok(Some(organization))
    }

    /// Resolves every organization in the document, in the document's key
    /// iteration order
    pub fn organizations(&self) -> Result<Vec<Organization>, TopologyError> {
        debug!("resolving all organizations");
        let mut organizations = Vec::new();
        if let Some(section) = &self.document.organizations {
            for name in section.keys() {
                if let Some(organization) = self.organization(name)? {
                    organizations.push(organization);
                }
            }
        }
        Ok(organizations)
    }

    /// Resolves a channel with its member peers and orderers attached.
    ///
    /// Absent exactly when `name` is not a key of the channels section. Each
    /// member peer carries this channel's role flags; orderers are attached
    /// in definition order.
    pub fn channel(&self, name: &str) -> Result<Option<Channel>, TopologyError> {
        debug!(%name, "resolving channel");
        let Some(raw) = NetworkDocument::entry(&self.document.channels, name) else {
            return Ok(None);
        };
        // a present key always yields a channel; a malformed body degrades
        // to an empty membership
        let entry: ChannelEntry = decode("channel", name, raw).unwrap_or_default();

        let mut channel = Channel::new(name);
        self.add_channel_peers(&mut channel, &entry)?;
        self.add_channel_orderers(&mut channel, &entry)?;
        Ok(Some(channel))
    }

    /// Merges the other resolver's document into this one with
    /// partial-overwrite semantics: present, non-empty sections replace
    /// wholesale, absent sections leave the existing data untouched. The
    /// other resolver is not mutated and this resolver's context is
    /// unaffected.
    pub fn merge(&mut self, other: &TopologyResolver) {
        debug!("merging additional configuration document");
        self.document.merge_from(&other.document);
    }

    fn build_peer(
        &self,
        name: &str,
        membership: Option<&Map<String, Value>>,
    ) -> Result<Option<Peer>, TopologyError> {
        let Some(raw) = NetworkDocument::entry(&self.document.peers, name) else {
            return Ok(None);
        };
        let Some(entry) = decode::<PeerEntry>("peer", name, raw) else {
            return Ok(None);
        };

        let mut peer = Peer::new(name, entry.url);
        peer.event_url = entry.event_url;
        peer.tls_ca_cert = resolve_opt_pem(entry.tls_ca_certs.as_ref(), &self.context)?;
        peer.options = entry.grpc_options;
        if let Some(membership) = membership {
            for (role, flag) in membership {
                if let Value::Bool(enabled) = flag {
                    peer.set_role(role, *enabled);
                }
            }
        }
        Ok(Some(peer))
    }

    fn add_channel_peers(
        &self,
        channel: &mut Channel,
        entry: &ChannelEntry,
    ) -> Result<(), TopologyError> {
        for (peer_name, descriptor) in &entry.peers {
            match self.build_peer(peer_name, descriptor.as_object())? {
                Some(peer) => channel.add_peer(peer),
                None => {
                    debug!(channel = %channel.name, peer = %peer_name, "skipping unresolved peer reference");
                }
            }
        }
        Ok(())
    }

    fn add_channel_orderers(
        &self,
        channel: &mut Channel,
        entry: &ChannelEntry,
    ) -> Result<(), TopologyError> {
        // definition order is broadcast fan-out order
        for orderer_name in &entry.orderers {
            match self.orderer(orderer_name)? {
                Some(orderer) => channel.add_orderer(orderer),
                None => {
                    debug!(channel = %channel.name, orderer = %orderer_name, "skipping unresolved orderer reference");
                }
            }
        }
        Ok(())
    }
}

/// Deserializes a raw section entry into its typed view, treating a
/// malformed entry as unresolved
fn decode<T: DeserializeOwned>(kind: &str, name: &str, raw: &Value) -> Option<T> {
    match serde_json::from_value(raw.clone()) {
        Ok(entry) => Some(entry),
        Err(err) => {
            debug!(%kind, %name, %err, "malformed entry, treating as unresolved");
            None
        }
    }
}
