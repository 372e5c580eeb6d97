use crate::protocol::{
    Error, MessageEncoding, ProtocolDefinition, ProtocolProvider, Result,
    Transport, DEFAULT_HTTP_PORT, DEFAULT_QUIC_PORT, DEFAULT_TCP_PORT,
    HTTP_PROTOCOL, HTTP_TLS_PROTOCOL, QUIC_PROTOCOL, TCP_PROTOCOL,
    TCP_TLS_PROTOCOL,
};
use lazy_static::lazy_static;
use std::{
    collections::{hash_map::Entry, HashMap},
    num::NonZeroU16,
    slice,
};
use tracing::debug;

lazy_static! {
    static ref G_BUILTIN_REGISTRY: ProtocolRegistry = ProtocolRegistry::builder()
        .with_builtin_protocols()
        .build()
        .expect("the built-in protocol table is malformed");
}

const fn nonzero(port: u16) -> NonZeroU16 {
    match NonZeroU16::new(port) {
        Some(port) => port,
        None => panic!("built-in default ports must not be zero"),
    }
}

const QUIC_PORT: NonZeroU16 = nonzero(DEFAULT_QUIC_PORT);
const TCP_PORT: NonZeroU16 = nonzero(DEFAULT_TCP_PORT);
const HTTP_PORT: NonZeroU16 = nonzero(DEFAULT_HTTP_PORT);

fn builtin_protocols() -> [ProtocolDefinition; 5] {
    [
        ProtocolDefinition::with_port(
            QUIC_PROTOCOL,
            QUIC_PORT,
            Transport::Quic,
            true,
            MessageEncoding::Binary,
        ),
        ProtocolDefinition::with_port(
            TCP_PROTOCOL,
            TCP_PORT,
            Transport::Tcp,
            false,
            MessageEncoding::Binary,
        ),
        ProtocolDefinition::with_port(
            TCP_TLS_PROTOCOL,
            TCP_PORT,
            Transport::Tcp,
            true,
            MessageEncoding::Binary,
        ),
        ProtocolDefinition::with_port(
            HTTP_PROTOCOL,
            HTTP_PORT,
            Transport::Http,
            false,
            MessageEncoding::Text,
        ),
        ProtocolDefinition::with_port(
            HTTP_TLS_PROTOCOL,
            HTTP_PORT,
            Transport::Http,
            true,
            MessageEncoding::Text,
        ),
    ]
}

/// An immutable catalog of protocol definitions.
///
/// Definitions are kept in declaration order for listing, with an index by identifier for
/// lookups. A [`ProtocolRegistry`] can't be modified once built, so a shared reference can be
/// handed out to any number of threads.
#[derive(Debug)]
pub struct ProtocolRegistry {
    definitions: Vec<ProtocolDefinition>,
    index: HashMap<String, usize>,
}

impl ProtocolRegistry {
    /// Get the process-wide registry of built-in protocols: `quic`, `tcp`, `tcp+tls`, `http` and
    /// `http+tls`. It is built on first use.
    pub fn builtin() -> &'static Self {
        &*G_BUILTIN_REGISTRY
    }

    pub fn builder() -> ProtocolRegistryBuilder {
        ProtocolRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, ProtocolDefinition> {
        self.definitions.iter()
    }
}

impl ProtocolProvider for ProtocolRegistry {
    fn supported_protocols(&self) -> &[ProtocolDefinition] {
        &self.definitions
    }

    fn protocol_definition(
        &self,
        identifier: &str,
    ) -> Result<&ProtocolDefinition> {
        self.index
            .get(identifier)
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| Error::UnsupportedProtocol {
                identifier: identifier.to_owned(),
            })
    }

    fn is_supported(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }
}

impl<'a> IntoIterator for &'a ProtocolRegistry {
    type Item = &'a ProtocolDefinition;
    type IntoIter = slice::Iter<'a, ProtocolDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collects protocol definitions and validates them into a [`ProtocolRegistry`].
#[derive(Debug, Default)]
pub struct ProtocolRegistryBuilder {
    definitions: Vec<ProtocolDefinition>,
}

impl ProtocolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the five built-in protocols, in their usual order.
    pub fn with_builtin_protocols(mut self) -> Self {
        self.definitions.extend(builtin_protocols());
        self
    }

    /// Add a protocol after the ones already added.
    pub fn protocol(mut self, definition: ProtocolDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Build the registry. Fails if an identifier is repeated.
    pub fn build(self) -> Result<ProtocolRegistry> {
        let mut index = HashMap::with_capacity(self.definitions.len());
        for (i, definition) in self.definitions.iter().enumerate() {
            match index.entry(definition.identifier().to_owned()) {
                Entry::Vacant(entry) => {
                    debug!(
                        "Protocol registered: {} (port {}, {}, tls: {}, {})",
                        entry.key(),
                        definition.default_port(),
                        definition.transport(),
                        definition.requires_tls(),
                        definition.encoding()
                    );
                    entry.insert(i);
                }
                Entry::Occupied(entry) => {
                    return Err(Error::DuplicateProtocol {
                        identifier: entry.key().clone(),
                    });
                }
            }
        }

        Ok(ProtocolRegistry {
            definitions: self.definitions,
            index,
        })
    }
}
