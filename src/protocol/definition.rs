use crate::protocol::{Error, Result};
use serde_derive::Serialize;
use std::num::NonZeroU16;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Transport family a protocol runs on top of.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Transport {
    Quic,
    Tcp,
    Http,
}

/// How messages are serialized over a protocol.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageEncoding {
    Binary,
    Text,
}

/// Connection metadata for a single protocol identifier.
///
/// Definitions are plain values: once created they are never modified, and clones are
/// independent of each other. Every definition has a non-empty identifier and a nonzero default
/// port.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ProtocolDefinition {
    identifier: String,
    default_port: NonZeroU16,
    transport: Transport,
    requires_tls: bool,
    encoding: MessageEncoding,
}

impl ProtocolDefinition {
    /// Create a definition. Fails with [`Error::EmptyIdentifier`] or [`Error::InvalidPort`] if
    /// `identifier` is empty or `default_port` is zero.
    pub fn new<I>(
        identifier: I,
        default_port: u16,
        transport: Transport,
        requires_tls: bool,
        encoding: MessageEncoding,
    ) -> Result<Self>
    where
        I: Into<String>,
    {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(Error::EmptyIdentifier);
        }
        let default_port = NonZeroU16::new(default_port)
            .ok_or_else(|| Error::InvalidPort {
                identifier: identifier.clone(),
            })?;

        Ok(Self::with_port(
            identifier,
            default_port,
            transport,
            requires_tls,
            encoding,
        ))
    }

    pub(crate) fn with_port<I>(
        identifier: I,
        default_port: NonZeroU16,
        transport: Transport,
        requires_tls: bool,
        encoding: MessageEncoding,
    ) -> Self
    where
        I: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            default_port,
            transport,
            requires_tls,
            encoding,
        }
    }

    /// The canonical, lowercase name of the protocol, e.g. `tcp+tls`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Port to connect to when the caller doesn't provide one.
    pub fn default_port(&self) -> u16 {
        self.default_port.get()
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Whether connections using this protocol must be encrypted.
    pub fn requires_tls(&self) -> bool {
        self.requires_tls
    }

    pub fn encoding(&self) -> MessageEncoding {
        self.encoding
    }

    /// Return `port` if given, otherwise the default port of this protocol.
    pub fn port_or_default(&self, port: Option<u16>) -> u16 {
        port.unwrap_or_else(|| self.default_port.get())
    }
}

/// A protocol definition paired with the port a connection should actually use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedProtocol<'a> {
    #[serde(flatten)]
    pub definition: &'a ProtocolDefinition,

    /// Either the port requested by the caller or the protocol's default port.
    pub port: u16,
}
