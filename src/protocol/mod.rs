//! Supported connection protocols.
//!
//! This module has two main items:
//!
//! - The [`ProtocolDefinition`] struct, which describes what a protocol identifier such as
//!   `tcp+tls` means: which port to connect to by default, which transport to use, whether TLS
//!   is required and how messages are encoded.
//! - The [`ProtocolProvider`] trait, implemented by [`ProtocolRegistry`], which answers whether a
//!   protocol identifier is supported and returns its definition.

use std::result;
use thiserror::Error;

pub use self::{
    definition::{
        MessageEncoding, ProtocolDefinition, ResolvedProtocol, Transport,
    },
    registry::{ProtocolRegistry, ProtocolRegistryBuilder},
};

mod definition;
mod registry;


pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_TCP_PORT: u16 = 8090;
pub const DEFAULT_QUIC_PORT: u16 = 8080;

pub static QUIC_PROTOCOL: &str = "quic";
pub static TCP_PROTOCOL: &str = "tcp";
pub static TCP_TLS_PROTOCOL: &str = "tcp+tls";
pub static HTTP_PROTOCOL: &str = "http";
pub static HTTP_TLS_PROTOCOL: &str = "http+tls";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("protocol not supported: {identifier:?}")]
    UnsupportedProtocol { identifier: String },

    #[error("protocol {identifier:?} is defined more than once")]
    DuplicateProtocol { identifier: String },

    #[error("invalid port 0 for protocol {identifier:?}")]
    InvalidPort { identifier: String },

    #[error("protocol identifiers must not be empty")]
    EmptyIdentifier,
}

pub type Result<T> = result::Result<T, Error>;

/// Trait for catalogs of supported protocols.
///
/// Lookups are exact and case-sensitive: `TCP` is not the same protocol as `tcp`.
pub trait ProtocolProvider {
    /// Get every supported protocol, in the order they were declared.
    fn supported_protocols(&self) -> &[ProtocolDefinition];

    /// Get the definition of the given protocol, or [`Error::UnsupportedProtocol`] if there's
    /// no protocol with that exact identifier.
    fn protocol_definition(&self, identifier: &str)
        -> Result<&ProtocolDefinition>;

    /// Check whether the given protocol is supported. Never fails.
    fn is_supported(&self, identifier: &str) -> bool {
        self.protocol_definition(identifier).is_ok()
    }

    /// Look up a protocol and pick the port a connection should use: `port` if the caller
    /// provided one, otherwise the protocol's default port.
    fn resolve(
        &self,
        identifier: &str,
        port: Option<u16>,
    ) -> Result<ResolvedProtocol<'_>> {
        let definition = self.protocol_definition(identifier)?;
        if port == Some(0) {
            return Err(Error::InvalidPort {
                identifier: identifier.to_owned(),
            });
        }

        Ok(ResolvedProtocol {
            definition,
            port: definition.port_or_default(port),
        })
    }
}
