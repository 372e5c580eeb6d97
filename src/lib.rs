pub mod protocol;

pub use crate::protocol::{
    ProtocolDefinition, ProtocolProvider, ProtocolRegistry,
};
