//! vethpeer core - shared error type, validated identifiers and lookup configuration
//!
//! This crate provides the types every other vethpeer crate builds on.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod types;

pub use config::LookupConfig;
pub use error::{Error, Result};
pub use types::{IfIndex, InterfaceName, ProcessId};

/// Name of the veth driver counter holding the peer interface index.
///
/// Exposed by the kernel veth driver through `ethtool -S`; must be matched exactly.
pub const PEER_IFINDEX_COUNTER: &str = "peer_ifindex";
