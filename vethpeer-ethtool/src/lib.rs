//! veth peer discovery through the ethtool statistics interface
//!
//! The veth driver exposes the peer's interface index as the `peer_ifindex`
//! statistic. This crate reads it with a [`StatsClient`] over a pluggable
//! [`StatsDevice`], and resolves interface indexes to names.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod catalog;
pub mod client;
pub mod device;
pub mod iface;
pub mod socket;
pub mod sys;

pub use catalog::{CounterCatalog, CounterSnapshot};
pub use client::{StatsClient, peer_index};
pub use device::{DriverInfo, MockDevice, MockRequest, StatsDevice};
pub use iface::{index_to_name, name_to_index};
pub use socket::EthtoolSocket;
