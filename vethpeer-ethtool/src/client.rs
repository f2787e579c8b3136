//! Driver statistics protocol
//!
//! Looking up a counter takes three requests against one device:
//! 1. driver info, for the counter count `n`
//! 2. the `n` counter names, to resolve a name to its index
//! 3. the `n` counter values, to read the value at that index
//!
//! `n` is queried once and reused for both buffers.

use tracing::{debug, info};
use vethpeer_core::{Error, IfIndex, InterfaceName, PEER_IFINDEX_COUNTER, Result};

use crate::catalog::{CounterCatalog, CounterSnapshot};
use crate::device::StatsDevice;
use crate::socket::EthtoolSocket;

/// Counter lookups against a [`StatsDevice`]
#[derive(Debug)]
pub struct StatsClient<D> {
    device: D,
}

impl<D: StatsDevice> StatsClient<D> {
    /// Create a client over `device`
    #[must_use]
    pub const fn new(device: D) -> Self {
        Self { device }
    }

    /// Number of counters the driver exposes
    ///
    /// # Errors
    /// Returns error if the driver info request is rejected
    pub fn counter_count(&self) -> Result<usize> {
        let info = self.device.driver_info()?;

        debug!(
            interface = %self.device.interface(),
            driver = %info.driver,
            n_stats = info.n_stats,
            "Driver info"
        );

        Ok(info.n_stats as usize)
    }

    /// Position of `name` among the first `n` counter names
    ///
    /// # Errors
    /// Returns error if the strings request is rejected, or
    /// [`Error::CounterNotFound`] after scanning all `n` names
    pub fn resolve_index(&self, n: usize, name: &str) -> Result<usize> {
        let mut catalog = CounterCatalog::with_slots(n);
        self.device.read_strings(&mut catalog)?;

        catalog.position(name).ok_or_else(|| Error::CounterNotFound {
            counter: name.to_string(),
            interface: self.device.interface().to_string(),
            scanned: catalog.len(),
        })
    }

    /// Value of counter `index` in a snapshot of `n` counters
    ///
    /// # Errors
    /// Returns error if the stats request is rejected or `index` is not in
    /// the snapshot
    pub fn fetch_value(&self, n: usize, index: usize) -> Result<u64> {
        let mut snapshot = CounterSnapshot::with_slots(n);
        self.device.read_stats(&mut snapshot)?;

        snapshot.get(index).ok_or_else(|| Error::CounterNotFound {
            counter: format!("#{index}"),
            interface: self.device.interface().to_string(),
            scanned: snapshot.len(),
        })
    }

    /// Value of the counter called `name`
    ///
    /// # Errors
    /// Returns the first failing step's error
    pub fn counter_value(&self, name: &str) -> Result<u64> {
        let n = self.counter_count()?;
        let index = self.resolve_index(n, name)?;
        let value = self.fetch_value(n, index)?;

        debug!(
            interface = %self.device.interface(),
            counter = name,
            index,
            value,
            "Counter resolved"
        );

        Ok(value)
    }

    /// Interface index of the veth peer, from the `peer_ifindex` counter
    ///
    /// # Errors
    /// Returns error if the counter cannot be read or does not fit an index
    pub fn peer_index(&self) -> Result<IfIndex> {
        let value = self.counter_value(PEER_IFINDEX_COUNTER)?;
        let index = IfIndex::try_from(value)?;

        info!(interface = %self.device.interface(), peer_ifindex = %index, "Found veth peer");

        Ok(index)
    }
}

/// Peer interface index of the veth `interface` in the current namespace
///
/// # Errors
/// Returns error if the control socket cannot be opened or any request fails
pub fn peer_index(interface: &InterfaceName) -> Result<IfIndex> {
    StatsClient::new(EthtoolSocket::open(interface)?).peer_index()
}
