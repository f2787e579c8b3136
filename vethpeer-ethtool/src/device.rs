//! Statistics device trait for pluggable implementations

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use nix::errno::Errno;
use vethpeer_core::{Error, InterfaceName, Result};

use crate::catalog::{CounterCatalog, CounterSnapshot};

/// Driver information relevant to the statistics protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    /// Driver short name (e.g. `veth`)
    pub driver: String,
    /// Number of statistics the driver exposes
    pub n_stats: u32,
}

/// Trait for ethtool statistics sources
///
/// This allows for different implementations:
/// - [`EthtoolSocket`](crate::EthtoolSocket) - `SIOCETHTOOL` on a real interface
/// - [`MockDevice`] - Testing without a kernel driver
///
/// Buffers are sized by the caller; implementations fill at most
/// `catalog.len()` names and `snapshot.len()` values.
pub trait StatsDevice {
    /// Interface the requests are addressed to
    fn interface(&self) -> &InterfaceName;

    /// Query driver information (`ETHTOOL_GDRVINFO`)
    ///
    /// # Errors
    /// Returns error if the request is rejected
    fn driver_info(&self) -> Result<DriverInfo>;

    /// Fill `catalog` with statistics names (`ETHTOOL_GSTRINGS`, `ETH_SS_STATS`)
    ///
    /// # Errors
    /// Returns error if the request is rejected
    fn read_strings(&self, catalog: &mut CounterCatalog) -> Result<()>;

    /// Fill `snapshot` with statistics values (`ETHTOOL_GSTATS`)
    ///
    /// # Errors
    /// Returns error if the request is rejected
    fn read_stats(&self, snapshot: &mut CounterSnapshot) -> Result<()>;
}

/// Request observed by a [`MockDevice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRequest {
    /// `ETHTOOL_GDRVINFO`
    DriverInfo,
    /// `ETHTOOL_GSTRINGS` with a catalog of `slots` names
    Strings {
        /// Catalog size supplied by the caller
        slots: usize,
    },
    /// `ETHTOOL_GSTATS` with a snapshot of `slots` values
    Stats {
        /// Snapshot size supplied by the caller
        slots: usize,
    },
}

/// Mock device for testing (no kernel driver involved)
///
/// # Example
/// ```
/// use vethpeer_core::InterfaceName;
/// use vethpeer_ethtool::{MockDevice, StatsClient};
///
/// let device = MockDevice::new(InterfaceName::default())
///     .with_counter("rx_queue_0_xdp_packets", 0)
///     .with_counter("peer_ifindex", 7);
///
/// let client = StatsClient::new(device.clone());
/// assert_eq!(client.peer_index().unwrap().as_raw(), 7);
/// assert_eq!(device.call_count(), 3);
/// ```
#[derive(Clone)]
pub struct MockDevice {
    interface: InterfaceName,
    state: Rc<RefCell<MockState>>,
}

#[derive(Default)]
struct MockState {
    driver: String,
    counters: Vec<(String, u64)>,
    reported_counts: VecDeque<u32>,
    failures: Vec<(MockRequest, Errno)>,
    requests: Vec<MockRequest>,
}

impl MockDevice {
    /// Create a mock `veth` device with no counters
    #[must_use]
    pub fn new(interface: InterfaceName) -> Self {
        Self {
            interface,
            state: Rc::new(RefCell::new(MockState {
                driver: "veth".to_string(),
                ..MockState::default()
            })),
        }
    }

    /// Append a counter
    #[must_use]
    pub fn with_counter(self, name: impl Into<String>, value: u64) -> Self {
        self.state.borrow_mut().counters.push((name.into(), value));
        self
    }

    /// Set the driver name
    #[must_use]
    pub fn with_driver(self, driver: impl Into<String>) -> Self {
        self.state.borrow_mut().driver = driver.into();
        self
    }

    /// Report these counts from successive driver info queries instead of the
    /// real number of counters
    #[must_use]
    pub fn with_reported_counts(self, counts: impl IntoIterator<Item = u32>) -> Self {
        self.state.borrow_mut().reported_counts.extend(counts);
        self
    }

    /// Reject requests of the given kind with `errno`
    ///
    /// Only the variant of `request` is considered, not its slot count.
    #[must_use]
    pub fn failing(self, request: MockRequest, errno: Errno) -> Self {
        self.state.borrow_mut().failures.push((request, errno));
        self
    }

    /// Requests received so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<MockRequest> {
        self.state.borrow().requests.clone()
    }

    /// Get the number of requests made (for testing)
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    fn record(&self, request: MockRequest, name: &'static str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request);

        let failure = state
            .failures
            .iter()
            .find(|(kind, _)| std::mem::discriminant(kind) == std::mem::discriminant(&request));

        match failure {
            Some(&(_, errno)) => Err(Error::Ethtool {
                request: name,
                interface: self.interface.to_string(),
                source: errno,
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for MockDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDevice")
            .field("interface", &self.interface)
            .finish_non_exhaustive()
    }
}

impl StatsDevice for MockDevice {
    fn interface(&self) -> &InterfaceName {
        &self.interface
    }

    fn driver_info(&self) -> Result<DriverInfo> {
        self.record(MockRequest::DriverInfo, "ETHTOOL_GDRVINFO")?;

        let mut state = self.state.borrow_mut();
        #[allow(clippy::cast_possible_truncation)]
        let actual = state.counters.len() as u32;
        let n_stats = state.reported_counts.pop_front().unwrap_or(actual);

        tracing::debug!(n_stats, "Mock: driver info");

        Ok(DriverInfo {
            driver: state.driver.clone(),
            n_stats,
        })
    }

    fn read_strings(&self, catalog: &mut CounterCatalog) -> Result<()> {
        self.record(
            MockRequest::Strings {
                slots: catalog.len(),
            },
            "ETHTOOL_GSTRINGS",
        )?;

        let state = self.state.borrow();
        for (i, (name, _)) in state.counters.iter().take(catalog.len()).enumerate() {
            catalog.set(i, name.as_bytes());
        }

        tracing::debug!(slots = catalog.len(), "Mock: read strings");

        Ok(())
    }

    fn read_stats(&self, snapshot: &mut CounterSnapshot) -> Result<()> {
        self.record(
            MockRequest::Stats {
                slots: snapshot.len(),
            },
            "ETHTOOL_GSTATS",
        )?;

        let state = self.state.borrow();
        for (slot, (_, value)) in snapshot.as_mut_slice().iter_mut().zip(&state.counters) {
            *slot = *value;
        }

        tracing::debug!(slots = snapshot.len(), "Mock: read stats");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reports_actual_count() {
        let device = MockDevice::new(InterfaceName::default())
            .with_counter("a", 1)
            .with_counter("b", 2);

        let info = device.driver_info().unwrap();
        assert_eq!(info.n_stats, 2);
        assert_eq!(info.driver, "veth");
        assert_eq!(device.requests(), vec![MockRequest::DriverInfo]);
    }

    #[test]
    fn test_mock_reported_counts_sequence() {
        let device = MockDevice::new(InterfaceName::default())
            .with_counter("a", 1)
            .with_reported_counts([5, 9]);

        assert_eq!(device.driver_info().unwrap().n_stats, 5);
        assert_eq!(device.driver_info().unwrap().n_stats, 9);
        assert_eq!(device.driver_info().unwrap().n_stats, 1);
    }

    #[test]
    fn test_mock_fills_only_supplied_slots() {
        let device = MockDevice::new(InterfaceName::default())
            .with_counter("a", 1)
            .with_counter("b", 2)
            .with_counter("c", 3);

        let mut catalog = CounterCatalog::with_slots(2);
        device.read_strings(&mut catalog).unwrap();
        assert_eq!(catalog.position("b"), Some(1));
        assert_eq!(catalog.position("c"), None);

        let mut snapshot = CounterSnapshot::with_slots(4);
        device.read_stats(&mut snapshot).unwrap();
        assert_eq!(snapshot.get(2), Some(3));
        assert_eq!(snapshot.get(3), Some(0));
    }

    #[test]
    fn test_mock_failure_injection() {
        let device = MockDevice::new(InterfaceName::default())
            .failing(MockRequest::Stats { slots: 0 }, Errno::EOPNOTSUPP);

        let mut snapshot = CounterSnapshot::with_slots(1);
        let err = device.read_stats(&mut snapshot).unwrap_err();

        assert!(matches!(
            err,
            Error::Ethtool {
                request: "ETHTOOL_GSTATS",
                source: Errno::EOPNOTSUPP,
                ..
            }
        ));
        assert!(device.driver_info().is_ok());
        assert_eq!(device.call_count(), 2);
    }
}
