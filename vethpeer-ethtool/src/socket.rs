//! `SIOCETHTOOL` statistics device
//!
//! This module uses `unsafe` for the ioctl itself: the kernel writes through
//! the `ifr_data` pointer into buffers sized from the driver's reported count.

#![allow(unsafe_code)]

use std::os::fd::{AsRawFd, OwnedFd};

use nix::sys::socket::{AddressFamily, SockFlag, SockType, socket};
use vethpeer_core::{Error, InterfaceName, Result};

use crate::catalog::{CounterCatalog, CounterSnapshot};
use crate::device::{DriverInfo, StatsDevice};
use crate::sys::{
    self, ETH_GSTRING_LEN, ETH_SS_STATS, ETHTOOL_GSTATS, ETHTOOL_GSTRINGS, EthtoolDrvInfo,
    GSTRINGS_HEADER_LEN, IfReq,
};

/// Control socket bound to one interface name
///
/// The descriptor is closed when the socket is dropped.
#[derive(Debug)]
pub struct EthtoolSocket {
    fd: OwnedFd,
    interface: InterfaceName,
    ifr_name: [u8; libc::IFNAMSIZ],
}

impl EthtoolSocket {
    /// Open a control socket for `interface`
    ///
    /// # Errors
    /// Returns error if the socket cannot be created
    pub fn open(interface: &InterfaceName) -> Result<Self> {
        let fd = socket(
            AddressFamily::Inet,
            SockType::Datagram,
            SockFlag::SOCK_CLOEXEC,
            None,
        )?;

        // InterfaceName guarantees at most IFNAMSIZ - 1 bytes
        let mut ifr_name = [0_u8; libc::IFNAMSIZ];
        let bytes = interface.as_str().as_bytes();
        ifr_name[..bytes.len()].copy_from_slice(bytes);

        Ok(Self {
            fd,
            interface: interface.clone(),
            ifr_name,
        })
    }

    fn ioctl(&self, request: &'static str, data: *mut libc::c_void) -> Result<()> {
        let mut ifr = IfReq::new(self.ifr_name, data);

        // SAFETY: `ifr` and the buffer behind `data` outlive the call
        unsafe { sys::siocethtool(self.fd.as_raw_fd(), &raw mut ifr) }.map_err(|source| {
            tracing::debug!(
                interface = %self.interface,
                request,
                error = %source,
                "ethtool request rejected"
            );
            Error::Ethtool {
                request,
                interface: self.interface.to_string(),
                source,
            }
        })?;

        Ok(())
    }
}

impl StatsDevice for EthtoolSocket {
    fn interface(&self) -> &InterfaceName {
        &self.interface
    }

    fn driver_info(&self) -> Result<DriverInfo> {
        let mut info = EthtoolDrvInfo::request();
        self.ioctl("ETHTOOL_GDRVINFO", (&raw mut info).cast())?;

        Ok(DriverInfo {
            driver: sys::fixed_str(&info.driver),
            n_stats: info.n_stats,
        })
    }

    fn read_strings(&self, catalog: &mut CounterCatalog) -> Result<()> {
        let slots = catalog.len();
        let len = u32::try_from(slots).map_err(|_| Error::InvalidConfig {
            message: format!("too many counters: {slots}"),
        })?;

        // struct ethtool_gstrings { cmd, string_set, len, data[] }
        let mut buf = vec![0_u8; GSTRINGS_HEADER_LEN + slots * ETH_GSTRING_LEN];
        buf[0..4].copy_from_slice(&ETHTOOL_GSTRINGS.to_ne_bytes());
        buf[4..8].copy_from_slice(&ETH_SS_STATS.to_ne_bytes());
        buf[8..12].copy_from_slice(&len.to_ne_bytes());

        self.ioctl("ETHTOOL_GSTRINGS", buf.as_mut_ptr().cast())?;

        let returned = u32::from_ne_bytes([buf[8], buf[9], buf[10], buf[11]]) as usize;
        if returned != slots {
            tracing::warn!(
                interface = %self.interface,
                expected = slots,
                returned,
                "Driver returned a different number of counter names"
            );
        }

        let copied = returned.min(slots) * ETH_GSTRING_LEN;
        catalog.as_mut_bytes()[..copied]
            .copy_from_slice(&buf[GSTRINGS_HEADER_LEN..GSTRINGS_HEADER_LEN + copied]);

        Ok(())
    }

    fn read_stats(&self, snapshot: &mut CounterSnapshot) -> Result<()> {
        let slots = snapshot.len();
        let n_stats = u32::try_from(slots).map_err(|_| Error::InvalidConfig {
            message: format!("too many counters: {slots}"),
        })?;

        // struct ethtool_stats { cmd, n_stats, data[] }; the header is one u64 wide
        let mut header = [0_u8; 8];
        header[..4].copy_from_slice(&ETHTOOL_GSTATS.to_ne_bytes());
        header[4..].copy_from_slice(&n_stats.to_ne_bytes());

        let mut buf = vec![0_u64; 1 + slots];
        buf[0] = u64::from_ne_bytes(header);

        self.ioctl("ETHTOOL_GSTATS", buf.as_mut_ptr().cast())?;

        let header = buf[0].to_ne_bytes();
        let returned = u32::from_ne_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let copied = returned.min(slots);
        snapshot.as_mut_slice()[..copied].copy_from_slice(&buf[1..=copied]);

        Ok(())
    }
}
