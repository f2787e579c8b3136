//! Raw `SIOCETHTOOL` definitions from `<linux/ethtool.h>` and `<linux/sockios.h>`

#![allow(unsafe_code)]

use std::mem::size_of;

/// Generic ethtool ioctl request number
pub const SIOCETHTOOL: libc::c_ulong = 0x8946;

/// Get driver info
pub const ETHTOOL_GDRVINFO: u32 = 0x0000_0003;
/// Get a string set
pub const ETHTOOL_GSTRINGS: u32 = 0x0000_001b;
/// Get NIC-specific statistics
pub const ETHTOOL_GSTATS: u32 = 0x0000_001d;

/// String set of the statistics names
pub const ETH_SS_STATS: u32 = 1;

/// Width of one entry in a string set
pub const ETH_GSTRING_LEN: usize = 32;

/// Size of `struct ethtool_gstrings` without its data
pub const GSTRINGS_HEADER_LEN: usize = 3 * size_of::<u32>();

/// Size of the `ifr_ifru` union on 64-bit targets
const IFREQ_UNION_LEN: usize = 24;

/// `struct ifreq` restricted to the `ifr_data` member
#[repr(C)]
#[derive(Debug)]
pub struct IfReq {
    /// Interface name, NUL padded
    pub ifr_name: [u8; libc::IFNAMSIZ],
    /// Pointer to the ethtool command structure
    pub ifr_data: *mut libc::c_void,
    _pad: [u8; IFREQ_UNION_LEN - size_of::<*mut libc::c_void>()],
}

impl IfReq {
    /// Request addressed to `name` carrying `data`
    #[must_use]
    pub const fn new(name: [u8; libc::IFNAMSIZ], data: *mut libc::c_void) -> Self {
        Self {
            ifr_name: name,
            ifr_data: data,
            _pad: [0; IFREQ_UNION_LEN - size_of::<*mut libc::c_void>()],
        }
    }
}

/// `struct ethtool_drvinfo`
#[repr(C)]
#[derive(Debug, Clone)]
pub struct EthtoolDrvInfo {
    /// Command, `ETHTOOL_GDRVINFO`
    pub cmd: u32,
    /// Driver short name
    pub driver: [u8; 32],
    /// Driver version
    pub version: [u8; 32],
    /// Firmware version
    pub fw_version: [u8; 32],
    /// Bus address
    pub bus_info: [u8; 32],
    /// Expansion ROM version
    pub erom_version: [u8; 32],
    reserved2: [u8; 12],
    /// Number of private flags
    pub n_priv_flags: u32,
    /// Number of NIC-specific statistics
    pub n_stats: u32,
    /// Self-test result count
    pub testinfo_len: u32,
    /// EEPROM dump size
    pub eedump_len: u32,
    /// Register dump size
    pub regdump_len: u32,
}

impl EthtoolDrvInfo {
    /// Zeroed `ETHTOOL_GDRVINFO` request
    #[must_use]
    pub const fn request() -> Self {
        Self {
            cmd: ETHTOOL_GDRVINFO,
            driver: [0; 32],
            version: [0; 32],
            fw_version: [0; 32],
            bus_info: [0; 32],
            erom_version: [0; 32],
            reserved2: [0; 12],
            n_priv_flags: 0,
            n_stats: 0,
            testinfo_len: 0,
            eedump_len: 0,
            regdump_len: 0,
        }
    }
}

nix::ioctl_readwrite_bad!(
    /// Issue `SIOCETHTOOL` on `fd`
    siocethtool,
    SIOCETHTOOL,
    IfReq
);

/// Text of a NUL-padded fixed-width C string
#[must_use]
pub fn fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
