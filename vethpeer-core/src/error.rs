//! Error types for vethpeer

use thiserror::Error;

/// vethpeer error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Opening or joining a network namespace failed
    #[error("cannot set network namespace for pid {pid}: {message}")]
    Namespace {
        /// Target process, as given by the caller
        pid: String,
        /// Error message
        message: String,
    },

    /// An ethtool request was rejected by the kernel or the driver
    #[error("{request} on {interface} failed: {source}")]
    Ethtool {
        /// Request name (e.g. `ETHTOOL_GSTRINGS`)
        request: &'static str,
        /// Interface the request was addressed to
        interface: String,
        /// Underlying errno
        source: nix::Error,
    },

    /// Driver does not expose the requested counter
    #[error("counter {counter:?} not found on {interface} ({scanned} counters scanned)")]
    CounterNotFound {
        /// Counter name that was looked up
        counter: String,
        /// Interface whose counters were scanned
        interface: String,
        /// Number of catalog entries compared
        scanned: usize,
    },

    /// Counter value does not fit an interface index
    #[error("peer index {value} is out of range for an interface index")]
    PeerIndexOutOfRange {
        /// Raw counter value
        value: u64,
    },

    /// Worker produced no usable result on the result channel
    #[error("transport error: {message}")]
    Transport {
        /// Error message
        message: String,
    },

    /// Interface index does not name an existing interface
    #[error("no interface with index {index}")]
    InterfaceNotFound {
        /// Interface index that failed to resolve
        index: u32,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// System error from nix
    #[error("System error: {0}")]
    System(#[from] nix::Error),
}

/// Result type alias for vethpeer operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_error_mentions_pid() {
        let err = Error::Namespace {
            pid: "4242".to_string(),
            message: "No such file or directory".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("cannot set network namespace"));
        assert!(msg.contains("4242"));
    }

    #[test]
    fn test_ethtool_error_display() {
        let err = Error::Ethtool {
            request: "ETHTOOL_GDRVINFO",
            interface: "eth0".to_string(),
            source: nix::errno::Errno::ENODEV,
        };

        let msg = err.to_string();
        assert!(msg.starts_with("ETHTOOL_GDRVINFO on eth0 failed"));
    }

    #[test]
    fn test_counter_not_found_display() {
        let err = Error::CounterNotFound {
            counter: "peer_ifindex".to_string(),
            interface: "eth0".to_string(),
            scanned: 3,
        };

        assert_eq!(
            err.to_string(),
            "counter \"peer_ifindex\" not found on eth0 (3 counters scanned)"
        );
    }
}
