//! Lookup configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{InterfaceName, ProcessId};

/// Default procfs mount point
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Parameters of a single peer lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Process whose network namespace is joined
    pub pid: ProcessId,

    /// Interface inspected inside the target namespace
    pub interface: InterfaceName,

    /// procfs mount used to locate `<pid>/ns/net`
    pub proc_root: PathBuf,
}

impl LookupConfig {
    /// Create a lookup of `eth0` inside the namespace of `pid`
    #[must_use]
    pub fn new(pid: ProcessId) -> Self {
        Self {
            pid,
            interface: InterfaceName::default(),
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
        }
    }

    /// Set the interface to inspect
    #[must_use]
    pub fn with_interface(mut self, interface: InterfaceName) -> Self {
        self.interface = interface;
        self
    }

    /// Set the procfs mount point
    #[must_use]
    pub fn with_proc_root(mut self, proc_root: impl Into<PathBuf>) -> Self {
        self.proc_root = proc_root.into();
        self
    }

    /// Path of the target's network namespace handle
    #[must_use]
    pub fn namespace_path(&self) -> PathBuf {
        netns_path(&self.proc_root, self.pid)
    }
}

/// `<proc_root>/<pid>/ns/net`
#[must_use]
pub fn netns_path(proc_root: &Path, pid: ProcessId) -> PathBuf {
    proc_root.join(pid.to_string()).join("ns").join("net")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LookupConfig::new(ProcessId::from_raw(42));
        assert_eq!(config.interface.as_str(), "eth0");
        assert_eq!(config.proc_root, PathBuf::from("/proc"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = LookupConfig::new(ProcessId::from_raw(42))
            .with_interface(InterfaceName::new("eth1").unwrap())
            .with_proc_root("/host/proc");

        assert_eq!(config.interface.as_str(), "eth1");
        assert_eq!(
            config.namespace_path(),
            PathBuf::from("/host/proc/42/ns/net")
        );
    }

    #[test]
    fn test_config_serde() {
        let config = LookupConfig::new(ProcessId::from_raw(7));
        let json = serde_json::to_string(&config).unwrap();
        let back: LookupConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
