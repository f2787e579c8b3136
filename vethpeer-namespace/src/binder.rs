//! Joining the network namespace of another process

use std::fs::File;
use std::path::{Path, PathBuf};

use nix::sched::{CloneFlags, setns};
use vethpeer_core::config::{DEFAULT_PROC_ROOT, netns_path};
use vethpeer_core::{Error, ProcessId, Result};

/// Binds the calling process to the network namespace of a target pid
///
/// The switch is irreversible for the caller; only call [`bind`](Self::bind)
/// from a disposable worker process.
#[derive(Debug, Clone)]
pub struct NamespaceBinder {
    proc_root: PathBuf,
}

impl NamespaceBinder {
    /// Create a binder resolving namespaces under `proc_root`
    #[must_use]
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    /// procfs mount this binder resolves against
    #[must_use]
    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    /// Path of the network namespace handle for `pid`
    #[must_use]
    pub fn namespace_path(&self, pid: ProcessId) -> PathBuf {
        netns_path(&self.proc_root, pid)
    }

    /// Join the network namespace of `pid`
    ///
    /// The namespace handle is closed before returning, on success and failure.
    ///
    /// # Errors
    /// Returns error if the handle cannot be opened (no such process, no
    /// permission) or if `setns(2)` rejects it (missing `CAP_SYS_ADMIN`)
    pub fn bind(&self, pid: ProcessId) -> Result<()> {
        let path = self.namespace_path(pid);

        tracing::debug!(pid = %pid, path = %path.display(), "Opening network namespace");

        let handle = File::open(&path).map_err(|e| {
            tracing::debug!(
                pid = %pid,
                path = %path.display(),
                error = %e,
                "Failed to open network namespace"
            );
            Error::Namespace {
                pid: pid.to_string(),
                message: format!("cannot open {}: {e}", path.display()),
            }
        })?;

        setns(&handle, CloneFlags::CLONE_NEWNET).map_err(|e| {
            tracing::debug!(pid = %pid, error = %e, "setns(CLONE_NEWNET) rejected");
            Error::Namespace {
                pid: pid.to_string(),
                message: format!("setns failed: {e}"),
            }
        })?;

        tracing::debug!(pid = %pid, "Joined network namespace");

        Ok(())
    }

}

impl Default for NamespaceBinder {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

/// Join the network namespace of `pid` using the default `/proc` mount
///
/// # Errors
/// See [`NamespaceBinder::bind`]
pub fn bind_to_namespace(pid: ProcessId) -> Result<()> {
    NamespaceBinder::default().bind(pid)
}
