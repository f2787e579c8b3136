//! Peer lookup orchestration

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};
use vethpeer_core::{IfIndex, LookupConfig, ProcessId};
use vethpeer_ethtool::{index_to_name, peer_index};
use vethpeer_namespace::{NamespaceBinder, run_isolated};

use crate::cli::Cli;

/// Host-side end of the inspected veth pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerLink {
    pub ifindex: IfIndex,
    pub ifname: String,
}

impl fmt::Display for PeerLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ifindex, self.ifname)
    }
}

/// Build the lookup configuration from command-line arguments
pub fn config_from_args(cli: &Cli) -> Result<LookupConfig> {
    let pid: ProcessId = cli.pid.parse().context("cannot set network namespace")?;

    Ok(LookupConfig::new(pid)
        .with_interface(cli.interface.clone())
        .with_proc_root(&cli.proc_root))
}

pub fn execute(config: &LookupConfig) -> Result<PeerLink> {
    if !nix::unistd::geteuid().is_root() {
        warn!("Not running as root; joining another network namespace needs CAP_SYS_ADMIN");
    }

    let binder = NamespaceBinder::new(&config.proc_root);

    debug!(
        pid = %config.pid,
        interface = %config.interface,
        namespace = %config.namespace_path().display(),
        "Looking up veth peer"
    );

    let interface = config.interface.clone();
    let ifindex = run_isolated(&binder, config.pid, move || peer_index(&interface))
        .context("cannot read from worker")?;

    let ifname =
        index_to_name(ifindex).with_context(|| format!("cannot find name of iface {ifindex}"))?;

    Ok(PeerLink { ifindex, ifname })
}
