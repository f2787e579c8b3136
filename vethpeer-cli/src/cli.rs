//! CLI argument definitions

use std::path::PathBuf;

use clap::Parser;
use vethpeer_core::InterfaceName;
use vethpeer_core::config::DEFAULT_PROC_ROOT;

#[derive(Parser)]
#[command(name = "vethpeer")]
#[command(about = "Find the host-side peer of a container's veth interface", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// procfs mount used to find the target namespace
    #[arg(long, default_value = DEFAULT_PROC_ROOT)]
    pub proc_root: PathBuf,

    /// Process whose network namespace is inspected
    pub pid: String,

    /// Interface inside the namespace whose veth peer is looked up
    #[arg(default_value = "eth0")]
    pub interface: InterfaceName,
}
