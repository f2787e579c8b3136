//! Running a lookup inside a foreign network namespace
//!
//! The namespace switch is confined to a forked worker so the controller's own
//! namespace is never touched. This module uses `unsafe` for fork(), which is
//! sound here because the controller is single-threaded when it forks.

#![allow(unsafe_code)]

use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork};
use tracing::{debug, error, warn};
use vethpeer_core::{Error, IfIndex, ProcessId, Result};

use crate::binder::NamespaceBinder;
use crate::transport::{self, ResultReceiver, ResultSender};

/// Run `job` in a worker bound to the network namespace of `pid`
///
/// The controller blocks until the worker either sends an index or exits.
/// The worker reports its own diagnostic on stderr and exits with status 1
/// without sending anything when the bind or the job fails.
///
/// # Errors
/// Returns error if the worker cannot be forked or delivers no index
pub fn run_isolated<F>(binder: &NamespaceBinder, pid: ProcessId, job: F) -> Result<IfIndex>
where
    F: FnOnce() -> Result<IfIndex>,
{
    let (tx, rx) = transport::channel()?;

    debug!(pid = %pid, "Forking namespace worker");

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            drop(tx);
            controller(child, rx)
        }
        Ok(ForkResult::Child) => {
            drop(rx);
            worker(binder, pid, job, tx)
        }
        Err(e) => Err(Error::Transport {
            message: format!("cannot fork worker: {e}"),
        }),
    }
}

/// Controller: read the worker's result, then reap it
fn controller(child: Pid, rx: ResultReceiver) -> Result<IfIndex> {
    let received = rx.recv();
    let status = reap(child);

    match received? {
        Some(index) => {
            debug!(worker = %child, ifindex = %index, "Received peer index");
            Ok(index)
        }
        None => Err(Error::Transport {
            message: match status {
                Some(code) => format!("worker exited with status {code} without a result"),
                None => "worker exited without a result".to_string(),
            },
        }),
    }
}

/// Wait for the worker to terminate, returning its exit code
fn reap(child: Pid) -> Option<i32> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                debug!(worker = %child, code, "Worker exited");
                return Some(code);
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                warn!(worker = %child, ?signal, "Worker terminated by signal");
                // Exit codes for signals: 128 + signal number
                return Some(128 + signal as i32);
            }
            Ok(status) => {
                debug!(worker = %child, ?status, "Worker status");
            }
            Err(nix::errno::Errno::EINTR) => {}
            Err(nix::errno::Errno::ECHILD) => {
                warn!(worker = %child, "Worker no longer exists");
                return None;
            }
            Err(e) => {
                error!(worker = %child, error = %e, "Wait failed");
                return None;
            }
        }
    }
}

/// Worker: bind, run the job, emit the result. Never returns.
fn worker<F>(binder: &NamespaceBinder, pid: ProcessId, job: F, tx: ResultSender) -> !
where
    F: FnOnce() -> Result<IfIndex>,
{
    if let Err(e) = binder.bind(pid) {
        eprintln!("error: {e}");
        exit_worker(1);
    }

    let index = match job() {
        Ok(index) => index,
        Err(e) => {
            eprintln!("error: cannot find peer ifindex: {e}");
            exit_worker(1);
        }
    };

    if let Err(e) = tx.send(index) {
        eprintln!("error: cannot write to controller: {e}");
        exit_worker(1);
    }

    exit_worker(0)
}

/// Terminate the worker without running the controller's exit handlers
fn exit_worker(code: i32) -> ! {
    unsafe { libc::_exit(code) }
}
