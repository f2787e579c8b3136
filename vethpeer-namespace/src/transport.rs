//! One-shot result channel between the worker and the controller
//!
//! A pipe carrying exactly one native-endian interface index. The worker
//! writes it only on success; an empty channel means the worker failed.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::OwnedFd;

use nix::unistd::pipe;
use vethpeer_core::{Error, IfIndex, Result};

/// Write end, owned by the worker
#[derive(Debug)]
pub struct ResultSender {
    file: File,
}

/// Read end, owned by the controller
#[derive(Debug)]
pub struct ResultReceiver {
    file: File,
}

/// Create a result channel
///
/// # Errors
/// Returns error if `pipe(2)` fails
pub fn channel() -> Result<(ResultSender, ResultReceiver)> {
    let (read_end, write_end) = pipe()?;
    Ok((
        ResultSender::from(write_end),
        ResultReceiver::from(read_end),
    ))
}

impl ResultSender {
    /// Send the index and close the channel
    ///
    /// # Errors
    /// Returns error if the write fails (e.g. the controller is gone)
    pub fn send(mut self, index: IfIndex) -> Result<()> {
        self.file.write_all(&index.to_wire())?;
        Ok(())
    }
}

impl From<OwnedFd> for ResultSender {
    fn from(fd: OwnedFd) -> Self {
        Self {
            file: File::from(fd),
        }
    }
}

impl ResultReceiver {
    /// Block until the worker sends an index or closes its end
    ///
    /// Returns `Ok(None)` when the channel closed without any data.
    ///
    /// # Errors
    /// Returns error on a read failure or a truncated message
    pub fn recv(mut self) -> Result<Option<IfIndex>> {
        let mut buf = [0_u8; IfIndex::WIRE_SIZE];
        let mut filled = 0;

        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            n if n == buf.len() => Ok(Some(IfIndex::from_wire(buf))),
            n => Err(Error::Transport {
                message: format!("short read: {n} of {} bytes", buf.len()),
            }),
        }
    }
}

impl From<OwnedFd> for ResultReceiver {
    fn from(fd: OwnedFd) -> Self {
        Self {
            file: File::from(fd),
        }
    }
}
