//! Core type definitions with strong typing and validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Network interface name with the kernel's validation rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct InterfaceName(String);

impl InterfaceName {
    /// Maximum length for interface names (`IFNAMSIZ` minus the trailing NUL)
    pub const MAX_LENGTH: usize = 15;

    /// Create a new `InterfaceName` with validation
    ///
    /// # Errors
    /// Returns error if the name is empty, too long, `.`/`..`, or contains
    /// `/`, `:`, NUL or whitespace
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidConfig {
                message: "Interface name cannot be empty".to_string(),
            });
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(Error::InvalidConfig {
                message: format!(
                    "Interface name too long (max {} bytes): {name}",
                    Self::MAX_LENGTH
                ),
            });
        }

        if name == "." || name == ".." {
            return Err(Error::InvalidConfig {
                message: format!("Invalid interface name: {name}"),
            });
        }

        if name
            .chars()
            .any(|c| c == '/' || c == ':' || c == '\0' || c.is_whitespace())
        {
            return Err(Error::InvalidConfig {
                message: format!("Interface name contains an invalid character: {name:?}"),
            });
        }

        Ok(())
    }

    /// Get the interface name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InterfaceName {
    fn default() -> Self {
        Self("eth0".to_string())
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InterfaceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for InterfaceName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<InterfaceName> for String {
    fn from(name: InterfaceName) -> Self {
        name.0
    }
}

/// Process identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ProcessId(i32);

impl ProcessId {
    /// Create from raw PID
    #[must_use]
    pub const fn from_raw(pid: i32) -> Self {
        Self(pid)
    }

    /// Get the current process ID
    #[must_use]
    pub fn current() -> Self {
        #[allow(clippy::cast_possible_wrap)]
        Self(std::process::id() as i32)
    }

    /// Get raw PID value
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProcessId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i32>() {
            Ok(pid) if pid > 0 => Ok(Self(pid)),
            _ => Err(Error::InvalidConfig {
                message: format!("not a valid process id: {s:?}"),
            }),
        }
    }
}

/// Kernel interface index (`ifindex`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct IfIndex(u32);

impl IfIndex {
    /// Wire size of an index on the result channel
    pub const WIRE_SIZE: usize = std::mem::size_of::<u32>();

    /// Create from a raw index
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Get raw index value
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Native-endian encoding used on the result channel
    #[must_use]
    pub const fn to_wire(self) -> [u8; Self::WIRE_SIZE] {
        self.0.to_ne_bytes()
    }

    /// Decode a native-endian index received on the result channel
    #[must_use]
    pub const fn from_wire(bytes: [u8; Self::WIRE_SIZE]) -> Self {
        Self(u32::from_ne_bytes(bytes))
    }
}

impl TryFrom<u64> for IfIndex {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| Error::PeerIndexOutOfRange { value })
    }
}

impl fmt::Display for IfIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
