//! Interface index and name resolution in the current namespace

#![allow(unsafe_code)]

use std::ffi::CStr;

use vethpeer_core::{Error, IfIndex, InterfaceName, Result};

/// Name of the interface with index `index`
///
/// # Errors
/// Returns [`Error::InterfaceNotFound`] if no interface has this index
pub fn index_to_name(index: IfIndex) -> Result<String> {
    let mut buf = [0_u8; libc::IF_NAMESIZE];

    // SAFETY: buf holds IF_NAMESIZE bytes as if_indextoname(3) requires
    let ret = unsafe { libc::if_indextoname(index.as_raw(), buf.as_mut_ptr().cast()) };
    if ret.is_null() {
        return Err(Error::InterfaceNotFound {
            index: index.as_raw(),
        });
    }

    let name = CStr::from_bytes_until_nul(&buf).map_err(|_| Error::InterfaceNotFound {
        index: index.as_raw(),
    })?;

    Ok(name.to_string_lossy().into_owned())
}

/// Index of the interface called `name`
///
/// # Errors
/// Returns error if no interface has this name
pub fn name_to_index(name: &InterfaceName) -> Result<IfIndex> {
    let index = nix::net::if_::if_nametoindex(name.as_str())?;
    Ok(IfIndex::from_raw(index))
}
