//! crates/nfs4acl/src/xattr.rs
//!
//! Bridge between the codec and the `system.nfs4_acl` extended attribute.
//!
//! On Linux the NFS client (and a few local file systems) expose the ACL of a
//! file as the raw payload handled by [`crate::wire`]. This module only moves
//! bytes: it reads the attribute, reports whether the path is a directory, and
//! writes a payload back with `XATTR_REPLACE` so that a file without an ACL is
//! never given one implicitly. OS errors are returned untouched inside
//! [`XattrError`]; nothing is retried.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nfs4acl::xattr::{load_acl, store_acl};
//! use nfs4acl::AccessMask;
//! use std::path::Path;
//!
//! let path = Path::new("/mnt/nfs/report.txt");
//! let mut acl = load_acl(path)?;
//! acl.remove_mask(AccessMask::WRITE_DATA);
//! store_acl(path, &acl)?;
//! ```

use std::fs;
use std::io;
use std::path::Path;

use rustix::fs::XattrFlags;

use crate::acl::Nfs4Acl;
use crate::error::{AclError, XattrError};
use crate::trace::trace_xattr;
use crate::wire::{decode, encode};

/// The extended attribute name for NFSv4 ACLs.
pub const NFS4_ACL_XATTR: &str = "system.nfs4_acl";

/// Write mode used when storing a payload: the attribute must already exist.
pub const NFS4_ACL_WRITE_FLAGS: XattrFlags = XattrFlags::REPLACE;

/// Reads the raw ACL payload of `path` and whether `path` is a directory.
///
/// Symlinks are followed. A path without the attribute yields an error whose
/// source has [`io::ErrorKind::NotFound`].
pub fn get_raw(path: &Path) -> Result<(Vec<u8>, bool), XattrError> {
    let metadata =
        fs::metadata(path).map_err(|error| XattrError::new("stat", path, error))?;

    let data = xattr::get_deref(path, NFS4_ACL_XATTR)
        .map_err(|error| XattrError::new("read NFSv4 ACL", path, error))?
        .ok_or_else(|| {
            XattrError::new(
                "read NFSv4 ACL",
                path,
                io::Error::new(io::ErrorKind::NotFound, "no system.nfs4_acl attribute"),
            )
        })?;

    trace_xattr("read", path, data.len());
    Ok((data, metadata.is_dir()))
}

/// Replaces the raw ACL payload of `path`.
pub fn set_raw(path: &Path, data: &[u8]) -> Result<(), XattrError> {
    rustix::fs::setxattr(path, NFS4_ACL_XATTR, data, NFS4_ACL_WRITE_FLAGS)
        .map_err(|errno| XattrError::new("write NFSv4 ACL", path, io::Error::from(errno)))?;

    trace_xattr("write", path, data.len());
    Ok(())
}

/// Reads and decodes the ACL of `path`.
pub fn load_acl(path: &Path) -> Result<Nfs4Acl, AclError> {
    let (data, is_directory) = get_raw(path)?;
    Ok(decode(&data, is_directory)?)
}

/// Encodes `acl` and stores it on `path`.
pub fn store_acl(path: &Path, acl: &Nfs4Acl) -> Result<(), AclError> {
    set_raw(path, &encode(acl))?;
    Ok(())
}

/// Returns true if `path` carries a readable NFSv4 ACL attribute.
pub fn has_nfs4_acl(path: &Path) -> bool {
    get_raw(path).is_ok()
}
