#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `nfs4acl` reads, edits, and writes NFSv4 Access Control Lists in the binary
//! form Linux exposes through the `system.nfs4_acl` extended attribute.
//!
//! NFSv4 ACLs differ significantly from POSIX ACLs:
//!
//! - **ACE-based model**: Each Access Control Entry (ACE) specifies allow/deny
//!   permissions for a specific principal (user, group, or special identifiers).
//! - **Granular permissions**: 14 distinct permission bits vs POSIX's 3 (rwx).
//! - **Inheritance**: Rich inheritance model for directories.
//! - **Order matters**: ACEs are evaluated in order; first match wins.
//!
//! # Design
//!
//! - [`atom`] holds the big-endian `u32` accessors and the padding rule.
//! - [`Nfs4Ace`] and [`Nfs4Acl`] are the data model. The principal
//!   classification ([`WhoType`]) is derived from the who string on demand.
//! - [`decode`] and [`encode`] convert between the model and the attribute
//!   payload; [`Nfs4Acl::modify_mask`] and its wrappers edit masks in bulk.
//! - [`render_ace`] and [`render_acl`] produce the `TYPE:FLAGS:WHO:MASK`
//!   notation; [`parse_access_mask`] reads the mask column back.
//! - `xattr` (feature `xattr`, Unix only) moves payloads to and from the file
//!   system.
//!
//! # Invariants
//!
//! - Decoding never reads outside the supplied buffer and never returns a
//!   partially parsed ACL.
//! - `decode(&encode(&acl), acl.is_directory()).entries() == acl.entries()`.
//! - An accepted payload ends exactly after its last padded entry, and
//!   re-encoding it reproduces it byte for byte when its padding is zero.
//! - Mutations never reorder entries.
//!
//! # Errors
//!
//! [`DecodeError`] reports malformed payloads, [`TargetError`] rejected
//! mutation selectors, [`ParseError`] bad mask text, and [`XattrError`] OS
//! failures. [`AclError`] wraps all four for callers that chain them.
//!
//! # Examples
//!
//! ```
//! use nfs4acl::{AccessMask, WhoType, decode, encode, render_acl};
//!
//! let payload = [
//!     0, 0, 0, 1, // one entry
//!     0, 0, 0, 0, // ALLOW
//!     0, 0, 0, 0, // no flags
//!     0, 0, 0, 2, // WRITE_DATA
//!     0, 0, 0, 6, // who length
//!     b'O', b'W', b'N', b'E', b'R', b'@', 0, 0,
//! ];
//!
//! let mut acl = decode(&payload, false)?;
//! assert_eq!(acl.entries()[0].who_type(), WhoType::Owner);
//! assert_eq!(render_acl(&acl, false), "A::OWNER@:w\n");
//!
//! acl.apply_mask(AccessMask::READ_DATA);
//! assert_eq!(render_acl(&acl, false), "A::OWNER@:rw\n");
//! assert_eq!(encode(&acl)[15], 3);
//! # Ok::<(), nfs4acl::DecodeError>(())
//! ```

mod ace;
mod acl;
pub mod atom;
mod error;
mod parse;
mod render;
mod trace;
mod wire;

#[cfg(all(unix, feature = "xattr"))]
pub mod xattr;

pub use ace::{
    AccessMask, AceFlags, AceType, Nfs4Ace, WHO_EVERYONE, WHO_GROUP, WHO_OWNER, WhoType,
};
pub use acl::{AceSelector, MaskOp, Nfs4Acl};
pub use error::{AclError, DecodeError, ParseError, TargetError, XattrError};
pub use parse::{parse_access_mask, parse_flags};
pub use render::{render_ace, render_acl, render_flags, render_mask};
pub use wire::{decode, encode, encoded_len};
