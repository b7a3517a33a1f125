//! crates/nfs4acl/src/error.rs
//!
//! Error types for decoding, targeting, text parsing and the OS bridge.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ace::WhoType;

/// Errors produced while decoding a `system.nfs4_acl` payload.
///
/// Every variant means the buffer is malformed; decoding stops at the first
/// problem and no partial ACL is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer cannot hold even the entry count.
    #[error("ACL buffer of {len} bytes is too short to hold the entry count")]
    TooShort {
        /// Length of the rejected buffer.
        len: usize,
    },
    /// The buffer ends before the fixed fields of an entry or inside its padding.
    #[error("ACL buffer truncated in entry {entry} at offset {offset}")]
    Truncated {
        /// Zero-based index of the entry being read.
        entry: usize,
        /// Byte offset the entry header or padding needed to reach.
        offset: usize,
    },
    /// The declared who length runs past the end of the buffer.
    #[error(
        "who length {who_length} of entry {entry} exceeds the {remaining} bytes remaining"
    )]
    WhoOverflow {
        /// Zero-based index of the entry being read.
        entry: usize,
        /// Who length declared on the wire.
        who_length: usize,
        /// Bytes left in the buffer after the entry header.
        remaining: usize,
    },
    /// The who bytes are not valid UTF-8.
    #[error("who string of entry {entry} is not valid UTF-8")]
    InvalidWho {
        /// Zero-based index of the entry being read.
        entry: usize,
    },
    /// Bytes remain after the last declared entry.
    #[error("ACL buffer has {} bytes after the last entry", .len - .consumed)]
    TrailingBytes {
        /// Bytes taken up by the entry count and the declared entries.
        consumed: usize,
        /// Length of the rejected buffer.
        len: usize,
    },
}

impl From<DecodeError> for io::Error {
    fn from(err: DecodeError) -> Self {
        Self::new(io::ErrorKind::InvalidData, err)
    }
}

/// Errors produced when an ACE selector cannot be used.
///
/// The ACL is never modified when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TargetError {
    /// Named principals have no single who-type match; target them by who string.
    #[error("who type {0:?} cannot be used as a target")]
    UnsupportedWhoType(WhoType),
    /// The raw who-type value is outside the defined range.
    #[error("who type value {0} is out of range")]
    OutOfRange(u32),
}

/// Errors produced while parsing mask or flag text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text contains a character with no meaning in this column.
    #[error("unknown {column} character '{character}'")]
    UnknownCharacter {
        /// Column being parsed ("mask" or "flag").
        column: &'static str,
        /// Offending character.
        character: char,
    },
    /// A `0x` literal could not be parsed as a 32-bit value.
    #[error("invalid hexadecimal value '{0}'")]
    InvalidHex(String),
}

/// Error produced when the OS refuses to read or write the ACL attribute.
///
/// The underlying [`io::Error`] is passed through untouched.
#[derive(Debug)]
pub struct XattrError {
    context: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl XattrError {
    /// Creates a new [`XattrError`] from the supplied context, path, and source error.
    #[must_use]
    pub fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the operation being performed when the error occurred.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// Returns the path involved in the failing operation.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying [`io::Error`] that triggered this failure.
    #[must_use]
    pub fn source_error(&self) -> &io::Error {
        &self.source
    }

    /// Consumes the error and returns its constituent parts.
    #[must_use]
    pub fn into_parts(self) -> (&'static str, PathBuf, io::Error) {
        (self.context, self.path, self.source)
    }
}

impl fmt::Display for XattrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} '{}': {}",
            self.context,
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for XattrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Any failure surfaced by the load/modify/store pipeline.
#[derive(Debug, Error)]
pub enum AclError {
    /// The stored payload is malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A mutation selector was rejected.
    #[error(transparent)]
    Target(#[from] TargetError),
    /// Mask or flag text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The OS bridge failed.
    #[error(transparent)]
    Xattr(#[from] XattrError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_messages_carry_context() {
        assert_eq!(
            DecodeError::TooShort { len: 3 }.to_string(),
            "ACL buffer of 3 bytes is too short to hold the entry count"
        );
        assert_eq!(
            DecodeError::Truncated { entry: 1, offset: 28 }.to_string(),
            "ACL buffer truncated in entry 1 at offset 28"
        );
        assert_eq!(
            DecodeError::WhoOverflow {
                entry: 0,
                who_length: 40,
                remaining: 8
            }
            .to_string(),
            "who length 40 of entry 0 exceeds the 8 bytes remaining"
        );
        assert_eq!(
            DecodeError::TrailingBytes { consumed: 28, len: 32 }.to_string(),
            "ACL buffer has 4 bytes after the last entry"
        );
    }

    #[test]
    fn decode_error_converts_to_invalid_data() {
        let err: io::Error = DecodeError::TooShort { len: 0 }.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn xattr_error_keeps_source_untouched() {
        let source = io::Error::from_raw_os_error(13);
        let err = XattrError::new("read NFSv4 ACL", Path::new("/srv/data"), source);

        assert_eq!(err.context(), "read NFSv4 ACL");
        assert_eq!(err.path(), Path::new("/srv/data"));
        assert_eq!(err.source_error().raw_os_error(), Some(13));
        assert!(err.to_string().starts_with("failed to read NFSv4 ACL '/srv/data': "));

        let (_, _, inner) = err.into_parts();
        assert_eq!(inner.raw_os_error(), Some(13));
    }

    #[test]
    fn acl_error_is_transparent() {
        let err = AclError::from(TargetError::UnsupportedWhoType(WhoType::Named));
        assert_eq!(err.to_string(), "who type Named cannot be used as a target");
    }
}
