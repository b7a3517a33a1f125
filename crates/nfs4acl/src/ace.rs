//! crates/nfs4acl/src/ace.rs
//!
//! The access control entry and the bit and enum vocabularies it is built from.
//!
//! An NFSv4 ACE names a principal ("who"), says whether the entry allows,
//! denies, audits, or alarms, and carries two 32-bit masks: inheritance and
//! audit flags, and the access mask proper. The principal classification
//! ([`WhoType`]) is never stored; it is derived from the who string every time
//! it is asked for, so it cannot drift from the string it describes.

use std::fmt;

use crate::error::TargetError;

/// Who string denoting the file owner.
pub const WHO_OWNER: &str = "OWNER@";
/// Who string denoting the owning group.
pub const WHO_GROUP: &str = "GROUP@";
/// Who string denoting everyone.
pub const WHO_EVERYONE: &str = "EVERYONE@";

/// NFSv4 ACE type.
///
/// The wire carries a bare `u32`. Codes outside the four defined types are
/// kept verbatim in [`AceType::Other`] so that re-encoding a decoded ACL
/// reproduces the original bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AceType {
    /// Access allowed.
    Allow,
    /// Access denied.
    Deny,
    /// Audit (log access attempts).
    Audit,
    /// Alarm (trigger alarm on access).
    Alarm,
    /// Unrecognised type code.
    Other(u32),
}

impl AceType {
    /// Maps a wire code to its type.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Allow,
            1 => Self::Deny,
            2 => Self::Audit,
            3 => Self::Alarm,
            other => Self::Other(other),
        }
    }

    /// Returns the wire code for this type.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Allow => 0,
            Self::Deny => 1,
            Self::Audit => 2,
            Self::Alarm => 3,
            Self::Other(code) => code,
        }
    }
}

impl From<u32> for AceType {
    fn from(code: u32) -> Self {
        Self::from_code(code)
    }
}

/// Classification of an ACE principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum WhoType {
    /// Any principal other than the three special identifiers.
    Named = 0,
    /// `OWNER@`.
    Owner = 1,
    /// `GROUP@`.
    Group = 2,
    /// `EVERYONE@`.
    Everyone = 3,
}

impl WhoType {
    /// Classifies a who string by exact, case-sensitive comparison.
    #[must_use]
    pub fn of(who: &str) -> Self {
        match who {
            WHO_OWNER => Self::Owner,
            WHO_GROUP => Self::Group,
            WHO_EVERYONE => Self::Everyone,
            _ => Self::Named,
        }
    }

    /// Returns the special who string for this type, or `None` for [`WhoType::Named`].
    #[must_use]
    pub const fn special_who(self) -> Option<&'static str> {
        match self {
            Self::Named => None,
            Self::Owner => Some(WHO_OWNER),
            Self::Group => Some(WHO_GROUP),
            Self::Everyone => Some(WHO_EVERYONE),
        }
    }
}

impl TryFrom<u32> for WhoType {
    type Error = TargetError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Named),
            1 => Ok(Self::Owner),
            2 => Ok(Self::Group),
            3 => Ok(Self::Everyone),
            other => Err(TargetError::OutOfRange(other)),
        }
    }
}

/// NFSv4 ACE flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AceFlags(u32);

impl AceFlags {
    /// ACE applies to files in this directory.
    pub const FILE_INHERIT: u32 = 0x0001;
    /// ACE applies to subdirectories.
    pub const DIRECTORY_INHERIT: u32 = 0x0002;
    /// Don't propagate inheritance to children of children.
    pub const NO_PROPAGATE_INHERIT: u32 = 0x0004;
    /// ACE is for inheritance only, doesn't apply to this object.
    pub const INHERIT_ONLY: u32 = 0x0008;
    /// Audit or alarm on successful accesses.
    pub const SUCCESSFUL_ACCESS: u32 = 0x0010;
    /// Audit or alarm on failed accesses.
    pub const FAILED_ACCESS: u32 = 0x0020;
    /// Principal is a group.
    pub const IDENTIFIER_GROUP: u32 = 0x0040;
    /// Entry targets `OWNER@`.
    pub const OWNER: u32 = 0x0080;
    /// Entry targets `GROUP@`.
    pub const GROUP: u32 = 0x0100;
    /// Entry targets `EVERYONE@`.
    pub const EVERYONE: u32 = 0x0200;

    /// Creates flags from raw value.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw flags value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Checks if any of the given flag bits are set.
    #[must_use]
    pub const fn contains(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }
}

/// NFSv4 access mask (permission bits).
///
/// The three lowest bits carry different names on directories and files but
/// are the same bits on the wire. Only one constant exists per bit; the
/// directory aliases below are the same values, and [`AccessMask::label`]
/// picks the name appropriate to the object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccessMask(u32);

impl AccessMask {
    /// Read data from file / list directory.
    pub const READ_DATA: u32 = 0x0001;
    /// Write data to file / create file in directory.
    pub const WRITE_DATA: u32 = 0x0002;
    /// Append data to file / create subdirectory.
    pub const APPEND_DATA: u32 = 0x0004;
    /// Read named attributes.
    pub const READ_NAMED_ATTRS: u32 = 0x0008;
    /// Write named attributes.
    pub const WRITE_NAMED_ATTRS: u32 = 0x0010;
    /// Execute file / search directory.
    pub const EXECUTE: u32 = 0x0020;
    /// Delete a file within a directory.
    pub const DELETE_CHILD: u32 = 0x0040;
    /// Read file attributes.
    pub const READ_ATTRIBUTES: u32 = 0x0080;
    /// Write file attributes.
    pub const WRITE_ATTRIBUTES: u32 = 0x0100;
    /// Delete the file itself.
    pub const DELETE: u32 = 0x10000;
    /// Read the ACL.
    pub const READ_ACL: u32 = 0x20000;
    /// Write the ACL.
    pub const WRITE_ACL: u32 = 0x40000;
    /// Change owner.
    pub const WRITE_OWNER: u32 = 0x80000;
    /// Synchronize (Windows semantics).
    pub const SYNCHRONIZE: u32 = 0x100000;

    /// Directory alias of [`AccessMask::READ_DATA`].
    pub const LIST_DIRECTORY: u32 = Self::READ_DATA;
    /// Directory alias of [`AccessMask::WRITE_DATA`].
    pub const ADD_FILE: u32 = Self::WRITE_DATA;
    /// Directory alias of [`AccessMask::APPEND_DATA`].
    pub const ADD_SUBDIRECTORY: u32 = Self::APPEND_DATA;

    /// Creates a mask from raw value.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw mask value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Checks if any of the given permission bits are set.
    #[must_use]
    pub const fn contains(self, bits: u32) -> bool {
        (self.0 & bits) != 0
    }

    /// Returns the symbolic name of a single permission bit.
    ///
    /// The overloaded low bits resolve to their directory names when
    /// `is_directory` is set. Unknown or multi-bit values yield `None`.
    #[must_use]
    pub const fn label(bit: u32, is_directory: bool) -> Option<&'static str> {
        let name = match (bit, is_directory) {
            (Self::READ_DATA, false) => "READ_DATA",
            (Self::READ_DATA, true) => "LIST_DIRECTORY",
            (Self::WRITE_DATA, false) => "WRITE_DATA",
            (Self::WRITE_DATA, true) => "ADD_FILE",
            (Self::APPEND_DATA, false) => "APPEND_DATA",
            (Self::APPEND_DATA, true) => "ADD_SUBDIRECTORY",
            (Self::READ_NAMED_ATTRS, _) => "READ_NAMED_ATTRS",
            (Self::WRITE_NAMED_ATTRS, _) => "WRITE_NAMED_ATTRS",
            (Self::EXECUTE, _) => "EXECUTE",
            (Self::DELETE_CHILD, _) => "DELETE_CHILD",
            (Self::READ_ATTRIBUTES, _) => "READ_ATTRIBUTES",
            (Self::WRITE_ATTRIBUTES, _) => "WRITE_ATTRIBUTES",
            (Self::DELETE, _) => "DELETE",
            (Self::READ_ACL, _) => "READ_ACL",
            (Self::WRITE_ACL, _) => "WRITE_ACL",
            (Self::WRITE_OWNER, _) => "WRITE_OWNER",
            (Self::SYNCHRONIZE, _) => "SYNCHRONIZE",
            _ => return None,
        };
        Some(name)
    }
}

/// A single NFSv4 Access Control Entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nfs4Ace {
    ace_type: AceType,
    flags: AceFlags,
    mask: AccessMask,
    who: String,
}

impl Nfs4Ace {
    /// Creates an entry from its four stored fields.
    #[must_use]
    pub fn new(ace_type: AceType, flags: u32, mask: u32, who: impl Into<String>) -> Self {
        Self {
            ace_type,
            flags: AceFlags::from_raw(flags),
            mask: AccessMask::from_raw(mask),
            who: who.into(),
        }
    }

    /// Returns the entry type.
    #[must_use]
    pub const fn ace_type(&self) -> AceType {
        self.ace_type
    }

    /// Replaces the entry type.
    pub fn set_ace_type(&mut self, ace_type: AceType) {
        self.ace_type = ace_type;
    }

    /// Returns the principal string.
    #[must_use]
    pub fn who(&self) -> &str {
        &self.who
    }

    /// Replaces the principal string.
    pub fn set_who(&mut self, who: impl Into<String>) {
        self.who = who.into();
    }

    /// Returns the principal classification derived from [`Self::who`].
    #[must_use]
    pub fn who_type(&self) -> WhoType {
        WhoType::of(&self.who)
    }

    /// Returns the flags.
    #[must_use]
    pub const fn flags(&self) -> AceFlags {
        self.flags
    }

    /// Returns the access mask.
    #[must_use]
    pub const fn access_mask(&self) -> AccessMask {
        self.mask
    }

    /// Returns true when any bit of `bits` is granted or denied by this entry.
    #[must_use]
    pub const fn has_access(&self, bits: u32) -> bool {
        self.mask.contains(bits)
    }

    /// Returns true when any bit of `bits` is present in the flags.
    #[must_use]
    pub const fn has_flags(&self, bits: u32) -> bool {
        self.flags.contains(bits)
    }

    // value    = 00110101
    // mask     | 00000011
    // result     00110111
    /// Sets the bits of `mask`, leaving other bits untouched.
    pub fn apply_access_mask(&mut self, mask: u32) {
        self.mask = AccessMask::from_raw(self.mask.as_raw() | mask);
    }

    // value    = 00110101
    // mask    &! 00000011
    // result     00110100
    /// Clears the bits of `mask`, leaving other bits untouched.
    pub fn remove_access_mask(&mut self, mask: u32) {
        self.mask = AccessMask::from_raw(self.mask.as_raw() & !mask);
    }

    /// Overwrites the access mask.
    pub fn set_access_mask(&mut self, mask: u32) {
        self.mask = AccessMask::from_raw(mask);
    }

    /// Sets the bits of `flags`, leaving other bits untouched.
    pub fn apply_flags(&mut self, flags: u32) {
        self.flags = AceFlags::from_raw(self.flags.as_raw() | flags);
    }

    /// Clears the bits of `flags`, leaving other bits untouched.
    pub fn remove_flags(&mut self, flags: u32) {
        self.flags = AceFlags::from_raw(self.flags.as_raw() & !flags);
    }

    /// Overwrites the flags.
    pub fn set_flags(&mut self, flags: u32) {
        self.flags = AceFlags::from_raw(flags);
    }
}

impl fmt::Display for Nfs4Ace {
    /// Renders the entry in file context; `{:#}` selects the verbose type names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::render_ace(self, f.alternate(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_type_conversion() {
        assert_eq!(AceType::from_code(0), AceType::Allow);
        assert_eq!(AceType::from_code(1), AceType::Deny);
        assert_eq!(AceType::from_code(2), AceType::Audit);
        assert_eq!(AceType::from_code(3), AceType::Alarm);
        assert_eq!(AceType::from_code(4), AceType::Other(4));
        assert_eq!(AceType::Other(0xffff_ffff).code(), 0xffff_ffff);
        assert_eq!(AceType::Alarm.code(), 3);
    }

    #[test]
    fn who_type_derivation_is_exact() {
        assert_eq!(WhoType::of("OWNER@"), WhoType::Owner);
        assert_eq!(WhoType::of("GROUP@"), WhoType::Group);
        assert_eq!(WhoType::of("EVERYONE@"), WhoType::Everyone);
        assert_eq!(WhoType::of(""), WhoType::Named);
        assert_eq!(WhoType::of("owner@"), WhoType::Named);
        assert_eq!(WhoType::of("OWNER@ "), WhoType::Named);
        assert_eq!(WhoType::of("alice@example.com"), WhoType::Named);
    }

    #[test]
    fn who_type_follows_who_changes() {
        let mut ace = Nfs4Ace::new(AceType::Allow, 0, 0, "OWNER@");
        assert_eq!(ace.who_type(), WhoType::Owner);

        ace.set_who("bob");
        assert_eq!(ace.who_type(), WhoType::Named);

        ace.set_who(WHO_EVERYONE);
        assert_eq!(ace.who_type(), WhoType::Everyone);
    }

    #[test]
    fn who_type_from_raw_value() {
        assert_eq!(WhoType::try_from(0), Ok(WhoType::Named));
        assert_eq!(WhoType::try_from(3), Ok(WhoType::Everyone));
        assert_eq!(WhoType::try_from(4), Err(TargetError::OutOfRange(4)));
        assert_eq!(WhoType::Group.special_who(), Some("GROUP@"));
        assert_eq!(WhoType::Named.special_who(), None);
    }

    #[test]
    fn mask_operations() {
        let mut ace = Nfs4Ace::new(AceType::Allow, 0, 0b0011_0101, "OWNER@");
        ace.apply_access_mask(0b0000_0011);
        assert_eq!(ace.access_mask().as_raw(), 0b0011_0111);

        let mut ace = Nfs4Ace::new(AceType::Allow, 0, 0b0011_0101, "OWNER@");
        ace.remove_access_mask(0b0000_0011);
        assert_eq!(ace.access_mask().as_raw(), 0b0011_0100);

        let mut ace = Nfs4Ace::new(AceType::Allow, 0, 0b0011_0101, "OWNER@");
        ace.set_access_mask(0b0000_0011);
        assert_eq!(ace.access_mask().as_raw(), 0b0000_0011);
    }

    #[test]
    fn flags_operations() {
        let mut ace = Nfs4Ace::new(
            AceType::Allow,
            AceFlags::FILE_INHERIT | AceFlags::DIRECTORY_INHERIT,
            0,
            "GROUP@",
        );
        assert!(ace.has_flags(AceFlags::FILE_INHERIT));
        assert!(!ace.has_flags(AceFlags::INHERIT_ONLY));

        ace.apply_flags(AceFlags::INHERIT_ONLY);
        ace.remove_flags(AceFlags::FILE_INHERIT);
        assert_eq!(
            ace.flags().as_raw(),
            AceFlags::DIRECTORY_INHERIT | AceFlags::INHERIT_ONLY
        );

        ace.set_flags(AceFlags::IDENTIFIER_GROUP);
        assert_eq!(ace.flags().as_raw(), AceFlags::IDENTIFIER_GROUP);
    }

    #[test]
    fn overloaded_bits_share_values() {
        assert_eq!(AccessMask::LIST_DIRECTORY, AccessMask::READ_DATA);
        assert_eq!(AccessMask::ADD_FILE, AccessMask::WRITE_DATA);
        assert_eq!(AccessMask::ADD_SUBDIRECTORY, AccessMask::APPEND_DATA);
        assert_eq!(AccessMask::label(AccessMask::WRITE_DATA, false), Some("WRITE_DATA"));
        assert_eq!(AccessMask::label(AccessMask::WRITE_DATA, true), Some("ADD_FILE"));
        assert_eq!(AccessMask::label(AccessMask::DELETE, true), Some("DELETE"));
        assert_eq!(AccessMask::label(0x0200, false), None);
    }

    #[test]
    fn display_renders_file_context() {
        let ace = Nfs4Ace::new(AceType::Deny, 0, AccessMask::WRITE_DATA, "EVERYONE@");
        assert_eq!(ace.to_string(), "D::EVERYONE@:w");
        assert_eq!(format!("{ace:#}"), "DENY::EVERYONE@:w");
    }
}
