//! crates/logging/src/levels.rs
//! Diagnostic categories and their per-category levels.

use std::fmt;
use std::str::FromStr;

/// Diagnostic categories, one per tracing target emitted by the workspace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticFlag {
    /// Payload decoding and encoding.
    Wire,
    /// Mask and flag mutations.
    Acl,
    /// Reads and writes of the extended attribute.
    Xattr,
    /// Command-line front end: path walking and per-path outcomes.
    Cli,
}

impl DiagnosticFlag {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Wire, Self::Acl, Self::Xattr, Self::Cli];

    /// Returns the tracing target events in this category are emitted under.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Wire => "nfs4acl::wire",
            Self::Acl => "nfs4acl::acl",
            Self::Xattr => "nfs4acl::xattr",
            Self::Cli => "nfs4acl::cli",
        }
    }

    /// Returns the short name used in `--debug`-style flag strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wire => "wire",
            Self::Acl => "acl",
            Self::Xattr => "xattr",
            Self::Cli => "cli",
        }
    }

    /// Maps a tracing target to its category.
    ///
    /// Nested targets such as `nfs4acl::wire::decode` map to their parent.
    #[must_use]
    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| {
            let prefix = flag.target();
            target == prefix
                || target
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with("::"))
        })
    }
}

impl fmt::Display for DiagnosticFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiagnosticFlag {
    type Err = UnknownFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFlag(s.to_owned()))
    }
}

/// Error returned when a flag name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownFlag(pub String);

impl fmt::Display for UnknownFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown diagnostic flag '{}'", self.0)
    }
}

impl std::error::Error for UnknownFlag {}

/// Level of one diagnostic category.
///
/// `0` silences the category beyond warnings, `1` enables info, `2` debug, and
/// `3` or more trace.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticLevels {
    /// Payload decoding and encoding.
    pub wire: u8,
    /// Mask and flag mutations.
    pub acl: u8,
    /// Extended attribute access.
    pub xattr: u8,
    /// Command-line front end.
    pub cli: u8,
}

impl DiagnosticLevels {
    /// Returns the level of `flag`.
    #[must_use]
    pub const fn get(&self, flag: DiagnosticFlag) -> u8 {
        match flag {
            DiagnosticFlag::Wire => self.wire,
            DiagnosticFlag::Acl => self.acl,
            DiagnosticFlag::Xattr => self.xattr,
            DiagnosticFlag::Cli => self.cli,
        }
    }

    /// Sets the level of `flag`.
    pub fn set(&mut self, flag: DiagnosticFlag, level: u8) {
        match flag {
            DiagnosticFlag::Wire => self.wire = level,
            DiagnosticFlag::Acl => self.acl = level,
            DiagnosticFlag::Xattr => self.xattr = level,
            DiagnosticFlag::Cli => self.cli = level,
        }
    }

    /// Returns true if `flag` is at least at `level`.
    #[must_use]
    pub const fn gte(&self, flag: DiagnosticFlag, level: u8) -> bool {
        self.get(flag) >= level
    }
}
