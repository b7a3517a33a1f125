//! crates/nfs4acl/src/acl.rs
//!
//! The ACL aggregate and its bulk mutation API.
//!
//! Entries are kept in evaluation order: NFSv4 servers walk an ACL top to
//! bottom and the first entry matching a requested bit decides it. Nothing in
//! this module reorders, merges, or drops entries.
//!
//! Every bulk mutation is the same shape: pick entries with an
//! [`AceSelector`], then combine their mask (or flags) with an operand using a
//! [`MaskOp`]. The nine named helpers (`apply_mask`, `remove_mask_for_who`,
//! ...) are thin wrappers over [`Nfs4Acl::modify_mask`].

use std::slice;

use crate::ace::{Nfs4Ace, WhoType};
use crate::error::{DecodeError, TargetError};
use crate::trace::trace_mutation;

/// How an operand is combined with an existing bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskOp {
    /// Bitwise OR: grant the operand bits, keep the rest.
    Apply,
    /// Bitwise AND-NOT: clear the operand bits, keep the rest.
    Remove,
    /// Overwrite with the operand.
    Set,
}

impl MaskOp {
    /// Combines `current` with `operand`.
    #[must_use]
    pub const fn combine(self, current: u32, operand: u32) -> u32 {
        match self {
            Self::Apply => current | operand,
            Self::Remove => current & !operand,
            Self::Set => operand,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Remove => "remove",
            Self::Set => "set",
        }
    }
}

/// Chooses which entries a bulk mutation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AceSelector<'a> {
    /// Every entry.
    All,
    /// Entries whose derived who type matches. [`WhoType::Named`] is rejected.
    WhoType(WhoType),
    /// Entries whose who string matches exactly.
    ///
    /// Special identifiers such as `OWNER@` are accepted here and select the
    /// same entries as the corresponding [`AceSelector::WhoType`].
    Who(&'a str),
}

impl AceSelector<'_> {
    /// Checks that the selector can be used as a mutation target.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::UnsupportedWhoType`] for
    /// `AceSelector::WhoType(WhoType::Named)`.
    pub fn validate(self) -> Result<Self, TargetError> {
        match self {
            Self::WhoType(WhoType::Named) => Err(TargetError::UnsupportedWhoType(WhoType::Named)),
            other => Ok(other),
        }
    }

    /// Returns true when `ace` is selected.
    #[must_use]
    pub fn matches(self, ace: &Nfs4Ace) -> bool {
        match self {
            Self::All => true,
            Self::WhoType(who_type) => ace.who_type() == who_type,
            Self::Who(who) => ace.who() == who,
        }
    }
}

/// An NFSv4 Access Control List.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nfs4Acl {
    is_directory: bool,
    entries: Vec<Nfs4Ace>,
}

impl Nfs4Acl {
    /// Creates an empty ACL for a file (`is_directory == false`) or directory.
    #[must_use]
    pub const fn new(is_directory: bool) -> Self {
        Self {
            is_directory,
            entries: Vec::new(),
        }
    }

    /// Creates an ACL holding `entries` in the given order.
    #[must_use]
    pub const fn with_entries(is_directory: bool, entries: Vec<Nfs4Ace>) -> Self {
        Self {
            is_directory,
            entries,
        }
    }

    /// Parses a `system.nfs4_acl` payload. See [`crate::decode`].
    pub fn from_bytes(data: &[u8], is_directory: bool) -> Result<Self, DecodeError> {
        crate::wire::decode(data, is_directory)
    }

    /// Serializes the ACL to its `system.nfs4_acl` payload. See [`crate::encode`].
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::wire::encode(self)
    }

    /// Returns true if the ACL belongs to a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Returns the entries in evaluation order.
    #[must_use]
    pub fn entries(&self) -> &[Nfs4Ace] {
        &self.entries
    }

    /// Returns the entries mutably. Order changes made here are persisted.
    pub fn entries_mut(&mut self) -> &mut [Nfs4Ace] {
        &mut self.entries
    }

    /// Iterates over the entries in evaluation order.
    pub fn iter(&self) -> slice::Iter<'_, Nfs4Ace> {
        self.entries.iter()
    }

    /// Appends an entry after the existing ones.
    pub fn push(&mut self, ace: Nfs4Ace) {
        self.entries.push(ace);
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the ACL has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the ACL and returns its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Nfs4Ace> {
        self.entries
    }

    /// Combines the access mask of every selected entry with `operand`.
    ///
    /// Returns the number of entries touched; zero matches is not an error.
    /// A rejected selector leaves the ACL unchanged.
    pub fn modify_mask(
        &mut self,
        selector: AceSelector<'_>,
        op: MaskOp,
        operand: u32,
    ) -> Result<usize, TargetError> {
        let selector = selector.validate()?;
        let mut touched = 0;
        for ace in self.entries.iter_mut().filter(|ace| selector.matches(ace)) {
            let updated = op.combine(ace.access_mask().as_raw(), operand);
            ace.set_access_mask(updated);
            touched += 1;
        }
        trace_mutation("mask", op.name(), operand, touched);
        Ok(touched)
    }

    /// Combines the flags of every selected entry with `operand`.
    pub fn modify_flags(
        &mut self,
        selector: AceSelector<'_>,
        op: MaskOp,
        operand: u32,
    ) -> Result<usize, TargetError> {
        let selector = selector.validate()?;
        let mut touched = 0;
        for ace in self.entries.iter_mut().filter(|ace| selector.matches(ace)) {
            let updated = op.combine(ace.flags().as_raw(), operand);
            ace.set_flags(updated);
            touched += 1;
        }
        trace_mutation("flags", op.name(), operand, touched);
        Ok(touched)
    }

    /// ORs `mask` into every entry.
    pub fn apply_mask(&mut self, mask: u32) -> usize {
        self.modify_all(MaskOp::Apply, mask)
    }

    /// Clears `mask` from every entry.
    pub fn remove_mask(&mut self, mask: u32) -> usize {
        self.modify_all(MaskOp::Remove, mask)
    }

    /// Overwrites the mask of every entry.
    pub fn set_mask(&mut self, mask: u32) -> usize {
        self.modify_all(MaskOp::Set, mask)
    }

    /// ORs `mask` into every entry of the given who type.
    pub fn apply_mask_for_who_type(
        &mut self,
        who_type: WhoType,
        mask: u32,
    ) -> Result<usize, TargetError> {
        self.modify_mask(AceSelector::WhoType(who_type), MaskOp::Apply, mask)
    }

    /// Clears `mask` from every entry of the given who type.
    pub fn remove_mask_for_who_type(
        &mut self,
        who_type: WhoType,
        mask: u32,
    ) -> Result<usize, TargetError> {
        self.modify_mask(AceSelector::WhoType(who_type), MaskOp::Remove, mask)
    }

    /// Overwrites the mask of every entry of the given who type.
    pub fn set_mask_for_who_type(
        &mut self,
        who_type: WhoType,
        mask: u32,
    ) -> Result<usize, TargetError> {
        self.modify_mask(AceSelector::WhoType(who_type), MaskOp::Set, mask)
    }

    /// ORs `mask` into every entry whose who string equals `who`.
    pub fn apply_mask_for_who(&mut self, who: &str, mask: u32) -> usize {
        self.modify_who(who, MaskOp::Apply, mask)
    }

    /// Clears `mask` from every entry whose who string equals `who`.
    pub fn remove_mask_for_who(&mut self, who: &str, mask: u32) -> usize {
        self.modify_who(who, MaskOp::Remove, mask)
    }

    /// Overwrites the mask of every entry whose who string equals `who`.
    pub fn set_mask_for_who(&mut self, who: &str, mask: u32) -> usize {
        self.modify_who(who, MaskOp::Set, mask)
    }

    fn modify_all(&mut self, op: MaskOp, mask: u32) -> usize {
        // `All` never fails validation.
        self.modify_mask(AceSelector::All, op, mask).unwrap_or_default()
    }

    fn modify_who(&mut self, who: &str, op: MaskOp, mask: u32) -> usize {
        self.modify_mask(AceSelector::Who(who), op, mask)
            .unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a Nfs4Acl {
    type Item = &'a Nfs4Ace;
    type IntoIter = slice::Iter<'a, Nfs4Ace>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<Nfs4Ace> for Nfs4Acl {
    fn extend<T: IntoIterator<Item = Nfs4Ace>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
