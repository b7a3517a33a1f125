//! crates/nfs4acl/src/render.rs
//!
//! Symbolic `TYPE:FLAGS:WHO:MASK` rendering, as printed by `nfs4_getfacl`.
//!
//! The character tables below are the only place the symbolic alphabet is
//! defined; the text parser in [`crate::parse`] reads the same tables.

use crate::ace::{AccessMask, AceFlags, AceType, Nfs4Ace};
use crate::acl::Nfs4Acl;

/// Type characters and keywords, in wire-code order.
pub(crate) static TYPE_SYMBOLS: &[(AceType, char, &str)] = &[
    (AceType::Allow, 'A', "ALLOW"),
    (AceType::Deny, 'D', "DENY"),
    (AceType::Audit, 'U', "AUDIT"),
    (AceType::Alarm, 'L', "ALARM"),
];

/// Flag characters in canonical output order.
pub(crate) static FLAG_SYMBOLS: &[(u32, char)] = &[
    (AceFlags::FILE_INHERIT, 'f'),
    (AceFlags::DIRECTORY_INHERIT, 'd'),
    (AceFlags::NO_PROPAGATE_INHERIT, 'n'),
    (AceFlags::INHERIT_ONLY, 'i'),
    (AceFlags::SUCCESSFUL_ACCESS, 'S'),
    (AceFlags::FAILED_ACCESS, 'F'),
    (AceFlags::IDENTIFIER_GROUP, 'g'),
    (AceFlags::OWNER, 'O'),
    (AceFlags::GROUP, 'G'),
    (AceFlags::EVERYONE, 'E'),
];

/// Leading mask characters for directories.
pub(crate) static DIRECTORY_MASK_SYMBOLS: &[(u32, char)] = &[
    (AccessMask::LIST_DIRECTORY, 'r'),
    (AccessMask::ADD_FILE, 'w'),
    (AccessMask::ADD_SUBDIRECTORY, 'a'),
    (AccessMask::DELETE_CHILD, 'D'),
];

/// Leading mask characters for files.
pub(crate) static FILE_MASK_SYMBOLS: &[(u32, char)] = &[
    (AccessMask::READ_DATA, 'r'),
    (AccessMask::WRITE_DATA, 'w'),
    (AccessMask::APPEND_DATA, 'a'),
];

/// Mask characters shared by files and directories, after the leading group.
pub(crate) static COMMON_MASK_SYMBOLS: &[(u32, char)] = &[
    (AccessMask::DELETE, 'd'),
    (AccessMask::EXECUTE, 'x'),
    (AccessMask::READ_ATTRIBUTES, 't'),
    (AccessMask::WRITE_ATTRIBUTES, 'T'),
    (AccessMask::READ_NAMED_ATTRS, 'n'),
    (AccessMask::WRITE_NAMED_ATTRS, 'N'),
    (AccessMask::READ_ACL, 'c'),
    (AccessMask::WRITE_ACL, 'C'),
    (AccessMask::WRITE_OWNER, 'o'),
    (AccessMask::SYNCHRONIZE, 'y'),
];

fn push_set_bits(out: &mut String, value: u32, table: &[(u32, char)]) {
    out.extend(
        table
            .iter()
            .filter(|(bit, _)| value & bit != 0)
            .map(|&(_, symbol)| symbol),
    );
}

fn push_type(out: &mut String, ace_type: AceType, verbose: bool) {
    if let Some(&(_, symbol, keyword)) = TYPE_SYMBOLS.iter().find(|(t, _, _)| *t == ace_type) {
        if verbose {
            out.push_str(keyword);
        } else {
            out.push(symbol);
        }
    }
}

/// Renders the mask column for a file or directory.
#[must_use]
pub fn render_mask(mask: AccessMask, is_directory: bool) -> String {
    let mut out = String::new();
    let leading = if is_directory {
        DIRECTORY_MASK_SYMBOLS
    } else {
        FILE_MASK_SYMBOLS
    };
    push_set_bits(&mut out, mask.as_raw(), leading);
    push_set_bits(&mut out, mask.as_raw(), COMMON_MASK_SYMBOLS);
    out
}

/// Renders the flags column.
#[must_use]
pub fn render_flags(flags: AceFlags) -> String {
    let mut out = String::new();
    push_set_bits(&mut out, flags.as_raw(), FLAG_SYMBOLS);
    out
}

/// Renders one entry as `TYPE:FLAGS:WHO:MASK`.
///
/// `verbose` spells the type out (`ALLOW`) instead of using its letter (`A`).
/// `is_directory` selects the directory letters for the overloaded mask bits
/// and enables the delete-child letter. Unset bits are simply omitted; an
/// unknown type code leaves the type column empty.
#[must_use]
pub fn render_ace(ace: &Nfs4Ace, verbose: bool, is_directory: bool) -> String {
    let mut out = String::with_capacity(ace.who().len() + 32);
    push_type(&mut out, ace.ace_type(), verbose);
    out.push(':');
    push_set_bits(&mut out, ace.flags().as_raw(), FLAG_SYMBOLS);
    out.push(':');
    out.push_str(ace.who());
    out.push(':');
    out.push_str(&render_mask(ace.access_mask(), is_directory));
    out
}

/// Renders every entry on its own newline-terminated line.
#[must_use]
pub fn render_acl(acl: &Nfs4Acl, verbose: bool) -> String {
    acl.iter().fold(String::new(), |mut out, ace| {
        out.push_str(&render_ace(ace, verbose, acl.is_directory()));
        out.push('\n');
        out
    })
}
