//! crates/nfs4acl/src/parse.rs
//!
//! Parsing of the symbolic mask and flag columns.
//!
//! Accepts exactly the characters the renderer emits, so any mask printed by
//! `nfs4_getfacl` can be fed back to `nfs4_setfacl`.

use crate::ace::{AccessMask, AceFlags};
use crate::error::ParseError;
use crate::render::{COMMON_MASK_SYMBOLS, DIRECTORY_MASK_SYMBOLS, FILE_MASK_SYMBOLS, FLAG_SYMBOLS};

fn lookup(symbol: char, tables: &[&[(u32, char)]]) -> Option<u32> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .find(|(_, candidate)| *candidate == symbol)
        .map(|&(bit, _)| bit)
}

fn parse_hex(text: &str) -> Option<Result<u32, ParseError>> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))?;
    Some(u32::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidHex(text.to_owned())))
}

/// Parses a mask column such as `rwax` or a hexadecimal literal such as `0x2`.
///
/// Letters from both the file and directory alphabets are accepted; the
/// overloaded letters map to the same bits either way.
pub fn parse_access_mask(text: &str) -> Result<AccessMask, ParseError> {
    if let Some(value) = parse_hex(text) {
        return value.map(AccessMask::from_raw);
    }

    let tables = [FILE_MASK_SYMBOLS, DIRECTORY_MASK_SYMBOLS, COMMON_MASK_SYMBOLS];
    text.chars()
        .try_fold(0u32, |mask, symbol| {
            lookup(symbol, &tables)
                .map(|bit| mask | bit)
                .ok_or(ParseError::UnknownCharacter {
                    column: "mask",
                    character: symbol,
                })
        })
        .map(AccessMask::from_raw)
}

/// Parses a flags column such as `fdi` or a hexadecimal literal.
pub fn parse_flags(text: &str) -> Result<AceFlags, ParseError> {
    if let Some(value) = parse_hex(text) {
        return value.map(AceFlags::from_raw);
    }

    text.chars()
        .try_fold(0u32, |flags, symbol| {
            lookup(symbol, &[FLAG_SYMBOLS])
                .map(|bit| flags | bit)
                .ok_or(ParseError::UnknownCharacter {
                    column: "flag",
                    character: symbol,
                })
        })
        .map(AceFlags::from_raw)
}
