//! crates/nfs4acl/src/wire.rs
//!
//! Decoder and encoder for the `system.nfs4_acl` payload.
//!
//! # Wire Format
//!
//! Every integer is a big-endian `u32` atom:
//!
//! ```text
//! entry_count : atom
//! For each entry:
//!   type        : atom
//!   flags       : atom
//!   access_mask : atom
//!   who_length  : atom
//!   who         : who_length bytes, zero padded to an atom boundary
//! ```
//!
//! There is no magic number, version, or checksum. The payload usually comes
//! straight from file-system metadata, so every length is checked against the
//! buffer before it is used and allocation is never sized from the declared
//! entry count alone.

use crate::ace::{AceType, Nfs4Ace};
use crate::acl::Nfs4Acl;
use crate::atom::{ATOM_SIZE, padded_length, read_u32_be, write_u32_be};
use crate::error::DecodeError;
use crate::trace::{trace_decode_complete, trace_decode_entry, trace_decode_error, trace_encode};

/// Bytes occupied by the fixed fields of one entry.
const ENTRY_HEADER_SIZE: usize = ATOM_SIZE * 4;

/// Parses a `system.nfs4_acl` payload into an ACL.
///
/// `is_directory` is recorded on the result and only affects rendering.
/// Padding bytes must be present but their content is not interpreted.
///
/// # Errors
///
/// Returns [`DecodeError`] if the buffer cannot hold the entry count, ends
/// inside an entry or its padding, declares a who string longer than the
/// remaining bytes, carries a who string that is not UTF-8, or continues past
/// the last declared entry.
pub fn decode(data: &[u8], is_directory: bool) -> Result<Nfs4Acl, DecodeError> {
    decode_entries(data)
        .map(|(entries, consumed)| {
            trace_decode_complete(entries.len(), consumed, data.len());
            Nfs4Acl::with_entries(is_directory, entries)
        })
        .inspect_err(trace_decode_error)
}

fn decode_entries(data: &[u8]) -> Result<(Vec<Nfs4Ace>, usize), DecodeError> {
    let len = data.len();
    if len < ATOM_SIZE {
        return Err(DecodeError::TooShort { len });
    }

    let count = read_u32_be(data, 0) as usize;
    let mut offset = ATOM_SIZE;

    // A valid entry needs at least a header, so the buffer bounds the count.
    let mut entries = Vec::with_capacity(count.min((len - ATOM_SIZE) / ENTRY_HEADER_SIZE));

    for entry in 0..count {
        if offset >= len || len - offset < ENTRY_HEADER_SIZE {
            return Err(DecodeError::Truncated { entry, offset });
        }

        let ace_type = read_u32_be(data, offset);
        let flags = read_u32_be(data, offset + ATOM_SIZE);
        let mask = read_u32_be(data, offset + ATOM_SIZE * 2);
        let who_length = read_u32_be(data, offset + ATOM_SIZE * 3) as usize;
        trace_decode_entry(entry, offset, ace_type, who_length);
        offset += ENTRY_HEADER_SIZE;

        let remaining = len - offset;
        if who_length > remaining {
            return Err(DecodeError::WhoOverflow {
                entry,
                who_length,
                remaining,
            });
        }

        let who = std::str::from_utf8(&data[offset..offset + who_length])
            .map_err(|_| DecodeError::InvalidWho { entry })?
            .to_owned();
        offset += padded_length(who_length);
        if offset > len {
            return Err(DecodeError::Truncated { entry, offset });
        }

        entries.push(Nfs4Ace::new(AceType::from_code(ace_type), flags, mask, who));
    }

    if offset != len {
        return Err(DecodeError::TrailingBytes {
            consumed: offset,
            len,
        });
    }
    Ok((entries, offset))
}

/// Returns the exact payload size [`encode`] produces for `acl`.
#[must_use]
pub fn encoded_len(acl: &Nfs4Acl) -> usize {
    acl.iter().fold(ATOM_SIZE, |total, ace| {
        total + ENTRY_HEADER_SIZE + padded_length(ace.who().len())
    })
}

/// Serializes an ACL into its `system.nfs4_acl` payload.
///
/// The output is sized with [`encoded_len`] and zero-filled, so padding bytes
/// are always zero. Encoding cannot fail.
///
/// The entry count and every who length are written as `u32` atoms. An ACL
/// with more than `u32::MAX` entries, or a who string longer than `u32::MAX`
/// bytes, has no wire representation; such values saturate at `u32::MAX`
/// (and trip a debug assertion) instead of wrapping.
#[must_use]
pub fn encode(acl: &Nfs4Acl) -> Vec<u8> {
    let mut data = vec![0u8; encoded_len(acl)];

    write_u32_be(&mut data, 0, atom_from_len(acl.len()));
    let mut offset = ATOM_SIZE;

    for ace in acl {
        let who = ace.who().as_bytes();
        write_u32_be(&mut data, offset, ace.ace_type().code());
        write_u32_be(&mut data, offset + ATOM_SIZE, ace.flags().as_raw());
        write_u32_be(&mut data, offset + ATOM_SIZE * 2, ace.access_mask().as_raw());
        write_u32_be(&mut data, offset + ATOM_SIZE * 3, atom_from_len(who.len()));
        offset += ENTRY_HEADER_SIZE;

        data[offset..offset + who.len()].copy_from_slice(who);
        offset += padded_length(who.len());
    }

    trace_encode(acl.len(), data.len());
    data
}

/// Converts a length to its atom value, saturating past `u32::MAX`.
fn atom_from_len(len: usize) -> u32 {
    debug_assert!(u32::try_from(len).is_ok(), "length {len} does not fit in an atom");
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ace::{AccessMask, AceFlags, WhoType};
    use proptest::prelude::*;
    use test_support::AclBytes;

    #[test]
    fn decodes_single_owner_entry() {
        let bytes = AclBytes::new()
            .entry(0, 0, AccessMask::WRITE_DATA, "OWNER@")
            .build();
        assert_eq!(bytes.len(), 4 + 16 + 8);

        let acl = decode(&bytes, false).expect("well-formed buffer");
        assert_eq!(acl.len(), 1);

        let ace = &acl.entries()[0];
        assert_eq!(ace.ace_type(), AceType::Allow);
        assert_eq!(ace.access_mask().as_raw(), AccessMask::WRITE_DATA);
        assert_eq!(ace.who(), "OWNER@");
        assert_eq!(ace.who_type(), WhoType::Owner);
    }

    #[test]
    fn empty_acl_is_one_atom() {
        let acl = Nfs4Acl::new(false);
        let bytes = encode(&acl);
        assert_eq!(bytes, [0, 0, 0, 0]);

        let parsed = decode(&bytes, false).expect("empty ACL decodes");
        assert!(parsed.is_empty());
    }

    #[test]
    fn rejects_buffer_shorter_than_an_atom() {
        for len in 0..ATOM_SIZE {
            let err = decode(&vec![0u8; len], false).unwrap_err();
            assert_eq!(err, DecodeError::TooShort { len });
        }
    }

    #[test]
    fn rejects_entry_count_without_entries() {
        let bytes = AclBytes::new().count(1).build();
        assert_eq!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::Truncated { entry: 0, offset: 4 }
        );
    }

    #[test]
    fn rejects_partial_entry_header() {
        let mut bytes = AclBytes::new().count(1).build();
        bytes.extend_from_slice(&[0u8; 12]);
        assert_eq!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::Truncated { entry: 0, offset: 4 }
        );
    }

    #[test]
    fn rejects_missing_second_entry() {
        let bytes = AclBytes::new()
            .count(2)
            .entry(0, 0, AccessMask::READ_DATA, "GROUP@")
            .build();
        assert_eq!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::Truncated {
                entry: 1,
                offset: 4 + 16 + 8
            }
        );
    }

    #[test]
    fn rejects_who_length_past_end() {
        let bytes = AclBytes::new()
            .raw_entry(0, 0, 0, 40, b"OWNER@\0\0")
            .build();
        assert_eq!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::WhoOverflow {
                entry: 0,
                who_length: 40,
                remaining: 8
            }
        );
    }

    #[test]
    fn rejects_huge_who_length_without_overflow() {
        let bytes = AclBytes::new()
            .raw_entry(0, 0, 0, u32::MAX, b"")
            .build();
        assert!(matches!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::WhoOverflow { entry: 0, .. }
        ));
    }

    #[test]
    fn rejects_invalid_utf8_who() {
        let bytes = AclBytes::new()
            .raw_entry(0, 0, 0, 2, &[0xff, 0xfe, 0, 0])
            .build();
        assert_eq!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::InvalidWho { entry: 0 }
        );
    }

    #[test]
    fn huge_entry_count_does_not_preallocate() {
        let bytes = AclBytes::new().count(u32::MAX).build();
        assert!(matches!(
            decode(&bytes, false),
            Err(DecodeError::Truncated { entry: 0, .. })
        ));
    }

    #[test]
    fn who_of_atom_length_gets_no_padding() {
        let acl = Nfs4Acl::with_entries(
            false,
            vec![
                Nfs4Ace::new(AceType::Allow, 0, AccessMask::READ_DATA, "user"),
                Nfs4Ace::new(AceType::Deny, 0, AccessMask::WRITE_DATA, "u"),
            ],
        );

        let bytes = encode(&acl);
        assert_eq!(bytes.len(), 4 + (16 + 4) + (16 + 4));
        assert_eq!(&bytes[20..24], b"user");
        assert_eq!(&bytes[40..44], b"u\0\0\0");
        assert_eq!(decode(&bytes, false).expect("round trip").entries(), acl.entries());
    }

    #[test]
    fn empty_who_at_end_of_buffer_decodes() {
        let acl = Nfs4Acl::with_entries(
            true,
            vec![Nfs4Ace::new(AceType::Alarm, AceFlags::FAILED_ACCESS, 0, "")],
        );
        let bytes = encode(&acl);
        assert_eq!(bytes.len(), 20);

        let parsed = decode(&bytes, true).expect("exact-length buffer decodes");
        assert_eq!(parsed, acl);
        assert_eq!(parsed.entries()[0].who_type(), WhoType::Named);
    }

    #[test]
    fn padding_content_is_ignored() {
        let bytes = AclBytes::new()
            .raw_entry(1, 0, AccessMask::EXECUTE, 6, b"GROUP@\xaa\xbb")
            .build();
        let acl = decode(&bytes, false).expect("padding is not interpreted");
        assert_eq!(acl.entries()[0].who(), "GROUP@");

        let reencoded = encode(&acl);
        assert_eq!(reencoded.len(), bytes.len());
        assert_eq!(&reencoded[26..28], &[0, 0]);
    }

    #[test]
    fn rejects_truncated_final_padding() {
        let bytes = AclBytes::new()
            .entry(0, 0, AccessMask::WRITE_DATA, "OWNER@")
            .build();
        for keep in [bytes.len() - 2, bytes.len() - 1] {
            assert_eq!(
                decode(&bytes[..keep], false).unwrap_err(),
                DecodeError::Truncated { entry: 0, offset: 28 }
            );
        }
    }

    #[test]
    fn unpadded_who_is_reported_on_its_own_entry() {
        let bytes = AclBytes::new()
            .count(2)
            .raw_entry(0, 0, 0, 5, b"alice")
            .build();
        assert_eq!(bytes.len(), 25);
        assert_eq!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::Truncated { entry: 0, offset: 32 }
        );
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = AclBytes::new()
            .entry(0, 0, AccessMask::READ_ACL, "EVERYONE@")
            .build();
        let consumed = bytes.len();
        bytes.extend_from_slice(&[0xde, 0xad, 0, 0]);
        assert_eq!(
            decode(&bytes, false).unwrap_err(),
            DecodeError::TrailingBytes {
                consumed,
                len: consumed + 4
            }
        );
    }

    #[test]
    fn empty_acl_with_trailing_bytes_is_rejected() {
        assert_eq!(
            decode(&[0, 0, 0, 0, 0], false).unwrap_err(),
            DecodeError::TrailingBytes { consumed: 4, len: 5 }
        );
    }

    #[test]
    fn lengths_convert_to_atoms() {
        assert_eq!(atom_from_len(0), 0);
        assert_eq!(atom_from_len(9), 9);
        assert_eq!(atom_from_len(u32::MAX as usize), u32::MAX);
    }

    #[test]
    fn unknown_type_codes_survive_reencode() {
        let bytes = AclBytes::new().entry(9, 0, 0, "bob").build();
        let acl = decode(&bytes, false).expect("type codes are not validated");
        assert_eq!(acl.entries()[0].ace_type(), AceType::Other(9));
        assert_eq!(encode(&acl), bytes);
    }

    #[test]
    fn encoded_len_matches_output() {
        let acl = Nfs4Acl::with_entries(
            false,
            vec![
                Nfs4Ace::new(AceType::Allow, 0, 0, "OWNER@"),
                Nfs4Ace::new(AceType::Allow, 0, 0, "EVERYONE@"),
                Nfs4Ace::new(AceType::Allow, 0, 0, "abcd"),
            ],
        );
        assert_eq!(encoded_len(&acl), 4 + (16 + 8) + (16 + 12) + (16 + 4));
        assert_eq!(encode(&acl).len(), encoded_len(&acl));
    }

    fn acl_padding_is_zero(bytes: &[u8], acl: &Nfs4Acl) -> bool {
        let mut offset = ATOM_SIZE;
        acl.iter().all(|ace| {
            let who_end = offset + ENTRY_HEADER_SIZE + ace.who().len();
            offset += ENTRY_HEADER_SIZE + padded_length(ace.who().len());
            bytes[who_end..offset].iter().all(|&b| b == 0)
        })
    }

    fn arb_ace() -> impl Strategy<Value = Nfs4Ace> {
        (
            any::<u32>(),
            any::<u32>(),
            any::<u32>(),
            prop_oneof![
                Just("OWNER@".to_owned()),
                Just("GROUP@".to_owned()),
                Just("EVERYONE@".to_owned()),
                ".{0,24}",
            ],
        )
            .prop_map(|(code, flags, mask, who)| {
                Nfs4Ace::new(AceType::from_code(code), flags, mask, who)
            })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            entries in prop::collection::vec(arb_ace(), 0..12),
            is_directory in any::<bool>(),
        ) {
            let acl = Nfs4Acl::with_entries(is_directory, entries);
            let bytes = encode(&acl);
            prop_assert_eq!(bytes.len() % ATOM_SIZE, 0);

            let parsed = decode(&bytes, is_directory).expect("encoded ACL decodes");
            prop_assert_eq!(parsed.entries(), acl.entries());
            prop_assert_eq!(parsed.is_directory(), is_directory);
            for (left, right) in parsed.iter().zip(acl.iter()) {
                prop_assert_eq!(left.who_type(), right.who_type());
            }
        }

        #[test]
        fn reencode_is_byte_identical(entries in prop::collection::vec(arb_ace(), 0..12)) {
            let bytes = encode(&Nfs4Acl::with_entries(false, entries));
            let reencoded = encode(&decode(&bytes, false).expect("canonical bytes decode"));
            prop_assert_eq!(reencoded, bytes);
        }

        #[test]
        fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            if let Ok(acl) = decode(&bytes, false) {
                prop_assert_eq!(encode(&acl).len(), bytes.len());
            }
        }

        #[test]
        fn accepted_buffers_reencode_identically(
            entries in prop::collection::vec(arb_ace(), 0..6),
            mutate in any::<prop::sample::Index>(),
            byte in any::<u8>(),
        ) {
            let mut bytes = encode(&Nfs4Acl::with_entries(false, entries));
            let at = mutate.index(bytes.len());
            bytes[at] = byte;
            if let Ok(acl) = decode(&bytes, false) {
                let reencoded = encode(&acl);
                prop_assert_eq!(reencoded.len(), bytes.len());
                if acl_padding_is_zero(&bytes, &acl) {
                    prop_assert_eq!(reencoded, bytes);
                }
            }
        }

        #[test]
        fn truncating_a_canonical_buffer_is_rejected(
            entries in prop::collection::vec(arb_ace(), 0..6),
            cut in any::<prop::sample::Index>(),
        ) {
            let bytes = encode(&Nfs4Acl::with_entries(false, entries));
            let keep = cut.index(bytes.len());
            prop_assert!(decode(&bytes[..keep], false).is_err());
        }

        #[test]
        fn extending_a_canonical_buffer_is_rejected(
            entries in prop::collection::vec(arb_ace(), 0..6),
            extra in prop::collection::vec(any::<u8>(), 1..12),
        ) {
            let mut bytes = encode(&Nfs4Acl::with_entries(false, entries));
            let consumed = bytes.len();
            bytes.extend_from_slice(&extra);
            prop_assert_eq!(
                decode(&bytes, false).unwrap_err(),
                DecodeError::TrailingBytes { consumed, len: bytes.len() }
            );
        }
    }
}
