//! crates/nfs4acl/src/atom.rs
//!
//! Primitive accessors for the 4-byte big-endian units ("atoms") that make up
//! the `system.nfs4_acl` payload.
//!
//! The accessors index the buffer directly. Callers are expected to have
//! checked `offset + ATOM_SIZE <= buf.len()` beforehand; the decoder does so
//! for every read before it reaches these helpers.

/// Size in bytes of one wire atom (a big-endian `u32`).
pub const ATOM_SIZE: usize = 4;

/// Reads the big-endian `u32` stored at `offset`.
///
/// # Panics
///
/// Panics if fewer than [`ATOM_SIZE`] bytes are available at `offset`.
#[inline]
#[must_use]
pub fn read_u32_be(buf: &[u8], offset: usize) -> u32 {
    let bytes: [u8; ATOM_SIZE] = [
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ];
    u32::from_be_bytes(bytes)
}

/// Writes `value` as a big-endian `u32` at `offset`.
///
/// # Panics
///
/// Panics if fewer than [`ATOM_SIZE`] bytes are available at `offset`.
#[inline]
pub fn write_u32_be(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + ATOM_SIZE].copy_from_slice(&value.to_be_bytes());
}

/// Rounds a who-string length up to the next atom boundary.
///
/// Lengths that are already a multiple of [`ATOM_SIZE`] are returned
/// unchanged: a four byte who string occupies exactly one atom and is not
/// followed by an extra padding atom.
#[inline]
#[must_use]
pub const fn padded_length(byte_length: usize) -> usize {
    let whole = (byte_length / ATOM_SIZE) * ATOM_SIZE;
    if whole < byte_length {
        whole + ATOM_SIZE
    } else {
        whole
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_length_boundaries() {
        assert_eq!(padded_length(0), 0);
        assert_eq!(padded_length(1), 4);
        assert_eq!(padded_length(4), 4);
        assert_eq!(padded_length(5), 8);
        assert_eq!(padded_length(7), 8);
        assert_eq!(padded_length(8), 8);
        assert_eq!(padded_length(9), 12);
    }

    #[test]
    fn read_uses_network_byte_order() {
        let buf = [0x00, 0x00, 0x00, 0x02, 0xde, 0xad, 0xbe, 0xef];
        assert_eq!(read_u32_be(&buf, 0), 2);
        assert_eq!(read_u32_be(&buf, 4), 0xdead_beef);
    }

    #[test]
    fn write_places_bytes_at_offset() {
        let mut buf = [0u8; 8];
        write_u32_be(&mut buf, 4, 0x0010_0000);
        assert_eq!(buf, [0, 0, 0, 0, 0x00, 0x10, 0x00, 0x00]);
        assert_eq!(read_u32_be(&buf, 4), 0x0010_0000);
    }

    #[test]
    #[should_panic]
    fn read_past_end_panics() {
        let buf = [0u8; 3];
        let _ = read_u32_be(&buf, 0);
    }
}
