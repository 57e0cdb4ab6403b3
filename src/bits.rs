//! Bit-level helpers that lay out the UUIDv7 fields.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        rand_a         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                        rand_b                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            rand_b                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use crate::generator::RandSource;

/// Width of the `unix_ts_ms` field.
pub const TIMESTAMP_BITS: u32 = 48;

/// Width of the `rand_a` field, which the monotonic generator uses as its counter.
pub const MID_BITS: u32 = 12;

/// Width of the `rand_b` field.
pub const TAIL_BITS: u32 = 62;

/// The `ver` field value.
pub const VERSION: u8 = 0b0111;

/// The `var` field value.
pub const VARIANT: u8 = 0b10;

const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;
const MID_MASK: u16 = (1 << MID_BITS) - 1;
const TAIL_MASK: u64 = (1 << TAIL_BITS) - 1;

/// Returns the 48 least significant bits of `epoch_millis`.
pub const fn pack_timestamp(epoch_millis: u64) -> u64 {
    epoch_millis & TIMESTAMP_MASK
}

/// Draws exactly `n` uniformly random bits, zero-filled at the high end.
///
/// `n` is clamped to 64. Zero bits are zero and consume nothing from `rng`.
pub fn random_bits<R: RandSource + ?Sized>(rng: &mut R, n: u32) -> u64 {
    match n.min(64) {
        0 => 0,
        n => rng.next_u64() >> (64 - n),
    }
}

/// Concatenates `ts` (48 bits), the version (4), `mid` (12), the variant (2) and `tail` (62)
/// into 16 bytes, most significant bit first.
///
/// Each field is masked to its width before it is placed.
pub const fn assemble(ts: u64, mid: u16, tail: u64) -> [u8; 16] {
    let bits = (pack_timestamp(ts) as u128) << 80
        | (VERSION as u128) << 76
        | ((mid & MID_MASK) as u128) << 64
        | (VARIANT as u128) << 62
        | (tail & TAIL_MASK) as u128;
    split_octets(bits)
}

/// Splits a 128-bit value into big-endian octets.
pub const fn split_octets(bits: u128) -> [u8; 16] {
    bits.to_be_bytes()
}

/// Joins big-endian octets into a 128-bit value.
pub const fn join_octets(octets: [u8; 16]) -> u128 {
    u128::from_be_bytes(octets)
}

/// Reads `bytes` as a big-endian unsigned integer.
pub(crate) fn read_be(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes.iter().fold(0, |acc, &e| acc << 8 | e as u64)
}

/// Returns the lower-case hexadecimal digit for the low nibble of `nibble`.
pub(crate) const fn hex_digit(nibble: u8) -> u8 {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    DIGITS[(nibble & 15) as usize]
}

/// Decodes one hexadecimal digit of either case.
pub(crate) const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
