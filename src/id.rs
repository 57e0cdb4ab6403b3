#[cfg(not(feature = "std"))]
use core as std;

use std::{cmp, fmt, str};

use fstr::FStr;

use crate::bits;
use crate::Error;

/// Represents a UUID version 7 value.
///
/// The value is a plain 16-byte array. It is [`Copy`], so every accessor hands out a copy and
/// nothing can reach the stored bytes mutably.
///
/// # Ordering
///
/// [`Ord`] compares the 16 bytes lexicographically, which sorts identifiers by `unix_ts_ms`,
/// then by the 16-bit group holding the version and counter, then by the random tail. The first
/// two keys alone are available through [`UuidV7::cmp_time_order`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct UuidV7([u8; 16]);

impl UuidV7 {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Creates an object from UUIDv7 field values, masking each to its width.
    pub const fn from_fields(unix_ts_ms: u64, rand_a: u16, rand_b: u64) -> Self {
        Self(bits::assemble(unix_ts_ms, rand_a, rand_b))
    }

    /// Creates an object from a byte slice that must be exactly 16 bytes long.
    ///
    /// No version or variant check is performed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `bytes` is not 16 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        <[u8; 16]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidLength { len: bytes.len() })
    }

    /// Parses the 8-4-4-4-12 hexadecimal string representation.
    ///
    /// Upper-case digits are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if `src` is not in the canonical form, or
    /// [`Error::VersionMismatch`] if it does not denote a version 7 UUID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use idz::UuidV7;
    ///
    /// let x = UuidV7::parse("018f1a2b-3c4d-7e01-9a2b-3c4d5e6f7081")?;
    /// assert_eq!(x.unix_ts_ms(), 0x018f_1a2b_3c4d);
    /// assert!(UuidV7::parse("018f1a2b-3c4d-4e01-9a2b-3c4d5e6f7081").is_err());
    /// # Ok::<(), idz::Error>(())
    /// ```
    pub fn parse(src: &str) -> Result<Self, Error> {
        const ERR: Error = Error::InvalidFormat;

        let src = src.as_bytes();
        if src.len() != 36 {
            return Err(ERR);
        }

        let mut dst = [0u8; 16];
        let mut iter = src.iter().copied();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().and_then(bits::parse_hex_digit).ok_or(ERR)?;
            let lo = iter.next().and_then(bits::parse_hex_digit).ok_or(ERR)?;
            *e = (hi << 4) | lo;
            if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next() != Some(b'-') {
                return Err(ERR);
            }
        }

        if dst[6] >> 4 != bits::VERSION {
            return Err(Error::VersionMismatch {
                version: dst[6] >> 4,
            });
        }
        Ok(Self(dst))
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string.
    ///
    /// Use the [`fmt::Display`] trait usually; this method serves `no_std` environments where
    /// heap-allocated strings are not available.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use idz::UuidV7;
    ///
    /// let x = UuidV7::from([
    ///     0x01, 0x8f, 0x1a, 0x2b, 0x3c, 0x4d, 0x7e, 0x01,
    ///     0x9a, 0x2b, 0x3c, 0x4d, 0x5e, 0x6f, 0x70, 0x81,
    /// ]);
    /// assert_eq!(&x.encode() as &str, "018f1a2b-3c4d-7e01-9a2b-3c4d5e6f7081");
    /// ```
    pub fn encode(&self) -> FStr<36> {
        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, &e) in self.0.iter().enumerate() {
            for c in [bits::hex_digit(e >> 4), bits::hex_digit(e)] {
                if let Some(slot) = buf_iter.next() {
                    *slot = c;
                }
            }
            if i == 3 || i == 5 || i == 7 || i == 9 {
                if let Some(slot) = buf_iter.next() {
                    *slot = b'-';
                }
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: buffer consists of ASCII hex digits and dashes only
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns a copy of the 16 bytes.
    pub const fn to_bytes(&self) -> [u8; 16] {
        self.0
    }

    /// Returns the `unix_ts_ms` field: Unix time in milliseconds, big-endian in bytes 0..6.
    pub fn unix_ts_ms(&self) -> u64 {
        bits::read_be(&self.0[..6])
    }

    /// Returns the `unix_ts_ms` field as a [`SystemTime`](std::time::SystemTime).
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn created_at(&self) -> std::time::SystemTime {
        std::time::UNIX_EPOCH + std::time::Duration::from_millis(self.unix_ts_ms())
    }

    /// Compares two objects by `unix_ts_ms` first and then by the raw bytes 6..8, the group that
    /// holds the version and the counter. This is the time order of identifiers.
    ///
    /// Objects equal under this ordering may still differ in their remaining bytes. [`Ord`]
    /// refines this ordering into a total order consistent with equality.
    pub fn cmp_time_order(&self, other: &Self) -> cmp::Ordering {
        bits::read_be(&self.0[..6])
            .cmp(&bits::read_be(&other.0[..6]))
            .then_with(|| bits::read_be(&self.0[6..8]).cmp(&bits::read_be(&other.0[6..8])))
    }

    /// Returns the version field if the variant field is `10`; `None` otherwise.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the variant field.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0b0000..=0b0111 => Variant::Var0,
            0b1000..=0b1011 => Variant::Var10,
            0b1100..=0b1101 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }
}

/// The variant field values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum Variant {
    /// `0b0` (NCS-compatible, Nil UUID).
    Var0,
    /// `0b10` (RFC 9562).
    Var10,
    /// `0b110` (Microsoft-compatible).
    Var110,
    /// `0b111` (reserved, Max UUID).
    VarReserved,
}

impl fmt::Display for UuidV7 {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for UuidV7 {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src)
    }
}

impl From<UuidV7> for [u8; 16] {
    fn from(src: UuidV7) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for UuidV7 {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for UuidV7 {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl AsRef<[u8]> for UuidV7 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<UuidV7> for u128 {
    fn from(src: UuidV7) -> Self {
        bits::join_octets(src.0)
    }
}

impl From<u128> for UuidV7 {
    fn from(src: u128) -> Self {
        Self(bits::split_octets(src))
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::UuidV7;
    use crate::Error;
    use std::io;

    impl From<UuidV7> for String {
        fn from(src: UuidV7) -> Self {
            src.to_string()
        }
    }

    impl TryFrom<String> for UuidV7 {
        type Error = Error;

        fn try_from(src: String) -> Result<Self, Self::Error> {
            src.parse()
        }
    }

    impl UuidV7 {
        /// Writes the 16 bytes verbatim to `sink`, with no length prefix or framing.
        ///
        /// # Errors
        ///
        /// Propagates any error the sink reports.
        pub fn write_raw<W: io::Write>(&self, mut sink: W) -> io::Result<()> {
            sink.write_all(&self.0)?;
            sink.flush()
        }

        /// Reads exactly 16 bytes from `source`.
        ///
        /// # Errors
        ///
        /// Returns [`Error::ShortRead`] if `source` reaches its end before 16 bytes have been
        /// read, or [`Error::Io`] carrying the error kind if `source` fails. Interrupted reads
        /// are retried.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use idz::UuidV7;
        ///
        /// let x = UuidV7::parse("018f1a2b-3c4d-7e01-9a2b-3c4d5e6f7081")?;
        /// let mut buf = Vec::new();
        /// x.write_raw(&mut buf).unwrap();
        /// assert_eq!(UuidV7::read_raw(&buf[..])?, x);
        /// assert!(UuidV7::read_raw(&buf[..15]).is_err());
        /// # Ok::<(), idz::Error>(())
        /// ```
        pub fn read_raw<R: io::Read>(mut source: R) -> Result<Self, Error> {
            let mut dst = [0u8; 16];
            let mut read = 0;
            while read < dst.len() {
                match source.read(&mut dst[read..]) {
                    Ok(0) => break,
                    Ok(n) => read += n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(Error::Io { kind: e.kind() }),
                }
            }
            if read < dst.len() {
                return Err(Error::ShortRead { read });
            }
            Ok(Self(dst))
        }
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::UuidV7;
    use crate::Error;

    impl From<UuidV7> for uuid::Uuid {
        fn from(src: UuidV7) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl TryFrom<uuid::Uuid> for UuidV7 {
        type Error = Error;

        fn try_from(src: uuid::Uuid) -> Result<Self, Self::Error> {
            match src.get_version_num() {
                7 => Ok(Self(src.into_bytes())),
                version => Err(Error::VersionMismatch {
                    version: version as u8,
                }),
            }
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, UuidV7};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for UuidV7 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.0)
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for UuidV7 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = UuidV7;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUIDv7 representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            UuidV7::parse(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            UuidV7::from_slice(value).map_err(de::Error::custom)
        }
    }

}
