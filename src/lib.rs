//! Time-sortable UUID version 7 identifiers
//!
//! ```rust
//! use idz::uuid7;
//!
//! let uuid = uuid7()?;
//! println!("{}", uuid); // e.g. "018f1a2b-3c4d-7e01-9a2b-3c4d5e6f7081"
//! println!("{:?}", uuid.to_bytes()); // as 16-byte big-endian array
//! # Ok::<(), idz::Error>(())
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562.html#name-uuid-version-7).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        counter        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds, keeping its 48 least significant bits.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `counter` field accommodates the sequence counter that ensures the
//!   monotonic order of IDs generated within the same millisecond. The counter is
//!   randomly initialized below 2048 whenever the `unix_ts_ms` changes and grows
//!   by a random step of 1 to 31 for each new ID within the same timestamp.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `rand` bits are filled with a cryptographically strong random
//!   number.
//!
//! When the 12-bit `counter` field overflows, the generator stamps the next ID with
//! the following millisecond and restarts the counter at zero; the `unix_ts_ms` may
//! thus run ahead of the real-time clock, by no more than the clock drift cutoff. If
//! the system clock moves back by ten seconds or less, generation fails with
//! [`Error::ClockRegression`]; a larger rollback, or an overflow that would run
//! further ahead, resets the generator and thus breaks the monotonic order of
//! generated identifiers. The cutoff is configurable per [`V7Generator`].
//!
//! # Ordering
//!
//! [`UuidV7::cmp_time_order`] is the time order of identifiers: it compares the
//! `unix_ts_ms` field and then the `ver` and `counter` bits, and ignores the rest.
//! The [`Ord`] implementation compares all 16 bytes so that it agrees with [`Eq`]
//! and [`Hash`](core::hash::Hash). It refines the time order: whenever
//! `cmp_time_order` says one identifier is earlier, `<` says so too, and identifiers
//! tied in time order are ranked by their random bits.
//!
//! # Other generators
//!
//! [`uuid7_oneshot`] fills the `counter` field with random bits instead. It shares
//! no state between calls, but IDs generated within the same millisecond come out in
//! no particular order.
//!
//! # Crate features
//!
//! - `std` enables the system clock, raw byte I/O and [`MonotonicGenerator`].
//! - `global_gen` (default) enables [`uuid7`] and [`DefaultRng`].
//! - `serde` and `uuid` enable the respective integrations.
//! - `tracing` logs clock anomalies and counter overflows through the `tracing` crate.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bits;
pub use bits::{assemble, join_octets, pack_timestamp, random_bits, split_octets};

mod error;
pub use error::Error;

mod id;
pub use id::{UuidV7, Variant};

pub mod generator;
pub use generator::{RandSource, TimeSource, V7Generator, DEFAULT_CLOCK_DRIFT_CUTOFF_NANOS};

#[cfg(feature = "std")]
pub use generator::{MonotonicGenerator, StdSystemTime};

#[cfg(feature = "global_gen")]
pub use generator::{monotonic_generator, DefaultRng};

pub mod oneshot;
#[cfg(feature = "std")]
#[doc(inline)]
pub use oneshot::generate as uuid7_oneshot;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::uuid7;
