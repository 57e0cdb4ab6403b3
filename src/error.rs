#[cfg(not(feature = "std"))]
use core as std;

use std::fmt;

/// All errors that constructing or generating a [`UuidV7`](crate::UuidV7) can produce.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Raw byte input was not exactly 16 bytes long.
    InvalidLength {
        /// Length of the rejected input.
        len: usize,
    },

    /// Text input was not in the 36-character 8-4-4-4-12 hexadecimal form.
    InvalidFormat,

    /// Parsed value does not carry version 7 in its version field.
    VersionMismatch {
        /// The high nibble of byte 6 as found in the input.
        version: u8,
    },

    /// The byte source ended before 16 bytes were read.
    ShortRead {
        /// Number of bytes read before the source ran dry.
        read: usize,
    },

    /// The monotonic generator saw the clock move backwards by no more than the configured
    /// cutoff.
    ClockRegression {
        /// Observed rollback in nanoseconds.
        drift_nanos: u64,
    },

    /// A thread panicked while holding the lock of a shared generator.
    LockPoisoned,

    /// The byte source failed with an error other than [`std::io::ErrorKind::Interrupted`].
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    Io {
        /// Kind of the error the source reported.
        kind: std::io::ErrorKind,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { len } => {
                write!(f, "invalid length: expected 16 bytes, got {len}")
            }
            Self::InvalidFormat => write!(f, "invalid string representation"),
            Self::VersionMismatch { version } => {
                write!(f, "version mismatch: expected 7, found {version}")
            }
            Self::ShortRead { read } => {
                write!(f, "short read: expected 16 bytes, got {read}")
            }
            Self::ClockRegression { drift_nanos } => write!(
                f,
                "clock moved backwards by {drift_nanos}ns, within the reset cutoff"
            ),
            Self::LockPoisoned => write!(f, "generator lock poisoned"),
            #[cfg(feature = "std")]
            Self::Io { kind } => write!(f, "read failed: {kind}"),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::Error;
    use std::sync::{MutexGuard, PoisonError};

    impl std::error::Error for Error {}

    impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
        fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
            Self::LockPoisoned
        }
    }
}
