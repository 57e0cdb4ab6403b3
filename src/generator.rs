//! UUIDv7 generators and their pluggable sources.

use crate::bits::{self, MID_BITS, TAIL_BITS};
use crate::{Error, UuidV7};

#[cfg(feature = "global_gen")]
mod default_rng;
#[cfg(feature = "global_gen")]
pub use default_rng::DefaultRng;

pub mod with_rand08;


/// The default amount of backward clock drift, in nanoseconds, treated as an error rather than a
/// reset: ten seconds.
pub const DEFAULT_CLOCK_DRIFT_CUTOFF_NANOS: u64 = 10_000_000_000;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Largest counter value that fits in the 12-bit `rand_a` field.
const MAX_COUNTER: u32 = (1 << MID_BITS) - 1;

/// Width of the random counter seed, one bit short of the field to leave room for increments.
const SEED_BITS: u32 = MID_BITS - 1;

/// Exclusive upper bound of the random counter increment.
const MAX_INCREMENT: u32 = 32;

/// A trait that defines the minimum random number generator interface for [`V7Generator`].
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;

    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> u64;
}

/// A trait that defines the minimum system clock interface for [`V7Generator`].
pub trait TimeSource {
    /// Returns the current Unix time in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that reads [`std::time::SystemTime`].
///
/// A clock set before the Unix epoch reads as zero.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

#[cfg(feature = "std")]
impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// Represents a UUIDv7 generator that encapsulates a counter and guarantees the monotonic order
/// of UUIDs generated within the same millisecond.
///
/// The generator keeps the last observed clock reading and a 12-bit counter stored in the
/// `rand_a` field:
///
/// - When the clock advances, the counter is reseeded with 11 random bits.
/// - Within the same millisecond, the counter grows by a random step in `1..32`, so the
///   generation rate cannot be read off the IDs.
/// - When the counter no longer fits in 12 bits, the UUID is stamped with the next millisecond
///   and the counter restarts at zero. Later calls keep counting on that carried timestamp until
///   the clock catches up with it. The carried timestamp never runs ahead of the clock by more
///   than the clock drift cutoff (or one millisecond, whichever is larger); an overflow past that
///   bound resets the generator to the current reading instead.
/// - When the clock moves backwards by more than the clock drift cutoff, the generator resets
///   and starts over from the new reading. A smaller rollback is reported as
///   [`Error::ClockRegression`] and leaves the state untouched. A cutoff of zero turns every
///   rollback into a reset.
///
/// This type needs `&mut self` to generate. Share it across threads through
/// [`MonotonicGenerator`], which wraps it in a mutex.
///
/// # Examples
///
/// ```rust
/// use idz::V7Generator;
///
/// let mut g = V7Generator::with_rand08(rand::rngs::OsRng);
/// let x = g.generate()?;
/// let y = g.generate()?;
/// assert!(x < y);
/// # Ok::<(), idz::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct V7Generator<R, T> {
    last_millis: Option<u64>,
    timestamp: u64,
    counter: u32,
    clock_drift_cutoff_nanos: u64,

    /// The random number generator used by the generator.
    rng: R,

    /// The system clock used by the generator.
    time: T,
}

impl<R: RandSource, T: TimeSource> V7Generator<R, T> {
    /// Creates a generator object with the default clock drift cutoff of ten seconds.
    pub const fn new(rng: R, time: T) -> Self {
        Self {
            last_millis: None,
            timestamp: 0,
            counter: 0,
            clock_drift_cutoff_nanos: DEFAULT_CLOCK_DRIFT_CUTOFF_NANOS,
            rng,
            time,
        }
    }

    /// Replaces the amount of backward clock drift, in nanoseconds, that is reported as an error
    /// instead of resetting the generator. Zero disables the error entirely.
    pub fn with_clock_drift_cutoff(mut self, nanos: u64) -> Self {
        self.clock_drift_cutoff_nanos = nanos;
        self
    }

    /// Returns the configured clock drift cutoff in nanoseconds.
    pub const fn clock_drift_cutoff_nanos(&self) -> u64 {
        self.clock_drift_cutoff_nanos
    }

    /// Generates a new UUIDv7 object from the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock went backwards by no more than the clock
    /// drift cutoff since the previous call.
    pub fn generate(&mut self) -> Result<UuidV7, Error> {
        let unix_ts_ms = self.time.unix_ts_ms();
        self.generate_core(unix_ts_ms)
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed.
    ///
    /// See the [`V7Generator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if `unix_ts_ms` is smaller than the previous one by no
    /// more than the clock drift cutoff.
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Result<UuidV7, Error> {
        match self.last_millis {
            None => self.reset(unix_ts_ms),
            Some(last) if unix_ts_ms == last => self.increment_counter(),
            Some(last) if unix_ts_ms < last => {
                let drift_nanos = (last - unix_ts_ms).saturating_mul(NANOS_PER_MILLI);
                if drift_nanos <= self.clock_drift_cutoff_nanos {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(drift_nanos, "clock moved backwards within cutoff");
                    return Err(Error::ClockRegression { drift_nanos });
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(drift_nanos, "clock moved backwards past cutoff; resetting");
                self.reset(unix_ts_ms);
            }
            Some(_) if unix_ts_ms <= self.timestamp => {
                // clock advanced but is still behind a timestamp carried over by overflow
                self.last_millis = Some(unix_ts_ms);
                self.increment_counter();
            }
            Some(_) => self.reset(unix_ts_ms),
        }

        if self.counter > MAX_COUNTER {
            let run_ahead = self.timestamp.saturating_add(1).saturating_sub(unix_ts_ms);
            if run_ahead > self.max_run_ahead_millis() {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    timestamp = self.timestamp,
                    unix_ts_ms,
                    "counter overflow would run too far ahead of the clock; resetting"
                );
                self.reset(unix_ts_ms);
            } else {
                #[cfg(feature = "tracing")]
                tracing::trace!(timestamp = self.timestamp, "counter overflow");
                self.timestamp = self.timestamp.saturating_add(1);
                self.counter = 0;
            }
        }

        Ok(UuidV7::from_fields(
            self.timestamp,
            self.counter as u16,
            bits::random_bits(&mut self.rng, TAIL_BITS),
        ))
    }

    /// Returns how far, in milliseconds, a timestamp carried over by counter overflow may run
    /// ahead of the clock: the clock drift cutoff, but never less than one millisecond.
    fn max_run_ahead_millis(&self) -> u64 {
        (self.clock_drift_cutoff_nanos / NANOS_PER_MILLI).max(1)
    }

    /// Starts over from `unix_ts_ms` with a freshly seeded counter.
    fn reset(&mut self, unix_ts_ms: u64) {
        self.last_millis = Some(unix_ts_ms);
        self.timestamp = unix_ts_ms;
        self.counter = bits::random_bits(&mut self.rng, SEED_BITS) as u32;
    }

    fn increment_counter(&mut self) {
        self.counter += 1 + self.rng.next_u32() % (MAX_INCREMENT - 1);
    }
}

#[cfg(feature = "std")]
pub use sync::MonotonicGenerator;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod sync {
    use std::sync::Mutex;

    use super::{RandSource, TimeSource, V7Generator};
    use crate::{Error, UuidV7};

    /// A thread-safe handle of [`V7Generator`].
    ///
    /// Every call reads the clock, decides the transition and updates the state while holding
    /// one lock, so concurrent callers sharing an instance never observe the same state twice.
    /// Separate instances make no ordering guarantee between each other.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::{sync::Arc, thread};
    /// use idz::MonotonicGenerator;
    ///
    /// let g = Arc::new(MonotonicGenerator::new());
    /// thread::scope(|s| {
    ///     for i in 0..4 {
    ///         let g = Arc::clone(&g);
    ///         s.spawn(move || {
    ///             for _ in 0..8 {
    ///                 println!("{} by thread {}", g.generate().unwrap(), i);
    ///                 thread::yield_now();
    ///             }
    ///         });
    ///     }
    /// });
    /// ```
    #[derive(Debug)]
    pub struct MonotonicGenerator<R, T> {
        pub(super) inner: Mutex<V7Generator<R, T>>,
    }

    impl<R: RandSource, T: TimeSource> MonotonicGenerator<R, T> {
        /// Wraps a generator so that it can be shared across threads.
        pub const fn from_generator(generator: V7Generator<R, T>) -> Self {
            Self {
                inner: Mutex::new(generator),
            }
        }

        /// Generates a new UUIDv7 object from the current timestamp.
        ///
        /// # Errors
        ///
        /// Returns [`Error::ClockRegression`] as [`V7Generator::generate`] does, or
        /// [`Error::LockPoisoned`] if another thread panicked while generating.
        #[cfg_attr(
            feature = "tracing",
            tracing::instrument(level = "trace", skip(self))
        )]
        pub fn generate(&self) -> Result<UuidV7, Error> {
            self.inner.lock()?.generate()
        }
    }

    #[cfg(feature = "global_gen")]
    mod defaults {
        use super::MonotonicGenerator;
        use crate::generator::{DefaultRng, StdSystemTime, V7Generator};

        impl MonotonicGenerator<DefaultRng, StdSystemTime> {
            /// Creates a generator that reads the system clock and draws from [`DefaultRng`],
            /// with the default clock drift cutoff of ten seconds.
            pub fn new() -> Self {
                Self::from_generator(V7Generator::new(DefaultRng::new(), StdSystemTime))
            }

            /// Creates a generator like [`MonotonicGenerator::new`] with a custom clock drift
            /// cutoff in nanoseconds.
            pub fn with_clock_drift_cutoff(nanos: u64) -> Self {
                Self::from_generator(
                    V7Generator::new(DefaultRng::new(), StdSystemTime)
                        .with_clock_drift_cutoff(nanos),
                )
            }
        }

        impl Default for MonotonicGenerator<DefaultRng, StdSystemTime> {
            fn default() -> Self {
                Self::new()
            }
        }
    }
}

/// Creates a [`MonotonicGenerator`] backed by the system clock and [`DefaultRng`].
///
/// `clock_drift_cutoff_nanos` defaults to ten seconds when `None`.
///
/// # Examples
///
/// ```rust
/// let g = idz::monotonic_generator(Some(5_000_000_000));
/// let x = g.generate()?;
/// let y = g.generate()?;
/// assert!(x < y);
/// # Ok::<(), idz::Error>(())
/// ```
#[cfg(feature = "global_gen")]
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn monotonic_generator(
    clock_drift_cutoff_nanos: Option<u64>,
) -> MonotonicGenerator<DefaultRng, StdSystemTime> {
    MonotonicGenerator::with_clock_drift_cutoff(
        clock_drift_cutoff_nanos.unwrap_or(DEFAULT_CLOCK_DRIFT_CUTOFF_NANOS),
    )
}
