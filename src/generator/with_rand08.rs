//! Integration with `rand` (v0.8) crate.

use super::{RandSource, V7Generator};
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<T: RngCore> V7Generator<Adapter<T>, super::StdSystemTime> {
    /// Creates a generator object that reads the system clock and draws from a random number
    /// generator that implements [`RngCore`] from `rand` (v0.8) crate.
    pub fn with_rand08(rng: T) -> Self {
        Self::new(Adapter(rng), super::StdSystemTime)
    }
}
