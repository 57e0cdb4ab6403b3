use rand::rngs::{adapter::ReseedingRng, OsRng};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Core;

use super::RandSource;

/// Number of bytes generated before the [`DefaultRng`] reseeds itself from the OS.
const RESEED_THRESHOLD: u64 = 1024 * 64;

/// The default random number generator used by [`MonotonicGenerator::new`] and the global
/// generator.
///
/// It wraps [`ChaCha12Core`] with [`ReseedingRng`] to emulate the strategy used by
/// [`rand::rngs::ThreadRng`], while remaining [`Send`] so that it can live behind a mutex.
///
/// [`MonotonicGenerator::new`]: crate::MonotonicGenerator::new
#[derive(Debug)]
pub struct DefaultRng(ReseedingRng<ChaCha12Core, OsRng>);

impl DefaultRng {
    /// Creates an instance seeded from the operating system.
    pub fn new() -> Self {
        Self(ReseedingRng::new(
            ChaCha12Core::from_entropy(),
            RESEED_THRESHOLD,
            OsRng,
        ))
    }
}

impl Default for DefaultRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandSource for DefaultRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
}
