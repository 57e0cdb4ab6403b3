//! Stateless UUIDv7 generation.
//!
//! Every call draws the whole `rand_a` and `rand_b` fields at random, so no state is shared
//! between calls and any number of threads may generate at once. The price is ordering: two UUIDs
//! generated within the same millisecond compare in an arbitrary order. Use
//! [`MonotonicGenerator`](crate::MonotonicGenerator) when that matters.

use crate::bits::{self, MID_BITS, TAIL_BITS};
use crate::generator::RandSource;
use crate::UuidV7;

/// Generates a UUIDv7 object from the current timestamp and the thread-local random number
/// generator of `rand`.
///
/// # Examples
///
/// ```rust
/// let uuid = idz::uuid7_oneshot();
/// println!("{uuid}"); // e.g., "018f1a2b-3c4d-7e01-9a2b-3c4d5e6f7081"
/// assert_eq!(uuid.version(), Some(7));
/// ```
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub fn generate() -> UuidV7 {
    use crate::generator::{with_rand08::Adapter, StdSystemTime, TimeSource};
    generate_with(&mut Adapter(rand::thread_rng()), StdSystemTime.unix_ts_ms())
}

/// Generates a UUIDv7 object from `unix_ts_ms` with random bits drawn from `rng`.
pub fn generate_with<R: RandSource + ?Sized>(rng: &mut R, unix_ts_ms: u64) -> UuidV7 {
    let rand_a = bits::random_bits(rng, MID_BITS) as u16;
    let rand_b = bits::random_bits(rng, TAIL_BITS);
    UuidV7::from_fields(unix_ts_ms, rand_a, rand_b)
}

#[cfg(feature = "std")]
#[cfg(test)]
mod tests {
    use super::{generate, generate_with};
    use crate::generator::with_rand08::Adapter;
    use crate::Variant;

    const N_SAMPLES: usize = 100_000;
    thread_local! {
        static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| generate().into()).collect();
    }

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-7[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = generate().unix_ts_ms() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in (52..64).chain(66..128) {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    /// Places the given timestamp
    #[test]
    fn places_the_given_timestamp() {
        let mut rng = Adapter(rand::thread_rng());
        for ts in [0, 1, 0x0123_4567_89ab, (1 << 48) - 1] {
            let e = generate_with(&mut rng, ts);
            assert_eq!(e.unix_ts_ms(), ts);
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(7));
        }
        assert_eq!(generate_with(&mut rng, 1 << 48).unix_ts_ms(), 0);
    }
}
