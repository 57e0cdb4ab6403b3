//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Error, UuidV7};
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
fn lock_global_gen() -> Result<sync::MutexGuard<'static, GlobalGenInner>, Error> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    Ok(G.get_or_init(Default::default).lock()?)
}

/// Generates a UUIDv7 object from the process-wide global generator.
///
/// The global generator guarantees the process-wide monotonic order of UUIDs, including those
/// generated within the same millisecond. On Unix, it resets when the process ID changes (i.e.,
/// upon process forks) to prevent collisions across processes.
///
/// # Errors
///
/// Returns [`Error::ClockRegression`] if the system clock went backwards by ten seconds or less
/// since the previous call.
///
/// # Examples
///
/// ```rust
/// let uuid = idz::uuid7()?;
/// println!("{uuid}"); // e.g., "018f1a2b-3c4d-7e01-9a2b-3c4d5e6f7081"
/// println!("{:?}", uuid.to_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = idz::uuid7()?.to_string();
/// # Ok::<(), idz::Error>(())
/// ```
pub fn uuid7() -> Result<UuidV7, Error> {
    lock_global_gen()?.get_mut().generate()
}

mod inner {
    use crate::generator::{DefaultRng, StdSystemTime, V7Generator};

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: V7Generator<DefaultRng, StdSystemTime>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: V7Generator::new(DefaultRng::new(), StdSystemTime),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`V7Generator`] instance, resetting the
        /// generator state on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut V7Generator<DefaultRng, StdSystemTime> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}

#[cfg(test)]
mod tests {
    use super::uuid7;
    use crate::Variant;

    const N_SAMPLES: usize = 100_000;
    thread_local! {
        static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| uuid7().unwrap().into()).collect();
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

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Encodes up-to-date timestamp, carried ahead by counter overflow no further than the cutoff
    #[test]
    fn encodes_up_to_date_timestamp() {
        use crate::DEFAULT_CLOCK_DRIFT_CUTOFF_NANOS;
        use std::time;
        let max_run_ahead = (DEFAULT_CLOCK_DRIFT_CUTOFF_NANOS / 1_000_000) as i64;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = uuid7().unwrap().unix_ts_ms() as i64;
            assert!(ts_now - timestamp < 16, "{timestamp} behind {ts_now}");
            assert!(timestamp - ts_now <= max_run_ahead, "{timestamp} ahead of {ts_now}");
        }
    }

    /// Encodes unique sortable pair of timestamp and counter
    #[test]
    fn encodes_unique_sortable_pair_of_timestamp_and_counter() {
        SAMPLES.with(|samples| {
            let mut prev_timestamp = &samples[0][0..13];
            let mut prev_counter = &samples[0][15..18];
            for e in &samples[1..] {
                let curr_timestamp = &e[0..13];
                let curr_counter = &e[15..18];
                assert!(
                    prev_timestamp < curr_timestamp
                        || (prev_timestamp == curr_timestamp && prev_counter < curr_counter)
                );
                prev_timestamp = curr_timestamp;
                prev_counter = curr_counter;
            }
        });
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = uuid7().unwrap();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(7));
        }
    }

    /// Generates no IDs sharing same timestamp and counters under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_counters_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(uuid7().unwrap()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(<[u8; 8]>::try_from(&e.to_bytes()[..8]).unwrap());
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
