//! Randomness for the cycle durations.

use core::cell::Cell;
use core::hash::Hasher;
use core::sync::atomic::AtomicUsize;
use core::sync::atomic::Ordering;
use core::time::Duration;
use std::hash::DefaultHasher;

/// [xorshift*] is a fast pseudorandom number generator which will
/// even tolerate weak seeding, as long as it's not zero.
///
/// The cycler owns one of these and uses it to draw a fresh target duration
/// after every phase flip. Seeding from a fixed value makes the sequence of
/// durations fully deterministic, which the timing tests rely on.
///
/// [xorshift*]: https://en.wikipedia.org/wiki/Xorshift#xorshift*
#[cfg(not(feature = "shuttle"))]
pub struct XorShift64Star {
    state: Cell<u64>,
}

#[cfg(not(feature = "shuttle"))]
impl XorShift64Star {
    /// Creates a generator with a unique seed drawn from a global counter.
    pub fn new() -> Self {
        // Any non-zero seed will do -- this uses the hash of a global counter.
        let mut seed = 0;
        while seed == 0 {
            let mut hasher = DefaultHasher::new();
            static COUNTER: AtomicUsize = AtomicUsize::new(0);
            hasher.write_usize(COUNTER.fetch_add(1, Ordering::Relaxed));
            seed = hasher.finish();
        }

        XorShift64Star {
            state: Cell::new(seed),
        }
    }

    /// Creates a generator from a fixed, non-zero seed.
    pub fn from_seed(seed: u64) -> Self {
        debug_assert_ne!(seed, 0);
        XorShift64Star {
            state: Cell::new(seed),
        }
    }

    fn next(&self) -> u64 {
        let mut x = self.state.get();
        debug_assert_ne!(x, 0);
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state.set(x);
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Return a value from `0..n`.
    pub fn next_bounded(&self, n: u64) -> u64 {
        self.next() % n
    }

    /// Return a duration drawn uniformly from `[min, max]`, with millisecond
    /// granularity.
    pub fn next_duration(&self, min: Duration, max: Duration) -> Duration {
        let spread = (max - min).as_millis() as u64;
        min + Duration::from_millis(self.next_bounded(spread + 1))
    }
}

#[cfg(feature = "shuttle")]
pub struct XorShift64Star;

#[cfg(feature = "shuttle")]
impl XorShift64Star {
    pub fn new() -> Self {
        Self
    }

    pub fn from_seed(_seed: u64) -> Self {
        // Shuttle controls all randomness during a model run, so the seed is
        // ignored in favor of its scheduler-driven generator.
        Self
    }

    pub fn next_bounded(&self, n: u64) -> u64 {
        use shuttle::rand::Rng;
        use shuttle::rand::thread_rng;

        thread_rng().gen_range(0..n)
    }

    pub fn next_duration(&self, min: Duration, max: Duration) -> Duration {
        let spread = (max - min).as_millis() as u64;
        min + Duration::from_millis(self.next_bounded(spread + 1))
    }
}
