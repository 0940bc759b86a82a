//! This module contains the signal state machine: the phase type, the timing
//! policy, and the traffic light itself with its background cycler thread.

use alloc::string::ToString;
use core::time::Duration;
use std::thread;
use std::time::Instant;

use tracing::debug;
use tracing::trace;

use crate::channel::Channel;
use crate::platform::*;
use crate::util::XorShift64Star;

// -----------------------------------------------------------------------------
// Phase

/// The phase stored in the light's atomic cell when the signal is red.
const RED: u32 = 0;

/// The phase stored in the light's atomic cell when the signal is green.
const GREEN: u32 = 1;

/// The current state of a traffic light.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The signal is not passable.
    Red,
    /// The signal is passable.
    Green,
}

impl Phase {
    /// Returns the opposite phase.
    pub fn flip(self) -> Phase {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }

    /// Returns true for [`Phase::Green`].
    pub fn is_green(self) -> bool {
        self == Phase::Green
    }

    fn into_u32(self) -> u32 {
        match self {
            Phase::Red => RED,
            Phase::Green => GREEN,
        }
    }

    fn from_u32(raw: u32) -> Phase {
        match raw {
            RED => Phase::Red,
            _ => Phase::Green,
        }
    }
}

// -----------------------------------------------------------------------------
// Cycle timing

/// The timing policy for a traffic light's cycler thread.
///
/// After every flip the cycler draws the target duration of the next cycle
/// uniformly from the closed interval `[min, max]`. Between elapsed-time
/// checks it sleeps for `tick`, so flips land within one tick of the drawn
/// target rather than at an exact deadline.
///
/// A fixed `seed` makes the sequence of drawn durations deterministic, which
/// is how the timing tests pin down the cycler's behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleTiming {
    /// The shortest duration a cycle may last.
    pub min: Duration,
    /// The longest duration a cycle may last.
    pub max: Duration,
    /// How long the cycler sleeps between elapsed-time checks.
    pub tick: Duration,
    /// A fixed seed for the duration generator, or `None` to seed uniquely.
    pub seed: Option<u64>,
}

impl CycleTiming {
    /// Creates a timing policy that draws cycle durations from `[min, max]`,
    /// with the default 1 ms check interval and a unique seed.
    pub fn new(min: Duration, max: Duration) -> Self {
        debug_assert!(min <= max);
        Self {
            min,
            max,
            tick: Duration::from_millis(1),
            seed: None,
        }
    }

    /// Sets the sleep interval between elapsed-time checks.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        debug_assert!(!tick.is_zero());
        self.tick = tick;
        self
    }

    /// Fixes the seed of the duration generator. Must be non-zero.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draws the target duration for the next cycle.
    fn draw(&self, rng: &XorShift64Star) -> Duration {
        rng.next_duration(self.min, self.max)
    }

    /// Creates the duration generator for one cycler run.
    fn rng(&self) -> XorShift64Star {
        match self.seed {
            Some(seed) => XorShift64Star::from_seed(seed),
            None => XorShift64Star::new(),
        }
    }
}

impl Default for CycleTiming {
    /// The reference timing: cycles of 4 to 6 seconds, checked every 1 ms.
    fn default() -> Self {
        Self::new(Duration::from_secs(4), Duration::from_secs(6))
    }
}

// -----------------------------------------------------------------------------
// Traffic light

/// A single traffic-light intersection.
///
/// The light is constructed red with no cycler running. Once
/// [`TrafficLight::simulate`] is called, a background thread flips the phase
/// at randomized intervals and publishes every transition into a [`Channel`]
/// shared with the waiters. Any number of threads may call
/// [`TrafficLight::wait_for_green`] or [`TrafficLight::current_phase`]
/// concurrently.
pub struct TrafficLight {
    /// The phase cell and channel, shared with the cycler thread.
    state: Arc<LightState>,
    /// The timing policy handed to the cycler when it starts.
    timing: CycleTiming,
    /// Controls for the running cycler, if any. Doubles as the guard that
    /// keeps a light from running two cyclers at once.
    cycler: Mutex<Option<ThreadControl>>,
}

/// The part of a traffic light that is shared with its cycler thread.
struct LightState {
    /// The authoritative phase. Written only by the cycler; read by anyone.
    phase: AtomicU32,
    /// Carries every phase transition from the cycler to the waiters.
    queue: Channel<Phase>,
}

impl LightState {
    /// Toggles the stored phase and returns the new value.
    ///
    /// Only the cycler calls this, so the load/store pair cannot race with
    /// another writer. Relaxed ordering suffices because the channel's lock
    /// is what publishes each transition to the waiters.
    fn flip_phase(&self) -> Phase {
        let next = Phase::from_u32(self.phase.load(Ordering::Relaxed)).flip();
        self.phase.store(next.into_u32(), Ordering::Relaxed);
        next
    }
}

/// Used to manage the lifecycle of the cycler thread.
struct ThreadControl {
    /// Tells the cycler to shut down when set to true.
    halt: Arc<AtomicBool>,
    /// The handle used to wait for the cycler to complete.
    handle: JoinHandle<()>,
}

impl TrafficLight {
    /// Creates a new light with the default timing. The initial phase is
    /// red and the cycler is not running.
    pub fn new() -> TrafficLight {
        Self::with_timing(CycleTiming::default())
    }

    /// Creates a new light with the given timing policy.
    pub fn with_timing(timing: CycleTiming) -> TrafficLight {
        TrafficLight {
            state: Arc::new(LightState {
                phase: AtomicU32::new(RED),
                queue: Channel::new(),
            }),
            timing,
            cycler: Mutex::new(None),
        }
    }

    /// Returns the current phase. Never blocks.
    ///
    /// This reads the phase cell directly rather than consuming from the
    /// channel, so repeated calls between flips return the same value.
    pub fn current_phase(&self) -> Phase {
        Phase::from_u32(self.state.phase.load(Ordering::Relaxed))
    }

    /// Blocks the calling thread until the light turns green.
    ///
    /// Every non-green transition delivered in the meantime is discarded.
    /// Delivery is fan-out: when several threads wait at once, each green
    /// transition releases exactly one of them, so the rest keep waiting for
    /// a later green.
    ///
    /// If the cycler was never started this blocks forever; starting the
    /// simulation is the caller's responsibility.
    pub fn wait_for_green(&self) {
        loop {
            if self.state.queue.recv().is_green() {
                return;
            }
            trace!("discarded non-green phase while waiting");
        }
    }

    /// Starts the background cycler thread.
    ///
    /// # Panics
    ///
    /// Panics if the cycler is already running, or if the thread cannot be
    /// spawned. Neither is recoverable: the first is a contract violation
    /// and the second is resource exhaustion at startup.
    pub fn simulate(&self) {
        let mut cycler = self.cycler.lock().unwrap();
        if cycler.is_some() {
            // Release the lock first so the drop-driven `stop` on the unwind
            // path finds it unpoisoned.
            drop(cycler);
            panic!("attempted to start a traffic light that is already cycling");
        }

        debug!("spawning traffic light cycler");
        let halt = Arc::new(AtomicBool::new(false));
        let cycler_halt = halt.clone();
        let state = self.state.clone();
        let timing = self.timing;
        let handle = ThreadBuilder::new()
            .name("cycler".to_string())
            .spawn(move || {
                cycle_loop(&state, timing, &cycler_halt);
            })
            .expect("failed to spawn traffic light cycler");

        *cycler = Some(ThreadControl { halt, handle });
    }

    /// Halts the cycler thread and waits for it to exit.
    ///
    /// The cycler notices the halt request within one tick. Calling this on
    /// a light that is not cycling does nothing, so `stop` is idempotent.
    pub fn stop(&self) {
        let control = self.cycler.lock().unwrap().take();
        if let Some(control) = control {
            debug!("halting traffic light cycler");
            control.halt.store(true, Ordering::Relaxed);
            let _ = control.handle.join();
        }
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrafficLight {
    /// A dropped light halts and joins its cycler rather than leaking it.
    fn drop(&mut self) {
        self.stop();
    }
}

// -----------------------------------------------------------------------------
// Cycler loop

/// This is the main loop for the cycler thread. It measures the time since
/// the last phase flip and, once that reaches the randomly drawn target
/// duration, toggles the phase, publishes the new value into the channel,
/// and draws a fresh target. Between checks it sleeps for one tick to avoid
/// spinning while still polling well below the target granularity.
fn cycle_loop(state: &LightState, timing: CycleTiming, halt: &AtomicBool) {
    trace!("starting traffic light cycler");

    let rng = timing.rng();
    let mut last_flip = Instant::now();
    let mut target = timing.draw(&rng);

    while !halt.load(Ordering::Relaxed) {
        if last_flip.elapsed() >= target {
            let phase = state.flip_phase();
            trace!("phase flipped to {:?}", phase);
            state.queue.send(phase);
            last_flip = Instant::now();
            target = timing.draw(&rng);
        }

        thread::sleep(timing.tick);
    }

    trace!("exiting traffic light cycler");
}

// -----------------------------------------------------------------------------
// Tests
