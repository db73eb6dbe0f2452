use core::time::Duration;
use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::{error, instrument, warn};

use crate::{
    generator::{Error, Result},
    id::SnowflakeId,
    provider::{WorkerIdProvider, acquire_worker_id},
    random::{RandSource, ThreadRandom},
    sleep::{SleepProvider, ThreadSleep},
    time::{SystemClock, TimeSource},
};

/// Largest backward clock jump (in ms) the generator waits out instead of
/// failing with [`Error::ClockRegressionSevere`].
pub const MAX_BACKWARD_DRIFT_MS: u64 = 5;

/// The first sequence of every millisecond is drawn from `0..SEQUENCE_SEED_BOUND`.
pub const SEQUENCE_SEED_BOUND: u64 = 100;

// Clock polls between scheduler yields while waiting out an exhausted
// sequence.
const SPINS_PER_YIELD: u32 = 64;

/// Mutable generator state. Only ever touched with the lock held.
#[derive(Debug)]
struct GeneratorState<R> {
    /// Unix millis of the last successful call, `None` before the first one.
    last_timestamp: Option<u64>,
    sequence: u64,
    rng: R,
}

/// A lock-based Snowflake ID generator shared by every caller in a process.
///
/// The entire [`next_id`] body runs under one mutex, so concurrent callers are
/// strictly serialized and state is never observed half-updated. Construct
/// one generator per worker ID and share it (e.g. behind an `Arc`); never run
/// two generators with the same worker ID at once.
///
/// Collaborators are injected so tests can drive every path:
/// - `T`: the [`TimeSource`] (defaults to the wall clock)
/// - `R`: the [`RandSource`] seeding each millisecond's first sequence
/// - `S`: the [`SleepProvider`] used while a regressed clock catches up
///
/// ## Clock regression
/// - back by at most [`MAX_BACKWARD_DRIFT_MS`]: wait `2 × drift` ms, re-read
///   once, fail with [`Error::ClockRegressionUnrecovered`] if still behind
/// - back by more: fail immediately with [`Error::ClockRegressionSevere`]
///
/// ## Sequence
/// Each new millisecond starts at a random sequence in `0..100`, then counts
/// up. When the 12-bit sequence wraps, the call busy-waits for the next
/// millisecond and re-seeds.
///
/// [`next_id`]: IdGenerator::next_id
#[derive(Debug)]
pub struct IdGenerator<T = SystemClock, R = ThreadRandom, S = ThreadSleep>
where
    T: TimeSource,
    R: RandSource,
    S: SleepProvider,
{
    state: Mutex<GeneratorState<R>>,
    worker_id: u64,
    epoch: u64,
    time: T,
    sleeper: S,
}

impl IdGenerator {
    /// Creates a generator on the wall clock, the thread-local RNG and a plain
    /// thread sleep.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if `worker_id > 1023`.
    ///
    /// # Example
    /// ```
    /// use snowleaf::{Error, IdGenerator, TWITTER_EPOCH};
    ///
    /// assert!(IdGenerator::new(1023, TWITTER_EPOCH).is_ok());
    /// assert_eq!(
    ///     IdGenerator::new(1024, TWITTER_EPOCH).unwrap_err(),
    ///     Error::InvalidWorkerId { worker_id: 1024 },
    /// );
    /// ```
    pub fn new(worker_id: u64, epoch: Duration) -> Result<Self> {
        Self::with_parts(worker_id, epoch, SystemClock, ThreadRandom, ThreadSleep)
    }

    /// Acquires a worker ID from `provider` and creates a default generator
    /// bound to it. This is the only call the generator ever makes to the
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdentityAcquisitionFailed`] if the provider
    /// fails, or [`Error::InvalidWorkerId`] if it hands back an out-of-range
    /// identity.
    pub fn from_provider<P>(provider: &P, host_identity: &str, epoch: Duration) -> Result<Self>
    where
        P: WorkerIdProvider + ?Sized,
    {
        let worker_id = acquire_worker_id(provider, host_identity)?;
        Self::new(worker_id, epoch)
    }
}

impl<T, R, S> IdGenerator<T, R, S>
where
    T: TimeSource,
    R: RandSource,
    S: SleepProvider,
{
    /// Creates a generator from explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if `worker_id > 1023`.
    pub fn with_parts(
        worker_id: u64,
        epoch: Duration,
        time: T,
        rng: R,
        sleeper: S,
    ) -> Result<Self> {
        Self::build(None, worker_id, 0, epoch, time, rng, sleeper)
    }

    /// Creates a generator preloaded with a state snapshot.
    ///
    /// `last_timestamp` is in Unix milliseconds, like [`TimeSource`]
    /// readings. This is mainly useful for tests and for resuming after a
    /// warm restart where the last issued timestamp is known; prefer
    /// [`Self::with_parts`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if `worker_id > 1023`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        last_timestamp: u64,
        worker_id: u64,
        sequence: u64,
        epoch: Duration,
        time: T,
        rng: R,
        sleeper: S,
    ) -> Result<Self> {
        Self::build(
            Some(last_timestamp),
            worker_id,
            sequence & SnowflakeId::SEQUENCE_MASK,
            epoch,
            time,
            rng,
            sleeper,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        last_timestamp: Option<u64>,
        worker_id: u64,
        sequence: u64,
        epoch: Duration,
        time: T,
        rng: R,
        sleeper: S,
    ) -> Result<Self> {
        if worker_id > SnowflakeId::MAX_WORKER_ID {
            return Err(Error::InvalidWorkerId { worker_id });
        }
        Ok(Self {
            state: Mutex::new(GeneratorState {
                last_timestamp,
                sequence,
                rng,
            }),
            worker_id,
            epoch: epoch.as_millis() as u64,
            time,
            sleeper,
        })
    }

    /// The worker ID stamped into every ID.
    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// The epoch timestamps are measured from.
    pub fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch)
    }

    /// Generates the next ID.
    ///
    /// Blocks for at most `2 × MAX_BACKWARD_DRIFT_MS` ms when the clock has
    /// slightly regressed, and spins briefly when 4096 IDs were already
    /// issued in the current millisecond. Otherwise it never blocks beyond
    /// acquiring the lock.
    ///
    /// A failed call issues no ID and leaves the generator's state untouched.
    ///
    /// # Errors
    /// - [`Error::ClockRegressionSevere`]: the clock is more than
    ///   [`MAX_BACKWARD_DRIFT_MS`] behind the last issued timestamp
    /// - [`Error::ClockRegressionUnrecovered`]: the clock was still behind
    ///   after the bounded wait
    /// - [`Error::WaitInterrupted`]: the sleeper cancelled the wait
    /// - [`Error::TimestampOutOfRange`]: the clock reads before the epoch or
    ///   past the end of the 41-bit window
    ///
    /// # Example
    /// ```
    /// use snowleaf::{IdGenerator, TWITTER_EPOCH};
    ///
    /// let generator = IdGenerator::new(1, TWITTER_EPOCH).unwrap();
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert_ne!(a, b);
    /// assert!(b.timestamp() >= a.timestamp());
    /// ```
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(worker_id = self.worker_id))
    )]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.state.lock();
        let mut now = self.time.current_millis();
        let last_timestamp = state.last_timestamp;

        if let Some(last) = last_timestamp.filter(|last| now < *last) {
            now = self.cold_clock_behind(now, last)?;
        }

        let sequence = match last_timestamp {
            Some(last) if now == last => {
                let next = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
                if next == 0 {
                    now = self.cold_wait_next_millis(last);
                    Self::seed_sequence(&mut state.rng)
                } else {
                    next
                }
            }
            _ => Self::seed_sequence(&mut state.rng),
        };

        let timestamp = self.timestamp_delta(now)?;

        state.last_timestamp = Some(now);
        state.sequence = sequence;

        Ok(SnowflakeId::from_components(
            timestamp,
            self.worker_id,
            sequence,
        ))
    }

    fn seed_sequence(rng: &mut R) -> u64 {
        rng.rand() % SEQUENCE_SEED_BOUND
    }

    fn timestamp_delta(&self, now: u64) -> Result<u64> {
        now.checked_sub(self.epoch)
            .filter(|delta| *delta <= SnowflakeId::MAX_TIMESTAMP)
            .ok_or(Error::TimestampOutOfRange {
                now,
                epoch: self.epoch,
            })
    }

    /// Applies the regression policy. Returns the recovered reading.
    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now: u64, last: u64) -> Result<u64> {
        let drift = last - now;
        if drift > MAX_BACKWARD_DRIFT_MS {
            #[cfg(feature = "tracing")]
            error!(drift, last, now, "clock moved backwards beyond tolerance");
            return Err(Error::ClockRegressionSevere { drift });
        }

        #[cfg(feature = "tracing")]
        warn!(drift, "clock moved backwards, waiting for it to catch up");

        if self
            .sleeper
            .sleep_for(Duration::from_millis(drift << 1))
            .is_err()
        {
            #[cfg(feature = "tracing")]
            error!("wait for clock recovery interrupted");
            return Err(Error::WaitInterrupted);
        }

        let now = self.time.current_millis();
        if now < last {
            #[cfg(feature = "tracing")]
            error!(last, now, "clock did not recover after waiting");
            return Err(Error::ClockRegressionUnrecovered {
                last_timestamp: last,
                now,
            });
        }
        Ok(now)
    }

    /// Polls the clock until it passes `last`.
    ///
    /// Sequence exhaustion lasts less than a millisecond, so this spins
    /// rather than sleeps, yielding to the scheduler every
    /// `SPINS_PER_YIELD` polls so a stalled clock cannot monopolize a core.
    #[cold]
    #[inline(never)]
    fn cold_wait_next_millis(&self, last: u64) -> u64 {
        let mut spins: u32 = 0;
        loop {
            let now = self.time.current_millis();
            if now > last {
                return now;
            }
            spins = spins.wrapping_add(1);
            if spins % SPINS_PER_YIELD == 0 {
                std::thread::yield_now();
            } else {
                core::hint::spin_loop();
            }
        }
    }
}
