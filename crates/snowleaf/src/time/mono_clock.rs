use crate::TimeSource;
use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A time source that never goes backwards.
///
/// The clock samples the wall clock once at construction, then advances by the
/// monotonic time elapsed since (`Instant`). NTP steps and manual adjustments
/// after startup are invisible to it, so a generator driven by this clock
/// never takes the clock-regression path. The trade-off is drift: over a long
/// process lifetime the reported time can diverge from the wall clock.
///
/// Internally a background thread updates a shared atomic counter once per
/// millisecond, which keeps syscalls off the hot path. The thread exits once
/// every clone of the clock has been dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    start_millis: u64, // wall-clock ms since the Unix epoch at construction
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new monotonic clock to the current wall-clock time and starts
    /// its ticker thread.
    ///
    /// # Example
    ///
    /// ```
    /// use snowleaf::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let first = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    /// assert!(clock.current_millis() >= first);
    /// ```
    pub fn new() -> Self {
        let start = Instant::now();
        let start_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64);

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                // Align to next tick after the current actual time
                tick = now_ms + 1;
            }
        });

        let _ = inner._handle.set(handle);

        Self {
            inner,
            start_millis,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.start_millis + self.inner.current.load(Ordering::Relaxed)
    }
}
