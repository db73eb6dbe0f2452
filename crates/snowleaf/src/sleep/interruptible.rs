use crate::{Interrupted, SleepProvider};
use core::time::Duration;
use parking_lot::{Condvar, Mutex};
use std::{sync::Arc, time::Instant};

#[derive(Debug, Default)]
struct Signal {
    interrupted: Mutex<bool>,
    cvar: Condvar,
}

/// A [`SleepProvider`] whose waits can be cancelled from another thread.
///
/// Clones share the same signal: keep one clone inside the generator and hand
/// another to whatever drives shutdown. After [`interrupt`] every current and
/// future wait fails immediately with [`Interrupted`] until [`reset`] is
/// called.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use snowleaf::{InterruptibleSleep, SleepProvider};
///
/// let sleeper = InterruptibleSleep::new();
/// let handle = sleeper.clone();
///
/// handle.interrupt();
/// assert!(sleeper.sleep_for(Duration::from_secs(60)).is_err());
///
/// handle.reset();
/// assert!(sleeper.sleep_for(Duration::from_millis(1)).is_ok());
/// ```
///
/// [`interrupt`]: InterruptibleSleep::interrupt
/// [`reset`]: InterruptibleSleep::reset
#[derive(Clone, Debug, Default)]
pub struct InterruptibleSleep {
    signal: Arc<Signal>,
}

impl InterruptibleSleep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes every waiter and makes subsequent waits fail.
    pub fn interrupt(&self) {
        let mut interrupted = self.signal.interrupted.lock();
        *interrupted = true;
        self.signal.cvar.notify_all();
    }

    /// Re-arms the sleeper after an [`interrupt`](Self::interrupt).
    pub fn reset(&self) {
        *self.signal.interrupted.lock() = false;
    }

    pub fn is_interrupted(&self) -> bool {
        *self.signal.interrupted.lock()
    }
}

impl SleepProvider for InterruptibleSleep {
    fn sleep_for(&self, dur: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now() + dur;
        let mut interrupted = self.signal.interrupted.lock();

        // Loop to absorb spurious wakeups.
        while !*interrupted {
            if self
                .signal
                .cvar
                .wait_until(&mut interrupted, deadline)
                .timed_out()
            {
                break;
            }
        }

        if *interrupted {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn sleeps_for_the_full_duration() {
        let sleeper = InterruptibleSleep::new();
        let start = Instant::now();
        assert_eq!(sleeper.sleep_for(Duration::from_millis(10)), Ok(()));
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn interrupt_wakes_a_blocked_waiter() {
        let sleeper = InterruptibleSleep::new();
        let handle = sleeper.clone();

        let start = Instant::now();
        let waiter = thread::spawn(move || sleeper.sleep_for(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(20));
        handle.interrupt();

        assert_eq!(waiter.join().unwrap(), Err(Interrupted));
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn reset_rearms() {
        let sleeper = InterruptibleSleep::new();
        sleeper.interrupt();
        assert!(sleeper.is_interrupted());
        assert_eq!(sleeper.sleep_for(Duration::ZERO), Err(Interrupted));

        sleeper.reset();
        assert!(!sleeper.is_interrupted());
        assert_eq!(sleeper.sleep_for(Duration::ZERO), Ok(()));
    }
}
