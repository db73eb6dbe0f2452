use crate::{Interrupted, SleepProvider};
use core::time::Duration;

/// A [`SleepProvider`] backed by [`std::thread::sleep`].
///
/// It can never be interrupted. Use [`InterruptibleSleep`] when shutdown must
/// be able to cut a wait short.
///
/// [`InterruptibleSleep`]: crate::InterruptibleSleep
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadSleep;

impl SleepProvider for ThreadSleep {
    fn sleep_for(&self, dur: Duration) -> Result<(), Interrupted> {
        std::thread::sleep(dur);
        Ok(())
    }
}
