use crate::TimeSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// The operating system's wall clock.
///
/// Unlike [`MonotonicClock`], this clock follows NTP corrections and manual
/// adjustments, so it can move backwards. The generator detects that and
/// applies its clock-regression policy.
///
/// A system time before 1970 reads as `0`, which the generator rejects as
/// being before its epoch.
///
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TWITTER_EPOCH;

    #[test]
    fn reads_after_the_default_epoch() {
        assert!(SystemClock.current_millis() > TWITTER_EPOCH.as_millis() as u64);
    }
}
