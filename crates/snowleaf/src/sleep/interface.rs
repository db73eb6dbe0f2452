use core::time::Duration;

/// Returned by a [`SleepProvider`] whose wait was cancelled before the full
/// duration elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("sleep interrupted")]
pub struct Interrupted;

/// A trait that abstracts over how the generator blocks while waiting for a
/// regressed clock to catch up.
///
/// The wait is short (at most a few milliseconds) and happens inside the
/// generator's critical section. Implementations may end the wait early by
/// returning [`Interrupted`], which fails that `next_id` call.
pub trait SleepProvider {
    /// Blocks the calling thread for `dur`, unless interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] if the wait was cancelled externally.
    fn sleep_for(&self, dur: Duration) -> Result<(), Interrupted>;
}
