use core::time::Duration;

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
///
/// This is the default deployment epoch. Changing the epoch of a running
/// deployment breaks comparability with every ID issued before the change.
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock, a monotonic
/// ticker, or a mocked time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**. The generator subtracts
/// its own epoch when packing an ID.
///
/// # Example
///
/// ```
/// use snowleaf::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}
