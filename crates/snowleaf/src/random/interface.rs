/// A trait for random sources that return random integers.
///
/// The generator draws from its source only when it starts a new millisecond
/// or recovers from sequence exhaustion, to place the first sequence of that
/// millisecond somewhere in `0..100` instead of always at zero.
///
/// The source lives inside the generator's critical section, so it takes
/// `&mut self` and needs no synchronization of its own.
///
/// # Example
/// ```
/// use snowleaf::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&mut self) -> u64 {
///         1234
///     }
/// }
///
/// let mut rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource {
    /// Returns a random integer.
    fn rand(&mut self) -> u64;
}
