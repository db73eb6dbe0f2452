use crate::RandSource;
use rand::{Rng, rng};

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and
/// automatically reseeded periodically. This type does **not** store the RNG
/// itself; it accesses the calling thread's generator on each call, so it is
/// zero-sized, `Send` and `Sync`.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&mut self) -> u64 {
        rng().random()
    }
}
