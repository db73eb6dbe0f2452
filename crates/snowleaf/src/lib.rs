//! Coordination-free, roughly time-ordered 64-bit identifiers.
//!
//! Every process owns a worker id in `0..=1023`, acquired once at startup
//! through a [`WorkerIdProvider`]. From then on a single shared
//! [`IdGenerator`] packs a millisecond timestamp, the worker id and a
//! per-millisecond sequence into a [`SnowflakeId`]:
//!
//! ```text
//!  Bit Index:  63           63 62            22 21            12 11             0
//!              +--------------+----------------+----------------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | worker ID (10) | sequence (12) |
//!              +--------------+----------------+----------------+---------------+
//! ```
//!
//! ```
//! use snowleaf::{IdGenerator, StaticWorkerId, TWITTER_EPOCH};
//!
//! let generator = IdGenerator::from_provider(&StaticWorkerId(7), "10.0.0.1:8080", TWITTER_EPOCH)
//!     .expect("worker id in range");
//!
//! let id = generator.next_id().expect("clock did not regress");
//! assert_eq!(id.worker_id(), 7);
//! assert!(id.sequence() <= snowleaf::SnowflakeId::MAX_SEQUENCE);
//! ```

mod generator;
mod id;
mod provider;
mod random;
#[cfg(feature = "serde")]
mod serde;
mod sleep;
mod time;

pub use crate::generator::*;
pub use crate::id::*;
pub use crate::provider::*;
pub use crate::random::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::sleep::*;
pub use crate::time::*;
