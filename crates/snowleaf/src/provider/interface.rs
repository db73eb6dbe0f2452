use core::fmt;

#[cfg(feature = "tracing")]
use tracing::{error, info};

use crate::{Error, Result, SnowflakeId};

/// The capability the generator needs from whatever assigns worker IDs.
///
/// An implementation must return an ID that no other live process in the
/// deployment holds, in `0..=1023`. Keeping the assignment stable for a host
/// across restarts, heartbeating, and release are all the provider's concern;
/// the generator calls [`acquire`](Self::acquire) exactly once, at
/// construction, and never again.
///
/// # Example
///
/// ```
/// use snowleaf::WorkerIdProvider;
///
/// struct FromEnv;
/// impl WorkerIdProvider for FromEnv {
///     type Err = std::num::ParseIntError;
///
///     fn acquire(&self, _host_identity: &str) -> Result<u64, Self::Err> {
///         "12".parse()
///     }
/// }
///
/// assert_eq!(FromEnv.acquire("10.0.0.1:8080"), Ok(12));
/// ```
pub trait WorkerIdProvider {
    /// The provider's own failure type.
    type Err: fmt::Display;

    /// Returns the worker ID assigned to `host_identity`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if no identity can be assigned.
    fn acquire(&self, host_identity: &str) -> core::result::Result<u64, Self::Err>;
}

/// Acquires and validates a worker ID.
///
/// Provider failures become [`Error::WorkerIdentityAcquisitionFailed`]; an
/// identity outside `0..=1023` becomes [`Error::InvalidWorkerId`]. Both are
/// fatal at startup.
///
/// # Errors
///
/// See above.
pub fn acquire_worker_id<P>(provider: &P, host_identity: &str) -> Result<u64>
where
    P: WorkerIdProvider + ?Sized,
{
    let worker_id = provider.acquire(host_identity).map_err(|e| {
        #[cfg(feature = "tracing")]
        error!(host_identity, error = %e, "worker id acquisition failed");
        Error::WorkerIdentityAcquisitionFailed {
            host_identity: host_identity.to_owned(),
            reason: e.to_string(),
        }
    })?;

    if worker_id > SnowflakeId::MAX_WORKER_ID {
        return Err(Error::InvalidWorkerId { worker_id });
    }

    #[cfg(feature = "tracing")]
    info!(host_identity, worker_id, "acquired worker id");

    Ok(worker_id)
}
