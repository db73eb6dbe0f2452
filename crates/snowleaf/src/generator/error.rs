/// A result type defaulting to this crate's [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowleaf` can emit.
///
/// Construction-time variants ([`Error::InvalidWorkerId`],
/// [`Error::WorkerIdentityAcquisitionFailed`]) are fatal: the process must not
/// start issuing IDs. Every other variant fails a single `next_id` call and
/// means "no ID was issued"; the caller decides whether to retry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The assigned worker ID does not fit in the 10-bit field.
    #[error("worker id {worker_id} is outside 0..=1023")]
    InvalidWorkerId { worker_id: u64 },

    /// The clock moved back by a few milliseconds and had not caught up
    /// after the bounded wait.
    #[error("clock moved backwards and did not recover (last: {last_timestamp} ms, now: {now} ms)")]
    ClockRegressionUnrecovered { last_timestamp: u64, now: u64 },

    /// The clock moved back further than the generator is willing to wait
    /// out. This needs operator attention.
    #[error("clock moved backwards by {drift} ms, refusing to generate ids")]
    ClockRegressionSevere { drift: u64 },

    /// The bounded wait for a regressed clock was cancelled.
    #[error("wait for clock recovery was interrupted")]
    WaitInterrupted,

    /// The worker identity provider could not supply an identity.
    #[error("failed to acquire worker id for {host_identity}: {reason}")]
    WorkerIdentityAcquisitionFailed {
        host_identity: String,
        reason: String,
    },

    /// The clock reads before the epoch, or so far past it that the delta no
    /// longer fits in the 41-bit timestamp field.
    #[error("timestamp {now} ms cannot be encoded against epoch {epoch} ms")]
    TimestampOutOfRange { now: u64, epoch: u64 },
}
