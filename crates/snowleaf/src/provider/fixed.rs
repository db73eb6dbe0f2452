use crate::WorkerIdProvider;
use core::convert::Infallible;

/// A manually assigned worker ID.
///
/// Use this when identities are handed out by deployment tooling (a config
/// file, an environment variable, a StatefulSet ordinal) rather than a
/// coordination service. The host identity is ignored; uniqueness is the
/// operator's responsibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticWorkerId(pub u64);

impl WorkerIdProvider for StaticWorkerId {
    type Err = Infallible;

    fn acquire(&self, _host_identity: &str) -> Result<u64, Self::Err> {
        Ok(self.0)
    }
}
