use crate::{SnowflakeId, WorkerIdProvider};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

/// Errors raised by [`MemoryWorkerIdProvider`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The host identity was empty.
    #[error("host identity must not be empty")]
    EmptyHostIdentity,

    /// Every worker ID in the registry's range is held by some host.
    #[error("all {capacity} worker ids are assigned")]
    Exhausted { capacity: u64 },

    /// A reservation asked for an ID beyond the registry's range.
    #[error("worker id {worker_id} exceeds the registry maximum {max_worker_id}")]
    OutOfRange { worker_id: u64, max_worker_id: u64 },

    /// A reservation asked for an ID that another host already holds.
    #[error("worker id {worker_id} is already held by {holder}")]
    AlreadyAssigned { worker_id: u64, holder: String },
}

#[derive(Debug, Default)]
struct Registry {
    by_host: HashMap<String, u64>,
    by_id: BTreeMap<u64, String>,
}

/// An in-process worker ID registry keyed by host identity.
///
/// A host that acquires twice gets its previous assignment back, the way a
/// restarted process finds its persisted registration in a coordination
/// service. New hosts receive the lowest free ID. This is enough for tests
/// and for several generators living inside one process; it offers no
/// guarantees across processes.
///
/// # Example
///
/// ```
/// use snowleaf::{MemoryWorkerIdProvider, WorkerIdProvider};
///
/// let registry = MemoryWorkerIdProvider::new();
/// assert_eq!(registry.acquire("10.0.0.1:8080"), Ok(0));
/// assert_eq!(registry.acquire("10.0.0.2:8080"), Ok(1));
/// assert_eq!(registry.acquire("10.0.0.1:8080"), Ok(0));
/// ```
#[derive(Debug)]
pub struct MemoryWorkerIdProvider {
    registry: Mutex<Registry>,
    max_worker_id: u64,
}

impl Default for MemoryWorkerIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorkerIdProvider {
    /// Creates a registry covering the full `0..=1023` range.
    pub fn new() -> Self {
        Self::with_max_worker_id(SnowflakeId::MAX_WORKER_ID)
    }

    /// Creates a registry handing out IDs in `0..=max_worker_id`.
    ///
    /// `max_worker_id` is clamped to the layout's maximum.
    pub fn with_max_worker_id(max_worker_id: u64) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            max_worker_id: max_worker_id.min(SnowflakeId::MAX_WORKER_ID),
        }
    }

    /// Pins `worker_id` to `host_identity`, e.g. when restoring assignments
    /// persisted by an earlier run.
    ///
    /// Re-reserving the pair a host already holds is a no-op. A host that
    /// held a different ID is moved to the new one.
    ///
    /// # Errors
    ///
    /// Fails if the ID is out of range or held by another host.
    pub fn reserve(&self, host_identity: &str, worker_id: u64) -> Result<(), RegistryError> {
        if host_identity.is_empty() {
            return Err(RegistryError::EmptyHostIdentity);
        }
        if worker_id > self.max_worker_id {
            return Err(RegistryError::OutOfRange {
                worker_id,
                max_worker_id: self.max_worker_id,
            });
        }

        let mut registry = self.registry.lock();
        if let Some(holder) = registry.by_id.get(&worker_id) {
            if holder == host_identity {
                return Ok(());
            }
            return Err(RegistryError::AlreadyAssigned {
                worker_id,
                holder: holder.clone(),
            });
        }

        if let Some(previous) = registry.by_host.insert(host_identity.to_owned(), worker_id) {
            registry.by_id.remove(&previous);
        }
        registry.by_id.insert(worker_id, host_identity.to_owned());
        Ok(())
    }

    /// Frees the ID held by `host_identity`, returning it.
    pub fn release(&self, host_identity: &str) -> Option<u64> {
        let mut registry = self.registry.lock();
        let worker_id = registry.by_host.remove(host_identity)?;
        registry.by_id.remove(&worker_id);
        Some(worker_id)
    }

    /// Returns the ID currently held by `host_identity`, if any.
    pub fn assigned(&self, host_identity: &str) -> Option<u64> {
        self.registry.lock().by_host.get(host_identity).copied()
    }

    /// Number of hosts currently holding an ID.
    pub fn len(&self) -> usize {
        self.registry.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lowest_free(registry: &Registry, max_worker_id: u64) -> Option<u64> {
        // `by_id` is ordered, so the first gap in the taken IDs is the answer.
        let mut candidate = 0;
        for &taken in registry.by_id.keys() {
            if taken != candidate {
                break;
            }
            candidate += 1;
        }
        (candidate <= max_worker_id).then_some(candidate)
    }
}

impl WorkerIdProvider for MemoryWorkerIdProvider {
    type Err = RegistryError;

    fn acquire(&self, host_identity: &str) -> Result<u64, Self::Err> {
        if host_identity.is_empty() {
            return Err(RegistryError::EmptyHostIdentity);
        }

        let mut registry = self.registry.lock();
        if let Some(&worker_id) = registry.by_host.get(host_identity) {
            return Ok(worker_id);
        }

        let worker_id = Self::lowest_free(&registry, self.max_worker_id).ok_or(
            RegistryError::Exhausted {
                capacity: self.max_worker_id + 1,
            },
        )?;
        registry.by_host.insert(host_identity.to_owned(), worker_id);
        registry.by_id.insert(worker_id, host_identity.to_owned());
        Ok(worker_id)
    }
}
