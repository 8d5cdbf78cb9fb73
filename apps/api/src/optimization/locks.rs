use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;

type Slot = Arc<AsyncMutex<()>>;

/// Per-record async mutexes.
///
/// Holding the guard for a job card serializes optimizations of that card.
/// Different cards never contend. A slot lives only while someone holds or
/// waits on it, so ids that never name a record leave nothing behind.
#[derive(Default)]
pub struct RecordLocks {
    slots: Mutex<HashMap<Uuid, Slot>>,
}

/// Exclusive hold on one record. Dropping it frees the record's slot when no
/// other caller is waiting for it.
pub struct RecordGuard<'a> {
    locks: &'a RecordLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: Uuid) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(id).or_default().clone()
    }

    /// Waits until no other caller holds the lock for `id`.
    pub async fn acquire(&self, id: Uuid) -> RecordGuard<'_> {
        let slot = self.slot(id);
        let guard = match slot.clone().try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                info!("Job {id} is already being optimized; waiting for it to finish");
                slot.lock_owned().await
            }
        };
        RecordGuard {
            locks: self,
            id,
            guard: Some(guard),
        }
    }

    /// Drops the slot for a deleted record. A caller still holding the old
    /// guard keeps it until it finishes.
    pub fn release(&self, id: Uuid) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    /// Removes the slot for `id` if the map holds the only reference to it.
    fn prune(&self, id: Uuid) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.get(&id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&id);
        }
    }

    #[cfg(test)]
    pub fn slot_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_locked(&self, id: Uuid) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .is_some_and(|slot| slot.try_lock().is_err())
    }
}

impl Drop for RecordGuard<'_> {
    fn drop(&mut self) {
        // The owned guard carries a reference to the slot; let go of it first.
        drop(self.guard.take());
        self.locks.prune(self.id);
    }
}
