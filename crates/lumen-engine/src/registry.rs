//! Concurrent session registry.
//!
//! Each slot pairs a [`SessionRecord`] with the cancellation token of its
//! worker. Status transitions happen under the slot's shard lock, so a stop
//! request and a worker completing can never both win.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lumen_core::SessionId;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use crate::session::{Schedule, SessionRecord, SessionRequest, SessionStatus};

struct Slot {
    record: SessionRecord,
    cancel: CancellationToken,
}

#[derive(Default)]
pub struct SessionRegistry {
    slots: DashMap<SessionId, Slot>,
    reapers: DashMap<SessionId, AbortHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `Running` record for `request`, already carrying its resolved
    /// `schedule`, and return its id with the token its worker should watch.
    /// A colliding id is regenerated.
    pub fn create(
        &self,
        request: &SessionRequest,
        schedule: Schedule,
    ) -> (SessionId, CancellationToken) {
        let created_at = Utc::now();
        loop {
            let id = SessionId::derive(&request.seed, created_at);
            match self.slots.entry(id.clone()) {
                Entry::Occupied(_) => {
                    tracing::warn!(session_id = %id, "session id collision, regenerating");
                }
                Entry::Vacant(slot) => {
                    let cancel = CancellationToken::new();
                    let _ = slot.insert(Slot {
                        record: SessionRecord::new(id.clone(), request, schedule, created_at),
                        cancel: cancel.clone(),
                    });
                    return (id, cancel);
                }
            }
        }
    }

    /// Consistent snapshot of one record.
    pub fn get(&self, id: &SessionId) -> Option<SessionRecord> {
        self.slots.get(id).map(|slot| slot.record.clone())
    }

    pub fn status(&self, id: &SessionId) -> Option<SessionStatus> {
        self.slots.get(id).map(|slot| slot.record.status)
    }

    /// Apply `mutate` to a running record. Absent or terminal records are
    /// left untouched and `false` is returned.
    pub fn update(&self, id: &SessionId, mutate: impl FnOnce(&mut SessionRecord)) -> bool {
        let Some(mut slot) = self.slots.get_mut(id) else {
            return false;
        };
        if slot.record.status.is_terminal() {
            return false;
        }
        let before = slot.record.status;
        mutate(&mut slot.record);
        slot.record.status = before;
        true
    }

    /// `Running -> Stopped`, waking the worker. Returns `true` only for the
    /// caller that performed the transition.
    pub fn request_stop(&self, id: &SessionId) -> bool {
        let Some(mut slot) = self.slots.get_mut(id) else {
            return false;
        };
        if slot.record.status != SessionStatus::Running {
            return false;
        }
        slot.record.status = SessionStatus::Stopped;
        slot.cancel.cancel();
        true
    }

    /// `Running -> Completed`. Remaining time is pinned to zero.
    pub fn complete(&self, id: &SessionId) -> bool {
        let Some(mut slot) = self.slots.get_mut(id) else {
            return false;
        };
        if slot.record.status != SessionStatus::Running {
            return false;
        }
        slot.record.status = SessionStatus::Completed;
        slot.record.remaining_seconds = 0;
        true
    }

    /// Drop a record immediately, cancelling any pending reaper for it.
    pub fn remove(&self, id: &SessionId) -> Option<SessionRecord> {
        if let Some((_, reaper)) = self.reapers.remove(id) {
            reaper.abort();
        }
        self.slots.remove(id).map(|(_, slot)| {
            slot.cancel.cancel();
            slot.record
        })
    }

    /// Remove `id` once `delay` has passed, provided it is terminal by then.
    /// At most one reaper is scheduled per id; later calls return `false`.
    pub fn schedule_removal(self: &Arc<Self>, id: SessionId, delay: Duration) -> bool {
        match self.reapers.entry(id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                let registry = Arc::clone(self);
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    registry.reap(&id);
                });
                let _ = entry.insert(handle.abort_handle());
                true
            }
        }
    }

    fn reap(&self, id: &SessionId) {
        let _ = self.reapers.remove(id);
        let removed = self
            .slots
            .remove_if(id, |_, slot| slot.record.status.is_terminal())
            .is_some();
        if removed {
            tracing::debug!(session_id = %id, "session removed after grace period");
        }
    }

    /// Stop every running session, returning how many were stopped.
    pub fn stop_all(&self) -> usize {
        let mut stopped = 0;
        for mut slot in self.slots.iter_mut() {
            if slot.record.status == SessionStatus::Running {
                slot.record.status = SessionStatus::Stopped;
                slot.cancel.cancel();
                stopped += 1;
            }
        }
        stopped
    }

    pub fn active_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.record.status == SessionStatus::Running)
            .count()
    }

    /// Records currently held, terminal ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
