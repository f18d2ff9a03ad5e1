//! The "newly added" designation.
//!
//! After a creation the registry designates the first new record so views can
//! emphasise it. The designation expires after a TTL. A newer creation
//! supersedes it and cancels the pending expiry, so an old timer never clears
//! a newer mark.
//!
//! Expiry is enforced twice: a spawned timer clears the mark and publishes
//! `NewlyAddedCleared` when a tokio runtime is available, and every read
//! checks the deadline so the designation also lapses without one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use medride_types::event::ServiceEvent;
use medride_types::service::ServiceId;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::event::EventBus;

/// Shortest lifetime accepted for the designation.
pub const MIN_HIGHLIGHT_TTL: Duration = Duration::from_millis(100);

#[derive(Debug)]
struct Mark {
    id: ServiceId,
    generation: u64,
    deadline: Instant,
    expiry: CancellationToken,
}

/// Tracks which record was most recently inserted.
pub struct NewlyAdded {
    ttl: Duration,
    slot: Arc<Mutex<Option<Mark>>>,
    generation: AtomicU64,
    bus: EventBus,
}

impl NewlyAdded {
    /// Create a tracker whose marks live for `ttl` (floored at [`MIN_HIGHLIGHT_TTL`]).
    pub fn new(ttl: Duration, bus: EventBus) -> Self {
        Self {
            ttl: ttl.max(MIN_HIGHLIGHT_TTL),
            slot: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
            bus,
        }
    }

    /// Designate `id`, replacing (and cancelling) any earlier designation.
    pub fn mark(&self, id: ServiceId) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let deadline = Instant::now() + self.ttl;
        let expiry = CancellationToken::new();

        {
            let mut slot = lock(&self.slot);
            if let Some(previous) = slot.take() {
                previous.expiry.cancel();
            }
            *slot = Some(Mark {
                id,
                generation,
                deadline,
                expiry: expiry.clone(),
            });
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(service_id = %id, "no runtime, newly-added mark expires lazily");
            return;
        };

        let slot = Arc::clone(&self.slot);
        let bus = self.bus.clone();
        handle.spawn(async move {
            tokio::select! {
                _ = expiry.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    if let Some(id) = take_if(&slot, |mark| mark.generation == generation) {
                        tracing::debug!(service_id = %id, "newly-added mark expired");
                        bus.publish(ServiceEvent::NewlyAddedCleared { id });
                    }
                }
            }
        });
    }

    /// The currently designated record, if its mark has not expired.
    pub fn current(&self) -> Option<ServiceId> {
        let now = Instant::now();
        if let Some(id) = take_if(&self.slot, |mark| mark.deadline <= now) {
            self.bus.publish(ServiceEvent::NewlyAddedCleared { id });
            return None;
        }
        lock(&self.slot).as_ref().map(|mark| mark.id)
    }

    /// Clear the designation now. Returns the id that was designated.
    pub fn clear(&self) -> Option<ServiceId> {
        let id = take_if(&self.slot, |_| true)?;
        self.bus.publish(ServiceEvent::NewlyAddedCleared { id });
        Some(id)
    }
}

impl std::fmt::Debug for NewlyAdded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewlyAdded")
            .field("ttl", &self.ttl)
            .field("mark", &*lock(&self.slot))
            .finish()
    }
}

fn lock(slot: &Mutex<Option<Mark>>) -> MutexGuard<'_, Option<Mark>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Remove the mark when `predicate` holds, cancelling its timer.
fn take_if(slot: &Mutex<Option<Mark>>, predicate: impl FnOnce(&Mark) -> bool) -> Option<ServiceId> {
    let mut guard = lock(slot);
    if !guard.as_ref().is_some_and(predicate) {
        return None;
    }
    let mark = guard.take()?;
    mark.expiry.cancel();
    Some(mark.id)
}
