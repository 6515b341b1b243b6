//! # Bounded pool of inactive event records.
//!
//! The pool is a FIFO free list guarded by a counting semaphore: one permit per
//! record currently in the list.
//!
//! ```text
//! acquire():     permit ──► pop_front ──► Event
//! try_acquire(): try_permit ─┬─► pop_front ──► Some(Event)
//!                            └─► None (no permit free)
//! release(ev):   reset ──► push_back ──► add permit
//! ```
//!
//! ## Rules
//! - Records are created once, in [`Pool::new`], with ids `0..capacity`.
//! - Permits never exceed queued records: a permit is added only after the push,
//!   and taken before the pop.
//! - Each id is in the pool at most once. `release` rejects a record whose id is
//!   already pooled or outside `0..capacity` ([`EngineError::PoolOverflow`]), so
//!   a duplicate return can never displace a legitimate one.
//! - `try_acquire` is a true test-and-take: it either takes a permit or reports
//!   exhaustion, it cannot race a blocking acquire into a spurious result.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Semaphore;

use crate::error::EngineError;
use crate::events::Event;

/// Free list plus per-id occupancy, guarded together.
struct Slots {
    free: VecDeque<Event>,
    /// `pooled[id]` is true while record `id` sits in `free`.
    pooled: Vec<bool>,
}

/// Fixed-capacity reservoir of unused records.
pub struct Pool {
    slots: Mutex<Slots>,
    permits: Semaphore,
    capacity: usize,
}

impl Pool {
    /// Creates a pool pre-populated with `capacity` records numbered `0..capacity`.
    ///
    /// ### Errors
    /// [`EngineError::PoolTooLarge`] if `capacity` exceeds [`Semaphore::MAX_PERMITS`].
    pub fn new(capacity: usize) -> Result<Self, EngineError> {
        if capacity > Semaphore::MAX_PERMITS {
            return Err(EngineError::PoolTooLarge {
                capacity,
                max: Semaphore::MAX_PERMITS,
            });
        }
        let slots = Slots {
            free: (0..capacity as u64).map(Event::new).collect(),
            pooled: vec![true; capacity],
        };

        Ok(Self {
            slots: Mutex::new(slots),
            permits: Semaphore::new(capacity),
            capacity,
        })
    }

    /// Configured number of records.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records currently available for acquisition.
    #[inline]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Waits until a record is available, then takes it.
    ///
    /// ### Errors
    /// [`EngineError::Closed`] only if the pool has been closed, which the engine never does.
    pub async fn acquire(&self) -> Result<Event, EngineError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| EngineError::Closed)?;
        permit.forget();
        self.pop().ok_or(EngineError::Closed)
    }

    /// Takes a record if one is available right now.
    pub fn try_acquire(&self) -> Option<Event> {
        let permit = self.permits.try_acquire().ok()?;
        permit.forget();
        self.pop()
    }

    /// Puts a record back. `None` is accepted and ignored.
    ///
    /// The record's type, arguments and owner are cleared; its id is kept.
    ///
    /// ### Errors
    /// [`EngineError::PoolOverflow`] if a record with the same id is already in
    /// the pool (the same delivery returned twice) or the id does not belong to
    /// this pool. The pool is left unchanged.
    pub fn release(&self, event: Option<Event>) -> Result<(), EngineError> {
        let Some(mut event) = event else {
            return Ok(());
        };
        event.reset();

        {
            let mut slots = self.lock();
            let overflow = EngineError::PoolOverflow {
                id: event.id(),
                capacity: self.capacity,
            };
            let Some(idx) = usize::try_from(event.id())
                .ok()
                .filter(|&idx| idx < self.capacity)
            else {
                return Err(overflow);
            };
            if slots.pooled[idx] {
                return Err(overflow);
            }
            slots.pooled[idx] = true;
            slots.free.push_back(event);
        }
        self.permits.add_permits(1);
        Ok(())
    }

    fn pop(&self) -> Option<Event> {
        let mut slots = self.lock();
        let event = slots.free.pop_front()?;
        if let Some(pooled) = slots.pooled.get_mut(event.id() as usize) {
            *pooled = false;
        }
        Some(event)
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        // Both fields are updated without panicking points in between.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
