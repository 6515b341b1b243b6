//! # Recyclable event records.
//!
//! An [`Event`] is the unit that moves through the engine:
//!
//! ```text
//!   Pool ──acquire──► caller ──set_type/set_arg──► emit ──► active queue ──► worker
//!    ▲                                                                         │
//!    └──────────────────────── return_event / recycle ◄── callback ◄───────────┘
//! ```
//!
//! ## Rules
//! - `id` is assigned once by the pool and never changes.
//! - `emit` **moves** the record into the active queue: after emission the caller
//!   no longer holds it, so a record is never mutated by two flows at once.
//! - Callbacks see `&Event`; giving a record back to the pool hands over a value
//!   copy (`event.clone()`), the in-flight original is dropped by the worker.
//! - Releasing a record clears its type, arguments and owner; only `id` survives.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::core::Shared;
use crate::error::EngineError;
use crate::events::kind::EventType;

/// Maximum number of argument slots carried by one record.
pub const MAX_ARGS: usize = 8;

/// Event record drawn from an engine's pool.
///
/// # Example
/// ```
/// use eventpool::{EngineError, Event, EventType};
///
/// let mut ev = Event::new(7);
/// ev.set_type("dummy");
/// ev.set_arg(0, b"payload".to_vec()).unwrap();
///
/// assert_eq!(ev.id(), 7);
/// assert_eq!(ev.event_type(), Some(&EventType::from("dummy")));
/// assert_eq!(ev.arg(0), Some(&b"payload"[..]));
/// assert_eq!(ev.arg(1), None);
///
/// // A standalone record has no engine to emit into.
/// assert_eq!(ev.emit(), Err(EngineError::UndefinedEvent));
/// ```
#[derive(Clone)]
pub struct Event {
    id: u64,
    event_type: Option<EventType>,
    args: [Vec<u8>; MAX_ARGS],
    owner: Option<Weak<Shared>>,
}

impl Event {
    /// Creates a detached record with the given id and no type.
    ///
    /// Records used with an engine come from its pool; a detached record
    /// cannot be emitted.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            event_type: None,
            args: Default::default(),
            owner: None,
        }
    }

    /// Slot identifier assigned by the pool.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current type, `None` until [`set_type`](Self::set_type) is called.
    #[inline]
    pub fn event_type(&self) -> Option<&EventType> {
        self.event_type.as_ref()
    }

    /// Sets the type, overwriting any previous value.
    pub fn set_type(&mut self, ty: impl Into<EventType>) {
        self.event_type = Some(ty.into());
    }

    /// Builder form of [`set_type`](Self::set_type).
    #[must_use]
    pub fn with_type(mut self, ty: impl Into<EventType>) -> Self {
        self.set_type(ty);
        self
    }

    /// Stores `data` in argument slot `index` (`0..MAX_ARGS`).
    pub fn set_arg(&mut self, index: usize, data: impl Into<Vec<u8>>) -> Result<(), EngineError> {
        let slot = self.args.get_mut(index).ok_or(EngineError::ArgIndex {
            index,
            max: MAX_ARGS,
        })?;
        *slot = data.into();
        Ok(())
    }

    /// Builder form of [`set_arg`](Self::set_arg).
    pub fn with_arg(mut self, index: usize, data: impl Into<Vec<u8>>) -> Result<Self, EngineError> {
        self.set_arg(index, data)?;
        Ok(self)
    }

    /// Argument in slot `index`; `None` when the slot is empty or out of range.
    pub fn arg(&self, index: usize) -> Option<&[u8]> {
        self.args
            .get(index)
            .filter(|a| !a.is_empty())
            .map(Vec::as_slice)
    }

    /// All argument slots, empty buffers included.
    #[inline]
    pub fn args(&self) -> &[Vec<u8>; MAX_ARGS] {
        &self.args
    }

    /// Empties every argument slot.
    pub fn clear_args(&mut self) {
        self.args.iter_mut().for_each(Vec::clear);
    }

    /// True while the record belongs to an engine (drawn from its pool, not yet released).
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.owner.is_some()
    }

    /// Hands the record to its engine's active queue.
    ///
    /// ### Errors
    /// - [`EngineError::UndefinedEvent`]: the record was not drawn from an engine.
    /// - [`EngineError::Closed`]: the engine or its dispatch worker is gone; if the
    ///   engine still exists the record goes back to its pool.
    pub fn emit(self) -> Result<(), EngineError> {
        let owner = self.owner.clone().ok_or(EngineError::UndefinedEvent)?;
        match owner.upgrade() {
            Some(shared) => shared.enqueue(self),
            None => Err(EngineError::Closed),
        }
    }

    /// Returns the record to the pool of the engine it was drawn from.
    ///
    /// Equivalent to `engine.return_event(event)` when the engine handle is not
    /// at hand.
    ///
    /// ### Errors
    /// - [`EngineError::UndefinedQueue`]: no owning engine, or it has been dropped.
    /// - [`EngineError::PoolOverflow`]: the record is already back in the pool.
    pub fn recycle(self) -> Result<(), EngineError> {
        let shared = self
            .owner
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(EngineError::UndefinedQueue)?;
        shared.pool().release(Some(self))
    }

    /// Stamps the owning engine (set when drawn from the pool).
    pub(crate) fn attach(&mut self, owner: &Arc<Shared>) {
        self.owner = Some(Arc::downgrade(owner));
    }

    /// Resets everything but `id` before the record re-enters the pool.
    pub(crate) fn reset(&mut self) {
        self.owner = None;
        self.event_type = None;
        self.clear_args();
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.event_type == other.event_type && self.args == other.args
    }
}

impl Eq for Event {}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.args.iter().filter(|a| !a.is_empty()).count();
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .field("args", &used)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_type_overwrites() {
        let mut ev = Event::new(0);
        assert_eq!(ev.event_type(), None);

        ev.set_type("first");
        ev.set_type("second");
        assert_eq!(ev.event_type().map(EventType::as_str), Some("second"));
    }

    #[test]
    fn test_arg_slots_bounds() {
        let mut ev = Event::new(1);
        assert!(ev.set_arg(MAX_ARGS - 1, vec![1, 2, 3]).is_ok());
        assert_eq!(
            ev.set_arg(MAX_ARGS, vec![0]),
            Err(EngineError::ArgIndex {
                index: MAX_ARGS,
                max: MAX_ARGS
            })
        );
        assert_eq!(ev.arg(MAX_ARGS - 1), Some(&[1u8, 2, 3][..]));
        assert_eq!(ev.arg(MAX_ARGS + 3), None);
    }

    #[test]
    fn test_clear_and_reset_keep_id() {
        let mut ev = Event::new(42)
            .with_type("dummy")
            .with_arg(2, "x")
            .expect("slot 2 exists");
        ev.reset();

        assert_eq!(ev.id(), 42);
        assert_eq!(ev.event_type(), None);
        assert!(ev.args().iter().all(Vec::is_empty));
        assert!(!ev.is_attached());
    }

    #[test]
    fn test_detached_record_cannot_emit_or_recycle() {
        let ev = Event::new(3).with_type("dummy");
        assert_eq!(ev.clone().emit(), Err(EngineError::UndefinedEvent));
        assert_eq!(ev.recycle(), Err(EngineError::UndefinedQueue));
    }

    #[test]
    fn test_equality_ignores_owner() {
        let a = Event::new(5).with_type("t");
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Event::new(5));
    }
}
