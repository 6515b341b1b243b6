//! # Reports published by the engine.
//!
//! [`ReportKind`] classifies what happened; [`Report`] carries the metadata
//! (record id and type, callback name, reason). Reports are the explicit hook for
//! conditions the dispatch path itself swallows: a failing callback never reaches
//! the emitter, but it does show up here.
//!
//! ## Ordering guarantees
//! Each report has a globally unique sequence number (`seq`) that increases
//! monotonically across all engines in the process.
//!
//! ## Example
//! ```rust
//! use eventpool::{Report, ReportKind};
//!
//! let r = Report::new(ReportKind::CallbackFailed)
//!     .with_callback("audit")
//!     .with_reason("disk full");
//!
//! assert_eq!(r.kind, ReportKind::CallbackFailed);
//! assert_eq!(r.callback.as_deref(), Some("audit"));
//! assert_eq!(r.reason.as_deref(), Some("disk full"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::events::{Event, EventType};

/// Global sequence counter for report ordering.
static REPORT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Engine initialized and its dispatch worker spawned.
    ///
    /// Sets:
    /// - `reason`: pool capacity summary
    EngineStarted,

    /// A callback returned an error.
    ///
    /// Sets:
    /// - `event_id`, `event_type`: the record being dispatched
    /// - `callback`: callback name
    /// - `reason`: error message
    CallbackFailed,

    /// A callback panicked; the worker caught it and moved on.
    ///
    /// Sets:
    /// - `event_id`, `event_type`: the record being dispatched
    /// - `callback`: callback name
    /// - `reason`: panic message
    CallbackPanicked,

    /// Worker received a record whose type is unset or not registered.
    /// The record was returned to the pool without dispatch.
    ///
    /// Sets:
    /// - `event_id`, `event_type` (if set)
    UnknownType,

    /// `Engine::shutdown` emitted the termination record.
    ///
    /// Sets:
    /// - `event_id`: the termination record
    ShutdownRequested,

    /// Dispatch worker left its loop.
    ///
    /// Sets:
    /// - `reason`: `"terminated"` or `"engine dropped"`
    WorkerStopped,
}

/// Engine report with optional metadata.
#[derive(Clone, Debug)]
pub struct Report {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Report classification.
    pub kind: ReportKind,
    /// Id of the record involved, if any.
    pub event_id: Option<u64>,
    /// Type of the record involved, if set.
    pub event_type: Option<EventType>,
    /// Name of the callback involved, if any.
    pub callback: Option<Arc<str>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Report {
    /// Creates a new report of the given kind with current timestamp and next sequence number.
    pub fn new(kind: ReportKind) -> Self {
        Self {
            seq: REPORT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            event_id: None,
            event_type: None,
            callback: None,
            reason: None,
        }
    }

    /// Attaches id and type of the record involved.
    #[inline]
    pub fn with_event(mut self, event: &Event) -> Self {
        self.event_id = Some(event.id());
        self.event_type = event.event_type().cloned();
        self
    }

    /// Attaches a callback name.
    #[inline]
    pub fn with_callback(mut self, name: impl Into<Arc<str>>) -> Self {
        self.callback = Some(name.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            ReportKind::CallbackFailed | ReportKind::CallbackPanicked | ReportKind::UnknownType
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_event_copies_identity() {
        let ev = Event::new(9).with_type("dummy");
        let r = Report::new(ReportKind::UnknownType).with_event(&ev);
        assert_eq!(r.event_id, Some(9));
        assert_eq!(r.event_type, Some(EventType::from("dummy")));
        assert!(r.is_failure());
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Report::new(ReportKind::EngineStarted);
        let b = Report::new(ReportKind::WorkerStopped);
        assert!(b.seq > a.seq);
        assert!(!b.is_failure());
    }
}
