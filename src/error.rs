//! Error types used by the engine and by callbacks.
//!
//! This module defines two main error enums:
//!
//! - [`EngineError`] - errors raised by the engine itself (pool, registry, emission).
//! - [`CallbackError`] - errors raised by user callbacks during dispatch.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Engine errors are returned synchronously to the caller that triggered them;
//! callback errors never reach the emitter and are only logged and reported.

use thiserror::Error;

/// # Errors produced by the engine.
///
/// Registry errors (`TypeExists`, `UnknownType`, `ReservedType`) are programmer
/// errors surfaced at setup time; they are never transient and never retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The record is not attached to an engine (built standalone or already released).
    #[error("undefined event")]
    UndefinedEvent,

    /// The pool the record should go back to no longer exists.
    #[error("undefined queue")]
    UndefinedQueue,

    /// A type with this identifier is already registered.
    #[error("type {id} already exists")]
    TypeExists {
        /// The conflicting identifier.
        id: String,
    },

    /// A callback was registered against a type never created with `new_type`.
    #[error("unknown event type {id}")]
    UnknownType {
        /// The unknown identifier.
        id: String,
    },

    /// User callbacks cannot be attached to the internal termination type.
    #[error("type {id} is reserved")]
    ReservedType {
        /// The reserved identifier.
        id: String,
    },

    /// Argument slot outside `0..MAX_ARGS`.
    #[error("argument index {index} out of range (max {max})")]
    ArgIndex {
        /// The requested slot.
        index: usize,
        /// Number of available slots.
        max: usize,
    },

    /// The record is already in the pool, or its id does not belong to it.
    #[error("record {id} rejected by pool of {capacity}: already pooled or foreign")]
    PoolOverflow {
        /// Id of the rejected record.
        id: u64,
        /// The configured capacity.
        capacity: usize,
    },

    /// Requested pool capacity cannot be represented by the pool.
    #[error("pool capacity {capacity} exceeds the supported maximum {max}")]
    PoolTooLarge {
        /// The requested capacity.
        capacity: usize,
        /// The largest supported capacity.
        max: usize,
    },

    /// The dispatch worker has stopped; the active queue no longer accepts events.
    #[error("engine closed")]
    Closed,

    /// Engine initialization was attempted outside a tokio runtime.
    #[error("no tokio runtime available to spawn the dispatch worker")]
    NoRuntime,
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventpool::EngineError;
    ///
    /// let err = EngineError::UnknownType { id: "dummy".into() };
    /// assert_eq!(err.as_label(), "engine_unknown_type");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::UndefinedEvent => "engine_undefined_event",
            EngineError::UndefinedQueue => "engine_undefined_queue",
            EngineError::TypeExists { .. } => "engine_type_exists",
            EngineError::UnknownType { .. } => "engine_unknown_type",
            EngineError::ReservedType { .. } => "engine_reserved_type",
            EngineError::ArgIndex { .. } => "engine_arg_index",
            EngineError::PoolOverflow { .. } => "engine_pool_overflow",
            EngineError::PoolTooLarge { .. } => "engine_pool_too_large",
            EngineError::Closed => "engine_closed",
            EngineError::NoRuntime => "engine_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EngineError::UndefinedEvent => "event has no owning engine".to_string(),
            EngineError::UndefinedQueue => "owning pool is gone".to_string(),
            EngineError::TypeExists { id } => format!("type exists: {id}"),
            EngineError::UnknownType { id } => format!("unknown type: {id}"),
            EngineError::ReservedType { id } => format!("reserved type: {id}"),
            EngineError::ArgIndex { index, max } => format!("arg index {index} >= {max}"),
            EngineError::PoolOverflow { id, capacity } => {
                format!("record {id} rejected: capacity={capacity}")
            }
            EngineError::PoolTooLarge { capacity, max } => {
                format!("pool too large: capacity={capacity} max={max}")
            }
            EngineError::Closed => "dispatch worker stopped".to_string(),
            EngineError::NoRuntime => "no tokio runtime".to_string(),
        }
    }
}

/// # Errors produced by callbacks.
///
/// Returned from [`Callback::call`](crate::Callback::call). The dispatch worker
/// logs them, publishes a [`ReportKind::CallbackFailed`](crate::ReportKind::CallbackFailed)
/// report and moves on to the next callback.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// Callback could not handle the event.
    #[error("callback failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Callback observed the engine context being cancelled.
    #[error("context cancelled")]
    Canceled,
}

impl CallbackError {
    /// Shorthand for [`CallbackError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        CallbackError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventpool::CallbackError;
    ///
    /// assert_eq!(CallbackError::fail("boom").as_label(), "callback_failed");
    /// assert_eq!(CallbackError::Canceled.as_label(), "callback_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallbackError::Fail { .. } => "callback_failed",
            CallbackError::Canceled => "callback_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallbackError::Fail { error } => format!("error: {error}"),
            CallbackError::Canceled => "context cancelled".to_string(),
        }
    }
}

impl From<EngineError> for CallbackError {
    fn from(err: EngineError) -> Self {
        CallbackError::Fail {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(EngineError::UndefinedEvent.to_string(), "undefined event");
        assert_eq!(EngineError::UndefinedQueue.to_string(), "undefined queue");
        assert_eq!(
            EngineError::TypeExists { id: "dummy".into() }.to_string(),
            "type dummy already exists"
        );
        assert_eq!(
            EngineError::UnknownType { id: "ghost".into() }.to_string(),
            "unknown event type ghost"
        );
    }

    #[test]
    fn test_engine_error_converts_into_callback_failure() {
        let err: CallbackError = EngineError::PoolOverflow { id: 3, capacity: 4 }.into();
        assert_eq!(
            err,
            CallbackError::Fail {
                error: "record 3 rejected by pool of 4: already pooled or foreign".into()
            }
        );
    }
}
