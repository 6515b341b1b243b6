//! # Callback abstractions.
//!
//! - [`Callback`] - trait for async handlers invoked by the dispatch worker
//! - [`CallbackFn`] - closure-backed implementation
//! - [`CallbackRef`] - shared reference to a callback (`Arc<dyn Callback>`)

mod callback;
mod callback_fn;

pub use callback::{Callback, CallbackRef};
pub use callback_fn::CallbackFn;
