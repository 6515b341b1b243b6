//! Event records and their type identifiers.
//!
//! ## Contents
//! - [`Event`] the recyclable record moved through pool, active queue and callbacks
//! - [`EventType`] the routing key looked up in the registry
//! - [`MAX_ARGS`], [`TERMINATE`] record layout and the reserved shutdown type

mod event;
mod kind;

pub use event::{Event, MAX_ARGS};
pub use kind::{EventType, TERMINATE};
