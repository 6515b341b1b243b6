//! Engine core: pool, registry, dispatch worker and the engine handle.
//!
//! Internal modules:
//! - [`pool`]: bounded FIFO of inactive records with blocking/non-blocking acquire;
//! - [`registry`]: event type to ordered callbacks;
//! - [`worker`]: the single consumer of the active queue;
//! - [`engine`]: composes the above, public entry point;
//! - [`config`]: engine settings.

mod config;
mod engine;
mod pool;
mod registry;
mod worker;

pub use config::EngineConfig;
pub use engine::Engine;
pub use pool::Pool;
pub use registry::Registry;

pub(crate) use engine::Shared;
