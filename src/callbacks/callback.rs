//! # Callback abstraction.
//!
//! A [`Callback`] is invoked by the dispatch worker for every record of the type
//! it is registered on. The common handle type is [`CallbackRef`], an
//! `Arc<dyn Callback>` that the registry keeps in registration order.
//!
//! ## Contract
//! - Called sequentially from the single dispatch worker: a slow callback delays
//!   every later record.
//! - Receives the engine so it can recycle the record once done with it
//!   (`engine.return_event(event.clone())`); the engine never does this on its own.
//! - Errors and panics are logged and reported, never retried.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::Engine;
use crate::error::CallbackError;
use crate::events::Event;

/// # Handler for one type of event.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use eventpool::{Callback, CallbackError, Engine, Event};
///
/// struct Recycle;
///
/// #[async_trait]
/// impl Callback for Recycle {
///     fn name(&self) -> &str { "recycle" }
///
///     async fn call(
///         &self,
///         _ctx: CancellationToken,
///         engine: &Engine,
///         event: &Event,
///     ) -> Result<(), CallbackError> {
///         engine.return_event(event.clone())?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Callback: Send + Sync + 'static {
    /// Human-readable name (for logs and reports).
    fn name(&self) -> &str;

    /// Handles one dispatched record.
    ///
    /// `ctx` is cancelled once the dispatch worker has terminated.
    async fn call(
        &self,
        ctx: CancellationToken,
        engine: &Engine,
        event: &Event,
    ) -> Result<(), CallbackError>;
}

/// Shared handle to a callback.
pub type CallbackRef = Arc<dyn Callback>;
