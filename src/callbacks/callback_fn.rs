//! # Function-backed callback (`CallbackFn`)
//!
//! [`CallbackFn`] wraps a closure `F: Fn(CancellationToken, Engine, Event) -> Fut`,
//! producing a fresh future per dispatch. The closure receives owned copies of
//! the engine handle and of the record, so it can move the record straight back
//! into the pool.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use eventpool::{CallbackError, CallbackFn, CallbackRef, Engine, Event};
//!
//! let cb: CallbackRef = CallbackFn::arc("recycle", |_ctx: CancellationToken, engine: Engine, ev: Event| async move {
//!     engine.return_event(ev)?;
//!     Ok::<_, CallbackError>(())
//! });
//!
//! assert_eq!(cb.name(), "recycle");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::callbacks::callback::Callback;
use crate::core::Engine;
use crate::error::CallbackError;
use crate::events::Event;

/// Function-backed callback implementation.
#[derive(Debug)]
pub struct CallbackFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> CallbackFn<F> {
    /// Creates a new function-backed callback.
    ///
    /// Prefer [`CallbackFn::arc`] when you immediately need a [`CallbackRef`](crate::CallbackRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the callback and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Callback for CallbackFn<F>
where
    F: Fn(CancellationToken, Engine, Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(
        &self,
        ctx: CancellationToken,
        engine: &Engine,
        event: &Event,
    ) -> Result<(), CallbackError> {
        (self.f)(ctx, engine.clone(), event.clone()).await
    }
}
