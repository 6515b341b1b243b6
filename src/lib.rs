//! # eventpool
//!
//! **eventpool** is a small in-process event engine for Rust.
//!
//! Producers draw pre-allocated event records from a bounded pool, fill in a
//! type and argument slots, and emit them. A single dispatch worker routes each
//! record to the callbacks registered for its type, in order. Callbacks hand
//! records back to the pool when they are done, so steady-state operation
//! allocates no new records.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  producer #1 │   │  producer #2 │   │  producer #3 │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ get_event / acquire (waits while exhausted)
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Engine (cheap clonable handle)                                   │
//! │  - Pool      (bounded FIFO of inactive records, ids 0..N)         │
//! │  - Registry  (event type -> ordered callbacks)                    │
//! │  - active queue (mpsc, emission order)                            │
//! │  - Bus       (broadcast reports)                                  │
//! └──────┬───────────────────────────────────────────────▲────────────┘
//!        │ event.emit()                                  │ return_event / recycle
//!        ▼                                               │
//!     ┌─────────────────────────────────────┐            │
//!     │  Worker (single task)               │            │
//!     │  recv ─► registry.callbacks(type)   │            │
//!     │        ─► cb1 ─► cb2 ─► ... ─► cbN ─┼────────────┘
//!     └──────┬──────────────────────────────┘
//!            │ CallbackFailed / CallbackPanicked / UnknownType / WorkerStopped
//!            ▼
//!     ┌─────────────────────────────────────┐
//!     │  Bus (broadcast channel)            │
//!     │  (capacity: report_capacity)        │
//!     └─────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Engine::initialize(cfg) ──► spawn Worker::run()
//!
//! loop {
//!   ├─► rx.recv()
//!   ├─► TERMINATE      ─► recycle record, exit
//!   ├─► unknown type   ─► UnknownType report, recycle record, continue
//!   └─► callbacks(type) in registration order
//!           ├─ Ok     ─► next callback
//!           ├─ Err    ─► CallbackFailed report, next callback
//!           └─ panic  ─► CallbackPanicked report, next callback
//! }
//!
//! On exit: records still queued go back to the pool, WorkerStopped is
//! published and `Engine::join` returns.
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types / traits                    |
//! |----------------|----------------------------------------------------------|---------------------------------------|
//! | **Engine**     | Pool, registry, active queue and worker in one handle.   | [`Engine`], [`EngineConfig`]          |
//! | **Records**    | Recyclable records with a type and argument slots.       | [`Event`], [`EventType`]              |
//! | **Callbacks**  | Async handlers registered per event type.                | [`Callback`], [`CallbackFn`]          |
//! | **Reports**    | Lifecycle and failure reports over a broadcast bus.      | [`Report`], [`ReportKind`], [`Bus`]   |
//! | **Errors**     | Typed errors for the engine and for callbacks.           | [`EngineError`], [`CallbackError`]    |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tokio_util::sync::CancellationToken;
//! use eventpool::{CallbackError, CallbackFn, Engine, EngineConfig, Event};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Engine::initialize(EngineConfig::with_pool_size(16))?;
//!     let clicks = engine.new_type("click")?;
//!
//!     let seen = Arc::new(AtomicUsize::new(0));
//!     let counter = seen.clone();
//!     engine.register_callback(
//!         &clicks,
//!         CallbackFn::arc("count", move |_ctx: CancellationToken, engine: Engine, ev: Event| {
//!             let counter = counter.clone();
//!             async move {
//!                 counter.fetch_add(1, Ordering::SeqCst);
//!                 engine.return_event(ev)?;
//!                 Ok::<_, CallbackError>(())
//!             }
//!         }),
//!     )?;
//!
//!     for _ in 0..3 {
//!         let ev = engine.acquire().await?.with_type(&clicks);
//!         ev.emit()?;
//!     }
//!
//!     engine.shutdown().await?;
//!     engine.join().await;
//!
//!     assert_eq!(seen.load(Ordering::SeqCst), 3);
//!     assert_eq!(engine.available(), 16);
//!     Ok(())
//! }
//! ```
mod callbacks;
mod core;
mod error;
mod events;
mod reports;

// ---- Public re-exports ----

pub use callbacks::{Callback, CallbackFn, CallbackRef};
pub use core::{Engine, EngineConfig, Pool, Registry};
pub use error::{CallbackError, EngineError};
pub use events::{Event, EventType, MAX_ARGS, TERMINATE};
pub use reports::{Bus, Report, ReportKind};
