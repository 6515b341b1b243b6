//! # Engine: pool, active queue, registry and dispatch worker in one handle.
//!
//! ## High-level architecture
//! ```text
//! initialize(cfg):
//!   Pool::new(cfg.pool_size)            records 0..pool_size
//!   mpsc::unbounded_channel()           active queue
//!   Registry::new() + TERMINATE type
//!   Bus::new(cfg.report_capacity)
//!   spawn Worker::run()                 single dispatch task
//!
//! Producer side:                              Worker side:
//!   get_event / acquire ──► Event               rx.recv() ──► registry.callbacks(type)
//!   set_type / set_arg                                         └─► cb1, cb2, ... (in order)
//!   event.emit() ──────────► active queue ────►
//!                                                 callbacks: engine.return_event(..) ──► Pool
//!
//! shutdown():
//!   acquire ──► set_type(TERMINATE) ──► emit ──► worker stops after the records
//!                                                 emitted before it
//! ```
//!
//! ## Rules
//! - `Engine` is a cheap handle (`Arc` inside); clones share one engine.
//! - Records keep only a weak reference to the engine; dropping every `Engine`
//!   handle stops the worker even without `shutdown`.
//! - `shutdown` is fire-and-forget; use [`Engine::join`] to wait for the worker.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::callbacks::CallbackRef;
use crate::core::{config::EngineConfig, pool::Pool, registry::Registry, worker::Worker};
use crate::error::EngineError;
use crate::events::{Event, EventType};
use crate::reports::{Bus, Report, ReportKind};

/// State shared by every handle of one engine and referenced (weakly) by its records.
pub(crate) struct Shared {
    cfg: EngineConfig,
    pool: Pool,
    registry: Registry,
    active: mpsc::UnboundedSender<Event>,
    bus: Bus,
    stopped: CancellationToken,
}

impl Shared {
    #[inline]
    pub(crate) fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Pushes a record onto the active queue.
    ///
    /// If the worker is gone the record is returned to the pool and
    /// [`EngineError::Closed`] is reported.
    pub(crate) fn enqueue(&self, event: Event) -> Result<(), EngineError> {
        match self.active.send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::SendError(event)) => {
                debug!(event_id = event.id(), "active queue closed, recycling record");
                self.pool.release(Some(event))?;
                Err(EngineError::Closed)
            }
        }
    }
}

/// Handle to an event engine.
///
/// # Example
/// ```rust
/// use eventpool::{CallbackError, CallbackFn, Engine, EngineConfig, Event};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let engine = Engine::initialize(EngineConfig::with_pool_size(8))?;
///
///     let greeting = engine.new_type("greeting")?;
///     engine.register_callback(
///         &greeting,
///         CallbackFn::arc("print", |_ctx: CancellationToken, engine: Engine, ev: Event| async move {
///             println!("hello from record {}", ev.id());
///             engine.return_event(ev)?;
///             Ok::<_, CallbackError>(())
///         }),
///     )?;
///
///     let mut ev = engine.acquire().await?;
///     ev.set_type(&greeting);
///     ev.emit()?;
///
///     engine.shutdown().await?;
///     engine.join().await;
///     assert_eq!(engine.available(), 8);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Shared>,
}

impl Engine {
    /// Builds the pool, the active queue and the registry (with the termination
    /// type), then spawns the dispatch worker on the current tokio runtime.
    ///
    /// ### Errors
    /// - [`EngineError::NoRuntime`]: called outside a tokio runtime.
    /// - [`EngineError::PoolTooLarge`]: `cfg.pool_size` cannot be represented.
    pub fn initialize(cfg: EngineConfig) -> Result<Self, EngineError> {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        info!(pool_size = cfg.pool_size, "initializing event engine");
        let pool = Pool::new(cfg.pool_size)?;

        let (active, rx) = mpsc::unbounded_channel();

        let registry = Registry::new();
        registry.new_type(EventType::terminate())?;

        let bus = Bus::new(cfg.report_capacity_clamped());
        let stopped = CancellationToken::new();

        let inner = Arc::new(Shared {
            cfg,
            pool,
            registry,
            active,
            bus: bus.clone(),
            stopped: stopped.clone(),
        });

        let worker = Worker::new(Arc::downgrade(&inner), bus.clone(), stopped);
        runtime.spawn(worker.run(rx));

        bus.publish(
            Report::new(ReportKind::EngineStarted)
                .with_reason(format!("pool_size={}", inner.cfg.pool_size)),
        );
        info!("event engine initialized");
        Ok(Self { inner })
    }

    /// Takes a record from the pool.
    ///
    /// - `block = true`: waits until a record is available.
    /// - `block = false`: returns `None` immediately if the pool is exhausted.
    pub async fn get_event(&self, block: bool) -> Option<Event> {
        if block {
            self.acquire().await.ok()
        } else {
            self.try_acquire()
        }
    }

    /// Waits for a record and stamps this engine as its owner.
    pub async fn acquire(&self) -> Result<Event, EngineError> {
        let mut event = self.inner.pool.acquire().await?;
        event.attach(&self.inner);
        Ok(event)
    }

    /// Takes a record if one is available right now.
    pub fn try_acquire(&self) -> Option<Event> {
        let mut event = self.inner.pool.try_acquire()?;
        event.attach(&self.inner);
        Some(event)
    }

    /// Puts a record back into the pool. `None` is a no-op.
    ///
    /// Callbacks call this with a copy of the record they were handed
    /// (`engine.return_event(event.clone())`) once they are done with it.
    pub fn return_event(&self, event: impl Into<Option<Event>>) -> Result<(), EngineError> {
        self.inner.pool.release(event.into())
    }

    /// Registers a new event type.
    pub fn new_type(&self, id: impl Into<EventType>) -> Result<EventType, EngineError> {
        let ty = self.inner.registry.new_type(id)?;
        debug!(event_type = %ty, "event type registered");
        Ok(ty)
    }

    /// Appends a callback to the callbacks of `ty`.
    pub fn register_callback(&self, ty: &EventType, callback: CallbackRef) -> Result<(), EngineError> {
        let name = callback.name().to_string();
        self.inner.registry.register_callback(ty, callback)?;
        debug!(event_type = %ty, callback = %name, "callback registered");
        Ok(())
    }

    /// True if `id` is a registered type (the termination type included).
    pub fn type_exists(&self, id: &str) -> bool {
        self.inner.registry.type_exists(id)
    }

    /// Sorted names of all registered types.
    pub fn types(&self) -> Vec<String> {
        self.inner.registry.list()
    }

    /// Sends the termination record to the dispatch worker.
    ///
    /// Waits for a free record if the pool is exhausted, forces its type to the
    /// termination type and emits it. Records emitted earlier are still
    /// dispatched; the call returns as soon as the record is queued.
    ///
    /// ### Errors
    /// [`EngineError::Closed`] if the worker has already stopped.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        if !self.is_running() {
            return Err(EngineError::Closed);
        }
        info!("shutting down event engine");

        let mut event = self.acquire().await?;
        event.set_type(EventType::terminate());

        // Before emit: the worker may publish WorkerStopped as soon as the record is queued.
        self.inner
            .bus
            .publish(Report::new(ReportKind::ShutdownRequested).with_event(&event));
        event.emit()
    }

    /// Waits until the dispatch worker has stopped.
    pub async fn join(&self) {
        self.inner.stopped.cancelled().await;
    }

    /// True until the dispatch worker has stopped.
    pub fn is_running(&self) -> bool {
        !self.inner.stopped.is_cancelled()
    }

    /// Configured pool size.
    pub fn capacity(&self) -> usize {
        self.inner.pool.capacity()
    }

    /// Records currently in the pool.
    pub fn available(&self) -> usize {
        self.inner.pool.available()
    }

    /// Subscribes to engine reports (callback failures, dropped records, lifecycle).
    pub fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.inner.bus.subscribe()
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.cfg
    }

    #[inline]
    pub(crate) fn from_shared(inner: Arc<Shared>) -> Self {
        Self { inner }
    }

    #[inline]
    pub(crate) fn registry(&self) -> &Registry {
        &self.inner.registry
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("capacity", &self.capacity())
            .field("available", &self.available())
            .field("types", &self.inner.registry.len())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TERMINATE;

    #[test]
    fn test_initialize_requires_runtime() {
        let err = Engine::initialize(EngineConfig::with_pool_size(1)).unwrap_err();
        assert_eq!(err, EngineError::NoRuntime);
    }

    #[tokio::test]
    async fn test_initialize_registers_termination_type() {
        let engine = Engine::initialize(EngineConfig::with_pool_size(2)).expect("engine");
        assert!(engine.type_exists(TERMINATE));
        assert_eq!(engine.types(), vec![TERMINATE.to_string()]);
        assert_eq!(
            engine.new_type(TERMINATE),
            Err(EngineError::TypeExists { id: TERMINATE.into() })
        );
        assert!(engine.is_running());
    }

    #[tokio::test]
    async fn test_acquired_records_are_attached() {
        let engine = Engine::initialize(EngineConfig::with_pool_size(2)).expect("engine");

        let a = engine.get_event(true).await.expect("blocking acquire");
        let b = engine.get_event(false).await.expect("non-blocking acquire");
        assert!(a.is_attached() && b.is_attached());
        assert_ne!(a.id(), b.id());
        assert!(engine.get_event(false).await.is_none());

        engine.return_event(a).expect("return a");
        b.recycle().expect("recycle b");
        assert_eq!(engine.available(), 2);
        assert_eq!(engine.return_event(None), Ok(()));
    }

    #[tokio::test]
    async fn test_shutdown_stops_worker_and_recycles_termination_record() {
        let engine = Engine::initialize(EngineConfig::with_pool_size(1)).expect("engine");
        engine.shutdown().await.expect("shutdown");
        engine.join().await;

        assert!(!engine.is_running());
        assert_eq!(engine.available(), 1);
        assert_eq!(engine.shutdown().await, Err(EngineError::Closed));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_duplicate_left_in_queue_is_rejected_on_exit() {
        let engine = Engine::initialize(EngineConfig::with_pool_size(2)).expect("engine");
        let ty = engine.new_type("dummy").expect("type");
        let ev = engine.acquire().await.expect("record").with_type(&ty);

        // Worker has not run yet: both land behind the termination record.
        engine.shutdown().await.expect("shutdown");
        ev.clone().emit().expect("emit copy");
        ev.recycle().expect("recycle original");
        engine.join().await;

        assert_eq!(engine.available(), 2);
        let a = engine.try_acquire().expect("first");
        let b = engine.try_acquire().expect("second");
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_shutdown_report_precedes_worker_stop() {
        let engine = Engine::initialize(EngineConfig::with_pool_size(1)).expect("engine");
        let mut rx = engine.subscribe();
        engine.shutdown().await.expect("shutdown");
        engine.join().await;

        let requested = rx.recv().await.expect("first report");
        let stopped = rx.recv().await.expect("second report");
        assert_eq!(requested.kind, ReportKind::ShutdownRequested);
        assert_eq!(stopped.kind, ReportKind::WorkerStopped);
        assert!(requested.seq < stopped.seq);
    }

    #[tokio::test]
    async fn test_emit_after_stop_recycles_record() {
        let engine = Engine::initialize(EngineConfig::with_pool_size(2)).expect("engine");
        let ty = engine.new_type("dummy").expect("type");
        engine.shutdown().await.expect("shutdown");
        engine.join().await;

        let mut ev = engine.acquire().await.expect("record");
        ev.set_type(&ty);
        assert_eq!(ev.emit(), Err(EngineError::Closed));
        assert_eq!(engine.available(), 2);
    }

    #[tokio::test]
    async fn test_record_outliving_engine_cannot_emit() {
        let engine = Engine::initialize(EngineConfig::with_pool_size(1)).expect("engine");
        let ev = engine.acquire().await.expect("record");
        drop(engine);

        assert!(ev.is_attached());
        assert_eq!(ev.clone().emit(), Err(EngineError::Closed));
        assert_eq!(ev.recycle(), Err(EngineError::UndefinedQueue));
    }
}
