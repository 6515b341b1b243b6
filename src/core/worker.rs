//! # Dispatch worker: the single consumer of the active queue.
//!
//! ## State machine
//! ```text
//! Running:
//! loop {
//!   ├─► rx.recv()                    (None → engine dropped → Terminated)
//!   ├─► type == TERMINATE            → recycle record → Terminated
//!   ├─► type unset / not registered  → warn, UnknownType report, recycle, continue
//!   └─► for cb in registry.callbacks(type):     (registration order)
//!         ├─ Ok        → next
//!         ├─ Err(e)    → warn, CallbackFailed report, next
//!         └─ panic     → error, CallbackPanicked report, next
//! }
//!
//! Terminated:
//!   close rx ──► recycle records still queued ──► WorkerStopped report ──► cancel token
//! ```
//!
//! ## Rules
//! - Records are processed **one at a time**, in emission order.
//! - A failing or panicking callback never stops the loop, never affects other
//!   callbacks or later records, and is never retried.
//! - Only the termination record (or the engine being dropped) ends the loop.
//! - No registry lock is held while callbacks run.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Weak;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::callbacks::CallbackRef;
use crate::core::engine::{Engine, Shared};
use crate::events::Event;
use crate::reports::{Bus, Report, ReportKind};

/// What the loop does after one record.
enum Flow {
    Continue,
    Terminate,
}

/// Consumer side of the active queue.
pub(crate) struct Worker {
    engine: Weak<Shared>,
    bus: Bus,
    /// Handed to callbacks; cancelled when the worker exits.
    token: CancellationToken,
}

impl Worker {
    pub(crate) fn new(engine: Weak<Shared>, bus: Bus, token: CancellationToken) -> Self {
        Self { engine, bus, token }
    }

    /// Drains `rx` until the termination record arrives or the engine is dropped.
    pub(crate) async fn run(self, mut rx: mpsc::UnboundedReceiver<Event>) {
        // Cancelled on every exit path, panics included.
        let _stopped = self.token.clone().drop_guard();
        debug!("dispatch worker started");

        let reason = loop {
            let Some(event) = rx.recv().await else {
                break "engine dropped";
            };
            let Some(shared) = self.engine.upgrade() else {
                break "engine dropped";
            };
            let engine = Engine::from_shared(shared);

            match self.dispatch(&engine, event).await {
                Flow::Continue => {}
                Flow::Terminate => break "terminated",
            }
        };

        rx.close();
        self.recycle_pending(&mut rx);

        self.bus
            .publish(Report::new(ReportKind::WorkerStopped).with_reason(reason));
        info!(reason, "dispatch worker stopped");
    }

    /// Routes one record to the callbacks of its type.
    async fn dispatch(&self, engine: &Engine, event: Event) -> Flow {
        let Some(ty) = event.event_type().cloned() else {
            self.drop_unroutable(engine, event);
            return Flow::Continue;
        };

        if ty.is_terminate() {
            info!(event_id = event.id(), "termination event received");
            if let Err(e) = engine.return_event(event) {
                warn!(error = %e, "failed to recycle termination record");
            }
            return Flow::Terminate;
        }

        let Some(callbacks) = engine.registry().callbacks(&ty) else {
            self.drop_unroutable(engine, event);
            return Flow::Continue;
        };

        debug!(
            event_id = event.id(),
            event_type = %ty,
            callbacks = callbacks.len(),
            "dispatching event"
        );
        for cb in &callbacks {
            self.invoke(engine, cb, &event).await;
        }
        Flow::Continue
    }

    /// Invokes one callback, isolating its errors and panics.
    async fn invoke(&self, engine: &Engine, cb: &CallbackRef, event: &Event) {
        let fut = cb.call(self.token.clone(), engine, event);

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(
                    callback = cb.name(),
                    event_id = event.id(),
                    error = %err,
                    label = err.as_label(),
                    "callback failed"
                );
                self.bus.publish(
                    Report::new(ReportKind::CallbackFailed)
                        .with_event(event)
                        .with_callback(cb.name())
                        .with_reason(err.to_string()),
                );
            }
            Err(panic) => {
                let info = panic_message(&*panic);
                error!(
                    callback = cb.name(),
                    event_id = event.id(),
                    panic = %info,
                    "callback panicked"
                );
                self.bus.publish(
                    Report::new(ReportKind::CallbackPanicked)
                        .with_event(event)
                        .with_callback(cb.name())
                        .with_reason(info),
                );
            }
        }
    }

    /// Drops a record with an unset or unregistered type back into the pool.
    fn drop_unroutable(&self, engine: &Engine, event: Event) {
        warn!(
            event_id = event.id(),
            event_type = ?event.event_type(),
            "dropping event of unknown type"
        );
        self.bus
            .publish(Report::new(ReportKind::UnknownType).with_event(&event));
        if let Err(e) = engine.return_event(event) {
            warn!(error = %e, "failed to recycle dropped record");
        }
    }

    /// Returns records left in the closed queue to the pool, undispatched.
    fn recycle_pending(&self, rx: &mut mpsc::UnboundedReceiver<Event>) {
        let Some(shared) = self.engine.upgrade() else {
            return;
        };
        let mut recycled = 0usize;
        while let Ok(event) = rx.try_recv() {
            let event_id = event.id();
            match shared.pool().release(Some(event)) {
                Ok(()) => recycled += 1,
                Err(e) => warn!(event_id, error = %e, "failed to recycle queued record"),
            }
        }
        if recycled > 0 {
            debug!(recycled, "returned undispatched records to the pool");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
