//! Report fan-out.
//!
//! The engine publishes a [`Report`] whenever the dispatch path swallows
//! something the producer never sees: a callback error or panic, a record of
//! unregistered type, and the start and stop of the worker.
//!
//! ```text
//! Engine::initialize ── EngineStarted ───────┐
//! Engine::shutdown ──── ShutdownRequested ───┤
//! Worker ────────────── CallbackFailed ──────┼──► Bus ──► Engine::subscribe() (0..n receivers)
//!                       CallbackPanicked ────┤
//!                       UnknownType ─────────┤
//!                       WorkerStopped ───────┘
//! ```
//!
//! A receiver only sees reports sent after it subscribed, so `EngineStarted`
//! is gone by the time `initialize` hands back an engine. Each receiver buffers
//! at most `EngineConfig::report_capacity` reports. Past that it gets
//! `RecvError::Lagged` and loses the oldest ones, and the worker keeps going.
//! The worker holds its own handle, so a receiver still gets `WorkerStopped`
//! after every `Engine` is dropped.

use tokio::sync::broadcast;

use super::report::Report;

/// Sending half shared by the engine and its worker.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Report>,
}

impl Bus {
    /// `capacity` is the per-receiver backlog; 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Report>(capacity.max(1));
        Self { tx }
    }

    /// Sends `report` to current receivers. Without receivers it is discarded.
    pub fn publish(&self, report: Report) {
        let _ = self.tx.send(report);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
