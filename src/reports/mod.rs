//! Engine reports: types and broadcast bus.
//!
//! ## Contents
//! - [`ReportKind`], [`Report`] classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Engine::initialize`, `Engine::shutdown`, the dispatch worker.
//! - **Consumers**: whoever called `Engine::subscribe()`.

mod bus;
mod report;

pub use bus::Bus;
pub use report::{Report, ReportKind};
