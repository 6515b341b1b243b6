//! # Engine configuration.
//!
//! Provides [`EngineConfig`], the settings consumed by `Engine::initialize`.
//!
//! ## Sentinel values
//! - `pool_size = 0` → valid but useless engine: every acquire waits forever,
//!   `try_acquire` always yields `None`, and `shutdown` never completes.
//! - `report_capacity = 0` → clamped to 1 by the report bus.

/// Configuration of one engine instance.
///
/// ## Field semantics
/// - `pool_size`: number of records created up front; fixed for the engine's lifetime
/// - `report_capacity`: ring buffer size of the report bus (min 1; clamped)
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of event records allocated at initialization.
    ///
    /// The pool never grows or shrinks afterwards: records are recycled.
    pub pool_size: usize,

    /// Capacity of the report broadcast channel.
    ///
    /// Receivers lagging behind more than `report_capacity` reports skip the oldest ones.
    pub report_capacity: usize,
}

impl EngineConfig {
    /// Config with the given pool size and default report capacity.
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            pool_size,
            ..Self::default()
        }
    }

    /// Returns the report capacity clamped to a minimum of 1.
    #[inline]
    pub fn report_capacity_clamped(&self) -> usize {
        self.report_capacity.max(1)
    }
}

impl Default for EngineConfig {
    /// Default configuration:
    ///
    /// - `pool_size = 1024`
    /// - `report_capacity = 256`
    fn default() -> Self {
        Self {
            pool_size: 1024,
            report_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.pool_size, 1024);
        assert_eq!(cfg.report_capacity, 256);
    }

    #[test]
    fn test_with_pool_size_keeps_other_defaults() {
        let cfg = EngineConfig::with_pool_size(3);
        assert_eq!(cfg.pool_size, 3);
        assert_eq!(cfg.report_capacity, 256);
    }

    #[test]
    fn test_report_capacity_clamped() {
        let cfg = EngineConfig {
            pool_size: 1,
            report_capacity: 0,
        };
        assert_eq!(cfg.report_capacity_clamped(), 1);
    }
}
