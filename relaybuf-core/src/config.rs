//! Shared buffer configuration.

use crate::error::{BufferError, Result};
use std::time::Duration;

/// Default buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default interval at which a waiting caller re-checks its interrupt token.
pub const DEFAULT_LOCK_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// What happens to the unread remainder after a partial read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainMode {
    /// Shift the unread remainder down to offset 0 and zero the freed tail.
    #[default]
    Compact,
    /// Zero `storage[0 .. new_len)` in place and leave the remainder unshifted.
    ///
    /// This reproduces the legacy driver: after a partial read the bytes still
    /// counted by the fill length are zeroes, and the unread data is lost.
    Legacy,
}

/// How a partially failed copy from or to caller memory moves the fill length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaultAccounting {
    /// Move the fill length by the whole transfer and report the failed count.
    #[default]
    Reserved,
    /// Move the fill length only by the bytes that were actually copied.
    Committed,
}

/// Configuration for a [`SharedBuffer`](crate::buffer::SharedBuffer).
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Fixed capacity of the buffer in bytes.
    pub capacity: usize,
    /// Behaviour of the unread remainder after a partial read.
    pub drain_mode: DrainMode,
    /// Fill-length bookkeeping on partial copy faults.
    pub fault_accounting: FaultAccounting,
    /// Upper bound on waiting for the lock (`None` = wait until interrupted).
    pub lock_timeout: Option<Duration>,
    /// Slice length between interrupt checks while waiting for the lock.
    pub lock_poll_interval: Duration,
}

impl BufferConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            drain_mode: DrainMode::default(),
            fault_accounting: FaultAccounting::default(),
            lock_timeout: None,
            lock_poll_interval: DEFAULT_LOCK_POLL_INTERVAL,
        }
    }

    /// Sets the buffer capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the drain mode.
    #[must_use]
    pub fn with_drain_mode(mut self, mode: DrainMode) -> Self {
        self.drain_mode = mode;
        self
    }

    /// Sets the fault accounting policy.
    #[must_use]
    pub fn with_fault_accounting(mut self, accounting: FaultAccounting) -> Self {
        self.fault_accounting = accounting;
        self
    }

    /// Sets the lock timeout.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// Sets the lock poll interval.
    #[must_use]
    pub fn with_lock_poll_interval(mut self, interval: Duration) -> Self {
        self.lock_poll_interval = interval;
        self
    }

    /// Checks that a buffer can be built from this configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for a zero capacity or a zero poll interval.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(BufferError::invalid_config("capacity must be non-zero"));
        }
        if self.lock_poll_interval.is_zero() {
            return Err(BufferError::invalid_config(
                "lock poll interval must be non-zero",
            ));
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BufferConfig::default();
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.drain_mode, DrainMode::Compact);
        assert_eq!(config.fault_accounting, FaultAccounting::Reserved);
        assert!(config.lock_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = BufferConfig::new()
            .with_capacity(64)
            .with_drain_mode(DrainMode::Legacy)
            .with_fault_accounting(FaultAccounting::Committed)
            .with_lock_timeout(Duration::from_millis(5))
            .with_lock_poll_interval(Duration::from_micros(100));

        assert_eq!(config.capacity, 64);
        assert_eq!(config.drain_mode, DrainMode::Legacy);
        assert_eq!(config.fault_accounting, FaultAccounting::Committed);
        assert_eq!(config.lock_timeout, Some(Duration::from_millis(5)));
        assert_eq!(config.lock_poll_interval, Duration::from_micros(100));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = BufferConfig::new().with_capacity(0).validate().unwrap_err();
        assert!(matches!(err, BufferError::InvalidConfig { .. }));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let result = BufferConfig::new()
            .with_lock_poll_interval(Duration::ZERO)
            .validate();
        assert!(result.is_err());
    }
}
