//! Interrupt tokens for cancellable lock waits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared flag standing in for a pending signal on the calling context.
///
/// Clones observe the same flag, so one thread can interrupt another that is
/// blocked waiting for the buffer lock.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    /// Creates a token that is not raised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token nobody else holds, so it can never be raised.
    #[must_use]
    pub fn never() -> Self {
        Self::default()
    }

    /// Raises the interrupt.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Clears the interrupt.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Returns true if the interrupt is raised.
    #[inline]
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_and_clear() {
        let interrupt = Interrupt::new();
        assert!(!interrupt.is_raised());

        interrupt.raise();
        assert!(interrupt.is_raised());

        interrupt.clear();
        assert!(!interrupt.is_raised());
    }

    #[test]
    fn test_clones_share_flag() {
        let interrupt = Interrupt::new();
        let remote = interrupt.clone();

        remote.raise();
        assert!(interrupt.is_raised());
    }

    #[test]
    fn test_never_is_independent() {
        let a = Interrupt::never();
        let b = Interrupt::never();
        a.raise();
        assert!(!b.is_raised());
    }
}
