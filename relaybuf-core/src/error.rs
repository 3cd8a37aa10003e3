//! Error types for shared buffer operations.

use thiserror::Error;

/// Reason a lock acquisition gave up without entering the critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyCause {
    /// The caller's interrupt token was raised while waiting.
    Interrupted,
    /// The configured lock timeout expired while waiting.
    TimedOut,
}

impl std::fmt::Display for BusyCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interrupted => write!(f, "interrupted"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Core error type for shared buffer operations.
///
/// Conditions that still move data (truncation, partial copy faults) and
/// conditions that move nothing (full, empty) are reported through
/// [`Transfer`](crate::transfer::Transfer) instead.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The buffer lock could not be acquired. No state was changed.
    #[error("buffer busy: lock acquisition {cause}")]
    Busy {
        /// Why the wait was abandoned.
        cause: BusyCause,
    },

    /// The buffer configuration was rejected at construction time.
    #[error("invalid buffer configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },
}

impl BufferError {
    /// Creates a busy error for an interrupted wait.
    pub fn interrupted() -> Self {
        Self::Busy {
            cause: BusyCause::Interrupted,
        }
    }

    /// Creates a busy error for an expired wait.
    pub fn timed_out() -> Self {
        Self::Busy {
            cause: BusyCause::TimedOut,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true if the caller may simply retry later.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

/// Result type alias for shared buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
