//! Error types for device operations.

use relaybuf_core::BufferError;
use thiserror::Error;

/// Error type for device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Shared buffer error.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// The endpoint does not expose the requested operation.
    #[error("device {device} does not support {operation}")]
    Unsupported {
        /// Device name.
        device: String,
        /// Operation name.
        operation: &'static str,
    },

    /// A node with this name is already registered.
    #[error("device {name} already registered")]
    AlreadyRegistered {
        /// Device name.
        name: String,
    },

    /// No node with this name is registered.
    #[error("device {name} not found")]
    NotFound {
        /// Device name.
        name: String,
    },

    /// The device has been torn down.
    #[error("device {name} shut down")]
    Shutdown {
        /// Device name.
        name: String,
    },
}

impl DeviceError {
    /// Creates an unsupported operation error.
    pub fn unsupported(device: impl Into<String>, operation: &'static str) -> Self {
        Self::Unsupported {
            device: device.into(),
            operation,
        }
    }

    /// Creates a shutdown error.
    pub fn shutdown(name: impl Into<String>) -> Self {
        Self::Shutdown { name: name.into() }
    }

    /// Returns true if the underlying buffer was busy.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Buffer(err) if err.is_busy())
    }
}
