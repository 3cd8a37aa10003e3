//! # relaybuf
//!
//! Two cooperating byte endpoints sharing one fixed-capacity buffer: an
//! inbound endpoint that accepts writes and an outbound endpoint that serves
//! reads.
//!
//! ## Features
//!
//! - **Bounded** - oversized writes and reads are truncated, never blocked on
//! - **One lock** - accept and deliver are mutually exclusive across all callers
//! - **Interruptible waits** - a raised [`Interrupt`] aborts a lock wait as busy
//! - **Asymmetric endpoints** - inbound only writes, outbound only reads
//!
//! ## Quick Start
//!
//! ```ignore
//! use relaybuf::prelude::*;
//!
//! let device = DeviceBuilder::new().capacity(1024).build()?;
//!
//! let mut writer = device.open("pa2_in")?;
//! writer.write(b"hello")?;
//!
//! let mut reader = device.open("pa2_out")?;
//! let mut buf = [0u8; 16];
//! let read = reader.read(&mut buf)?;
//! assert_eq!(&buf[..read.len], b"hello");
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Shared buffer, guard, transfer records, configuration
//! - [`device`] - Endpoints, file operations, node registry, lifecycle

pub mod prelude;

/// Shared buffer and its supporting types.
pub mod core {
    pub use relaybuf_core::*;
}

/// Endpoints and device lifecycle.
pub mod device {
    pub use relaybuf_device::*;
}

// Re-export commonly used items at the crate root
pub use relaybuf_core::{
    BufferConfig, BufferError, Delivery, DrainMode, FaultAccounting, Interrupt, SharedBuffer,
    Transfer, TransferStatus,
};

pub use relaybuf_device::{Device, DeviceBuilder, DeviceError};
