//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use relaybuf::prelude::*;
//! ```

// Core types
pub use relaybuf_core::buffer::{BufferGuard, SharedBuffer, StatsSnapshot};
pub use relaybuf_core::config::{BufferConfig, DrainMode, FaultAccounting};
pub use relaybuf_core::error::{BufferError, BusyCause, Result as BufferResult};
pub use relaybuf_core::interrupt::Interrupt;
pub use relaybuf_core::transfer::{Delivery, Direction, Transfer, TransferStatus};
pub use relaybuf_core::usercopy::{UserSink, UserSource};

// Device types
pub use relaybuf_device::{
    Device, DeviceBuilder, DeviceClass, DeviceError, EndpointStats, FileHandle, FileOperations,
    InboundEndpoint, NodeInfo, NodeRegistry, OutboundEndpoint,
};
