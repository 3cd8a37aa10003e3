//! # relaybuf Device
//!
//! Two character-device style endpoints over one shared buffer.
//!
//! This crate provides:
//! - [`InboundEndpoint`] (accept only) and [`OutboundEndpoint`] (deliver only)
//! - The [`FileOperations`] table a driver shim binds to each node
//! - [`NodeRegistry`] mapping node names to their operations
//! - [`DeviceBuilder`] / [`Device`] for the startup and teardown lifecycle

pub mod builder;
pub mod endpoint;
pub mod error;
pub mod ops;
pub mod registry;

pub use builder::{DEFAULT_INBOUND_NAME, DEFAULT_OUTBOUND_NAME, Device, DeviceBuilder};
pub use endpoint::{EndpointStats, InboundEndpoint, OutboundEndpoint};
pub use error::DeviceError;
pub use ops::{FileHandle, FileOperations};
pub use registry::{DeviceClass, NodeInfo, NodeRegistry};
