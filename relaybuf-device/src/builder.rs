//! Device builder and the installed device pair.

use crate::endpoint::{InboundEndpoint, OutboundEndpoint};
use crate::error::DeviceError;
use crate::ops::FileHandle;
use crate::registry::{DeviceClass, NodeRegistry};
use relaybuf_core::{BufferConfig, SharedBuffer};
use std::sync::Arc;

/// Default name of the inbound node.
pub const DEFAULT_INBOUND_NAME: &str = "pa2_in";

/// Default name of the outbound node.
pub const DEFAULT_OUTBOUND_NAME: &str = "pa2_out";

/// Builder for configuring and installing a device pair.
pub struct DeviceBuilder {
    inbound_name: String,
    outbound_name: String,
    config: BufferConfig,
    registry: Option<Arc<NodeRegistry>>,
}

impl DeviceBuilder {
    /// Creates a new device builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inbound_name: DEFAULT_INBOUND_NAME.to_string(),
            outbound_name: DEFAULT_OUTBOUND_NAME.to_string(),
            config: BufferConfig::default(),
            registry: None,
        }
    }

    /// Sets the inbound node name.
    #[must_use]
    pub fn inbound_name(mut self, name: impl Into<String>) -> Self {
        self.inbound_name = name.into();
        self
    }

    /// Sets the outbound node name.
    #[must_use]
    pub fn outbound_name(mut self, name: impl Into<String>) -> Self {
        self.outbound_name = name.into();
        self
    }

    /// Sets the buffer configuration.
    #[must_use]
    pub fn config(mut self, config: BufferConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the buffer capacity.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Registers the nodes in `registry` instead of a private one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<NodeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Installs the device: builds the buffer and registers both nodes.
    ///
    /// Nothing stays registered if any step fails.
    ///
    /// # Errors
    /// Returns a buffer error for an invalid configuration, or
    /// `AlreadyRegistered` if a node name is taken.
    pub fn build(self) -> Result<Device, DeviceError> {
        tracing::info!(
            "Installing device pair {} / {}",
            self.inbound_name,
            self.outbound_name
        );

        let buffer = Arc::new(SharedBuffer::new(self.config)?);
        let registry = self.registry.unwrap_or_default();

        let inbound = Arc::new(InboundEndpoint::new(
            self.inbound_name.clone(),
            Arc::clone(&buffer),
        ));
        let outbound = Arc::new(OutboundEndpoint::new(
            self.outbound_name.clone(),
            Arc::clone(&buffer),
        ));

        registry.register(
            self.inbound_name.clone(),
            DeviceClass::Input,
            Arc::clone(&inbound) as _,
        )?;
        if let Err(e) = registry.register(
            self.outbound_name.clone(),
            DeviceClass::Output,
            Arc::clone(&outbound) as _,
        ) {
            registry.unregister(&self.inbound_name);
            return Err(e);
        }

        tracing::info!("Device pair installed, capacity {}", buffer.capacity());

        Ok(Device {
            buffer,
            inbound,
            outbound,
            registry,
            installed: true,
        })
    }
}

impl Default for DeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An installed pair of endpoints sharing one buffer.
///
/// Dropping the device tears it down.
pub struct Device {
    buffer: Arc<SharedBuffer>,
    inbound: Arc<InboundEndpoint>,
    outbound: Arc<OutboundEndpoint>,
    registry: Arc<NodeRegistry>,
    installed: bool,
}

impl Device {
    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::new()
    }

    /// Returns the inbound endpoint.
    #[must_use]
    pub fn inbound(&self) -> &Arc<InboundEndpoint> {
        &self.inbound
    }

    /// Returns the outbound endpoint.
    #[must_use]
    pub fn outbound(&self) -> &Arc<OutboundEndpoint> {
        &self.outbound
    }

    /// Returns the shared buffer.
    #[must_use]
    pub fn buffer(&self) -> &Arc<SharedBuffer> {
        &self.buffer
    }

    /// Returns the registry the nodes live in.
    #[must_use]
    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// Opens a node by name.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown name, or `Shutdown` after teardown.
    pub fn open(&self, name: &str) -> Result<FileHandle, DeviceError> {
        self.registry.open(name)
    }

    /// Removes both nodes and drops the buffer content.
    pub fn teardown(mut self) {
        self.uninstall();
    }

    fn uninstall(&mut self) {
        if !self.installed {
            return;
        }
        self.installed = false;

        tracing::info!("Removing device pair");
        self.inbound.deactivate();
        self.outbound.deactivate();
        self.registry.unregister(self.inbound.name());
        self.registry.unregister(self.outbound.name());
        self.buffer.reset();
        tracing::info!("Device pair removed");
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.uninstall();
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("inbound", &self.inbound.name())
            .field("outbound", &self.outbound.name())
            .field("buffer", &self.buffer)
            .field("installed", &self.installed)
            .finish()
    }
}
