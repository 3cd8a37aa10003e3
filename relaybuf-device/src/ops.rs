//! File-operations table exposed to a driver shim.

use crate::error::DeviceError;
use relaybuf_core::{Interrupt, Transfer, UserSink, UserSource};
use std::sync::Arc;

/// Entry points a driver shim binds to an addressable node.
///
/// `read` and `write` default to [`DeviceError::Unsupported`]; an endpoint
/// overrides only the one it exposes. The `offset` cursor is handed through
/// from the caller and is not interpreted.
pub trait FileOperations: Send + Sync {
    /// Returns the node name the operations are bound to.
    fn name(&self) -> &str;

    /// Called when a caller opens the node.
    ///
    /// # Errors
    /// Returns `Shutdown` if the device was torn down.
    fn open(&self) -> Result<(), DeviceError>;

    /// Called when a caller closes the node.
    ///
    /// # Errors
    /// Implementations in this crate never fail on release.
    fn release(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    /// Delivers up to `len` bytes into `sink`.
    ///
    /// # Errors
    /// Returns `Unsupported` unless the node exposes reads.
    fn read(
        &self,
        _sink: &mut dyn UserSink,
        _len: usize,
        _offset: &mut u64,
        _interrupt: &Interrupt,
    ) -> Result<Transfer, DeviceError> {
        Err(DeviceError::unsupported(self.name(), "read"))
    }

    /// Accepts up to `len` bytes from `src`.
    ///
    /// # Errors
    /// Returns `Unsupported` unless the node exposes writes.
    fn write(
        &self,
        _src: &dyn UserSource,
        _len: usize,
        _offset: &mut u64,
        _interrupt: &Interrupt,
    ) -> Result<Transfer, DeviceError> {
        Err(DeviceError::unsupported(self.name(), "write"))
    }
}

/// An open node.
///
/// Carries the caller's cursor and interrupt token; `release` runs on drop.
pub struct FileHandle {
    ops: Arc<dyn FileOperations>,
    offset: u64,
    interrupt: Interrupt,
}

impl FileHandle {
    /// Opens `ops`, running its `open` hook.
    ///
    /// # Errors
    /// Returns the error of the `open` hook.
    pub fn open(ops: Arc<dyn FileOperations>) -> Result<Self, DeviceError> {
        ops.open()?;
        Ok(Self {
            ops,
            offset: 0,
            interrupt: Interrupt::new(),
        })
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.ops.name()
    }

    /// Returns the interrupt token of this handle.
    ///
    /// Raising a clone of it from another thread aborts a pending lock wait.
    #[must_use]
    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    /// Returns the cursor handed to the node on every call.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Writes `data` to the node.
    ///
    /// # Errors
    /// Returns `Unsupported` on a read-only node, or a busy buffer error.
    pub fn write(&mut self, data: &[u8]) -> Result<Transfer, DeviceError> {
        self.ops.write(&data, data.len(), &mut self.offset, &self.interrupt)
    }

    /// Reads into `buf` from the node.
    ///
    /// # Errors
    /// Returns `Unsupported` on a write-only node, or a busy buffer error.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<Transfer, DeviceError> {
        let len = buf.len();
        let mut sink = buf;
        self.ops.read(&mut sink, len, &mut self.offset, &self.interrupt)
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        let _ = self.ops.release();
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.ops.name())
            .field("offset", &self.offset)
            .finish()
    }
}
