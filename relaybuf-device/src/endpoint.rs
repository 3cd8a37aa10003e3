//! Inbound and outbound endpoints.
//!
//! Both endpoints are thin wrappers around one shared buffer. The inbound
//! endpoint only accepts bytes, the outbound endpoint only delivers them.

use crate::error::DeviceError;
use crate::ops::FileOperations;
use relaybuf_core::{Delivery, Interrupt, SharedBuffer, Transfer, UserSink, UserSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Open/close counters of an endpoint. Diagnostic only.
#[derive(Debug, Default)]
pub struct EndpointStats {
    opens: AtomicU64,
    closes: AtomicU64,
}

impl EndpointStats {
    /// Records an open and returns the total number of opens.
    pub fn record_open(&self) -> u64 {
        self.opens.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a close.
    pub fn record_close(&self) {
        self.closes.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of opens.
    #[must_use]
    pub fn open_count(&self) -> u64 {
        self.opens.load(Ordering::Relaxed)
    }

    /// Returns the number of closes.
    #[must_use]
    pub fn close_count(&self) -> u64 {
        self.closes.load(Ordering::Relaxed)
    }
}

/// State common to both endpoints.
#[derive(Debug)]
struct EndpointCore {
    name: String,
    buffer: Arc<SharedBuffer>,
    stats: EndpointStats,
    active: AtomicBool,
}

impl EndpointCore {
    fn new(name: String, buffer: Arc<SharedBuffer>) -> Self {
        Self {
            name,
            buffer,
            stats: EndpointStats::default(),
            active: AtomicBool::new(true),
        }
    }

    fn ensure_active(&self) -> Result<(), DeviceError> {
        if self.active.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(DeviceError::shutdown(&self.name))
        }
    }

    fn open(&self) -> Result<(), DeviceError> {
        self.ensure_active()?;
        let count = self.stats.record_open();
        tracing::info!("{}: device opened {} times", self.name, count);
        Ok(())
    }

    fn release(&self) {
        self.stats.record_close();
        tracing::info!("{}: device closed", self.name);
    }
}

/// Write-only endpoint that appends caller bytes to the shared buffer.
#[derive(Debug)]
pub struct InboundEndpoint {
    core: EndpointCore,
}

impl InboundEndpoint {
    /// Creates an inbound endpoint over `buffer`.
    #[must_use]
    pub fn new(name: impl Into<String>, buffer: Arc<SharedBuffer>) -> Self {
        Self {
            core: EndpointCore::new(name.into(), buffer),
        }
    }

    /// Returns the endpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Returns the open/close counters.
    #[must_use]
    pub fn stats(&self) -> &EndpointStats {
        &self.core.stats
    }

    /// Appends up to `len` bytes from `src` to the shared buffer.
    ///
    /// # Errors
    /// Returns `Shutdown` after teardown, or a busy buffer error.
    pub fn accept<S>(
        &self,
        src: &S,
        len: usize,
        interrupt: &Interrupt,
    ) -> Result<Transfer, DeviceError>
    where
        S: UserSource + ?Sized,
    {
        self.core.ensure_active()?;
        let transfer = self.core.buffer.accept(src, len, interrupt)?;
        Ok(transfer)
    }

    pub(crate) fn deactivate(&self) {
        self.core.active.store(false, Ordering::Release);
    }
}

impl FileOperations for InboundEndpoint {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn open(&self) -> Result<(), DeviceError> {
        self.core.open()
    }

    fn release(&self) -> Result<(), DeviceError> {
        self.core.release();
        Ok(())
    }

    fn write(
        &self,
        src: &dyn UserSource,
        len: usize,
        _offset: &mut u64,
        interrupt: &Interrupt,
    ) -> Result<Transfer, DeviceError> {
        self.accept(src, len, interrupt)
    }
}

/// Read-only endpoint that consumes bytes from the front of the shared buffer.
#[derive(Debug)]
pub struct OutboundEndpoint {
    core: EndpointCore,
}

impl OutboundEndpoint {
    /// Creates an outbound endpoint over `buffer`.
    #[must_use]
    pub fn new(name: impl Into<String>, buffer: Arc<SharedBuffer>) -> Self {
        Self {
            core: EndpointCore::new(name.into(), buffer),
        }
    }

    /// Returns the endpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Returns the open/close counters.
    #[must_use]
    pub fn stats(&self) -> &EndpointStats {
        &self.core.stats
    }

    /// Consumes up to `capacity` bytes into `sink`.
    ///
    /// # Errors
    /// Returns `Shutdown` after teardown, or a busy buffer error.
    pub fn deliver_into<K>(
        &self,
        sink: &mut K,
        capacity: usize,
        interrupt: &Interrupt,
    ) -> Result<Transfer, DeviceError>
    where
        K: UserSink + ?Sized,
    {
        self.core.ensure_active()?;
        let transfer = self.core.buffer.deliver_into(sink, capacity, interrupt)?;
        Ok(transfer)
    }

    /// Consumes up to `capacity` bytes and returns them.
    ///
    /// # Errors
    /// Returns `Shutdown` after teardown, or a busy buffer error.
    pub fn deliver(
        &self,
        capacity: usize,
        interrupt: &Interrupt,
    ) -> Result<Delivery, DeviceError> {
        self.core.ensure_active()?;
        let delivery = self.core.buffer.deliver(capacity, interrupt)?;
        Ok(delivery)
    }

    pub(crate) fn deactivate(&self) {
        self.core.active.store(false, Ordering::Release);
    }
}

impl FileOperations for OutboundEndpoint {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn open(&self) -> Result<(), DeviceError> {
        self.core.open()
    }

    fn release(&self) -> Result<(), DeviceError> {
        self.core.release();
        Ok(())
    }

    fn read(
        &self,
        sink: &mut dyn UserSink,
        len: usize,
        _offset: &mut u64,
        interrupt: &Interrupt,
    ) -> Result<Transfer, DeviceError> {
        self.deliver_into(sink, len, interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaybuf_core::TransferStatus;

    fn pair(capacity: usize) -> (InboundEndpoint, OutboundEndpoint) {
        let buffer = Arc::new(SharedBuffer::with_capacity(capacity).unwrap());
        (
            InboundEndpoint::new("pa2_in", Arc::clone(&buffer)),
            OutboundEndpoint::new("pa2_out", buffer),
        )
    }

    #[test]
    fn test_endpoints_share_one_buffer() {
        let (inbound, outbound) = pair(64);
        let interrupt = Interrupt::never();

        inbound.accept(b"hello", 5, &interrupt).unwrap();
        let delivery = outbound.deliver(5, &interrupt).unwrap();
        assert_eq!(delivery.as_slice(), b"hello");
    }

    #[test]
    fn test_open_counts() {
        let (inbound, _) = pair(8);
        inbound.open().unwrap();
        inbound.open().unwrap();
        inbound.release().unwrap();

        assert_eq!(inbound.stats().open_count(), 2);
        assert_eq!(inbound.stats().close_count(), 1);
    }

    #[test]
    fn test_capability_split() {
        let (inbound, outbound) = pair(8);
        let interrupt = Interrupt::never();
        let mut offset = 0;

        let mut out = [0u8; 4];
        let err = inbound
            .read(&mut out.as_mut_slice(), 4, &mut offset, &interrupt)
            .unwrap_err();
        assert!(matches!(err, DeviceError::Unsupported { operation: "read", .. }));

        let err = outbound
            .write(&b"abcd".as_slice(), 4, &mut offset, &interrupt)
            .unwrap_err();
        assert!(matches!(err, DeviceError::Unsupported { operation: "write", .. }));
    }

    #[test]
    fn test_file_operations_route_to_buffer() {
        let (inbound, outbound) = pair(8);
        let interrupt = Interrupt::never();
        let mut offset = 42;

        let written = inbound
            .write(&b"abcdefghij".as_slice(), 10, &mut offset, &interrupt)
            .unwrap();
        assert_eq!(written.len, 8);
        assert!(written.is_truncated());

        let mut out = [0u8; 8];
        let read = outbound
            .read(&mut out.as_mut_slice(), 8, &mut offset, &interrupt)
            .unwrap();
        assert_eq!(read.len, 8);
        assert_eq!(&out, b"abcdefgh");
        assert_eq!(offset, 42);
    }

    #[test]
    fn test_deactivated_endpoint_rejects_calls() {
        let (inbound, outbound) = pair(8);
        let interrupt = Interrupt::never();
        inbound.deactivate();
        outbound.deactivate();

        assert!(matches!(inbound.open(), Err(DeviceError::Shutdown { .. })));
        assert!(matches!(
            inbound.accept(b"a", 1, &interrupt),
            Err(DeviceError::Shutdown { .. })
        ));
        assert!(matches!(
            outbound.deliver(1, &interrupt),
            Err(DeviceError::Shutdown { .. })
        ));
    }

    #[test]
    fn test_nothing_statuses_pass_through() {
        let (inbound, outbound) = pair(2);
        let interrupt = Interrupt::never();

        let read = outbound.deliver(4, &interrupt).unwrap();
        assert_eq!(read.transfer.status, TransferStatus::NothingRead);

        inbound.accept(b"ab", 2, &interrupt).unwrap();
        let written = inbound.accept(b"c", 1, &interrupt).unwrap();
        assert_eq!(written.status, TransferStatus::NothingWritten);
    }
}
