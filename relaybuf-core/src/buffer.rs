//! The capacity-bounded byte buffer shared by both endpoints.
//!
//! This module provides:
//! - [`SharedBuffer`] - fixed-capacity storage, fill length and the single lock
//! - [`BufferGuard`] - the only handle through which storage can be reached
//! - [`BufferStats`] - cumulative transfer counters for diagnostics
//!
//! Valid content always starts at offset 0: `storage[0 .. len)` is readable,
//! everything past `len` is stale.

use crate::config::{BufferConfig, DrainMode, FaultAccounting};
use crate::error::{BufferError, Result};
use crate::interrupt::Interrupt;
use crate::transfer::{Delivery, Direction, Transfer};
use crate::usercopy::{UserSink, UserSource};
use bytes::BytesMut;
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

struct BufferState {
    storage: Box<[u8]>,
    len: usize,
}

/// Fixed-capacity byte reservoir guarded by one exclusive lock.
///
/// Writers append at the current fill length and readers always consume from
/// offset 0. Requests larger than the free space (or the held data) are
/// truncated, never blocked on. Share it between endpoints with an `Arc`.
pub struct SharedBuffer {
    state: Mutex<BufferState>,
    /// Mirror of the fill length, published under the lock.
    len_hint: AtomicUsize,
    capacity: usize,
    config: BufferConfig,
    stats: BufferStats,
}

impl SharedBuffer {
    /// Creates a zero-initialised, empty buffer.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(config: BufferConfig) -> Result<Self> {
        config.validate()?;
        let capacity = config.capacity;

        tracing::debug!("Shared buffer created with capacity {}", capacity);

        Ok(Self {
            state: Mutex::new(BufferState {
                storage: vec![0u8; capacity].into_boxed_slice(),
                len: 0,
            }),
            len_hint: AtomicUsize::new(0),
            capacity,
            config,
            stats: BufferStats::new(),
        })
    }

    /// Creates a buffer with the given capacity and default settings.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(BufferConfig::new().with_capacity(capacity))
    }

    /// Returns the fixed capacity in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configuration the buffer was built with.
    #[must_use]
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Returns the transfer counters.
    #[must_use]
    pub fn stats(&self) -> &BufferStats {
        &self.stats
    }

    /// Returns the fill length as last published, without taking the lock.
    ///
    /// The value may be stale by the time the caller looks at it.
    #[inline]
    #[must_use]
    pub fn len_hint(&self) -> usize {
        self.len_hint.load(Ordering::Acquire)
    }

    /// Acquires the buffer lock.
    ///
    /// Tries the uncontended path first, then waits in slices of
    /// `lock_poll_interval`, re-checking `interrupt` and the optional
    /// `lock_timeout` between slices.
    ///
    /// # Errors
    /// Returns `Busy` if the wait is interrupted or times out.
    pub fn lock(&self, interrupt: &Interrupt) -> Result<BufferGuard<'_>> {
        if let Some(state) = self.state.try_lock() {
            return Ok(self.guard(state));
        }

        // A timeout past the representable range of `Instant` means no deadline.
        let deadline = self
            .config
            .lock_timeout
            .and_then(|t| Instant::now().checked_add(t));
        let poll = self.config.lock_poll_interval;

        loop {
            if interrupt.is_raised() {
                self.stats.busy.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Lock acquisition interrupted");
                return Err(BufferError::interrupted());
            }

            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        self.stats.busy.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!("Lock acquisition timed out");
                        return Err(BufferError::timed_out());
                    }
                    poll.min(deadline - now)
                }
                None => poll,
            };

            if let Some(state) = self.state.try_lock_for(slice) {
                return Ok(self.guard(state));
            }
        }
    }

    fn guard<'a>(&'a self, state: MutexGuard<'a, BufferState>) -> BufferGuard<'a> {
        tracing::trace!("Lock acquired");
        BufferGuard {
            state,
            len_hint: &self.len_hint,
        }
    }

    /// Appends up to `requested` bytes from `src`.
    ///
    /// The request is truncated to the free space. If nothing fits, or zero
    /// bytes were requested, returns `NothingWritten` without taking the lock.
    ///
    /// # Errors
    /// Returns `Busy` if the lock could not be acquired; nothing is written.
    pub fn accept<S>(&self, src: &S, requested: usize, interrupt: &Interrupt) -> Result<Transfer>
    where
        S: UserSource + ?Sized,
    {
        let free = self.capacity - self.len_hint().min(self.capacity);
        if requested > free {
            tracing::info!(
                "Write of {} bytes exceeds {} free, dropping the rest to fit buffer",
                requested,
                free
            );
        }

        let want = requested.min(free);
        if want == 0 {
            tracing::debug!("No bytes written");
            return Ok(Transfer::nothing(Direction::Accept, requested));
        }

        let mut guard = self.lock(interrupt)?;
        let (len, faulted) = guard.append(src, want, self.config.fault_accounting);
        let fill = guard.len();
        drop(guard);
        tracing::trace!("Lock released");

        self.stats
            .record(Direction::Accept, len, faulted, len > 0 && len < requested);
        if faulted > 0 {
            tracing::warn!("Failed to copy {} of {} bytes from caller", faulted, want);
        }
        tracing::debug!("{} bytes written, fill length {}", len, fill);

        Ok(Transfer::moved(Direction::Accept, requested, len, faulted))
    }

    /// Consumes up to `capacity` bytes from the front of the buffer into `sink`.
    ///
    /// The request is truncated to the held data. If the buffer is empty, or
    /// zero capacity is offered, returns `NothingRead` without taking the lock.
    ///
    /// # Errors
    /// Returns `Busy` if the lock could not be acquired; nothing is consumed.
    pub fn deliver_into<K>(
        &self,
        sink: &mut K,
        capacity: usize,
        interrupt: &Interrupt,
    ) -> Result<Transfer>
    where
        K: UserSink + ?Sized,
    {
        let held = self.len_hint();
        if capacity > held {
            tracing::info!(
                "Read of {} bytes exceeds {} held, returning only what is held",
                capacity,
                held
            );
        }

        let want = capacity.min(held);
        if want == 0 {
            tracing::debug!("No bytes read");
            return Ok(Transfer::nothing(Direction::Deliver, capacity));
        }

        let mut guard = self.lock(interrupt)?;
        let (len, faulted) = guard.drain_into(
            sink,
            want,
            self.config.drain_mode,
            self.config.fault_accounting,
        );
        let fill = guard.len();
        drop(guard);
        tracing::trace!("Lock released");

        self.stats
            .record(Direction::Deliver, len, faulted, len > 0 && len < capacity);
        if faulted > 0 {
            tracing::warn!("Failed to copy {} of {} bytes to caller", faulted, want);
        }
        tracing::debug!("{} bytes read, fill length {}", len, fill);

        Ok(Transfer::moved(Direction::Deliver, capacity, len, faulted))
    }

    /// Consumes up to `capacity` bytes and returns them as owned bytes.
    ///
    /// # Errors
    /// Returns `Busy` if the lock could not be acquired; nothing is consumed.
    pub fn deliver(&self, capacity: usize, interrupt: &Interrupt) -> Result<Delivery> {
        let mut out = BytesMut::with_capacity(capacity.min(self.capacity));
        let transfer = self.deliver_into(&mut out, capacity, interrupt)?;
        Ok(Delivery {
            data: out.freeze(),
            transfer,
        })
    }

    /// Drops all held content. The storage is not zeroed.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.len = 0;
        self.len_hint.store(0, Ordering::Release);
        tracing::debug!("Shared buffer reset");
    }
}

impl std::fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("capacity", &self.capacity)
            .field("len_hint", &self.len_hint())
            .field("drain_mode", &self.config.drain_mode)
            .field("fault_accounting", &self.config.fault_accounting)
            .finish()
    }
}

/// Exclusive access to the buffer contents.
///
/// Holding a guard is the critical section; dropping it releases the lock.
pub struct BufferGuard<'a> {
    state: MutexGuard<'a, BufferState>,
    len_hint: &'a AtomicUsize,
}

impl BufferGuard<'_> {
    /// Returns the fill length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len
    }

    /// Returns true if no bytes are held.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.len == 0
    }

    /// Returns the buffer capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.storage.len()
    }

    /// Returns the free space in bytes.
    #[inline]
    #[must_use]
    pub fn free(&self) -> usize {
        self.capacity() - self.state.len
    }

    /// Returns true if no more bytes can be appended.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Returns the valid content, `storage[0 .. len)`.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.state.storage[..self.state.len]
    }

    fn publish(&self) {
        self.len_hint.store(self.state.len, Ordering::Release);
    }

    /// Copies up to `want` bytes from `src` to the end of the content.
    ///
    /// Returns `(accounted, faulted)`. `want` is clamped again to the free
    /// space seen under the lock.
    fn append<S>(&mut self, src: &S, want: usize, accounting: FaultAccounting) -> (usize, usize)
    where
        S: UserSource + ?Sized,
    {
        let want = want.min(self.free());
        if want == 0 {
            return (0, 0);
        }

        let state = &mut *self.state;
        let start = state.len;
        let failed = src
            .copy_out(&mut state.storage[start..start + want])
            .min(want);
        let accounted = match accounting {
            FaultAccounting::Reserved => want,
            FaultAccounting::Committed => want - failed,
        };
        state.len += accounted;
        self.publish();

        (accounted, failed)
    }

    /// Copies up to `want` bytes from the front of the content into `sink`
    /// and removes them.
    ///
    /// Returns `(accounted, faulted)`.
    fn drain_into<K>(
        &mut self,
        sink: &mut K,
        want: usize,
        mode: DrainMode,
        accounting: FaultAccounting,
    ) -> (usize, usize)
    where
        K: UserSink + ?Sized,
    {
        let state = &mut *self.state;
        let held = state.len;
        let want = want.min(held);
        if want == 0 {
            return (0, 0);
        }

        let failed = sink.copy_in(&state.storage[..want]).min(want);
        let consumed = match accounting {
            FaultAccounting::Reserved => want,
            FaultAccounting::Committed => want - failed,
        };
        let remaining = held - consumed;

        match mode {
            DrainMode::Compact => {
                state.storage.copy_within(consumed..held, 0);
                state.storage[remaining..held].fill(0);
            }
            DrainMode::Legacy => {
                state.storage[..remaining].fill(0);
            }
        }
        state.len = remaining;
        self.publish();

        (consumed, failed)
    }
}

impl std::fmt::Debug for BufferGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferGuard")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Cumulative counters over the lifetime of a buffer.
#[derive(Debug, Default)]
pub struct BufferStats {
    accepted: AtomicU64,
    delivered: AtomicU64,
    truncated: AtomicU64,
    faulted: AtomicU64,
    busy: AtomicU64,
}

impl BufferStats {
    fn new() -> Self {
        Self::default()
    }

    fn record(&self, direction: Direction, len: usize, faulted: usize, truncated: bool) {
        let counter = match direction {
            Direction::Accept => &self.accepted,
            Direction::Deliver => &self.delivered,
        };
        counter.fetch_add(len as u64, Ordering::Relaxed);
        self.faulted.fetch_add(faulted as u64, Ordering::Relaxed);
        if truncated {
            self.truncated.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns a point-in-time copy of the counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted_bytes: self.accepted.load(Ordering::Relaxed),
            delivered_bytes: self.delivered.load(Ordering::Relaxed),
            truncated_calls: self.truncated.load(Ordering::Relaxed),
            faulted_bytes: self.faulted.load(Ordering::Relaxed),
            busy_rejections: self.busy.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`BufferStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Bytes accounted as appended.
    pub accepted_bytes: u64,
    /// Bytes accounted as consumed.
    pub delivered_bytes: u64,
    /// Calls that moved fewer bytes than requested (not counting no-ops).
    pub truncated_calls: u64,
    /// Bytes the caller-memory copy failed to move.
    pub faulted_bytes: u64,
    /// Calls rejected because the lock could not be acquired.
    pub busy_rejections: u64,
}
