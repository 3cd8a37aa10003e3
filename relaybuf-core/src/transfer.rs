//! Outcome records for accept and deliver operations.

use bytes::Bytes;

/// Status of a transfer that was not rejected as busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// At least one byte moved.
    Ok,
    /// Nothing was appended: the buffer was full or zero bytes were requested.
    NothingWritten,
    /// Nothing was consumed: the buffer was empty or zero capacity was offered.
    NothingRead,
}

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Caller memory into the buffer.
    Accept,
    /// Buffer into caller memory.
    Deliver,
}

/// Result of a single accept or deliver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Direction of the transfer.
    pub direction: Direction,
    /// Length the caller asked for.
    pub requested: usize,
    /// Length the buffer accounted for (appended or consumed).
    pub len: usize,
    /// Bytes the caller-memory copy failed to move.
    pub faulted: usize,
    /// Transfer status.
    pub status: TransferStatus,
}

impl Transfer {
    /// Creates a zero-length transfer that never touched the lock.
    #[must_use]
    pub fn nothing(direction: Direction, requested: usize) -> Self {
        let status = match direction {
            Direction::Accept => TransferStatus::NothingWritten,
            Direction::Deliver => TransferStatus::NothingRead,
        };
        Self {
            direction,
            requested,
            len: 0,
            faulted: 0,
            status,
        }
    }

    /// Creates a transfer that moved `len` bytes.
    #[must_use]
    pub fn moved(direction: Direction, requested: usize, len: usize, faulted: usize) -> Self {
        if len == 0 {
            return Self {
                faulted,
                ..Self::nothing(direction, requested)
            };
        }
        Self {
            direction,
            requested,
            len,
            faulted,
            status: TransferStatus::Ok,
        }
    }

    /// Returns true if fewer bytes were accounted for than requested.
    #[inline]
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.len < self.requested
    }

    /// Returns true if part of the caller-memory copy failed.
    #[inline]
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.faulted > 0
    }

    /// Returns true if nothing moved.
    #[inline]
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        self.status != TransferStatus::Ok
    }
}

/// Bytes delivered to the caller together with their transfer record.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Delivered bytes.
    pub data: Bytes,
    /// Transfer record.
    pub transfer: Transfer,
}

impl Delivery {
    /// Returns the number of bytes the buffer consumed.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transfer.len
    }

    /// Returns true if nothing was consumed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transfer.len == 0
    }

    /// Returns the delivered bytes.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
