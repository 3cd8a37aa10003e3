//! Copies between caller memory and buffer storage.
//!
//! Both directions report the number of bytes that could NOT be copied, so a
//! caller region that is shorter than the transfer length shows up as a
//! partial copy fault rather than a panic.

use bytes::BytesMut;

/// Caller memory that bytes are copied out of (the write path).
pub trait UserSource {
    /// Fills `dst` from caller memory.
    ///
    /// Bytes that cannot be copied are zero-filled in `dst`.
    ///
    /// # Returns
    /// The number of bytes that could not be copied.
    fn copy_out(&self, dst: &mut [u8]) -> usize;
}

/// Caller memory that bytes are copied into (the read path).
pub trait UserSink {
    /// Writes `src` to caller memory.
    ///
    /// # Returns
    /// The number of bytes that could not be copied.
    fn copy_in(&mut self, src: &[u8]) -> usize;
}

impl UserSource for [u8] {
    #[inline]
    fn copy_out(&self, dst: &mut [u8]) -> usize {
        let copied = self.len().min(dst.len());
        dst[..copied].copy_from_slice(&self[..copied]);
        dst[copied..].fill(0);
        dst.len() - copied
    }
}

impl<const N: usize> UserSource for [u8; N] {
    #[inline]
    fn copy_out(&self, dst: &mut [u8]) -> usize {
        self.as_slice().copy_out(dst)
    }
}

impl UserSource for Vec<u8> {
    #[inline]
    fn copy_out(&self, dst: &mut [u8]) -> usize {
        self.as_slice().copy_out(dst)
    }
}

impl UserSource for str {
    #[inline]
    fn copy_out(&self, dst: &mut [u8]) -> usize {
        self.as_bytes().copy_out(dst)
    }
}

impl<T: UserSource + ?Sized> UserSource for &T {
    #[inline]
    fn copy_out(&self, dst: &mut [u8]) -> usize {
        (**self).copy_out(dst)
    }
}

impl UserSink for [u8] {
    #[inline]
    fn copy_in(&mut self, src: &[u8]) -> usize {
        let copied = self.len().min(src.len());
        self[..copied].copy_from_slice(&src[..copied]);
        src.len() - copied
    }
}

impl<const N: usize> UserSink for [u8; N] {
    #[inline]
    fn copy_in(&mut self, src: &[u8]) -> usize {
        self.as_mut_slice().copy_in(src)
    }
}

impl UserSink for Vec<u8> {
    #[inline]
    fn copy_in(&mut self, src: &[u8]) -> usize {
        self.extend_from_slice(src);
        0
    }
}

impl UserSink for BytesMut {
    #[inline]
    fn copy_in(&mut self, src: &[u8]) -> usize {
        self.extend_from_slice(src);
        0
    }
}

impl<T: UserSink + ?Sized> UserSink for &mut T {
    #[inline]
    fn copy_in(&mut self, src: &[u8]) -> usize {
        (**self).copy_in(src)
    }
}
