//! # Working Buffers
//!
//! Fixed-capacity byte buffers reused across frames. Writes past the
//! capacity are rejected with [`KissError::BufferOverflow`] instead of
//! growing the allocation.

use bytes::{BufMut, BytesMut};
use std::ops::Deref;

use crate::error::{KissError, Result};

/// Byte buffer with a hard capacity, allocated once
#[derive(Debug)]
pub struct FrameBuffer {
    data: BytesMut,
    capacity: usize,
}

impl FrameBuffer {
    /// Allocate a buffer that will never hold more than `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of bytes this buffer accepts
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether another byte would overflow
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    /// Forget the contents; the allocation is kept
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Append one byte
    ///
    /// # Errors
    ///
    /// Returns [`KissError::BufferOverflow`] if the buffer is full; the
    /// contents are left untouched.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.is_full() {
            return Err(KissError::BufferOverflow { capacity: self.capacity });
        }
        self.data.put_u8(byte);
        Ok(())
    }

    /// Append a slice, all or nothing
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if self.data.len() + bytes.len() > self.capacity {
            return Err(KissError::BufferOverflow { capacity: self.capacity });
        }
        self.data.put_slice(bytes);
        Ok(())
    }

    /// Clear the buffer and expose `len` zeroed bytes (clamped to the
    /// capacity) for a collaborator to fill in place.
    ///
    /// Follow up with [`FrameBuffer::truncate`] once the real count is known.
    pub fn prepare(&mut self, len: usize) -> &mut [u8] {
        let len = len.min(self.capacity);
        self.data.clear();
        self.data.resize(len, 0);
        &mut self.data[..]
    }

    /// Keep only the first `len` bytes
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }
}

impl Deref for FrameBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}
