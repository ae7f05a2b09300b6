//! Reusable fixed-capacity scratch buffers.
//!
//! Each session owns one scratch buffer sized at creation. Native calls
//! write into it through a guard whose `Drop` resets the read position, so
//! every call starts from a clean buffer no matter how the previous one
//! exited. The capacity never changes after construction; callers bound
//! native writes by it instead of growing the buffer.

/// Fixed-capacity scratch buffer dedicated to one session.
#[derive(Debug)]
pub struct Scratch<T> {
    buf: Box<[T]>,
    pos: usize,
}

impl<T: Default + Copy> Scratch<T> {
    /// Allocates a scratch buffer of `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![T::default(); capacity].into_boxed_slice(),
            pos: 0,
        }
    }

    /// Returns the fixed capacity in elements.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the current read position. Zero between calls.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Acquires the buffer for one native call.
    pub fn acquire(&mut self) -> ScratchGuard<'_, T> {
        ScratchGuard { scratch: self }
    }
}

/// Scoped access to an acquired scratch buffer. Dropping the guard resets
/// the buffer position, on success and failure paths alike.
#[derive(Debug)]
pub struct ScratchGuard<'a, T> {
    scratch: &'a mut Scratch<T>,
}

impl<T: Default + Copy> ScratchGuard<'_, T> {
    /// Returns the writable region: the full capacity, from the start.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.scratch.buf
    }

    /// Returns the fixed capacity in elements.
    pub fn capacity(&self) -> usize {
        self.scratch.buf.len()
    }

    /// Copies the first `n` elements out as an independent buffer, so the
    /// result's lifetime does not depend on the next call's reuse.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the capacity. Native writes are bounded by the
    /// capacity, so a valid native length never trips this.
    pub fn copy_out(&mut self, n: usize) -> Vec<T> {
        self.scratch.pos = n;
        self.scratch.buf[..n].to_vec()
    }
}

impl<T> Drop for ScratchGuard<'_, T> {
    fn drop(&mut self) {
        self.scratch.pos = 0;
    }
}
