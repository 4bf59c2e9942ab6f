use bytemuck::Pod;

/// Component index outside `0..size`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("vector index {index} out of bounds for size {size}")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub size: usize,
}

/// Contract shared by the fixed-size vector types.
///
/// Storage is a contiguous, tightly-packed array of `Elem`; every accessor
/// below aliases it.
pub trait Vector {
    type Elem: Pod;

    /// Backing storage as a flat array, read-only.
    fn as_array(&self) -> &[Self::Elem];

    /// Backing storage as a mutable flat array. Writes are visible through `get`.
    fn as_array_mut(&mut self) -> &mut [Self::Elem];

    /// Number of components. Fixed for the lifetime of the vector.
    #[inline]
    fn size(&self) -> usize {
        self.as_array().len()
    }

    /// Returns component `i`.
    #[inline]
    fn get(&self, i: usize) -> Result<Self::Elem, IndexOutOfBounds> {
        let size = self.size();
        self.as_array()
            .get(i)
            .copied()
            .ok_or(IndexOutOfBounds { index: i, size })
    }

    /// Overwrites component `i` in place.
    #[inline]
    fn set(&mut self, i: usize, value: Self::Elem) -> Result<(), IndexOutOfBounds> {
        let size = self.size();
        let slot = self
            .as_array_mut()
            .get_mut(i)
            .ok_or(IndexOutOfBounds { index: i, size })?;
        *slot = value;
        Ok(())
    }

    /// Returns a buffer view over the storage, positioned at 0.
    #[inline]
    fn as_buffer(&self) -> VectorBuffer<'_, Self::Elem> {
        VectorBuffer::new(self.as_array())
    }
}

/// Read cursor over a vector's storage.
///
/// A fresh view always starts at position 0. Relative reads advance the
/// position; the underlying storage is borrowed, never copied.
#[derive(Debug, Clone)]
pub struct VectorBuffer<'a, T: Pod> {
    data: &'a [T],
    position: usize,
}

impl<'a, T: Pod> VectorBuffer<'a, T> {
    #[inline]
    pub fn new(data: &'a [T]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.position < self.data.len()
    }

    /// Reads the element at the current position and advances.
    pub fn get(&mut self) -> Option<T> {
        let v = self.data.get(self.position).copied()?;
        self.position += 1;
        Some(v)
    }

    /// Absolute read; does not move the position.
    #[inline]
    pub fn get_at(&self, i: usize) -> Option<T> {
        self.data.get(i).copied()
    }

    /// Resets the position to 0.
    #[inline]
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self
    }

    /// Whole storage, independent of the position.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Whole storage as raw bytes, ready for `Queue::write_buffer`.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.data)
    }
}
