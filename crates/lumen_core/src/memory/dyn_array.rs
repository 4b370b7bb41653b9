//! # Dynamic Array
//!
//! Growable contiguous buffer of fixed-size elements. Both stores are built
//! on top of it.
//!
//! Growth is explicit and fallible: when an append would exceed capacity
//! the buffer grows from `c` to `2c + 1` elements, and a failed reservation
//! is reported as [`StoreError::AllocationFailure`] instead of aborting.

use std::mem;

use bytemuck::{Pod, Zeroable};

use crate::error::{StoreError, StoreResult};

/// Elements reserved by [`DynArray::new`].
pub const INITIAL_CAPACITY: usize = 4;

/// A growable, densely packed array.
///
/// The buffer never shrinks. Any append may relocate it, so references
/// obtained from [`DynArray::at`] or [`DynArray::as_slice`] are only valid
/// until the next mutating call; the borrow checker enforces this.
///
/// # Example
///
/// ```rust
/// use lumen_core::DynArray;
///
/// let mut array: DynArray<u32> = DynArray::new();
/// array.push(7)?;
/// array.push(9)?;
/// assert_eq!(*array.at(1)?, 9);
/// assert_eq!(array.remove(0)?, 7);
/// assert_eq!(array.as_slice(), &[9]);
/// # Ok::<(), lumen_core::StoreError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynArray<T> {
    data: Vec<T>,
}

impl<T> DynArray<T> {
    /// Creates an empty array with a small initial reservation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Creates an empty array with room for at least `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailure`] if the reservation fails.
    pub fn with_capacity(capacity: usize) -> StoreResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| Self::allocation_failure(capacity))?;
        Ok(Self { data })
    }

    /// Size of one element in bytes.
    #[inline]
    #[must_use]
    pub const fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Number of elements stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements the buffer can hold without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Makes room for `additional` more elements, growing by `2c + 1` steps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailure`] if the required capacity
    /// overflows or the allocator refuses the request.
    pub fn reserve(&mut self, additional: usize) -> StoreResult<()> {
        let len = self.data.len();
        let required = len
            .checked_add(additional)
            .ok_or_else(|| Self::allocation_failure(usize::MAX))?;
        let old_capacity = self.data.capacity();
        if required <= old_capacity {
            return Ok(());
        }

        let mut new_capacity = old_capacity;
        while new_capacity < required {
            new_capacity = new_capacity
                .checked_mul(2)
                .and_then(|c| c.checked_add(1))
                .ok_or_else(|| Self::allocation_failure(usize::MAX))?;
        }

        self.data
            .try_reserve_exact(new_capacity - len)
            .map_err(|_| Self::allocation_failure(new_capacity))?;

        tracing::trace!(
            "DynArray grew from {} to {} elements ({} bytes each)",
            old_capacity,
            self.data.capacity(),
            mem::size_of::<T>()
        );
        Ok(())
    }

    /// Appends an element, growing first if the buffer is full.
    ///
    /// Returns the index the element was written to.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailure`] if growth fails. The array
    /// is left unchanged in that case.
    #[inline]
    pub fn push(&mut self, item: T) -> StoreResult<usize> {
        self.reserve(1)?;
        let index = self.data.len();
        self.data.push(item);
        Ok(index)
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] if `index >= len`.
    #[inline]
    pub fn at(&self, index: usize) -> StoreResult<&T> {
        let len = self.data.len();
        self.data.get(index).ok_or(StoreError::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] if `index >= len`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> StoreResult<&mut T> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or(StoreError::OutOfRange { index, len })
    }

    /// Returns the element at `index`, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Returns the element at `index` mutably, or `None` if out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// Removes the element at `index`, shifting everything after it down.
    ///
    /// Preserves the order of the remaining elements. O(n).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> StoreResult<T> {
        self.check_index(index)?;
        Ok(self.data.remove(index))
    }

    /// Removes the element at `index` by moving the last element into its place.
    ///
    /// O(1). Only the previously last element changes position.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfRange`] if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> StoreResult<T> {
        self.check_index(index)?;
        Ok(self.data.swap_remove(index))
    }

    /// Removes every element. Capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// The packed contents.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The packed contents, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over the elements in packed order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates mutably over the elements in packed order.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    #[inline]
    fn check_index(&self, index: usize) -> StoreResult<()> {
        let len = self.data.len();
        if index < len {
            Ok(())
        } else {
            Err(StoreError::OutOfRange { index, len })
        }
    }

    fn allocation_failure(requested: usize) -> StoreError {
        StoreError::AllocationFailure {
            requested,
            element_size: mem::size_of::<T>(),
        }
    }
}

impl<T: Zeroable> DynArray<T> {
    /// Appends an all-zero element.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailure`] if growth fails.
    #[inline]
    pub fn push_zeroed(&mut self) -> StoreResult<usize> {
        self.push(T::zeroed())
    }
}

impl<T: Pod> DynArray<T> {
    /// Raw bytes of the packed contents, e.g. for a GPU buffer upload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.data.as_slice())
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_array() {
        let array: DynArray<u64> = DynArray::new();
        assert!(array.is_empty());
        assert_eq!(array.element_size(), 8);
        assert!(array.capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn test_growth_preserves_contents() {
        let mut array: DynArray<u32> = DynArray::with_capacity(0).unwrap();
        for i in 0..100 {
            assert_eq!(array.push(i).unwrap(), i as usize);
        }
        assert_eq!(array.len(), 100);
        assert!(array.capacity() >= 100);
        for i in 0..100 {
            assert_eq!(*array.at(i).unwrap(), i as u32);
        }
    }

    #[test]
    fn test_growth_doubles_plus_one() {
        let mut array: DynArray<u32> = DynArray::with_capacity(3).unwrap();
        let before = array.capacity();
        for i in 0..=before {
            array.push(i as u32).unwrap();
        }
        assert!(array.capacity() >= before * 2 + 1);
    }

    #[test]
    fn test_at_out_of_range() {
        let mut array: DynArray<u8> = DynArray::new();
        array.push(1).unwrap();
        assert_eq!(
            array.at(1),
            Err(StoreError::OutOfRange { index: 1, len: 1 })
        );
        assert!(array.at_mut(5).is_err());
        assert!(array.get(1).is_none());
    }

    #[test]
    fn test_remove_shifts() {
        let mut array: DynArray<u8> = DynArray::new();
        for v in [10, 20, 30, 40] {
            array.push(v).unwrap();
        }
        assert_eq!(array.remove(1).unwrap(), 20);
        assert_eq!(array.as_slice(), &[10, 30, 40]);
        assert!(array.remove(3).is_err());
    }

    #[test]
    fn test_swap_remove_moves_last() {
        let mut array: DynArray<u8> = DynArray::new();
        for v in [10, 20, 30, 40] {
            array.push(v).unwrap();
        }
        assert_eq!(array.swap_remove(0).unwrap(), 10);
        assert_eq!(array.as_slice(), &[40, 20, 30]);
        assert_eq!(array.swap_remove(2).unwrap(), 30);
        assert_eq!(array.as_slice(), &[40, 20]);
    }

    #[test]
    fn test_push_zeroed_and_bytes() {
        let mut array: DynArray<u16> = DynArray::new();
        array.push(0x0102).unwrap();
        array.push_zeroed().unwrap();
        assert_eq!(array.as_bytes().len(), 4);
        assert_eq!(&array.as_bytes()[2..], &[0, 0]);
        assert_eq!(*array.at(1).unwrap(), 0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut array: DynArray<u32> = DynArray::new();
        for i in 0..32 {
            array.push(i).unwrap();
        }
        let capacity = array.capacity();
        array.clear();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), capacity);
    }

    #[test]
    fn test_reserve_overflow_is_reported() {
        let mut array: DynArray<u64> = DynArray::new();
        array.push(1).unwrap();
        assert!(matches!(
            array.reserve(usize::MAX),
            Err(StoreError::AllocationFailure { element_size: 8, .. })
        ));
        assert_eq!(array.len(), 1);
    }
}
