//! Append-only growable storage with an explicit doubling policy.
//!
//! `GrowableBuffer<T>` owns its elements and keeps its own logical capacity,
//! so callers never juggle a `(ptr, len, capacity)` triple by hand. Growth
//! starts at [`MIN_CAPACITY`] and doubles afterwards; storage never shrinks
//! except through [`GrowableBuffer::release`].

use core::slice;

use log::trace;

use crate::error::BufferError;

/// Capacity reserved on the first append.
pub const MIN_CAPACITY: usize = 8;

/// Next capacity for a buffer currently holding `old` slots.
pub const fn grow_capacity(old: usize) -> usize {
    if old < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        old.saturating_mul(2)
    }
}

/// Generic append-only buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowableBuffer<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self { Self::new() }
}

impl<T> GrowableBuffer<T> {
    /// Empty buffer, no allocation.
    pub const fn new() -> Self { Self { items: Vec::new(), capacity: 0 } }

    /// Number of stored elements.
    pub fn len(&self) -> usize { self.items.len() }

    /// True when nothing has been appended.
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Logical capacity according to the growth policy.
    pub fn capacity(&self) -> usize { self.capacity }

    /// Appends `item` at the end and returns its index.
    pub fn append(&mut self, item: T) -> usize {
        if self.items.len() + 1 > self.capacity {
            let old = self.capacity;
            self.capacity = grow_capacity(old);
            self.items.reserve_exact(self.capacity - self.items.len());
            trace!("buffer grow {old} -> {}", self.capacity);
        }
        let index = self.items.len();
        self.items.push(item);
        index
    }

    /// Bounds-checked read.
    pub fn get(&self, index: usize) -> Result<&T, BufferError> {
        self.items.get(index).ok_or(BufferError::OutOfBounds { index, len: self.items.len() })
    }

    /// Last element, if any.
    pub fn last(&self) -> Option<&T> { self.items.last() }

    /// Mutable access to the last element (used to extend run-length entries).
    pub fn last_mut(&mut self) -> Option<&mut T> { self.items.last_mut() }

    /// Read-only view. Any later append invalidates it, which the borrow
    /// checker enforces.
    pub fn as_slice(&self) -> &[T] { &self.items }

    /// Iterates in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, T> { self.items.iter() }

    /// Frees the backing storage and resets length and capacity to zero.
    pub fn release(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }
}

impl<'a, T> IntoIterator for &'a GrowableBuffer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<T> Extend<T> for GrowableBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_empty_without_capacity() {
        let buf: GrowableBuffer<u8> = GrowableBuffer::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn capacity_doubles_from_floor() {
        let mut buf = GrowableBuffer::new();
        buf.append(1u8);
        assert_eq!(buf.capacity(), 8);

        for i in 0..8 {
            buf.append(i);
        }
        assert_eq!(buf.len(), 9);
        assert_eq!(buf.capacity(), 16);

        for i in 0..8 {
            buf.append(i);
        }
        assert_eq!(buf.len(), 17);
        assert_eq!(buf.capacity(), 32);
    }

    #[test]
    fn get_is_bounds_checked() {
        let mut buf = GrowableBuffer::new();
        buf.append(42u32);
        assert_eq!(buf.get(0), Ok(&42));
        assert_eq!(buf.get(1), Err(BufferError::OutOfBounds { index: 1, len: 1 }));
    }

    #[test]
    fn release_resets_everything() {
        let mut buf = GrowableBuffer::new();
        buf.extend(0..20u16);
        buf.release();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.append(7), 0);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.as_slice(), &[7]);
    }

    proptest! {
        #[test]
        fn appends_keep_order(items in proptest::collection::vec(any::<i32>(), 0..300)) {
            let mut buf = GrowableBuffer::new();
            for (i, item) in items.iter().enumerate() {
                prop_assert_eq!(buf.append(*item), i);
            }
            prop_assert_eq!(buf.len(), items.len());
            prop_assert!(buf.capacity() >= buf.len());
            for (i, item) in items.iter().enumerate() {
                prop_assert_eq!(buf.get(i), Ok(item));
            }
        }
    }
}
