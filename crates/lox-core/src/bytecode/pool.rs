//! Constant pool: ordered literals addressed by a stable index.

use log::trace;

use crate::{
    buffer::GrowableBuffer,
    error::{ChunkError, ChunkResult},
    value::Value,
};

/// Largest number of slots a 24-bit operand can address.
pub const MAX_CONSTANTS: usize = 1 << 24;

/// Constant pool with stable 0-based indices. Slots are never reused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    values: GrowableBuffer<Value>,
}

impl ConstantPool {
    /// Empty pool.
    pub const fn new() -> Self { Self { values: GrowableBuffer::new() } }

    /// Number of stored constants.
    pub fn len(&self) -> usize { self.values.len() }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Stores `value` in a fresh slot and returns its index.
    ///
    /// Fails once the 24-bit index space is exhausted; the pool is left
    /// untouched in that case.
    pub fn append(&mut self, value: Value) -> ChunkResult<usize> {
        let len = self.values.len();
        if len >= MAX_CONSTANTS {
            return Err(ChunkError::ConstantPoolFull { len });
        }
        let index = self.values.append(value);
        trace!("constant[{index}] = {value}");
        Ok(index)
    }

    /// Value stored at `index`.
    pub fn get(&self, index: usize) -> ChunkResult<Value> {
        self.values
            .get(index)
            .copied()
            .map_err(|_| ChunkError::ConstantOutOfRange { index, len: self.values.len() })
    }

    /// Iterate as `(index, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Value)> + '_ {
        self.values.iter().copied().enumerate()
    }

    /// Frees the storage.
    pub fn release(&mut self) { self.values.release(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_insertion_order() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.append(Value(1.0)), Ok(0));
        assert_eq!(pool.append(Value(1.0)), Ok(1));
        assert_eq!(pool.append(Value(2.5)), Ok(2));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(1), Ok(Value(1.0)));
        assert_eq!(pool.get(2), Ok(Value(2.5)));
        let all: Vec<_> = pool.iter().collect();
        assert_eq!(all, vec![(0, Value(1.0)), (1, Value(1.0)), (2, Value(2.5))]);
    }

    #[test]
    fn missing_slot_is_reported() {
        let mut pool = ConstantPool::new();
        pool.append(Value(3.0)).unwrap();
        assert_eq!(pool.get(5), Err(ChunkError::ConstantOutOfRange { index: 5, len: 1 }));
    }

    #[test]
    fn release_empties_the_pool() {
        let mut pool = ConstantPool::new();
        pool.append(Value(3.0)).unwrap();
        pool.release();
        assert!(pool.is_empty());
        assert_eq!(pool.append(Value(4.0)), Ok(0));
    }
}
