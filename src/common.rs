//! Common functionality for the queue family
//!
//! This module provides the capability traits every queue implements and the
//! index normalization shared by the indexable variants.

use crate::error::{QueueError, Result};

/// Minimal FIFO capability
///
/// Any type providing these four operations with strict first-in-first-out
/// order and the stated error contract is a conforming queue.
pub trait FifoQueue<T> {
    /// Appends an element at the back of the queue
    fn enqueue(&mut self, item: T);

    /// Removes and returns the oldest element
    ///
    /// Returns [`QueueError::Empty`] if the queue holds no elements.
    fn dequeue(&mut self) -> Result<T>;

    /// Returns the number of live elements
    fn len(&self) -> usize;

    /// Checks if the queue holds no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A queue whose oldest element can be borrowed in place
///
/// Kept apart from [`FifoQueue`] because a lock-guarded queue cannot hand out
/// a reference that outlives its critical section.
pub trait PeekableQueue<T>: FifoQueue<T> {
    /// Returns the oldest element without removing it
    fn front(&self) -> Option<&T>;
}

/// Extended capability: positional access, containment, batch append and copy
///
/// Offset 0 is the oldest element, offset `len - 1` the newest. Negative
/// indices count back from the newest element, so `-1` is the newest.
pub trait IndexedQueue<T>: PeekableQueue<T> {
    /// Returns a reference to the element at `index`
    fn get(&self, index: isize) -> Result<&T>;

    /// Returns a mutable reference to the element at `index`
    fn get_mut(&mut self, index: isize) -> Result<&mut T>;

    /// Overwrites the element at `index` in place
    fn set(&mut self, index: isize, item: T) -> Result<()> {
        *self.get_mut(index)? = item;
        Ok(())
    }

    /// Linear scan for an element equal to `item`
    fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        (0..self.len()).any(|offset| self.get(offset as isize).is_ok_and(|x| x == item))
    }

    /// Enqueues every element of `items` in iteration order
    fn extend_from<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        for item in items {
            self.enqueue(item);
        }
    }

    /// Returns an independent queue holding clones of the live elements
    fn copy(&self) -> Self
    where
        Self: Sized,
        T: Clone;

    /// Removes every element
    fn clear(&mut self);
}

/// Translates a possibly negative `index` into an offset in `[0, len)`
///
/// Negative values map to `index + len`. Anything that still falls outside
/// the live range is reported as [`QueueError::IndexOutOfRange`] carrying the
/// caller's original index.
#[inline]
pub fn normalize_index(index: isize, len: usize) -> Result<usize> {
    let out_of_range = || QueueError::IndexOutOfRange { index, len };

    let offset = if index < 0 {
        // `len` always fits in an isize: no allocation may exceed isize::MAX bytes.
        let shifted = index + len as isize;
        if shifted < 0 {
            return Err(out_of_range());
        }
        shifted as usize
    } else {
        index as usize
    };

    if offset < len {
        Ok(offset)
    } else {
        Err(out_of_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(0, 3), Ok(0));
        assert_eq!(normalize_index(2, 3), Ok(2));
        assert_eq!(normalize_index(-1, 3), Ok(2));
        assert_eq!(normalize_index(-3, 3), Ok(0));

        assert_eq!(
            normalize_index(3, 3),
            Err(QueueError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            normalize_index(-4, 3),
            Err(QueueError::IndexOutOfRange { index: -4, len: 3 })
        );
        assert!(normalize_index(0, 0).is_err());
        assert!(normalize_index(-1, 0).is_err());
        assert!(normalize_index(isize::MIN, 5).is_err());
    }
}
