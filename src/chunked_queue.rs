//! Chunk-chained queue
//!
//! [`ChunkedQueue`] keeps its elements in fixed rings of [`CHUNK_CAPACITY`]
//! slots. A new chunk is appended when the newest one fills up and the oldest
//! chunk is released once drained, so growing never moves an element.
//!
//! Only the oldest chunk may be partially drained and only the newest one may
//! be partially filled; every chunk in between is full. That keeps positional
//! access O(1): one subtraction for the oldest chunk, then a division.

use std::fmt;
use std::iter::FusedIterator;

use tracing::trace;

use crate::buffer::RingBuffer;
use crate::circular_queue::CircularQueue;
use crate::common::{normalize_index, FifoQueue, IndexedQueue, PeekableQueue};
use crate::error::{QueueError, Result};

/// Slots per chunk
pub const CHUNK_CAPACITY: usize = 256;

/// A FIFO queue over a chain of fixed-size ring chunks
#[derive(Clone)]
pub struct ChunkedQueue<T> {
    /// Oldest chunk first
    chunks: CircularQueue<RingBuffer<T>>,

    len: usize,
}

impl<T> ChunkedQueue<T> {
    /// Creates an empty queue; no chunk is allocated until the first enqueue
    pub fn new() -> Self {
        Self {
            chunks: CircularQueue::new(),
            len: 0,
        }
    }

    /// Returns the number of live elements across all chunks
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the queue holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated chunks
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Appends an element, starting a new chunk if the newest one is full
    pub fn enqueue(&mut self, item: T) {
        match self.chunks.get_mut(-1) {
            Ok(tail) if !tail.is_full() => {
                let pushed = tail.push_back(item);
                debug_assert!(pushed.is_ok(), "enqueue into a full chunk");
            }
            _ => {
                trace!(chunks = self.chunks.len() + 1, "allocating queue chunk");
                let mut chunk = RingBuffer::with_capacity(CHUNK_CAPACITY);
                let pushed = chunk.push_back(item);
                debug_assert!(pushed.is_ok(), "enqueue into a fresh chunk");
                self.chunks.enqueue(chunk);
            }
        }
        self.len += 1;
    }

    /// Removes and returns the oldest element
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to remove.
    pub fn dequeue(&mut self) -> Result<T> {
        let head = self.chunks.get_mut(0).map_err(|_| QueueError::Empty)?;
        let item = head.pop_front().ok_or(QueueError::Empty)?;
        let drained = head.is_empty();

        // The last chunk is kept around so an idle queue does not thrash the allocator.
        if drained && self.chunks.len() > 1 {
            self.chunks.dequeue()?;
            trace!(chunks = self.chunks.len(), "released drained queue chunk");
        }
        self.len -= 1;
        Ok(item)
    }

    /// Enqueues every element of `items` in iteration order
    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.enqueue(item);
        }
    }

    /// Maps a live offset to a (chunk, offset within chunk) pair
    #[inline]
    fn locate(&self, offset: usize) -> (usize, usize) {
        let head_len = self.chunks.front().map_or(0, RingBuffer::len);
        if offset < head_len {
            (0, offset)
        } else {
            let rest = offset - head_len;
            (1 + rest / CHUNK_CAPACITY, rest % CHUNK_CAPACITY)
        }
    }

    /// Returns a reference to the element at `index`
    ///
    /// Negative indices count back from the newest element.
    pub fn get(&self, index: isize) -> Result<&T> {
        let len = self.len;
        let (chunk, inner) = self.locate(normalize_index(index, len)?);
        self.chunks
            .get(chunk as isize)
            .ok()
            .and_then(|chunk| chunk.get(inner))
            .ok_or(QueueError::IndexOutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`
    pub fn get_mut(&mut self, index: isize) -> Result<&mut T> {
        let len = self.len;
        let (chunk, inner) = self.locate(normalize_index(index, len)?);
        self.chunks
            .get_mut(chunk as isize)
            .ok()
            .and_then(|chunk| chunk.get_mut(inner))
            .ok_or(QueueError::IndexOutOfRange { index, len })
    }

    /// Overwrites the element at `index` in place
    pub fn set(&mut self, index: isize, item: T) -> Result<()> {
        *self.get_mut(index)? = item;
        Ok(())
    }

    /// Returns the oldest element
    pub fn front(&self) -> Option<&T> {
        self.chunks.front().and_then(|chunk| chunk.get(0))
    }

    /// Returns the newest element
    pub fn back(&self) -> Option<&T> {
        self.chunks
            .back()
            .and_then(|chunk| chunk.len().checked_sub(1).and_then(|last| chunk.get(last)))
    }

    /// Checks whether any live element equals `item`
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|x| x == item)
    }

    /// Returns an independent queue holding clones of every element
    pub fn copy(&self) -> Self
    where
        T: Clone,
    {
        self.clone()
    }

    /// Drops every element and chunk
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.len = 0;
    }

    /// Returns a front-to-back iterator over the live elements
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<T> Default for ChunkedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FifoQueue<T> for ChunkedQueue<T> {
    fn enqueue(&mut self, item: T) {
        ChunkedQueue::enqueue(self, item);
    }

    fn dequeue(&mut self) -> Result<T> {
        ChunkedQueue::dequeue(self)
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<T> PeekableQueue<T> for ChunkedQueue<T> {
    fn front(&self) -> Option<&T> {
        ChunkedQueue::front(self)
    }
}

impl<T> IndexedQueue<T> for ChunkedQueue<T> {
    fn get(&self, index: isize) -> Result<&T> {
        ChunkedQueue::get(self, index)
    }

    fn get_mut(&mut self, index: isize) -> Result<&mut T> {
        ChunkedQueue::get_mut(self, index)
    }

    fn copy(&self) -> Self
    where
        T: Clone,
    {
        self.clone()
    }

    fn clear(&mut self) {
        ChunkedQueue::clear(self);
    }
}

impl<T> FromIterator<T> for ChunkedQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T> Extend<T> for ChunkedQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        ChunkedQueue::extend(self, iter);
    }
}

impl<T: PartialEq> PartialEq for ChunkedQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ChunkedQueue<T> {}

impl<T: fmt::Debug> fmt::Debug for ChunkedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`ChunkedQueue`], oldest element first
pub struct Iter<'a, T> {
    queue: &'a ChunkedQueue<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.queue.get(self.front as isize).ok();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.queue.get(self.back as isize).ok()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a ChunkedQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
