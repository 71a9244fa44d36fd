//! Growable circular-buffer queue
//!
//! [`CircularQueue`] stores its elements in a power-of-two ring that doubles
//! when full and halves when less than a quarter of it is in use. Enqueue,
//! dequeue and positional access (including negative indices) are all O(1)
//! amortized.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Index, IndexMut};

use tracing::debug;

use crate::buffer::{round_up_to_power_of_2, RingBuffer};
use crate::common::{normalize_index, FifoQueue, IndexedQueue, PeekableQueue};
use crate::error::{QueueError, Result};

/// Slot count of a queue created without an explicit capacity
pub const DEFAULT_CAPACITY: usize = 16;

/// A FIFO queue backed by a growable circular buffer
///
/// # Examples
///
/// ```rust
/// use fast_queue_rs::CircularQueue;
///
/// let mut queue: CircularQueue<i32> = (0..5).collect();
/// queue.enqueue(5);
///
/// assert_eq!(queue.get(-1), Ok(&5));
/// assert_eq!(queue.dequeue(), Ok(0));
/// assert_eq!(queue.len(), 5);
/// ```
#[derive(Clone)]
pub struct CircularQueue<T> {
    buf: RingBuffer<T>,

    /// The buffer is never shrunk below this many slots
    min_capacity: usize,
}

impl<T> CircularQueue<T> {
    /// Creates an empty queue with [`DEFAULT_CAPACITY`] slots
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty queue with room for at least `capacity` elements
    ///
    /// The capacity is rounded up to a power of two and also acts as the
    /// floor below which dequeueing never shrinks the buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        let min_capacity = round_up_to_power_of_2(capacity.max(DEFAULT_CAPACITY));
        Self {
            buf: RingBuffer::with_capacity(min_capacity),
            min_capacity,
        }
    }

    /// Returns the number of live elements
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Checks if the queue holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the number of allocated slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Appends an element at the back, doubling the buffer when it is full
    pub fn enqueue(&mut self, item: T) {
        if self.buf.is_full() {
            self.resize(self.buf.capacity() * 2);
        }
        let pushed = self.buf.push_back(item);
        debug_assert!(pushed.is_ok(), "enqueue into a full buffer");
    }

    /// Removes and returns the oldest element
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to remove.
    pub fn dequeue(&mut self) -> Result<T> {
        let item = self.buf.pop_front().ok_or(QueueError::Empty)?;
        self.shrink_if_sparse();
        Ok(item)
    }

    /// Enqueues every element of `items` in iteration order
    ///
    /// The buffer is grown once up front when the iterator reports a lower
    /// size bound. Nothing of `items` is retained beyond the moved elements.
    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        self.reserve(items.size_hint().0);
        for item in items {
            self.enqueue(item);
        }
    }

    /// Makes room for at least `additional` more elements without resizing
    pub fn reserve(&mut self, additional: usize) {
        let needed = self.len().saturating_add(additional);
        if needed > self.buf.capacity() {
            self.resize(needed);
        }
    }

    /// Returns a reference to the element at `index`
    ///
    /// Negative indices count back from the newest element.
    #[inline]
    pub fn get(&self, index: isize) -> Result<&T> {
        let offset = normalize_index(index, self.len())?;
        self.buf
            .get(offset)
            .ok_or(QueueError::IndexOutOfRange { index, len: self.len() })
    }

    /// Returns a mutable reference to the element at `index`
    #[inline]
    pub fn get_mut(&mut self, index: isize) -> Result<&mut T> {
        let len = self.len();
        let offset = normalize_index(index, len)?;
        self.buf
            .get_mut(offset)
            .ok_or(QueueError::IndexOutOfRange { index, len })
    }

    /// Overwrites the element at `index` in place
    pub fn set(&mut self, index: isize, item: T) -> Result<()> {
        *self.get_mut(index)? = item;
        Ok(())
    }

    /// Returns the oldest element, the one `dequeue` would return next
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.buf.get(0)
    }

    /// Returns the newest element
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|offset| self.buf.get(offset))
    }

    /// Same as [`front`](Self::front)
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.front()
    }

    /// Checks whether any live element equals `item`
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|x| x == item)
    }

    /// Returns a queue with its own buffer holding clones of every element
    ///
    /// Structural changes to either queue are never visible through the other.
    /// The elements themselves are cloned, so wrap them in `Rc`/`Arc` to share.
    pub fn copy(&self) -> Self
    where
        T: Clone,
    {
        self.clone()
    }

    /// Drops every element and returns the buffer to its minimum capacity
    pub fn clear(&mut self) {
        if self.buf.capacity() > self.min_capacity {
            self.buf = RingBuffer::with_capacity(self.min_capacity);
        } else {
            self.buf.clear();
        }
    }

    /// Returns a front-to-back iterator over the live elements
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            front: 0,
            back: self.len(),
        }
    }

    fn shrink_if_sparse(&mut self) {
        let capacity = self.buf.capacity();
        if capacity > self.min_capacity && self.len() < capacity / 4 {
            self.resize(capacity / 2);
        }
    }

    fn resize(&mut self, new_capacity: usize) {
        debug!(
            from = self.buf.capacity(),
            to = round_up_to_power_of_2(new_capacity),
            len = self.len(),
            "resizing circular queue buffer"
        );
        self.buf.resize(new_capacity);
    }
}

impl<T> Default for CircularQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FifoQueue<T> for CircularQueue<T> {
    fn enqueue(&mut self, item: T) {
        CircularQueue::enqueue(self, item);
    }

    fn dequeue(&mut self) -> Result<T> {
        CircularQueue::dequeue(self)
    }

    fn len(&self) -> usize {
        CircularQueue::len(self)
    }

    fn is_empty(&self) -> bool {
        CircularQueue::is_empty(self)
    }
}

impl<T> PeekableQueue<T> for CircularQueue<T> {
    fn front(&self) -> Option<&T> {
        CircularQueue::front(self)
    }
}

impl<T> IndexedQueue<T> for CircularQueue<T> {
    fn get(&self, index: isize) -> Result<&T> {
        CircularQueue::get(self, index)
    }

    fn get_mut(&mut self, index: isize) -> Result<&mut T> {
        CircularQueue::get_mut(self, index)
    }

    fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        CircularQueue::contains(self, item)
    }

    fn extend_from<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        CircularQueue::extend(self, items);
    }

    fn copy(&self) -> Self
    where
        T: Clone,
    {
        self.clone()
    }

    fn clear(&mut self) {
        CircularQueue::clear(self);
    }
}

impl<T> Index<isize> for CircularQueue<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index` is outside `[-len, len)`.
    fn index(&self, index: isize) -> &T {
        match self.get(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<isize> for CircularQueue<T> {
    fn index_mut(&mut self, index: isize) -> &mut T {
        match self.get_mut(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> FromIterator<T> for CircularQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T> From<Vec<T>> for CircularQueue<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> Extend<T> for CircularQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        CircularQueue::extend(self, iter);
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for CircularQueue<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        CircularQueue::extend(self, iter.into_iter().copied());
    }
}

impl<T: PartialEq> PartialEq for CircularQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CircularQueue<T> {}

impl<T: fmt::Debug> fmt::Debug for CircularQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`CircularQueue`], oldest element first
///
/// Created by [`CircularQueue::iter`]. Each call to `iter` starts over.
pub struct Iter<'a, T> {
    queue: &'a CircularQueue<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.queue.buf.get(self.front);
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
        self.queue.buf.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            queue: self.queue,
            front: self.front,
            back: self.back,
        }
    }
}

/// Owning iterator that dequeues elements in FIFO order
pub struct IntoIter<T> {
    queue: CircularQueue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.buf.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len();
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for CircularQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { queue: self }
    }
}

impl<'a, T> IntoIterator for &'a CircularQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
