//! Mutex-guarded queue for sharing between threads
//!
//! [`SyncQueue`] wraps any conforming queue behind a single lock. Every
//! operation is one critical section: acquire, run the wrapped operation,
//! release. Elements handed out are clones, never references into the guarded
//! buffer.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_utils::CachePadded;
use tracing::warn;

use crate::circular_queue::CircularQueue;
use crate::common::{FifoQueue, IndexedQueue, PeekableQueue};
use crate::error::Result;

/// A thread-safe queue: one lock around one wrapped queue
///
/// # Examples
///
/// ```rust
/// use fast_queue_rs::SyncQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(SyncQueue::new());
/// let producer = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || queue.extend(0..100))
/// };
/// producer.join().unwrap();
///
/// assert_eq!(queue.len(), 100);
/// assert_eq!(queue.peek(), Some(0));
/// ```
pub struct SyncQueue<T, Q = CircularQueue<T>> {
    /// The lock lives on its own cache line so neighbouring queues do not
    /// contend on it
    inner: CachePadded<Mutex<Q>>,

    _marker: PhantomData<fn() -> T>,
}

impl<T> SyncQueue<T, CircularQueue<T>> {
    /// Creates an empty queue backed by a [`CircularQueue`]
    pub fn new() -> Self {
        Self::from_queue(CircularQueue::new())
    }

    /// Creates an empty queue with room for at least `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_queue(CircularQueue::with_capacity(capacity))
    }
}

impl<T, Q> SyncQueue<T, Q> {
    /// Wraps an existing queue
    pub fn from_queue(queue: Q) -> Self {
        Self {
            inner: CachePadded::new(Mutex::new(queue)),
            _marker: PhantomData,
        }
    }

    /// Unwraps the guarded queue
    pub fn into_inner(self) -> Q {
        CachePadded::into_inner(self.inner)
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires the lock
    ///
    /// Queue operations never leave the wrapped queue half-updated, so a lock
    /// poisoned by a panic elsewhere is taken over rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Q> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("taking over queue lock poisoned by a panicking thread");
            poisoned.into_inner()
        })
    }

    /// Exclusive access needs no locking
    fn queue_mut(&mut self) -> &mut Q {
        self.inner.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, Q: FifoQueue<T>> SyncQueue<T, Q> {
    /// Appends an element at the back
    pub fn enqueue(&self, item: T) {
        self.lock().enqueue(item);
    }

    /// Removes and returns the oldest element
    ///
    /// Returns [`QueueError::Empty`](crate::QueueError::Empty) if the queue is
    /// empty; use [`peek`](Self::peek) to poll without an error.
    pub fn dequeue(&self) -> Result<T> {
        self.lock().dequeue()
    }

    /// Returns the number of elements at the time the lock was held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Checks if the queue held no elements at the time the lock was held
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T, Q: PeekableQueue<T>> SyncQueue<T, Q> {
    /// Returns a clone of the oldest element, or `None` if the queue is empty
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().front().cloned()
    }
}

impl<T, Q: IndexedQueue<T>> SyncQueue<T, Q> {
    /// Returns a clone of the element at `index`
    pub fn get(&self, index: isize) -> Result<T>
    where
        T: Clone,
    {
        self.lock().get(index).cloned()
    }

    /// Overwrites the element at `index` in place
    pub fn set(&self, index: isize, item: T) -> Result<()> {
        self.lock().set(index, item)
    }

    /// Checks whether any element equals `item`
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.lock().contains(item)
    }

    /// Enqueues every element of `items` in iteration order
    ///
    /// `items` is drained before the lock is taken, so the caller's iterator
    /// never runs inside the critical section and the batch lands contiguously.
    pub fn extend<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        self.lock().extend_from(items);
    }

    /// Returns a new, independently locked queue holding clones of the elements
    pub fn copy(&self) -> Self
    where
        T: Clone,
    {
        Self::from_queue(self.lock().copy())
    }

    /// Removes every element
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns an iterator that clones one element per lock acquisition
    ///
    /// Elements are read through [`get`](Self::get) by offset. Mutating the
    /// queue from another thread meanwhile is allowed but leaves the yielded
    /// sequence unspecified; iteration stops at the first offset that no
    /// longer exists.
    pub fn iter(&self) -> Iter<'_, T, Q> {
        Iter {
            queue: self,
            offset: 0,
            done: false,
        }
    }
}

impl<T, Q: FifoQueue<T>> FifoQueue<T> for SyncQueue<T, Q> {
    fn enqueue(&mut self, item: T) {
        self.queue_mut().enqueue(item);
    }

    fn dequeue(&mut self) -> Result<T> {
        self.queue_mut().dequeue()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

impl<T, Q: Default> Default for SyncQueue<T, Q> {
    fn default() -> Self {
        Self::from_queue(Q::default())
    }
}

impl<T, Q> From<Q> for SyncQueue<T, Q> {
    fn from(queue: Q) -> Self {
        Self::from_queue(queue)
    }
}

impl<T> FromIterator<T> for SyncQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_queue(iter.into_iter().collect())
    }
}

impl<T, Q: fmt::Debug> fmt::Debug for SyncQueue<T, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncQueue")
            .field("queue", &*self.lock())
            .finish()
    }
}

/// Iterator over a [`SyncQueue`], created by [`SyncQueue::iter`]
pub struct Iter<'a, T, Q> {
    queue: &'a SyncQueue<T, Q>,
    offset: usize,
    done: bool,
}

impl<T: Clone, Q: IndexedQueue<T>> Iterator for Iter<'_, T, Q> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        match self.queue.get(self.offset as isize) {
            Ok(item) => {
                self.offset += 1;
                Some(item)
            }
            Err(_) => {
                self.done = true;
                None
            }
        }
    }
}

impl<T: Clone, Q: IndexedQueue<T>> FusedIterator for Iter<'_, T, Q> {}

impl<'a, T: Clone, Q: IndexedQueue<T>> IntoIterator for &'a SyncQueue<T, Q> {
    type Item = T;
    type IntoIter = Iter<'a, T, Q>;

    fn into_iter(self) -> Iter<'a, T, Q> {
        self.iter()
    }
}
