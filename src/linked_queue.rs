//! Node-chained queue
//!
//! Every element lives in its own heap node linked to the next newer one.
//! There is never a resize or a bulk move, but also no positional access:
//! only the minimal [`FifoQueue`] capability is provided, plus a borrowed
//! view of the front node through [`PeekableQueue`].

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::common::{FifoQueue, PeekableQueue};
use crate::error::{QueueError, Result};

struct Node<T> {
    value: T,
    next: Option<NonNull<Node<T>>>,
}

/// A FIFO queue of individually allocated, singly linked nodes
pub struct LinkedQueue<T> {
    /// Oldest node, the next to be dequeued
    front: Option<NonNull<Node<T>>>,

    /// Newest node, the append point
    back: Option<NonNull<Node<T>>>,

    len: usize,

    /// Marker for variance and drop check
    _marker: PhantomData<Box<Node<T>>>,
}

// Safety: the queue exclusively owns every node reachable from `front`; the
// raw links are never shared outside it.
unsafe impl<T: Send> Send for LinkedQueue<T> {}
unsafe impl<T: Sync> Sync for LinkedQueue<T> {}

impl<T> LinkedQueue<T> {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self {
            front: None,
            back: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of linked nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the queue holds no nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the oldest element, the one `dequeue` would return next
    #[inline]
    pub fn front(&self) -> Option<&T> {
        // SAFETY: the front node stays alive while `self` is borrowed; only
        // `dequeue` and `clear` free it, and both take `&mut self`.
        self.front.map(|node| unsafe { &node.as_ref().value })
    }

    /// Links a new node holding `item` after the current back node
    pub fn enqueue(&mut self, item: T) {
        let node = NonNull::from(Box::leak(Box::new(Node {
            value: item,
            next: None,
        })));

        match self.back {
            // SAFETY: `back` is the last live node and nothing else borrows it.
            Some(back) => unsafe { (*back.as_ptr()).next = Some(node) },
            None => self.front = Some(node),
        }
        self.back = Some(node);
        self.len += 1;
    }

    /// Unlinks the front node and returns its value
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to remove.
    pub fn dequeue(&mut self) -> Result<T> {
        let front = self.front.ok_or(QueueError::Empty)?;

        // SAFETY: `front` was leaked from a Box in `enqueue` and is unlinked
        // right here, so ownership is reclaimed exactly once.
        let node = unsafe { Box::from_raw(front.as_ptr()) };
        self.front = node.next;
        if self.front.is_none() {
            self.back = None;
        }
        self.len -= 1;
        Ok(node.value)
    }

    /// Drops every node
    pub fn clear(&mut self) {
        while self.dequeue().is_ok() {}
    }
}

impl<T> Drop for LinkedQueue<T> {
    fn drop(&mut self) {
        // Iterative, so long chains cannot overflow the stack.
        self.clear();
    }
}

impl<T> Default for LinkedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FifoQueue<T> for LinkedQueue<T> {
    fn enqueue(&mut self, item: T) {
        LinkedQueue::enqueue(self, item);
    }

    fn dequeue(&mut self) -> Result<T> {
        LinkedQueue::dequeue(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> PeekableQueue<T> for LinkedQueue<T> {
    fn front(&self) -> Option<&T> {
        LinkedQueue::front(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut cursor = self.front;
        while let Some(node) = cursor {
            // SAFETY: nodes reachable from `front` stay alive while `self` is borrowed.
            let node = unsafe { node.as_ref() };
            list.entry(&node.value);
            cursor = node.next;
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_linked_queue_basic() {
        let mut q = LinkedQueue::new();
        assert!(q.is_empty());

        q.enqueue("hello".to_string());
        q.enqueue("world".to_string());
        assert_eq!(q.len(), 2);
        assert_eq!(format!("{q:?}"), r#"["hello", "world"]"#);

        assert_eq!(q.dequeue().unwrap(), "hello");
        assert_eq!(q.dequeue().unwrap(), "world");
        assert_eq!(q.dequeue(), Err(QueueError::Empty));
        assert!(q.is_empty());

        // the back pointer must have been reset with the last dequeue
        q.enqueue("again".to_string());
        assert_eq!(q.dequeue().unwrap(), "again");
    }

    #[test]
    fn test_front_follows_dequeue() {
        let mut q = LinkedQueue::new();
        assert_eq!(q.front(), None);

        q.enqueue(1);
        q.enqueue(2);
        assert_eq!(q.front(), Some(&1));
        assert_eq!(q.len(), 2);

        q.dequeue().unwrap();
        assert_eq!(PeekableQueue::front(&q), Some(&2));
        q.dequeue().unwrap();
        assert_eq!(q.front(), None);
    }

    #[test]
    fn test_linked_queue_large() {
        let mut q = LinkedQueue::new();
        for i in 0..100_000 {
            q.enqueue(i);
        }
        assert_eq!(q.len(), 100_000);
        for i in 0..100_000 {
            assert_eq!(q.dequeue(), Ok(i));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn test_linked_queue_drops_remaining() {
        let tracker = Rc::new(());
        {
            let mut q = LinkedQueue::new();
            for _ in 0..10 {
                q.enqueue(Rc::clone(&tracker));
            }
            drop(q.dequeue());
            assert_eq!(Rc::strong_count(&tracker), 10);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_long_chain_drop() {
        let mut q = LinkedQueue::new();
        for i in 0..1_000_000u32 {
            q.enqueue(i);
        }
        drop(q);
    }
}
