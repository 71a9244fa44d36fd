//! # fast_queue_rs
//!
//! FIFO queues with amortized O(1) enqueue, dequeue and positional access
//! (negative indices count back from the newest element), plus a mutex-guarded
//! variant for sharing across threads.
//!
//! - [`CircularQueue`]: growable power-of-two ring buffer; the workhorse.
//! - [`ChunkedQueue`]: chain of fixed 256-slot rings, never moves an element.
//! - [`LinkedQueue`]: one heap node per element, enqueue/dequeue only.
//! - [`SyncQueue`]: one lock around any of the above, plus a non-failing `peek`.
//!
//! All of them implement [`FifoQueue`]. The storage queues also implement
//! [`PeekableQueue`], and the indexable ones [`IndexedQueue`].

mod buffer;
mod common;
mod error;

pub mod chunked_queue;
pub mod circular_queue;
pub mod dynamic;
pub mod linked_queue;
pub mod sync_queue;

// Re-exports for convenience
pub use chunked_queue::{ChunkedQueue, CHUNK_CAPACITY};
pub use circular_queue::{CircularQueue, DEFAULT_CAPACITY};
pub use common::{normalize_index, FifoQueue, IndexedQueue, PeekableQueue};
pub use dynamic::{DynamicArgs, Value};
pub use error::{ErrorKind, QueueError, Result};
pub use linked_queue::LinkedQueue;
pub use sync_queue::SyncQueue;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_family_sanity() {
        // Every variant is a conforming FIFO queue and can cross threads
        fn is_fifo<Q: FifoQueue<u32> + Send>() -> bool { true }
        fn is_shared<Q: Send + Sync>() -> bool { true }
        fn is_peekable<Q: PeekableQueue<u32>>() -> bool { true }

        assert!(is_fifo::<CircularQueue<u32>>());
        assert!(is_fifo::<ChunkedQueue<u32>>());
        assert!(is_fifo::<LinkedQueue<u32>>());
        assert!(is_fifo::<SyncQueue<u32>>());
        assert!(is_peekable::<CircularQueue<u32>>());
        assert!(is_peekable::<ChunkedQueue<u32>>());
        assert!(is_peekable::<LinkedQueue<u32>>());
        assert!(is_shared::<SyncQueue<String>>());
        assert!(is_shared::<SyncQueue<u32, LinkedQueue<u32>>>());
    }
}
