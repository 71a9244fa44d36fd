//! Backing store for the circular queues
//!
//! A fixed-capacity ring of possibly uninitialized slots. The live window is
//! `len` slots starting at `front`, addressed modulo the capacity. Capacity is
//! always a power of two so slot translation is a mask instead of a division.
//! Growing or shrinking is a `resize`, which repacks the live window at slot 0.

use std::fmt;
use std::mem::MaybeUninit;

/// Returns the smallest power of two greater than or equal to `n` (and at least 1)
#[inline]
pub(crate) const fn round_up_to_power_of_2(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        n.next_power_of_two()
    }
}

pub(crate) struct RingBuffer<T> {
    /// Slot storage; only the `len` slots after `front` (wrapping) are initialized
    slots: Box<[MaybeUninit<T>]>,

    /// Slot holding the oldest live element
    front: usize,

    /// Number of live elements
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer with at least `capacity` slots
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Self::allocate(round_up_to_power_of_2(capacity)),
            front: 0,
            len: 0,
        }
    }

    fn allocate(capacity: usize) -> Box<[MaybeUninit<T>]> {
        (0..capacity).map(|_| MaybeUninit::uninit()).collect()
    }

    /// Translates a logical offset into a slot index
    #[inline(always)]
    fn slot(&self, offset: usize) -> usize {
        (self.front + offset) & (self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Writes `value` at offset `len`
    ///
    /// Hands the value back if every slot is live.
    #[inline]
    pub(crate) fn push_back(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        let slot = self.slot(self.len);
        self.slots[slot] = MaybeUninit::new(value);
        self.len += 1;
        Ok(())
    }

    /// Moves the element at offset 0 out of the buffer
    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: `len > 0`, so the front slot is initialized. Advancing `front`
        // below marks it uninitialized again, so it is never read twice.
        let value = unsafe { self.slots[self.front].assume_init_read() };
        self.front = (self.front + 1) & (self.slots.len() - 1);
        self.len -= 1;
        Some(value)
    }

    #[inline]
    pub(crate) fn get(&self, offset: usize) -> Option<&T> {
        if offset >= self.len {
            return None;
        }
        // SAFETY: every offset below `len` maps to an initialized slot.
        Some(unsafe { self.slots[self.slot(offset)].assume_init_ref() })
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        if offset >= self.len {
            return None;
        }
        let slot = self.slot(offset);
        // SAFETY: every offset below `len` maps to an initialized slot.
        Some(unsafe { self.slots[slot].assume_init_mut() })
    }

    /// Reallocates to at least `new_capacity` slots, repacking the live
    /// elements at offsets `[0, len)` and resetting `front` to 0
    pub(crate) fn resize(&mut self, new_capacity: usize) {
        let new_capacity = round_up_to_power_of_2(new_capacity);
        assert!(
            new_capacity >= self.len,
            "ring buffer resized below its live length"
        );

        let mut slots = Self::allocate(new_capacity);
        for (offset, target) in slots.iter_mut().take(self.len).enumerate() {
            let from = self.slot(offset);
            // SAFETY: `from` holds a live element. It is moved exactly once and
            // the old storage is released below without dropping its contents.
            *target = MaybeUninit::new(unsafe { self.slots[from].assume_init_read() });
        }

        self.slots = slots;
        self.front = 0;
    }

    /// Drops every live element, keeping the allocation
    pub(crate) fn clear(&mut self) {
        while self.pop_front().is_some() {}
        self.front = 0;
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        let mut copy = Self {
            slots: Self::allocate(self.capacity()),
            front: 0,
            len: 0,
        };
        for offset in 0..self.len {
            if let Some(item) = self.get(offset) {
                copy.slots[offset] = MaybeUninit::new(item.clone());
                // Counted one at a time so a panicking clone drops only what was written.
                copy.len += 1;
            }
        }
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.len).filter_map(|offset| self.get(offset)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_round_up_to_power_of_2() {
        assert_eq!(round_up_to_power_of_2(0), 1);
        assert_eq!(round_up_to_power_of_2(1), 1);
        assert_eq!(round_up_to_power_of_2(3), 4);
        assert_eq!(round_up_to_power_of_2(16), 16);
        assert_eq!(round_up_to_power_of_2(1025), 2048);
    }

    #[test]
    fn test_wraparound() {
        let mut buf = RingBuffer::with_capacity(4);
        for i in 0..3 {
            assert!(buf.push_back(i).is_ok());
        }
        assert_eq!(buf.pop_front(), Some(0));
        assert_eq!(buf.pop_front(), Some(1));

        // front is now slot 2; these wrap around to slots 3, 0 and 1
        assert!(buf.push_back(3).is_ok());
        assert!(buf.push_back(4).is_ok());
        assert!(buf.push_back(5).is_ok());
        assert!(buf.is_full());
        assert_eq!(buf.push_back(6), Err(6));

        assert_eq!(buf.get(0), Some(&2));
        assert_eq!(buf.get(3), Some(&5));
        assert_eq!(buf.get(4), None);

        let drained: Vec<_> = std::iter::from_fn(|| buf.pop_front()).collect();
        assert_eq!(drained, vec![2, 3, 4, 5]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_resize_repacks_in_order() {
        let mut buf = RingBuffer::with_capacity(4);
        for i in 0..4 {
            buf.push_back(i).unwrap();
        }
        buf.pop_front();
        buf.push_back(4).unwrap();

        buf.resize(8);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.front, 0);
        for i in 5..9 {
            buf.push_back(i).unwrap();
        }
        assert_eq!(format!("{buf:?}"), "[1, 2, 3, 4, 5, 6, 7, 8]");

        for _ in 0..6 {
            buf.pop_front();
        }
        buf.resize(2);
        assert_eq!(buf.capacity(), 2);
        assert_eq!(format!("{buf:?}"), "[7, 8]");
    }

    #[test]
    fn test_drop_releases_live_elements_only() {
        let tracker = Rc::new(());
        {
            let mut buf = RingBuffer::with_capacity(4);
            for _ in 0..4 {
                buf.push_back(Rc::clone(&tracker)).unwrap();
            }
            drop(buf.pop_front());
            buf.resize(16);
            assert_eq!(Rc::strong_count(&tracker), 4);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buf = RingBuffer::with_capacity(2);
        buf.push_back(String::from("a")).unwrap();
        buf.push_back(String::from("b")).unwrap();

        let mut copy = buf.clone();
        *copy.get_mut(0).unwrap() = String::from("z");
        assert_eq!(buf.get(0).map(String::as_str), Some("a"));
        assert_eq!(copy.get(0).map(String::as_str), Some("z"));
        assert_eq!(copy.capacity(), buf.capacity());
    }
}
