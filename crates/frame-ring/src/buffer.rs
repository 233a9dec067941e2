//! Ring buffer implementation

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Errors constructing a ring buffer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    /// A zero-capacity ring can never hold a frame
    #[error("ring buffer capacity must be non-zero")]
    ZeroCapacity,
}

/// Snapshot of a ring's occupancy and lifetime statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingStats {
    /// Fixed capacity in frames
    pub capacity: usize,
    /// Frames currently buffered
    pub occupancy: usize,
    /// Largest occupancy ever observed
    pub high_water_mark: usize,
    /// Lifetime put count
    pub puts: u64,
    /// Lifetime get count
    pub gets: u64,
    /// Lifetime count of unread frames evicted by overwrite
    pub overflows: u64,
}

/// A buffered frame plus its insertion timestamp
#[derive(Debug)]
struct Entry<T> {
    frame: T,
    inserted_at: Instant,
}

#[derive(Debug)]
struct Inner<T> {
    /// Pre-allocated storage, never resized after construction
    storage: Box<[Entry<T>]>,
    /// Next write slot
    head: usize,
    /// Next read slot
    tail: usize,
    /// True iff the ring holds exactly `capacity` frames
    full: bool,
    high_water_mark: usize,
    put_count: u64,
    get_count: u64,
    overflow_count: u64,
}

impl<T> Inner<T> {
    fn occupancy(&self, capacity: usize) -> usize {
        if self.full {
            capacity
        } else {
            (self.head + capacity - self.tail) % capacity
        }
    }
}

/// Fixed-capacity circular store of frames with overwrite-oldest semantics
///
/// One producer context writes via [`put`](FrameRing::put) while one consumer
/// context reads via [`get`](FrameRing::get)/[`peek`](FrameRing::peek). A
/// full ring silently evicts its oldest unread frame to accept a new one;
/// data loss is observable only through [`overflow_count`](FrameRing::
/// overflow_count). Index state is gated behind a short critical section that
/// both sides take, so the single-producer/single-consumer contract is
/// enforced rather than assumed; no operation blocks or allocates after
/// construction.
#[derive(Debug)]
pub struct FrameRing<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone + Default> FrameRing<T> {
    /// Create a ring with a fixed capacity, pre-allocating all storage
    ///
    /// Capacity is immutable for the lifetime of the ring; resizing inside
    /// the producer context is never safe, so it is simply not offered.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }
        let storage: Vec<Entry<T>> = (0..capacity)
            .map(|_| Entry {
                frame: T::default(),
                inserted_at: Instant::now(),
            })
            .collect();
        Ok(Self {
            capacity,
            inner: Mutex::new(Inner {
                storage: storage.into_boxed_slice(),
                head: 0,
                tail: 0,
                full: false,
                high_water_mark: 0,
                put_count: 0,
                get_count: 0,
                overflow_count: 0,
            }),
        })
    }

    /// Write a frame at the head slot, timestamping it on insertion
    ///
    /// When the ring is already full the oldest unread frame is evicted
    /// first and `overflow_count` is bumped; the newest frame always wins.
    /// Never fails and never allocates.
    pub fn put(&self, frame: T) {
        let mut inner = self.inner.lock();
        if inner.full {
            inner.tail = (inner.tail + 1) % self.capacity;
            inner.overflow_count += 1;
        }
        let head = inner.head;
        inner.storage[head] = Entry {
            frame,
            inserted_at: Instant::now(),
        };
        inner.head = (head + 1) % self.capacity;
        inner.full = inner.head == inner.tail;
        inner.put_count += 1;
        let occupancy = inner.occupancy(self.capacity);
        if occupancy > inner.high_water_mark {
            inner.high_water_mark = occupancy;
        }
    }

    /// Whether at least one unread frame is buffered
    pub fn available(&self) -> bool {
        let inner = self.inner.lock();
        inner.full || inner.head != inner.tail
    }

    /// Clone of the oldest unread frame without removing it
    pub fn peek(&self) -> Option<T> {
        let inner = self.inner.lock();
        if !inner.full && inner.head == inner.tail {
            return None;
        }
        Some(inner.storage[inner.tail].frame.clone())
    }

    /// Remove and return the oldest unread frame
    pub fn get(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        if !inner.full && inner.head == inner.tail {
            return None;
        }
        let frame = inner.storage[inner.tail].frame.clone();
        inner.tail = (inner.tail + 1) % self.capacity;
        inner.full = false;
        inner.get_count += 1;
        Some(frame)
    }

    /// Insertion timestamp of the current oldest unread frame
    ///
    /// Must be read before the `get` that consumes the entry.
    pub fn insert_time(&self) -> Option<Instant> {
        let inner = self.inner.lock();
        if !inner.full && inner.head == inner.tail {
            return None;
        }
        Some(inner.storage[inner.tail].inserted_at)
    }

    /// Reset to the empty state
    ///
    /// Lifetime statistics (put/get/overflow counts and the high-water mark)
    /// are cumulative and survive a clear; only destroy-and-recreate starts
    /// them over.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.head = 0;
        inner.tail = 0;
        inner.full = false;
    }

    /// Current occupancy
    pub fn len(&self) -> usize {
        self.inner.lock().occupancy(self.capacity)
    }

    /// Whether the ring holds no unread frames
    pub fn is_empty(&self) -> bool {
        !self.available()
    }

    /// Slots available before the next put evicts an unread frame
    pub fn free_slots(&self) -> usize {
        self.capacity - self.len()
    }

    /// Fixed capacity in frames
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lifetime put count
    pub fn put_count(&self) -> u64 {
        self.inner.lock().put_count
    }

    /// Lifetime get count
    pub fn get_count(&self) -> u64 {
        self.inner.lock().get_count
    }

    /// Lifetime count of unread frames evicted by overwrite
    pub fn overflow_count(&self) -> u64 {
        self.inner.lock().overflow_count
    }

    /// Largest occupancy ever observed
    pub fn high_water_mark(&self) -> usize {
        self.inner.lock().high_water_mark
    }

    /// Consistent snapshot of occupancy and lifetime statistics
    pub fn stats(&self) -> RingStats {
        let inner = self.inner.lock();
        RingStats {
            capacity: self.capacity,
            occupancy: inner.occupancy(self.capacity),
            high_water_mark: inner.high_water_mark,
            puts: inner.put_count,
            gets: inner.get_count,
            overflows: inner.overflow_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use can_frame::CanFrame;
    use proptest::prelude::*;

    fn frame(id: u32) -> CanFrame {
        CanFrame::new(id, &[id as u8]).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            FrameRing::<CanFrame>::new(0).unwrap_err(),
            RingError::ZeroCapacity
        );
    }

    #[test]
    fn test_fifo_order_below_capacity() {
        let ring = FrameRing::new(8).unwrap();
        for id in 1..=5 {
            ring.put(frame(id));
        }
        for id in 1..=5 {
            assert!(ring.available());
            assert_eq!(ring.get(), Some(frame(id)));
        }
        assert!(!ring.available());
        assert_eq!(ring.len(), 0);
    }

    #[test]
    fn test_overwrite_keeps_newest() {
        // Capacity 4, put A..E: B,C,D,E survive and one eviction is counted.
        let ring = FrameRing::new(4).unwrap();
        for id in [0xA, 0xB, 0xC, 0xD, 0xE] {
            ring.put(frame(id));
        }
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.overflow_count(), 1);
        for id in [0xB, 0xC, 0xD, 0xE] {
            assert_eq!(ring.get(), Some(frame(id)));
        }
        assert!(!ring.available());
    }

    #[test]
    fn test_empty_reads_return_none_without_counting() {
        let ring = FrameRing::<CanFrame>::new(8).unwrap();
        assert_eq!(ring.peek(), None);
        assert_eq!(ring.get(), None);
        assert_eq!(ring.insert_time(), None);
        assert_eq!(ring.put_count(), 0);
        assert_eq!(ring.get_count(), 0);
    }

    #[test]
    fn test_clear_keeps_lifetime_statistics() {
        let ring = FrameRing::new(2).unwrap();
        ring.put(frame(1));
        ring.put(frame(2));
        ring.put(frame(3));
        let _ = ring.get();
        ring.clear();

        assert!(!ring.available());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.free_slots(), 2);
        assert_eq!(ring.put_count(), 3);
        assert_eq!(ring.get_count(), 1);
        assert_eq!(ring.overflow_count(), 1);
        assert_eq!(ring.high_water_mark(), 2);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let ring = FrameRing::new(4).unwrap();
        ring.put(frame(7));
        assert_eq!(ring.peek(), Some(frame(7)));
        assert_eq!(ring.peek(), Some(frame(7)));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get_count(), 0);
        assert_eq!(ring.get(), Some(frame(7)));
    }

    #[test]
    fn test_insert_time_tracks_oldest_entry() {
        let ring = FrameRing::new(4).unwrap();
        let before = Instant::now();
        ring.put(frame(1));
        let t1 = ring.insert_time().unwrap();
        assert!(t1 >= before);

        ring.put(frame(2));
        // Oldest entry unchanged by a later put.
        assert_eq!(ring.insert_time().unwrap(), t1);
        let _ = ring.get();
        let t2 = ring.insert_time().unwrap();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_frame_round_trip_preserves_fields() {
        let ring = FrameRing::new(4).unwrap();
        let mut sent = CanFrame::new(0x123, &[1, 2, 3]).unwrap();
        sent.ext = true;
        ring.put(sent);
        assert_eq!(ring.get(), Some(sent));
    }

    #[test]
    fn test_stats_snapshot() {
        let ring = FrameRing::new(4).unwrap();
        ring.put(frame(1));
        ring.put(frame(2));
        let _ = ring.get();
        let stats = ring.stats();
        assert_eq!(
            stats,
            RingStats {
                capacity: 4,
                occupancy: 1,
                high_water_mark: 2,
                puts: 2,
                gets: 1,
                overflows: 0,
            }
        );
    }

    proptest! {
        /// Putting capacity + k frames then draining yields exactly the last
        /// `capacity` frames, in order, with k overflows counted.
        #[test]
        fn prop_drain_after_overflow(capacity in 1usize..32, extra in 1usize..32) {
            let ring = FrameRing::new(capacity).unwrap();
            let total = capacity + extra;
            for i in 0..total as u32 {
                ring.put(i);
            }
            prop_assert_eq!(ring.overflow_count(), extra as u64);
            prop_assert_eq!(ring.high_water_mark(), capacity);
            for i in extra as u32..total as u32 {
                prop_assert_eq!(ring.get(), Some(i));
            }
            prop_assert!(!ring.available());
        }

        /// Occupancy and free slots always partition the capacity, and the
        /// high-water mark tracks the maximum occupancy reached.
        #[test]
        fn prop_occupancy_invariants(
            capacity in 1usize..16,
            ops in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let ring = FrameRing::new(capacity).unwrap();
            let mut model: std::collections::VecDeque<u32> = Default::default();
            let mut max_seen = 0usize;
            for (i, is_put) in ops.into_iter().enumerate() {
                if is_put {
                    ring.put(i as u32);
                    if model.len() == capacity {
                        model.pop_front();
                    }
                    model.push_back(i as u32);
                } else {
                    prop_assert_eq!(ring.get(), model.pop_front());
                }
                max_seen = max_seen.max(model.len());
                prop_assert_eq!(ring.len(), model.len());
                prop_assert_eq!(ring.len() + ring.free_slots(), capacity);
                prop_assert_eq!(ring.available(), !model.is_empty());
            }
            prop_assert_eq!(ring.high_water_mark(), max_seen);
            prop_assert!(ring.high_water_mark() <= capacity);
        }
    }
}
