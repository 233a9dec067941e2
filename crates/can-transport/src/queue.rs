//! Transmit queue seam
//!
//! The transmit backlog is pluggable so platforms with a native queue
//! primitive can supply their own backend; the default wraps a
//! [`FrameRing`], which never rejects an enqueue and instead evicts the
//! oldest pending send.

use can_frame::WireMsg;
use frame_ring::{FrameRing, RingError, RingStats};

/// Backlog of wire messages awaiting a ready-to-send driver
pub trait TxQueue: Sized {
    /// Construct a backend holding at most `capacity` pending sends
    fn with_capacity(capacity: usize) -> Result<Self, RingError>;

    /// Queue a message; `false` only if the backend rejects it
    fn enqueue(&self, msg: WireMsg) -> bool;

    /// Remove the oldest pending message
    fn dequeue(&self) -> Option<WireMsg>;

    /// Count of messages awaiting transmission
    fn pending(&self) -> usize;
}

/// Default transmit queue backed by a frame ring
///
/// Enqueueing always succeeds; when the ring is full the oldest pending
/// send is silently evicted and counted in the ring's overflow statistic.
pub struct RingTxQueue {
    ring: FrameRing<WireMsg>,
}

impl RingTxQueue {
    /// Statistics snapshot of the underlying ring
    pub fn stats(&self) -> RingStats {
        self.ring.stats()
    }
}

impl TxQueue for RingTxQueue {
    fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        Ok(Self {
            ring: FrameRing::new(capacity)?,
        })
    }

    fn enqueue(&self, msg: WireMsg) -> bool {
        self.ring.put(msg);
        true
    }

    fn dequeue(&self) -> Option<WireMsg> {
        self.ring.get()
    }

    fn pending(&self) -> usize {
        self.ring.len()
    }
}
