//! Frame Ring Buffer
//!
//! Provides a fixed-capacity circular store of fixed-size frame records with
//! overwrite-oldest-on-full semantics and usage instrumentation. One ring
//! instance backs the receive path (records = [`can_frame::CanFrame`]) and
//! another the transmit queue (records = [`can_frame::WireMsg`]); the store
//! is generic so a single component serves both.

mod buffer;

pub use buffer::{FrameRing, RingError, RingStats};
