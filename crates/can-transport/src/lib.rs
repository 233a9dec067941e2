//! CAN Transport Adapter
//!
//! Bridges an asynchronous frame driver (which delivers received frames via
//! a notification callback at unpredictable times) to a poll-based contract
//! toward the application: `available()` / `next_message()` on the receive
//! side, `send_message()` / `send_message_direct()` on the transmit side.
//!
//! Received frames land in a [`frame_ring::FrameRing`]; outgoing frames are
//! handed to the driver immediately when it reports ready-to-send, otherwise
//! queued and drained opportunistically on the next poll. Polling is the
//! only entry point the application is guaranteed to call frequently, so it
//! is also where transmit backlog gets retired.

mod config;
mod driver;
mod error;
mod queue;
mod transport;

pub mod mock;

pub use config::TransportConfig;
pub use driver::{DriverError, DriverSetup, FrameDriver, Notification, NotifyFn, CAN_BITRATE};
pub use error::TransportError;
pub use queue::{RingTxQueue, TxQueue};
pub use transport::{CanTransport, TransportStats, DEFAULT_PRIORITY};
