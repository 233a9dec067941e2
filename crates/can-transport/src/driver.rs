//! Frame driver seam
//!
//! The transport treats the underlying CAN controller as an opaque frame
//! source/sink behind the [`FrameDriver`] trait. The driver calls back into
//! the transport from its own execution context, so the notification closure
//! must be `Send + Sync` and must complete in bounded time.

use can_frame::WireMsg;
use std::sync::Arc;
use thiserror::Error;

/// Protocol-mandated fixed bit rate, 125 Kb/s
pub const CAN_BITRATE: u32 = 125_000;

/// An asynchronous event from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// A frame arrived off the bus
    Received(WireMsg),
    /// A previously submitted frame went out
    Sent,
    /// A bus or controller error, with a driver-specific code
    Error(u32),
}

/// Callback registered with the driver at start time
///
/// A capturing closure rather than a bare function pointer, so the driver
/// can reach the owning transport instance without any global registry.
pub type NotifyFn = Arc<dyn Fn(Notification) + Send + Sync>;

/// Parameters handed to the driver when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSetup {
    /// Bus bit rate; fixed at [`CAN_BITRATE`] by the owning protocol
    pub bitrate: u32,
    /// Transmit pin assignment
    pub tx_pin: u8,
    /// Receive pin assignment
    pub rx_pin: u8,
}

impl Default for DriverSetup {
    fn default() -> Self {
        Self {
            bitrate: CAN_BITRATE,
            tx_pin: 1,
            rx_pin: 2,
        }
    }
}

/// Errors surfaced by a driver
#[derive(Debug, Error)]
pub enum DriverError {
    /// The controller could not be brought up
    #[error("driver start failed: {0}")]
    Start(String),

    /// An operation was attempted before `start`
    #[error("driver not running")]
    NotRunning,
}

/// The external frame source/sink
///
/// Implementations must not block: `send` either hands the frame to the
/// controller or returns `false`, and `ok_to_send` reports whether the
/// controller can accept a frame right now.
pub trait FrameDriver {
    /// Begin asynchronous reception, delivering events through `notify`
    fn start(&mut self, setup: &DriverSetup, notify: NotifyFn) -> Result<(), DriverError>;

    /// Whether the controller can accept a frame for immediate transmission
    fn ok_to_send(&self) -> bool;

    /// Hand one wire message to the controller; `false` on rejection
    fn send(&mut self, msg: &WireMsg) -> bool;

    /// Stop reception and release the controller
    fn stop(&mut self);
}
