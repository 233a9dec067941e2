//! Transport error types

use crate::DriverError;
use frame_ring::RingError;
use thiserror::Error;

/// Errors surfaced by the transport adapter
///
/// Steady-state traffic conditions (buffer overflow, empty reads) are
/// absorbed as counters and never appear here; only lifecycle failures do.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An operation that needs buffers was called before `begin`
    #[error("transport not started")]
    NotStarted,

    /// `begin` was called while already running
    #[error("transport already started; use reset() to reinitialize")]
    AlreadyStarted,

    /// Ring buffer allocation failed at initialization
    #[error("buffer allocation failed: {0}")]
    Buffer(#[from] RingError),

    /// The underlying driver failed to start
    #[error(transparent)]
    Driver(#[from] DriverError),
}
