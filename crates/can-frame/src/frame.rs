//! Application-level CAN frame record

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of data bytes in a classic CAN frame
pub const MAX_DATA_LEN: u8 = 8;

/// Errors constructing a frame
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Payload longer than the 8-byte classic CAN limit
    #[error("payload length {0} exceeds CAN maximum of {MAX_DATA_LEN}")]
    PayloadTooLong(usize),
}

/// A single CAN bus message
///
/// `id` carries the bare identifier; the remote-request and extended-id
/// flags are kept as separate booleans rather than packed into reserved id
/// bits (that packing is the wire format's concern, see [`crate::WireMsg`]).
/// Only the first `len` bytes of `data` are meaningful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFrame {
    /// Frame identifier (11-bit standard or 29-bit extended)
    pub id: u32,
    /// Count of valid data bytes, 0..=8
    pub len: u8,
    /// Payload storage; bytes past `len` are undefined
    pub data: [u8; 8],
    /// Remote transmission request flag
    pub rtr: bool,
    /// Extended (29-bit) identifier flag
    pub ext: bool,
}

impl CanFrame {
    /// Create a data frame from a payload slice
    pub fn new(id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_DATA_LEN as usize {
            return Err(FrameError::PayloadTooLong(payload.len()));
        }
        let mut data = [0u8; 8];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            len: payload.len() as u8,
            data,
            rtr: false,
            ext: false,
        })
    }

    /// The valid portion of the payload
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(MAX_DATA_LEN) as usize]
    }

    /// Whether this frame is the all-zero sentinel returned on empty reads
    pub fn is_empty_sentinel(&self) -> bool {
        *self == Self::default()
    }
}
