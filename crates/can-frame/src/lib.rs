//! CAN Frame Data Model
//!
//! This crate provides the application-level `CanFrame` record and the
//! driver's wire-level `WireMsg` record, plus the conversions between the
//! two. The wire format packs the remote-request and extended-id flags into
//! reserved high bits of the 32-bit identifier.

mod frame;
mod wire;

pub use frame::{CanFrame, FrameError, MAX_DATA_LEN};
pub use wire::{WireMsg, ID_EFF, ID_RTR};
