//! Driver wire-level message record
//!
//! The underlying CAN driver exchanges frames as a packed record whose id
//! field carries the remote-request and extended-id flags in reserved high
//! bits. That encoding is a fixed external contract; this module owns the
//! conversions so the rest of the workspace only ever sees [`CanFrame`].

use crate::{CanFrame, MAX_DATA_LEN};
use serde::{Deserialize, Serialize};

/// Remote transmission request flag, reserved id bit 30
pub const ID_RTR: u32 = 1 << 30;

/// Extended (29-bit) identifier flag, reserved id bit 31
pub const ID_EFF: u32 = 1 << 31;

/// Wire-level message as exchanged with the external driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMsg {
    /// Identifier with flag bits 30/31 reserved for RTR/EFF
    pub id: u32,
    /// Data length count, 0..=8
    pub dlc: u8,
    /// Payload storage
    pub data: [u8; 8],
}

impl From<&CanFrame> for WireMsg {
    fn from(frame: &CanFrame) -> Self {
        let mut id = frame.id & !(ID_RTR | ID_EFF);
        if frame.rtr {
            id |= ID_RTR;
        }
        if frame.ext {
            id |= ID_EFF;
        }
        Self {
            id,
            dlc: frame.len.min(MAX_DATA_LEN),
            data: frame.data,
        }
    }
}

impl From<&WireMsg> for CanFrame {
    fn from(msg: &WireMsg) -> Self {
        Self {
            id: msg.id & !(ID_RTR | ID_EFF),
            len: msg.dlc.min(MAX_DATA_LEN),
            data: msg.data,
            rtr: msg.id & ID_RTR != 0,
            ext: msg.id & ID_EFF != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flags_packed_into_reserved_bits() {
        let mut frame = CanFrame::new(0x123, &[1, 2, 3]).unwrap();
        frame.rtr = true;
        frame.ext = true;
        let msg = WireMsg::from(&frame);
        assert_eq!(msg.id & ID_RTR, ID_RTR);
        assert_eq!(msg.id & ID_EFF, ID_EFF);
        assert_eq!(msg.id & !(ID_RTR | ID_EFF), 0x123);
        assert_eq!(msg.dlc, 3);
    }

    #[test]
    fn test_decode_masks_flag_bits_from_id() {
        let msg = WireMsg {
            id: 0x456 | ID_RTR,
            dlc: 0,
            data: [0; 8],
        };
        let frame = CanFrame::from(&msg);
        assert_eq!(frame.id, 0x456);
        assert!(frame.rtr);
        assert!(!frame.ext);
    }

    #[test]
    fn test_oversized_dlc_clamped_on_decode() {
        let msg = WireMsg {
            id: 0x1,
            dlc: 15,
            data: [0; 8],
        };
        assert_eq!(CanFrame::from(&msg).len, 8);
    }

    proptest! {
        #[test]
        fn prop_frame_wire_round_trip(
            id in 0u32..(1 << 29),
            payload in proptest::collection::vec(any::<u8>(), 0..=8),
            rtr: bool,
            ext: bool,
        ) {
            let mut frame = CanFrame::new(id, &payload).unwrap();
            frame.rtr = rtr;
            frame.ext = ext;
            let back = CanFrame::from(&WireMsg::from(&frame));
            prop_assert_eq!(back.id, id);
            prop_assert_eq!(back.len as usize, payload.len());
            prop_assert_eq!(back.payload(), &payload[..]);
            prop_assert_eq!(back.rtr, rtr);
            prop_assert_eq!(back.ext, ext);
        }
    }
}
