//! Transport configuration

use serde::{Deserialize, Serialize};

/// Transport configuration
///
/// Buffer capacities can be tuned according to bus load and available
/// memory, but only before `begin`; the rings are fixed-capacity once
/// allocated. Pin assignments pass straight through to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Receive ring capacity in frames
    pub rx_capacity: usize,

    /// Transmit queue capacity in frames
    pub tx_capacity: usize,

    /// Transmit pin assignment, forwarded to the driver
    pub tx_pin: u8,

    /// Receive pin assignment, forwarded to the driver
    pub rx_pin: u8,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            rx_capacity: 64,
            tx_capacity: 16,
            tx_pin: 1,
            rx_pin: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.rx_capacity, 64);
        assert_eq!(config.tx_capacity, 16);
    }

    #[test]
    fn test_deserialize() {
        let config: TransportConfig =
            serde_json::from_str(r#"{"rx_capacity":128,"tx_capacity":8,"tx_pin":4,"rx_pin":5}"#)
                .unwrap();
        assert_eq!(config.rx_capacity, 128);
        assert_eq!(config.rx_pin, 5);
    }
}
