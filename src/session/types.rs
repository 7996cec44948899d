use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::session::log::MessageLog;

/// Serial line configuration for a device/port session (baud rate, data bits,
/// stop bits, parity, flow control).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialSessionConfig {
    pub baud: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: SerialParity,
    pub flow_control: FlowControl,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum SerialParity {
    None,
    Odd,
    Even,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

impl Default for SerialSessionConfig {
    fn default() -> Self {
        Self {
            baud: 9600,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
            flow_control: FlowControl::None,
        }
    }
}

/// Direction of a single message record relative to this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Rx,
    Tx,
}

/// Whether a session talks to real hardware or to an in-memory scripted device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Hardware,
    Mock,
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Hardware
    }
}

/// The client-side record of a single device/port: connection state, line
/// configuration, and accumulated message history.
///
/// Created when a port is discovered during a scan, mutated on
/// connect/disconnect and on each send/receive event. Counters always equal
/// the number of Rx/Tx records appended since the last `clear` (the bounded
/// log may have trimmed older records; the counters are authoritative).
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub display_name: String,
    pub connected: bool,
    pub config: SerialSessionConfig,
    pub log: MessageLog,
    pub rx_count: u64,
    pub tx_count: u64,
}

impl Session {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            connected: false,
            config: SerialSessionConfig::default(),
            log: MessageLog::default(),
            rx_count: 0,
            tx_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_9600_8n1() {
        let cfg = SerialSessionConfig::default();
        assert_eq!(cfg.baud, 9600);
        assert_eq!(cfg.data_bits, 8);
        assert_eq!(cfg.stop_bits, 1);
        assert_eq!(cfg.parity, SerialParity::None);
        assert_eq!(cfg.flow_control, FlowControl::None);
    }

    #[test]
    fn parity_round_trips_through_strum() {
        use std::str::FromStr;
        for parity in [SerialParity::None, SerialParity::Odd, SerialParity::Even] {
            let label = parity.to_string();
            assert_eq!(SerialParity::from_str(&label).unwrap(), parity);
        }
    }
}
