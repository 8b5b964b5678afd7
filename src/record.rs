//! Wi-Fi scan record type.
//!
//! One `WifiRecord` corresponds to one data line emitted by the scanning
//! device:
//!
//! ```text
//! "MyNetwork",-42,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2
//! ```

use std::fmt;

/// Header row the device prints at the start of every scan cycle.
pub const SCAN_HEADER: &str = "SSID,RSSI,CH,Band,MAC,Encryption";

/// Column headers used when rendering a batch as a table.
pub const DISPLAY_HEADERS: [&str; 6] = [
    "SSID",
    "RSSI (dBm)",
    "Channel",
    "Band",
    "MAC Address",
    "Encryption",
];

/// A single access point seen during one scan cycle.
///
/// Only ever built from a fully parsed data line; there is no partially
/// filled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiRecord {
    pub ssid: String,
    pub signal_strength_dbm: i32,
    pub channel: u32,
    pub band: String,
    pub mac_address: String,
    pub encryption: String,
}

impl WifiRecord {
    /// Reassemble the record into the device's canonical line format.
    pub fn to_line(&self) -> String {
        self.to_string()
    }

    /// The record as display cells, in `DISPLAY_HEADERS` order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.ssid.clone(),
            self.signal_strength_dbm.to_string(),
            self.channel.to_string(),
            self.band.clone(),
            self.mac_address.clone(),
            self.encryption.clone(),
        ]
    }
}

impl fmt::Display for WifiRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\",{},{},{},{},{}",
            self.ssid,
            self.signal_strength_dbm,
            self.channel,
            self.band,
            self.mac_address,
            self.encryption
        )
    }
}
