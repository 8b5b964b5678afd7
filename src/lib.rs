//! # wifiscan-monitor
//!
//! Watch a serial-attached device that periodically prints Wi-Fi scan
//! results, and keep a terminal table of the latest scan up to date.
//!
//! ## Overview
//!
//! The device speaks a simple line protocol:
//! - **Header**: `SSID,RSSI,CH,Band,MAC,Encryption` starts a new scan batch
//! - **Data lines**: one access point each, `"ssid",rssi,ch,band,mac,enc`
//! - **Log lines**: ESP-IDF style output starting with `E`, `W` or `I`
//!
//! Lines are classified one by one, data lines are collected into the
//! current batch, and the batch is redrawn (strongest signal first) as
//! soon as the device stops sending for a moment.
//!
//! ## Example
//!
//! ```
//! use wifiscan_monitor::{BatchAccumulator, classify};
//!
//! let mut batch = BatchAccumulator::new();
//! for line in [
//!     "SSID,RSSI,CH,Band,MAC,Encryption",
//!     r#""Net1",-40,1,2.4GHz,11:22:33:44:55:66,WPA2"#,
//!     r#""Net2",-20,6,5GHz,aa:bb:cc:dd:ee:ff,Open"#,
//! ] {
//!     batch.apply(classify(line));
//! }
//!
//! assert!(batch.ready_to_display(false));
//! let rows = batch.sorted_for_display();
//! assert_eq!(rows[0].ssid, "Net2");
//! ```

pub mod batch;
pub mod classify;
pub mod error;
pub mod monitor;
pub mod record;
pub mod render;
pub mod screen;
pub mod source;

pub use batch::{BatchAccumulator, BatchState};
pub use classify::{LineKind, LogLevel, LogLine, classify, parse_record};
pub use error::MonitorError;
pub use monitor::{Monitor, MonitorSummary};
pub use record::{DISPLAY_HEADERS, SCAN_HEADER, WifiRecord};
pub use render::{render, render_batch};
pub use screen::Screen;
pub use source::{
    LineFramer, LineSource, ReaderSource, SerialConfig, SerialIo, SerialSource, decode_line,
};
