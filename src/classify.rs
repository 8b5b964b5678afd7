//! Line classifier and record parser.
//!
//! Every line coming off the device falls into exactly one of four kinds:
//!
//! - `SSID,RSSI,CH,Band,MAC,Encryption` - header, starts a new scan batch
//! - `"ssid",rssi,ch,band,mac,enc` - one scanned access point
//! - `I (1234) wifi: ...` - ESP-IDF style log output (E/W/I prefix)
//! - anything else - noise, dropped
//!
//! Classification never fails. Malformed data lines are not errors, they
//! simply do not produce a record.

use crate::record::{SCAN_HEADER, WifiRecord};

/// Severity taken from the first letter of a device log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
}

impl LogLevel {
    /// Detect the severity prefix of a line, if it has one.
    pub fn from_prefix(line: &str) -> Option<Self> {
        match line.chars().next()? {
            'E' => Some(LogLevel::Error),
            'W' => Some(LogLevel::Warning),
            'I' => Some(LogLevel::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
        }
    }
}

/// A device log line, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

/// The classification of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Header row: a new scan batch begins.
    BatchStart,
    /// A fully parsed scan result.
    DataLine(WifiRecord),
    /// Device log output (error, warning or info).
    LogLine(LogLine),
    /// Anything else; silently dropped.
    Unrecognized,
}

impl LineKind {
    /// Short name used in trace output.
    pub fn name(&self) -> &'static str {
        match self {
            LineKind::BatchStart => "batch-start",
            LineKind::DataLine(_) => "data",
            LineKind::LogLine(_) => "log",
            LineKind::Unrecognized => "unrecognized",
        }
    }
}

/// Classify a single line (surrounding whitespace already stripped).
pub fn classify(line: &str) -> LineKind {
    if line.starts_with(SCAN_HEADER) {
        return LineKind::BatchStart;
    }

    if let Some(record) = parse_record(line) {
        return LineKind::DataLine(record);
    }

    if let Some(level) = LogLevel::from_prefix(line) {
        return LineKind::LogLine(LogLine {
            level,
            text: line.to_string(),
        });
    }

    LineKind::Unrecognized
}

/// Parse a data line into a record in a single pass.
///
/// Returns `None` unless every field has the expected shape:
/// a quoted SSID followed by exactly five comma separated fields
/// (signed RSSI, channel, band, MAC, encryption).
pub fn parse_record(line: &str) -> Option<WifiRecord> {
    // SSID sits between the first two quotes, and the line opens with one
    let after_open = line.strip_prefix('"')?;
    let close = after_open.find('"')?;
    let ssid = &after_open[..close];
    if !is_ssid(ssid) {
        return None;
    }

    let rest = after_open[close + 1..].strip_prefix(',')?;
    let fields: Vec<&str> = rest.split(',').map(str::trim).collect();
    let [rssi, channel, band, mac, encryption] = fields.as_slice() else {
        return None;
    };

    let signal_strength_dbm = parse_rssi(rssi)?;
    let channel = parse_channel(channel)?;

    if !is_band(band) || !is_mac(mac) || !is_encryption(encryption) {
        return None;
    }

    Some(WifiRecord {
        ssid: ssid.to_string(),
        signal_strength_dbm,
        channel,
        band: band.to_string(),
        mac_address: mac.to_string(),
        encryption: encryption.to_string(),
    })
}

fn is_ssid(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || c == '-' || c == '_')
}

/// Signed decimal integer: optional leading `-`, then digits.
fn parse_rssi(s: &str) -> Option<i32> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if !is_digits(digits) {
        return None;
    }
    s.parse().ok()
}

fn parse_channel(s: &str) -> Option<u32> {
    if !is_digits(s) {
        return None;
    }
    s.parse().ok()
}

/// Numeric frequency immediately followed by the unit, e.g. `2.4GHz`.
fn is_band(s: &str) -> bool {
    let Some(value) = s.strip_suffix("GHz") else {
        return false;
    };
    value.chars().any(|c| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Six colon separated pairs of hex digits.
fn is_mac(s: &str) -> bool {
    let groups: Vec<&str> = s.split(':').collect();
    groups.len() == 6
        && groups
            .iter()
            .all(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_encryption(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '+' || c == '-' || c == '_')
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(line: &str) -> WifiRecord {
        match classify(line) {
            LineKind::DataLine(record) => record,
            other => panic!("Expected DataLine for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_header_is_batch_start() {
        assert_eq!(classify(SCAN_HEADER), LineKind::BatchStart);
    }

    #[test]
    fn test_header_matches_as_prefix() {
        assert_eq!(
            classify("SSID,RSSI,CH,Band,MAC,Encryption,Extra"),
            LineKind::BatchStart
        );
    }

    #[test]
    fn test_parse_data_line() {
        let record = data(r#""MyNetwork",-42,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2"#);
        assert_eq!(record.ssid, "MyNetwork");
        assert_eq!(record.signal_strength_dbm, -42);
        assert_eq!(record.channel, 6);
        assert_eq!(record.band, "2.4GHz");
        assert_eq!(record.mac_address, "aa:bb:cc:dd:ee:ff");
        assert_eq!(record.encryption, "WPA2");
    }

    #[test]
    fn test_ssid_with_spaces_hyphens_underscores() {
        let record = data(r#""Cafe Guest-2_4",-71,11,2.4GHz,AA:BB:CC:00:11:22,WPA2-PSK"#);
        assert_eq!(record.ssid, "Cafe Guest-2_4");
        assert_eq!(record.encryption, "WPA2-PSK");
    }

    #[test]
    fn test_encryption_with_plus() {
        let record = data(r#""Home",-55,36,5GHz,de:ad:be:ef:00:01,WPA2+WPA3"#);
        assert_eq!(record.encryption, "WPA2+WPA3");
        assert_eq!(record.band, "5GHz");
    }

    #[test]
    fn test_round_trip_to_line() {
        let line = r#""Net1",-40,1,2.4GHz,11:22:33:44:55:66,WPA2"#;
        assert_eq!(data(line).to_line(), line);
    }

    #[test]
    fn test_round_trip_ignores_whitespace_around_fields() {
        let record = data(r#""Net1", -40 , 1,2.4GHz ,11:22:33:44:55:66, WPA2"#);
        assert_eq!(
            record.to_line(),
            r#""Net1",-40,1,2.4GHz,11:22:33:44:55:66,WPA2"#
        );
    }

    #[test]
    fn test_non_numeric_rssi_is_unrecognized() {
        assert_eq!(
            classify(r#""Net",abc,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2"#),
            LineKind::Unrecognized
        );
    }

    #[test]
    fn test_negative_channel_is_unrecognized() {
        assert_eq!(
            classify(r#""Net",-40,-6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2"#),
            LineKind::Unrecognized
        );
    }

    #[test]
    fn test_rssi_overflow_is_unrecognized() {
        assert_eq!(
            classify(r#""Net",-99999999999,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2"#),
            LineKind::Unrecognized
        );
    }

    #[test]
    fn test_wrong_field_count_is_unrecognized() {
        assert!(parse_record(r#""Net",-40,6,2.4GHz,aa:bb:cc:dd:ee:ff"#).is_none());
        assert!(parse_record(r#""Net",-40,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2,x"#).is_none());
    }

    #[test]
    fn test_missing_quotes_is_unrecognized() {
        assert!(parse_record("Net,-40,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2").is_none());
        assert!(parse_record(r#""Net,-40,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2"#).is_none());
    }

    #[test]
    fn test_empty_ssid_is_rejected() {
        assert!(parse_record(r#""",-40,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2"#).is_none());
    }

    #[test]
    fn test_ssid_with_punctuation_is_rejected() {
        assert!(parse_record(r#""Joe's",-40,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA2"#).is_none());
    }

    #[test]
    fn test_bad_band_is_rejected() {
        assert!(parse_record(r#""Net",-40,6,2.4,aa:bb:cc:dd:ee:ff,WPA2"#).is_none());
        assert!(parse_record(r#""Net",-40,6,GHz,aa:bb:cc:dd:ee:ff,WPA2"#).is_none());
        assert!(parse_record(r#""Net",-40,6,2.4 GHz,aa:bb:cc:dd:ee:ff,WPA2"#).is_none());
    }

    #[test]
    fn test_bad_mac_is_rejected() {
        assert!(parse_record(r#""Net",-40,6,2.4GHz,aa:bb:cc:dd:ee,WPA2"#).is_none());
        assert!(parse_record(r#""Net",-40,6,2.4GHz,aa:bb:cc:dd:ee:zz,WPA2"#).is_none());
        assert!(parse_record(r#""Net",-40,6,2.4GHz,aabb:cc:dd:ee:ff:0,WPA2"#).is_none());
    }

    #[test]
    fn test_bad_encryption_is_rejected() {
        assert!(parse_record(r#""Net",-40,6,2.4GHz,aa:bb:cc:dd:ee:ff,WPA/2"#).is_none());
        assert!(parse_record(r#""Net",-40,6,2.4GHz,aa:bb:cc:dd:ee:ff,"#).is_none());
    }

    #[test]
    fn test_log_lines() {
        for (line, level) in [
            ("E (1234) wifi: scan failed", LogLevel::Error),
            ("W (88) wifi: retrying", LogLevel::Warning),
            ("I (5) main: scan done", LogLevel::Info),
        ] {
            match classify(line) {
                LineKind::LogLine(log) => {
                    assert_eq!(log.level, level);
                    assert_eq!(log.text, line);
                }
                other => panic!("Expected LogLine, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_lowercase_prefix_is_not_a_log_line() {
        assert_eq!(classify("info: hello"), LineKind::Unrecognized);
    }

    #[test]
    fn test_noise_is_unrecognized() {
        assert_eq!(classify(""), LineKind::Unrecognized);
        assert_eq!(classify("ets Jun  8 2016 00:22:57"), LineKind::Unrecognized);
        assert_eq!(classify("rst:0x1 (POWERON_RESET)"), LineKind::Unrecognized);
    }

    #[test]
    fn test_classification_is_total() {
        let inputs = [
            "",
            "\"",
            "\"\"",
            "\",",
            ",,,,,",
            "\"a\",",
            "\"a\",,,,,",
            "\"\u{e9}t\u{e9}\",-1,1,1GHz,00:00:00:00:00:00,x",
            "SSID",
            "E",
            "\u{fffd}\u{fffd}",
        ];
        for input in inputs {
            let kind = classify(input);
            assert!(!kind.name().is_empty());
        }
    }

    #[test]
    fn test_unicode_ssid_is_accepted() {
        let record = data("\"Caf\u{e9}\",-60,1,2.4GHz,00:11:22:33:44:55,Open");
        assert_eq!(record.ssid, "Caf\u{e9}");
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
        assert_eq!(LogLevel::Warning.as_str(), "WARN");
        assert_eq!(LogLevel::Info.as_str(), "INFO");
    }
}
