//! Byte sources that yield complete device lines.
//!
//! A [`LineSource`] hides where the device output comes from (a serial
//! port or a captured stream) and answers the one question the batch
//! logic needs: is more input already waiting right now?

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Stdin};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info, warn};

use crate::error::MonitorError;

/// Default serial device for the current platform.
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM13";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A blocking producer of decoded, trimmed lines.
pub trait LineSource {
    /// Wait for the next complete line.
    ///
    /// Returns `Ok(None)` once the stream has ended. Having no data yet is
    /// not an error; implementations keep waiting.
    fn next_line(&mut self) -> Result<Option<String>, MonitorError>;

    /// Whether more input is buffered and can be read without waiting.
    fn bytes_pending(&mut self) -> Result<bool, MonitorError>;

    /// Release the underlying connection. Further reads return `Ok(None)`.
    fn close(&mut self);

    /// Human readable name of the source, used in messages.
    fn name(&self) -> &str;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Result<Option<String>, MonitorError> {
        (**self).next_line()
    }

    fn bytes_pending(&mut self) -> Result<bool, MonitorError> {
        (**self).bytes_pending()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Decode one raw line: invalid UTF-8 is dropped, surrounding whitespace
/// (including the line terminator) is stripped.
pub fn decode_line(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text.trim().to_string()
}

// ---------------------------------------------------------------------------
// Line framing
// ---------------------------------------------------------------------------

/// Splits an arbitrary chunked byte stream into `\n` terminated lines.
///
/// Bytes after the last newline stay buffered until the rest of the line
/// arrives, so a partial line is never handed out.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Take the next complete line, if one is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = self.buf.drain(..=end).collect();
        Some(decode_line(&raw))
    }

    /// Whether any bytes (complete line or not) are still held.
    pub fn has_buffered(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Hand out whatever is left as a final line, e.g. at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.buf);
        Some(decode_line(&raw))
    }
}

// ---------------------------------------------------------------------------
// Serial port
// ---------------------------------------------------------------------------

/// Identification of the one serial device to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Read timeout handed to the serial driver.
    pub timeout: Duration,
    /// Sleep between polls while the device is silent.
    pub poll_interval: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// The two things the serial source needs from a port: a timed read and
/// the number of bytes the driver already holds.
pub trait SerialIo: Read {
    fn bytes_waiting(&self) -> io::Result<u32>;
}

impl SerialIo for Box<dyn SerialPort> {
    fn bytes_waiting(&self) -> io::Result<u32> {
        self.bytes_to_read().map_err(io::Error::from)
    }
}

/// Line source backed by a serial port.
pub struct SerialSource<P: SerialIo = Box<dyn SerialPort>> {
    port_name: String,
    port: Option<P>,
    framer: LineFramer,
    poll_interval: Duration,
}

impl SerialSource {
    /// Open the configured port.
    pub fn open(config: &SerialConfig) -> Result<Self, MonitorError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.timeout)
            .open()
            .map_err(|source| MonitorError::Open {
                port: config.port.clone(),
                source,
            })?;

        info!(port = %config.port, baud = config.baud_rate, "serial port opened");

        Ok(Self::with_port(port, &config.port, config.poll_interval))
    }
}

impl<P: SerialIo> SerialSource<P> {
    /// Wrap an already opened port.
    pub fn with_port(port: P, port_name: &str, poll_interval: Duration) -> Self {
        Self {
            port_name: port_name.to_string(),
            port: Some(port),
            framer: LineFramer::new(),
            poll_interval,
        }
    }

    fn disconnected(&self, source: io::Error) -> MonitorError {
        MonitorError::Disconnected {
            port: self.port_name.clone(),
            source,
        }
    }
}

impl<P: SerialIo> LineSource for SerialSource<P> {
    fn next_line(&mut self) -> Result<Option<String>, MonitorError> {
        let mut chunk = [0u8; 1024];
        loop {
            if let Some(line) = self.framer.next_line() {
                return Ok(Some(line));
            }

            let Some(port) = self.port.as_mut() else {
                return Ok(None);
            };

            match port.read(&mut chunk) {
                Ok(0) => thread::sleep(self.poll_interval),
                Ok(n) => self.framer.push(&chunk[..n]),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut
                            | io::ErrorKind::WouldBlock
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    thread::sleep(self.poll_interval)
                }
                Err(e) => {
                    warn!(port = %self.port_name, error = %e, "serial read failed");
                    return Err(self.disconnected(e));
                }
            }
        }
    }

    fn bytes_pending(&mut self) -> Result<bool, MonitorError> {
        if self.framer.has_buffered() {
            return Ok(true);
        }
        let Some(port) = self.port.as_ref() else {
            return Ok(false);
        };
        let waiting = port.bytes_waiting().map_err(|e| self.disconnected(e))?;
        Ok(waiting > 0)
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            debug!(port = %self.port_name, "serial port closed");
        }
        if let Some(partial) = self.framer.finish() {
            debug!(port = %self.port_name, partial = %partial, "unterminated line discarded");
        }
    }

    fn name(&self) -> &str {
        &self.port_name
    }
}

// ---------------------------------------------------------------------------
// Captured streams
// ---------------------------------------------------------------------------

/// Line source over any reader, e.g. a capture file or stdin.
///
/// "Pending" means the read buffer still holds unread bytes, which mirrors
/// what the serial driver reports for a live port.
pub struct ReaderSource<R: Read> {
    name: String,
    reader: Option<BufReader<R>>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name,
            reader: Some(BufReader::new(reader)),
        }
    }

    fn input_error(&self, source: io::Error) -> MonitorError {
        MonitorError::Input {
            path: PathBuf::from(&self.name),
            source,
        }
    }
}

impl ReaderSource<File> {
    /// Open a capture file.
    pub fn open(path: &Path) -> Result<Self, MonitorError> {
        let file = File::open(path).map_err(|source| MonitorError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "reading captured device output");
        Ok(Self::new(file, path.display().to_string()))
    }
}

impl ReaderSource<Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin(), "-")
    }
}

impl<R: Read> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>, MonitorError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut raw = Vec::new();
        let read = reader.read_until(b'\n', &mut raw);
        match read {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(decode_line(&raw))),
            Err(source) => Err(self.input_error(source)),
        }
    }

    fn bytes_pending(&mut self) -> Result<bool, MonitorError> {
        Ok(self
            .reader
            .as_ref()
            .is_some_and(|reader| !reader.buffer().is_empty()))
    }

    fn close(&mut self) {
        self.reader = None;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
