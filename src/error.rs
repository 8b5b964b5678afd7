//! Connection-level errors.
//!
//! Per-line parsing problems never show up here; the classifier absorbs
//! them. Everything in this enum ends the monitor loop.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The serial port could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// The serial link failed after it was opened.
    #[error("serial port {port} disconnected: {source}")]
    Disconnected {
        port: String,
        #[source]
        source: io::Error,
    },

    /// A captured input stream could not be opened or read.
    #[error("failed to read input {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the terminal failed.
    #[error("terminal write failed: {0}")]
    Screen(#[from] io::Error),
}

impl MonitorError {
    /// Name of the byte source the error refers to.
    pub fn source_name(&self) -> String {
        match self {
            MonitorError::Open { port, .. } | MonitorError::Disconnected { port, .. } => {
                port.clone()
            }
            MonitorError::Input { path, .. } => path.display().to_string(),
            MonitorError::Screen(_) => "terminal".to_string(),
        }
    }
}
