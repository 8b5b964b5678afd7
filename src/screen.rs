//! Operator-facing terminal output.
//!
//! Everything the operator sees goes through [`Screen`], which writes to
//! any `io::Write` so tests can capture it.

use std::io::{self, Write};

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::classify::{LogLevel, LogLine};
use crate::error::MonitorError;
use crate::record::WifiRecord;
use crate::render::render_batch;

pub const TITLE: &str = "Live Wi-Fi Scan Data";

pub struct Screen<W: Write> {
    out: W,
}

impl Screen<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Wipe the display and home the cursor.
    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    pub fn connecting(&mut self, port: &str, baud_rate: u32) -> io::Result<()> {
        writeln!(
            self.out,
            "Attempting to connect to serial port {} at {}...",
            port.bold(),
            baud_rate.to_string().bold()
        )?;
        self.out.flush()
    }

    pub fn connected(&mut self) -> io::Result<()> {
        self.clear()?;
        writeln!(
            self.out,
            "{} Waiting for the first scan data...",
            "Connection successful.".green()
        )?;
        self.out.flush()
    }

    /// Redraw the whole screen with an ordered batch.
    pub fn show_batch(&mut self, records: &[WifiRecord]) -> io::Result<()> {
        self.clear()?;
        writeln!(self.out, "{}", TITLE.bold().cyan())?;
        writeln!(self.out, "{}", "-".repeat(30))?;
        writeln!(self.out, "{}", render_batch(records))?;
        self.out.flush()
    }

    pub fn show_log(&mut self, log: &LogLine) -> io::Result<()> {
        let label = match log.level {
            LogLevel::Error => "Log Message:".red(),
            LogLevel::Warning => "Log Message:".yellow(),
            LogLevel::Info => "Log Message:".normal(),
        };
        writeln!(self.out, "{label} [{}] {}", log.level.as_str(), log.text)?;
        self.out.flush()
    }

    pub fn connection_error(&mut self, err: &MonitorError) -> io::Result<()> {
        self.clear()?;
        let name = err.source_name();
        writeln!(self.out, "{} {err}", "Connection error:".red().bold())?;
        match err {
            MonitorError::Open { .. } | MonitorError::Disconnected { .. } => writeln!(
                self.out,
                "Ensure the correct port ({name}) is available and the device is connected."
            )?,
            MonitorError::Input { .. } => {
                writeln!(self.out, "Check that {name} exists and is readable.")?
            }
            MonitorError::Screen(_) => {
                writeln!(self.out, "Check that the terminal is still attached.")?
            }
        }
        self.out.flush()
    }

    pub fn closing(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Closing serial connection.")?;
        self.out.flush()
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
