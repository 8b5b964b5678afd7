//! The read / classify / accumulate / display loop.
//!
//! One line at a time: pull it from the source, classify it, feed the
//! accumulator, then ask whether the batch is ready now that the line has
//! been handled. The loop runs until the source reports end of stream or a
//! connection error.

use std::io::Write;

use tracing::{info, trace};

use crate::batch::BatchAccumulator;
use crate::classify::{LineKind, classify};
use crate::error::MonitorError;
use crate::screen::Screen;
use crate::source::LineSource;

/// Counters collected over one monitoring session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    /// Non-blank lines received.
    pub lines_read: usize,
    /// Lines that produced a record.
    pub records_parsed: usize,
    /// Device log lines shown to the operator.
    pub log_lines: usize,
    /// Lines that matched nothing.
    pub dropped_lines: usize,
    /// Header lines seen.
    pub batches_started: usize,
    /// Times the table was redrawn.
    pub displays: usize,
}

pub struct Monitor<W: Write> {
    screen: Screen<W>,
    batches: BatchAccumulator,
    summary: MonitorSummary,
}

impl<W: Write> Monitor<W> {
    pub fn new(screen: Screen<W>) -> Self {
        Self {
            screen,
            batches: BatchAccumulator::new(),
            summary: MonitorSummary::default(),
        }
    }

    /// Drive the loop until the source is exhausted.
    ///
    /// Connection failures are returned to the caller untouched; the source
    /// is not closed here.
    pub fn run<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<MonitorSummary, MonitorError> {
        while let Some(line) = source.next_line()? {
            if line.is_empty() {
                continue;
            }
            let pending = source.bytes_pending()?;
            self.process_line(&line, pending)?;
        }

        info!(
            source = source.name(),
            lines = self.summary.lines_read,
            displays = self.summary.displays,
            "input stream ended"
        );
        Ok(self.summary())
    }

    /// Handle one non-blank line. Returns whether the table was redrawn.
    pub fn process_line(&mut self, line: &str, more_pending: bool) -> Result<bool, MonitorError> {
        self.summary.lines_read += 1;

        let kind = classify(line);
        trace!(kind = kind.name(), line, "classified");

        let log = match &kind {
            LineKind::BatchStart => None,
            LineKind::DataLine(_) => {
                self.summary.records_parsed += 1;
                None
            }
            LineKind::LogLine(log) => {
                self.summary.log_lines += 1;
                Some(log.clone())
            }
            LineKind::Unrecognized => {
                self.summary.dropped_lines += 1;
                None
            }
        };

        self.batches.apply(kind);
        self.summary.batches_started = self.batches.batches_started();

        let displayed = self.batches.ready_to_display(more_pending);
        if displayed {
            let rows = self.batches.sorted_for_display();
            self.screen.show_batch(&rows)?;
            self.summary.displays += 1;
            info!(
                batch = self.batches.batches_started(),
                networks = rows.len(),
                "scan table refreshed"
            );
        }

        // Logs go below the table so a redraw does not wipe them.
        if let Some(log) = log {
            self.screen.show_log(&log)?;
        }

        Ok(displayed)
    }

    pub fn batches(&self) -> &BatchAccumulator {
        &self.batches
    }

    pub fn summary(&self) -> MonitorSummary {
        self.summary.clone()
    }

    pub fn screen_mut(&mut self) -> &mut Screen<W> {
        &mut self.screen
    }

    pub fn into_screen(self) -> Screen<W> {
        self.screen
    }
}
