//! Scan batch accumulator.
//!
//! Holds the records of the scan cycle currently being received. A header
//! line throws the previous batch away and starts an empty one; data lines
//! append to it. The accumulator never decides on its own that a batch is
//! finished: the caller asks [`BatchAccumulator::ready_to_display`] after
//! every line, passing whether the byte source still has input buffered.

use tracing::{debug, trace};

use crate::classify::LineKind;
use crate::record::WifiRecord;

/// Observable state of the current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// No records since the last header (or since startup).
    Empty,
    /// At least one record; more may still be arriving.
    Accumulating,
}

/// Owner of the current scan batch.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    batch: Vec<WifiRecord>,
    batches_started: usize,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current batch with an empty one.
    pub fn on_batch_start(&mut self) {
        self.batches_started += 1;
        debug!(
            batch = self.batches_started,
            discarded = self.batch.len(),
            "scan batch started"
        );
        self.batch = Vec::new();
    }

    /// Append a record in arrival order. Duplicates are kept.
    pub fn on_data_line(&mut self, record: WifiRecord) {
        trace!(ssid = %record.ssid, rssi = record.signal_strength_dbm, "record appended");
        self.batch.push(record);
    }

    /// Feed one classified line. Log and unrecognized lines leave the
    /// batch untouched.
    pub fn apply(&mut self, kind: LineKind) {
        match kind {
            LineKind::BatchStart => self.on_batch_start(),
            LineKind::DataLine(record) => self.on_data_line(record),
            LineKind::LogLine(_) | LineKind::Unrecognized => {}
        }
    }

    /// True when there is something to show and the source has gone quiet.
    pub fn ready_to_display(&self, more_bytes_pending: bool) -> bool {
        !self.batch.is_empty() && !more_bytes_pending
    }

    /// Copy of the batch ordered by signal strength, strongest first.
    ///
    /// The sort is stable, so records with equal strength keep their
    /// arrival order.
    pub fn sorted_for_display(&self) -> Vec<WifiRecord> {
        let mut rows = self.batch.clone();
        rows.sort_by(|a, b| b.signal_strength_dbm.cmp(&a.signal_strength_dbm));
        rows
    }

    pub fn state(&self) -> BatchState {
        if self.batch.is_empty() {
            BatchState::Empty
        } else {
            BatchState::Accumulating
        }
    }

    /// Records of the current batch in arrival order.
    pub fn records(&self) -> &[WifiRecord] {
        &self.batch
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Number of header lines seen so far.
    pub fn batches_started(&self) -> usize {
        self.batches_started
    }
}
