//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Bounded newest-first buffer of recent telemetry records."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
use std::collections::VecDeque;

use chrono::Duration;

use crate::record::TelemetryRecord;

/// Bounded, time-ordered buffer of recent records, newest first (index 0 is
/// the most recently appended record).
///
/// The buffer intends to hold roughly `window` worth of history, but the
/// bound is approximate: eviction measures the incoming record against the
/// *second-oldest* retained record and drops at most one record per append,
/// so the actual span can exceed the window by up to one sample's slack.
/// Downstream output already suppresses averages across detected gaps, so
/// the slack is tolerated rather than corrected.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    records: VecDeque<TelemetryRecord>,
    window: Duration,
}

impl HistoryWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            records: VecDeque::new(),
            window,
        }
    }

    /// Prepend `record`, evicting the oldest retained record once the buffer
    /// already spans the configured window.
    pub fn append(&mut self, record: TelemetryRecord) {
        if self.records.len() < 2 {
            self.records.push_front(record);
            return;
        }

        let second_oldest = &self.records[self.records.len() - 2];
        let evict = record.timestamp - second_oldest.timestamp >= self.window;

        self.records.push_front(record);
        if evict {
            self.records.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Signed span from the oldest to the newest retained record; `None`
    /// while the buffer is empty.
    pub fn span(&self) -> Option<Duration> {
        let newest = self.records.front()?;
        let oldest = self.records.back()?;
        Some(newest.timestamp - oldest.timestamp)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetryRecord> {
        self.records.iter()
    }

    /// Contiguous newest-first view of the retained records.
    pub fn records(&mut self) -> &[TelemetryRecord] {
        self.records.make_contiguous()
    }
}
