//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Anomaly rules evaluated against single records or record sequences."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
//! Anomaly rules come in two capability shapes: [`RecordRule`] looks at one
//! record, [`SequenceRule`] looks at an ordered newest-first sequence. Every
//! rule is stateless and returns either `None` or a fixed-format diagnostic
//! line.

use chrono::Duration;

use crate::record::TelemetryRecord;

/// Lower bound of the accepted voltage band (inclusive).
const VOLTAGE_MIN_V: f64 = 475.0;
/// Upper bound of the accepted voltage band (inclusive).
const VOLTAGE_MAX_V: f64 = 485.0;
/// Largest tolerated step between adjacent samples.
const MAX_SAMPLE_STEP_MS: i64 = 1_500;

/// A rule evaluated against a single telemetry record.
pub trait RecordRule {
    /// Returns a diagnostic message when the record is anomalous.
    fn check(&self, record: &TelemetryRecord) -> Option<String>;
}

/// A rule evaluated against an ordered, newest-first sequence of records.
pub trait SequenceRule {
    /// Returns a diagnostic message for the first anomalous adjacent pair,
    /// scanning newest to oldest. Sequences shorter than two records are
    /// never anomalous.
    fn check(&self, records: &[TelemetryRecord]) -> Option<String>;
}

/// Flags negative real power.
pub struct PowerRule;

impl RecordRule for PowerRule {
    fn check(&self, record: &TelemetryRecord) -> Option<String> {
        if record.power < 0.0 {
            Some(format!("* Anomaly - kW < 0.0 (kW = {})", record.power))
        } else {
            None
        }
    }
}

/// Flags voltage outside the 480 V +/- 5 V band. Both bounds are inclusive.
pub struct VoltageRule;

impl RecordRule for VoltageRule {
    fn check(&self, record: &TelemetryRecord) -> Option<String> {
        if (VOLTAGE_MIN_V..=VOLTAGE_MAX_V).contains(&record.voltage) {
            None
        } else {
            Some(format!(
                "* Anomaly - V outside range of 480 V +/- 5.0V (V={})",
                record.voltage
            ))
        }
    }
}

/// Flags negative line current.
pub struct CurrentRule;

impl RecordRule for CurrentRule {
    fn check(&self, record: &TelemetryRecord) -> Option<String> {
        if record.current < 0.0 {
            Some(format!("* Anomaly - I < 0.0 (I = {})", record.current))
        } else {
            None
        }
    }
}

/// Flags adjacent samples more than 1.5 s apart.
///
/// The positive-delta guard keeps an out-of-order pair from also being
/// reported as a time gap; that case belongs to [`OutOfOrderRule`].
pub struct TimeGapRule;

impl SequenceRule for TimeGapRule {
    fn check(&self, records: &[TelemetryRecord]) -> Option<String> {
        let max_delta = Duration::milliseconds(MAX_SAMPLE_STEP_MS);

        for pair in records.windows(2) {
            let delta = pair[0].timestamp - pair[1].timestamp;
            if delta > max_delta && delta > Duration::zero() {
                return Some(format!(
                    "* Anomaly - time gap detected > 1.5 s ({} s)",
                    delta_seconds(delta)
                ));
            }
        }

        None
    }
}

/// Flags an adjacent pair whose newer sample carries the older timestamp.
pub struct OutOfOrderRule;

impl SequenceRule for OutOfOrderRule {
    fn check(&self, records: &[TelemetryRecord]) -> Option<String> {
        for pair in records.windows(2) {
            if pair[0].timestamp - pair[1].timestamp < Duration::zero() {
                return Some("* Anomaly - time stamps out of order".to_string());
            }
        }

        None
    }
}

/// Renders a delta as signed seconds with fractional precision.
fn delta_seconds(delta: Duration) -> f64 {
    delta
        .num_microseconds()
        .map(|us| us as f64 / 1_000_000.0)
        .unwrap_or_else(|| delta.num_milliseconds() as f64 / 1_000.0)
}
