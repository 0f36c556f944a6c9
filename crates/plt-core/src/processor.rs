//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Streaming processor: parse, window, average, rule checks, formatting."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::{
    anomaly::{
        CurrentRule, OutOfOrderRule, PowerRule, RecordRule, SequenceRule, TimeGapRule, VoltageRule,
    },
    errors::{Result, TelemetryError},
    history::HistoryWindow,
    io::{LineSink, LineSource},
    record::TelemetryRecord,
    reports::RunReport,
};

/// Moving-average horizon in seconds. The history window approximates this
/// span; see [`HistoryWindow`] for the eviction rule.
const MVA_WINDOW_SECONDS: i64 = 5;

/// Unweighted arithmetic means over the records currently retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverage {
    pub power: f64,
    pub voltage: f64,
    pub current: f64,
}

/// Annotates a stream of power-line telemetry lines.
///
/// Each processed line is echoed with the moving averages of power, voltage,
/// and current appended (once enough recent history exists), and any anomaly
/// diagnostics are returned alongside. Owns the history window exclusively
/// for the duration of a run; strictly sequential, no state survives across
/// processor instances.
pub struct PowerlineProcessor {
    history: HistoryWindow,
    record_rules: Vec<Box<dyn RecordRule>>,
    mva_window: Duration,
}

impl PowerlineProcessor {
    pub fn new() -> Self {
        let mva_window = Duration::seconds(MVA_WINDOW_SECONDS);
        Self {
            history: HistoryWindow::new(mva_window),
            // Evaluation order is part of the output contract.
            record_rules: vec![
                Box::new(PowerRule),
                Box::new(VoltageRule),
                Box::new(CurrentRule),
            ],
            mva_window,
        }
    }

    /// Unweighted means of power, voltage, and current across the window,
    /// regardless of inter-sample spacing. `None` while no record has been
    /// processed yet.
    pub fn calc_mva(&self) -> Option<MovingAverage> {
        if self.history.is_empty() {
            return None;
        }

        let mut mva = MovingAverage {
            power: 0.0,
            voltage: 0.0,
            current: 0.0,
        };
        for record in self.history.iter() {
            mva.power += record.power;
            mva.voltage += record.voltage;
            mva.current += record.current;
        }

        let count = self.history.len() as f64;
        mva.power /= count;
        mva.voltage /= count;
        mva.current /= count;
        Some(mva)
    }

    /// Process one raw telemetry line.
    ///
    /// Returns the annotated output line and the ordered anomaly messages
    /// for that line. Malformed input fails the call; nothing is appended to
    /// the window in that case.
    pub fn process_line(&mut self, line: &str) -> Result<(String, Vec<String>)> {
        let record = TelemetryRecord::parse(line).map_err(|source| TelemetryError::Parse {
            line: line.to_string(),
            source,
        })?;
        self.history.append(record.clone());

        let mva = self.calc_mva();

        let mut anomalies = Vec::new();
        for rule in &self.record_rules {
            if let Some(message) = rule.check(&record) {
                anomalies.push(message);
            }
        }

        let records = self.history.records();

        // Pair checks look at the two most recent samples only, so the same
        // discontinuity is reported once, on the line that introduced it.
        let latest_pair = &records[..records.len().min(2)];
        if let Some(message) = TimeGapRule.check(latest_pair) {
            anomalies.push(message);
        }
        if let Some(message) = OutOfOrderRule.check(latest_pair) {
            anomalies.push(message);
        }

        // Averages are meaningless across a gap anywhere in the window, or
        // before a full window's worth of whole seconds has accumulated.
        let mut output_mva = TimeGapRule.check(records).is_none();
        let span = records[0].timestamp - records[records.len() - 1].timestamp;
        if span.num_seconds() < self.mva_window.num_seconds() {
            output_mva = false;
        }

        let annotated = match mva {
            Some(mva) if output_mva => format!(
                "{}, {:.3}, {:.3}, {:.3}",
                line, mva.power, mva.voltage, mva.current
            ),
            _ => format!("{}, , ,", line),
        };

        Ok((annotated, anomalies))
    }

    /// Pull lines from `source` until exhaustion, pushing each annotated
    /// line and its anomaly messages to `sink`.
    ///
    /// A malformed line halts the run with the offending line in the error;
    /// skipping it silently would corrupt the window's time semantics.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<RunReport>
    where
        S: LineSource,
        K: LineSink,
    {
        let started = Utc::now();
        let mut lines_processed = 0u64;
        let mut anomalies_detected = 0u64;

        while let Some(line) = source.next_line()? {
            let (annotated, anomalies) = self.process_line(&line)?;
            sink.emit(&annotated)?;
            for message in &anomalies {
                warn!("{message}");
                sink.emit(message)?;
            }
            lines_processed += 1;
            anomalies_detected += anomalies.len() as u64;
        }

        let report = RunReport {
            started,
            finished: Utc::now(),
            lines_processed,
            anomalies_detected,
        };
        info!(
            "Annotated {} telemetry lines, {} anomalies detected",
            report.lines_processed, report.anomalies_detected
        );
        Ok(report)
    }
}

impl Default for PowerlineProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> TelemetryRecord {
        TelemetryRecord::parse(line).unwrap()
    }

    #[test]
    fn calc_mva_is_none_before_any_record() {
        let processor = PowerlineProcessor::new();
        assert_eq!(processor.calc_mva(), None);
    }

    #[test]
    fn calc_mva_averages_every_retained_record() {
        let mut processor = PowerlineProcessor::new();
        processor.history.append(record("2018-01-08 14:55:40.152, 1, 2, 3"));
        processor.history.append(record("2018-01-08 14:55:41.152, 1, 2, 3"));
        processor.history.append(record("2018-01-08 14:55:42.152, 2, 3, 4"));
        processor.history.append(record("2018-01-08 14:55:43.152, 4, 5, 6"));
        processor.history.append(record("2018-01-08 14:55:44.152, 4, 5, 6"));
        processor.history.append(record("2018-01-08 14:55:45.152, 4, 5, 6"));

        let mva = processor.calc_mva().unwrap();
        assert!((mva.power - 2.666_666_6).abs() < 1e-6);
        assert!((mva.voltage - 3.666_666_6).abs() < 1e-6);
        assert!((mva.current - 4.666_666_6).abs() < 1e-6);
    }

    #[test]
    fn short_history_suppresses_averages() {
        let mut processor = PowerlineProcessor::new();

        let (first, anomalies) = processor
            .process_line("2018-01-08 14:54:42.630, 441.781, 477.470, 925.254")
            .unwrap();
        assert_eq!(first, "2018-01-08 14:54:42.630, 441.781, 477.470, 925.254, , ,");
        assert!(anomalies.is_empty());

        let (second, anomalies) = processor
            .process_line("2018-01-08 14:54:43.784, 320.249, 475.942, 672.873")
            .unwrap();
        assert_eq!(second, "2018-01-08 14:54:43.784, 320.249, 475.942, 672.873, , ,");
        assert!(anomalies.is_empty());
    }

    #[test]
    fn averages_appear_once_window_is_full() {
        let mut processor = PowerlineProcessor::new();
        let lines = [
            "2018-01-08 14:55:40.152, 1.0, 480.0, 3.0",
            "2018-01-08 14:55:41.152, 1.0, 480.0, 3.0",
            "2018-01-08 14:55:42.152, 2.0, 480.0, 4.0",
            "2018-01-08 14:55:43.152, 4.0, 480.0, 6.0",
            "2018-01-08 14:55:44.152, 4.0, 480.0, 6.0",
        ];
        for line in lines {
            let (annotated, _) = processor.process_line(line).unwrap();
            assert!(annotated.ends_with(", , ,"));
        }

        // Sixth sample brings the window span to five whole seconds.
        let (annotated, anomalies) = processor
            .process_line("2018-01-08 14:55:45.152, 4.0, 480.0, 6.0")
            .unwrap();
        assert_eq!(
            annotated,
            "2018-01-08 14:55:45.152, 4.0, 480.0, 6.0, 2.667, 480.000, 4.667"
        );
        assert!(anomalies.is_empty());
    }

    #[test]
    fn gap_reports_anomaly_and_suppresses_averages() {
        let mut processor = PowerlineProcessor::new();
        processor
            .process_line("2018-01-08 14:54:42.630, 1.0, 480.0, 2.0")
            .unwrap();

        let (annotated, anomalies) = processor
            .process_line("2018-01-08 14:54:45.130, 1.0, 480.0, 2.0")
            .unwrap();

        assert!(annotated.ends_with(", , ,"));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0], "* Anomaly - time gap detected > 1.5 s (2.5 s)");
    }

    #[test]
    fn out_of_order_pair_is_not_also_a_gap() {
        let mut processor = PowerlineProcessor::new();
        processor
            .process_line("2018-01-08 14:54:45.130, 1.0, 480.0, 2.0")
            .unwrap();

        let (_, anomalies) = processor
            .process_line("2018-01-08 14:54:42.630, 1.0, 480.0, 2.0")
            .unwrap();

        assert_eq!(anomalies, vec!["* Anomaly - time stamps out of order"]);
    }

    #[test]
    fn single_record_rules_report_in_fixed_order() {
        let mut processor = PowerlineProcessor::new();
        let (_, anomalies) = processor
            .process_line("2018-01-08 14:54:42.630, -1.0, 490.0, -2.0")
            .unwrap();

        assert_eq!(anomalies.len(), 3);
        assert!(anomalies[0].contains("kW < 0.0"));
        assert!(anomalies[1].contains("V outside range"));
        assert!(anomalies[2].contains("I < 0.0"));
    }

    #[test]
    fn malformed_line_fails_without_touching_the_window() {
        let mut processor = PowerlineProcessor::new();
        let err = processor.process_line("not, telemetry").unwrap_err();
        assert!(matches!(err, TelemetryError::Parse { .. }));
        assert!(processor.history.is_empty());
    }

    #[test]
    fn run_emits_annotated_lines_then_anomalies() {
        let mut processor = PowerlineProcessor::new();
        let mut source = vec![
            "2018-01-08 14:54:42.630, 441.781, 477.470, 925.254".to_string(),
            "2018-01-08 14:54:45.130, -320.249, 475.942, 672.873".to_string(),
        ]
        .into_iter();
        let mut sink: Vec<String> = Vec::new();

        let report = processor.run(&mut source, &mut sink).unwrap();

        assert_eq!(report.lines_processed, 2);
        assert_eq!(report.anomalies_detected, 2);
        assert_eq!(sink.len(), 4);
        assert_eq!(sink[0], "2018-01-08 14:54:42.630, 441.781, 477.470, 925.254, , ,");
        assert_eq!(sink[1], "2018-01-08 14:54:45.130, -320.249, 475.942, 672.873, , ,");
        assert!(sink[2].contains("kW < 0.0"));
        assert!(sink[3].contains("time gap detected"));
    }

    #[test]
    fn run_halts_on_malformed_line() {
        let mut processor = PowerlineProcessor::new();
        let mut source = vec![
            "2018-01-08 14:54:42.630, 441.781, 477.470, 925.254".to_string(),
            "garbage".to_string(),
            "2018-01-08 14:54:43.784, 320.249, 475.942, 672.873".to_string(),
        ]
        .into_iter();
        let mut sink: Vec<String> = Vec::new();

        let err = processor.run(&mut source, &mut sink).unwrap_err();
        assert!(matches!(err, TelemetryError::Parse { .. }));
        // Only the line processed before the failure reached the sink.
        assert_eq!(sink.len(), 1);
    }
}
