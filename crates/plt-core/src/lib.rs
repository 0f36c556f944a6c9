//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Streaming annotation core for power-line telemetry."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
//! Streaming processor for power-line telemetry readings.
//!
//! Raw lines flow in through a [`LineSource`], become [`TelemetryRecord`]s,
//! update the bounded [`HistoryWindow`], and come back out annotated with
//! moving averages and anomaly diagnostics through a [`LineSink`].

pub mod anomaly;
pub mod errors;
pub mod history;
pub mod io;
pub mod processor;
pub mod record;
pub mod reports;

pub use errors::{ParseError, Result, TelemetryError};
pub use history::HistoryWindow;
pub use io::{LineSink, LineSource};
pub use processor::{MovingAverage, PowerlineProcessor};
pub use record::TelemetryRecord;
pub use reports::RunReport;
