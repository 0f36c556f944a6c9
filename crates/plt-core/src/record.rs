//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Typed power-line telemetry record and line parsing."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Timestamp layouts accepted on input, most common first.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// One measurement sampled from the power line.
///
/// Constructed once per input line and immutable thereafter; held only
/// inside the history window until evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub timestamp: NaiveDateTime,
    /// Real power in kW.
    pub power: f64,
    /// Line voltage in V.
    pub voltage: f64,
    /// Line current in A.
    pub current: f64,
}

impl TelemetryRecord {
    /// Parse a raw `"<timestamp>, <power>, <voltage>, <current>"` line.
    ///
    /// Whitespace around fields is tolerated; anything else about the shape
    /// is not.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() != 4 {
            return Err(ParseError::FieldCount {
                found: tokens.len(),
            });
        }

        Ok(Self {
            timestamp: parse_timestamp(tokens[0])?,
            power: parse_number("power", tokens[1])?,
            voltage: parse_number("voltage", tokens[2])?,
            current: parse_number("current", tokens[3])?,
        })
    }
}

impl FromStr for TelemetryRecord {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Self::parse(line)
    }
}

fn parse_timestamp(token: &str) -> Result<NaiveDateTime, ParseError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
        .ok_or_else(|| ParseError::Timestamp {
            token: token.to_string(),
        })
}

fn parse_number(field: &'static str, token: &str) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::Number {
        field,
        token: token.to_string(),
    })
}
