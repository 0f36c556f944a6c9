//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Run summary reporting for completed annotation passes."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::Result;

/// Summary of one complete annotation run, suitable for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub lines_processed: u64,
    pub anomalies_detected: u64,
}

impl RunReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)?;

        info!("Run report exported to {}", path.display());
        Ok(())
    }
}
