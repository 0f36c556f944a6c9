//! ---
//! plt_section: "03-observability"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Structured logging bootstrap for the telemetry tools."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

/// Initialize a baseline tracing subscriber for the annotation tools.
///
/// Defaults to `INFO`; `RUST_LOG` overrides per the usual env-filter
/// directives. Safe to call more than once.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize with an explicit default level. `RUST_LOG` still wins.
pub fn init_with_level(level: Level) {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(subscriber_fmt::layer())
        .try_init();
}
