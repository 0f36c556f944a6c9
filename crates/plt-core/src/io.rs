//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Line-oriented source and sink seams for the processing loop."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
//! The core never touches files. Concrete adapters (see the `plt-datalog`
//! crate) implement these traits; the processing loop only pulls lines and
//! pushes lines.

use std::io;

/// Pull side of the pipeline: yields the next raw telemetry line, or `None`
/// once the stream is exhausted.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Push side of the pipeline: accepts one output line at a time.
pub trait LineSink {
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

impl LineSource for std::vec::IntoIter<String> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.next())
    }
}

impl LineSink for Vec<String> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}
