//! ---
//! plt_section: "02-io-adapters"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "File-backed implementations of the line source and sink seams."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
//! The processing core only knows [`LineSource`] and [`LineSink`]; these
//! adapters bind those seams to plain files on disk, one telemetry reading
//! or annotation per line.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use plt_core::{LineSink, LineSource};
use tracing::debug;

/// Reads a telemetry data log line by line.
#[derive(Debug)]
pub struct DataLogReader {
    reader: BufReader<File>,
}

impl DataLogReader {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("Reading telemetry from {}", path.display());
        Ok(Self {
            reader: BufReader::new(file),
        })
    }
}

impl LineSource for DataLogReader {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Writes annotated telemetry lines, one per `emit`, newline-terminated.
pub struct DataLogWriter {
    writer: BufWriter<File>,
}

impl DataLogWriter {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!("Writing annotated telemetry to {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Flush buffered output. Dropping the writer also flushes, but silently;
    /// call this to observe write failures.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl LineSink for DataLogWriter {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }
}
