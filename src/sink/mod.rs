//! Append-only destinations for harvested website lines.
//!
//! Results and diagnostics are deliberately separate channels: sinks
//! carry one website URL per line and nothing else, so the output stays
//! parseable while progress goes to stderr via tracing.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::app::Result;

/// Append-only line destination shared by all workers.
///
/// Each write flushes before returning so partial output survives an
/// interrupted run.
pub trait Sink: Send {
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Workers serialize writes through this mutex so lines never interleave.
pub type SharedSink = Arc<Mutex<dyn Sink>>;

/// Writes result lines to stdout.
pub struct StdoutSink {
    out: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StdoutSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes result lines to a file, flushing after every line.
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            file: File::create(path)?,
        })
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_appends_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("websites.txt");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write_line("https://example.com/").unwrap();
        sink.write_line("https://example.org/").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "https://example.com/\nhttps://example.org/\n");
    }

    #[test]
    fn test_file_sink_flushes_each_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("websites.txt");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write_line("https://example.com/").unwrap();

        // Visible before the sink is dropped.
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "https://example.com/\n");
    }
}
