use crate::aggregator::RateRows;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the latency and success datasets.
///
/// Each rate's latency rows form one block terminated by a blank line, which plotting tools use to
/// split the data into one series per rate. Success rows are one line per rate.
pub struct DatasetWriter<L, S> {
    latency: L,
    success: S,
}

impl DatasetWriter<BufWriter<File>, BufWriter<File>> {
    /// Truncates (or creates) both datasets.
    pub fn create(latency: &Path, success: &Path) -> io::Result<Self> {
        Ok(Self::new(
            BufWriter::new(File::create(latency)?),
            BufWriter::new(File::create(success)?),
        ))
    }
}

impl<L: Write, S: Write> DatasetWriter<L, S> {
    pub fn new(latency: L, success: S) -> Self {
        Self { latency, success }
    }

    pub fn write_rate(&mut self, rows: &RateRows) -> io::Result<()> {
        for row in &rows.latency {
            writeln!(self.latency, "{row}")?;
        }
        writeln!(self.latency)?;
        writeln!(self.success, "{}", rows.success)
    }

    pub fn finish(mut self) -> io::Result<(L, S)> {
        self.latency.flush()?;
        self.success.flush()?;
        Ok((self.latency, self.success))
    }
}
