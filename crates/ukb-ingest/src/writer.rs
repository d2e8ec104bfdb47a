//! Streaming table output in the input's dialect.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::{IngestError, Result};

/// Row-at-a-time writer so decoded output streams in input order.
pub struct TableWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl TableWriter {
    /// Create the output file with the given delimiter.
    pub fn create(path: &Path, delimiter: u8) -> Result<Self> {
        let writer = WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|error| IngestError::Csv {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn write_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.writer.write_record(row).map_err(|error| IngestError::Csv {
            path: self.path.clone(),
            message: error.to_string(),
        })
    }

    /// Flush buffered rows to disk.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|source| IngestError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
