//! Reading server logs from disk

use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Server log reader
pub struct LogFile;

impl LogFile {
    /// Read a log file into lines
    ///
    /// Invalid UTF-8 is replaced rather than rejected, a leading BOM is
    /// dropped and both `\n` and `\r\n` line endings are accepted.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use farlog_parser::LogFile;
    ///
    /// let lines = LogFile::read("logs/log00.txt").unwrap();
    /// println!("Read {} lines", lines.len());
    /// ```
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let bytes = Self::read_bytes(path)?;
        Ok(Self::decode(&bytes))
    }

    /// Raw log content, for callers that also fingerprint the file
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        debug!("Reading server log: {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| Error::LogUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    /// Decode raw log content into lines, replacing invalid UTF-8
    pub fn decode(bytes: &[u8]) -> Vec<String> {
        Self::split(&String::from_utf8_lossy(bytes))
    }

    /// Split log text into owned lines
    pub fn split(content: &str) -> Vec<String> {
        content
            .strip_prefix('\u{feff}')
            .unwrap_or(content)
            .lines()
            .map(str::to_string)
            .collect()
    }
}
