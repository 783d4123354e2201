//! Log file replay
//!
//! Reads a captured trace file once, in file order.

use super::{read_line_lossy, LineRead, LineSource};
use crate::types::{DecoderError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Line source over a finite log file
pub struct FileSource {
    path: PathBuf,
    reader: BufReader<File>,
    finished: bool,
}

impl FileSource {
    /// Open a trace log file
    ///
    /// A missing or unreadable file is reported as
    /// [`DecoderError::SourceUnavailable`].
    pub fn open(path: &Path) -> Result<Self> {
        log::info!("Opening trace log: {:?}", path);

        if !path.exists() {
            return Err(DecoderError::SourceUnavailable(format!(
                "trace log not found: {:?}",
                path
            )));
        }

        let file = File::open(path).map_err(|e| {
            DecoderError::SourceUnavailable(format!("failed to open {:?}: {}", path, e))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            finished: false,
        })
    }
}

impl Iterator for FileSource {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match read_line_lossy(&mut self.reader) {
            Ok(LineRead::Line(line)) => Some(Ok(line)),
            // Files do not time out; treat it like any other empty read
            Ok(LineRead::TimedOut) => Some(Ok(String::new())),
            Ok(LineRead::Eof) => {
                log::debug!("Reached end of {:?}", self.path);
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl LineSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
