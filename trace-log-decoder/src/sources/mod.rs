//! Trace line sources (log file, live serial stream)
//!
//! A source yields raw lines one at a time with their terminators removed.
//! File sources stop when the file is exhausted; live sources stop after a
//! fixed read budget and yield an empty line for every read that timed out.

use crate::types::Result;
use std::io::{BufRead, ErrorKind};

pub mod bounded;
pub mod file;
pub mod serial;

// Re-export source types
pub use bounded::BoundedSource;
pub use file::FileSource;
pub use serial::{list_ports, PortInfo, SerialSource, SerialSettings};

/// Common trait for all line sources
pub trait LineSource: Iterator<Item = Result<String>> {
    /// Human-readable description of where lines come from
    fn describe(&self) -> String;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Outcome of a single line read
#[derive(Debug, PartialEq)]
pub(crate) enum LineRead {
    /// A line arrived (possibly partial if the read timed out mid-line)
    Line(String),
    /// The read timed out before any byte arrived
    TimedOut,
    /// The reader is exhausted
    Eof,
}

/// Read one line, decoding invalid UTF-8 lossily and stripping `\n` / `\r\n`
pub(crate) fn read_line_lossy<R: BufRead>(reader: &mut R) -> Result<LineRead> {
    let mut buf = Vec::new();
    match reader.read_until(b'\n', &mut buf) {
        Ok(0) => Ok(LineRead::Eof),
        Ok(_) => Ok(LineRead::Line(into_line(buf))),
        Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
            if buf.is_empty() {
                Ok(LineRead::TimedOut)
            } else {
                Ok(LineRead::Line(into_line(buf)))
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn into_line(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
