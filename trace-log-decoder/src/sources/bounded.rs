//! Bounded reads from a continuously producing stream
//!
//! A live device never signals end of input, so reading stops after a fixed
//! number of line reads. A read that times out still counts against the budget
//! and yields an empty line, which the record decoder rejects.

use super::{read_line_lossy, LineRead, LineSource};
use crate::types::Result;
use std::io::BufRead;

/// Line source that performs at most `max_lines` reads
pub struct BoundedSource<R: BufRead> {
    reader: R,
    max_lines: usize,
    reads: usize,
    timeouts: usize,
    description: String,
}

impl<R: BufRead> BoundedSource<R> {
    pub fn new(reader: R, max_lines: usize, description: impl Into<String>) -> Self {
        Self {
            reader,
            max_lines,
            reads: 0,
            timeouts: 0,
            description: description.into(),
        }
    }

    /// Number of reads performed so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of reads that timed out or found no data
    pub fn timeouts(&self) -> usize {
        self.timeouts
    }

    /// Access the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R: BufRead> Iterator for BoundedSource<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reads >= self.max_lines {
            return None;
        }
        self.reads += 1;

        match read_line_lossy(&mut self.reader) {
            Ok(LineRead::Line(line)) => Some(Ok(line)),
            Ok(LineRead::TimedOut) | Ok(LineRead::Eof) => {
                self.timeouts += 1;
                log::trace!("Read {} of {} returned no data", self.reads, self.max_lines);
                Some(Ok(String::new()))
            }
            Err(e) => Some(Err(e)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.max_lines - self.reads;
        (remaining, Some(remaining))
    }
}

impl<R: BufRead> LineSource for BoundedSource<R> {
    fn describe(&self) -> String {
        format!("{} (up to {} lines)", self.description, self.max_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufReader, Cursor, Read};

    /// Reader that times out on every other call
    struct FlakyReader {
        chunks: Vec<&'static [u8]>,
        calls: usize,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 || self.chunks.is_empty() {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
            }
            let chunk = self.chunks.remove(0);
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_stops_at_budget() {
        let reader = Cursor::new(b"1\n2\n3\n4\n".to_vec());
        let source = BoundedSource::new(reader, 2, "test");
        let lines: Vec<String> = source.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["1", "2"]);
    }

    #[test]
    fn test_exhausted_stream_yields_empty_lines_until_budget() {
        let reader = Cursor::new(b"1\n".to_vec());
        let mut source = BoundedSource::new(reader, 3, "test");
        let lines: Vec<String> = source.by_ref().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["1", "", ""]);
        assert_eq!(source.reads(), 3);
        assert_eq!(source.timeouts(), 2);
    }

    #[test]
    fn test_timeouts_do_not_end_iteration() {
        let reader = BufReader::new(FlakyReader {
            chunks: vec![b"1.0;1;a;out;1\n", b"2.0;1;a;out;0\n"],
            calls: 0,
        });
        let source = BoundedSource::new(reader, 4, "flaky");
        assert_eq!(source.size_hint(), (4, Some(4)));

        let lines: Vec<String> = source.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["1.0;1;a;out;1", "", "2.0;1;a;out;0", ""]);
    }

    #[test]
    fn test_describe_includes_budget() {
        let source = BoundedSource::new(Cursor::new(Vec::new()), 20, "/dev/ttyACM0");
        assert_eq!(source.describe(), "/dev/ttyACM0 (up to 20 lines)");
    }
}
