//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! [`TraceDecoder`] holds a validated [`TraceConfig`] and turns a sequence of raw
//! lines into a [`TraceCapture`]: one [`Series`] per configured channel.

use crate::channel::Channel;
use crate::config::TraceConfig;
use crate::record::decode_line;
use crate::series::Series;
use crate::sources::{FileSource, LineSource};
use crate::types::{RejectReason, Rejected, Result, TraceEvent};
use serde::Serialize;
use std::path::Path;

/// The main decoder struct - entry point for all decoding operations
pub struct TraceDecoder {
    config: TraceConfig,
}

impl TraceDecoder {
    /// Create a decoder from a configuration
    ///
    /// # Returns
    /// * `Err(DecoderError::InvalidConfig)` if the configuration has no channels,
    ///   duplicate labels or an inverted window
    pub fn new(config: TraceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Decode a sequence of raw lines
    ///
    /// Each line is decoded once and offered to every channel; an event may land
    /// in several series if channels overlap. Malformed lines are skipped and
    /// counted. A matched event whose value is not numeric aborts the decode
    /// with [`crate::DecoderError::UnparseableValue`]. Source errors propagate.
    ///
    /// # Example
    /// ```
    /// use trace_log_decoder::{Channel, TraceConfig, TraceDecoder};
    ///
    /// let config = TraceConfig::new().add_channel(Channel::new("blinky", "out"));
    /// let decoder = TraceDecoder::new(config).unwrap();
    ///
    /// let lines = ["1.5;3;blinky;out;output: 1", "bad;line"]
    ///     .iter()
    ///     .map(|l| Ok(l.to_string()));
    /// let capture = decoder.decode_lines(lines).unwrap();
    ///
    /// let series = capture.series("blinky/out").unwrap();
    /// assert_eq!(series.times(), &[1.5]);
    /// assert_eq!(series.values(), &[1]);
    /// assert_eq!(capture.stats.rejected_arity, 1);
    /// ```
    pub fn decode_lines<I>(&self, lines: I) -> Result<TraceCapture>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let mut capture = TraceCapture::for_channels(&self.config.channels);

        for line in lines {
            let line = line?;
            let event = match capture.stats.record(decode_line(&line)) {
                Some(event) => event,
                None => continue,
            };

            let mut matched_any = false;
            for entry in capture.channels.iter_mut() {
                if !entry.channel.matches(&event) {
                    continue;
                }
                entry.series.accept(&entry.channel, &event)?;
                entry.matched += 1;
                capture.stats.accepted += 1;
                matched_any = true;
            }

            if matched_any && self.config.echo_matches {
                log::info!("{}", line);
            }
        }

        if let Some(window) = &self.config.window {
            for entry in capture.channels.iter_mut() {
                entry.series.clip_window(window);
                log::debug!(
                    "Channel {}: {} of {} samples inside ({}, {})",
                    entry.channel.display_label(),
                    entry.series.len(),
                    entry.matched,
                    window.lo,
                    window.hi
                );
            }
        }

        log::debug!(
            "Decoded {} lines: {} events, {} samples, {} rejected",
            capture.stats.lines_read,
            capture.stats.events_decoded,
            capture.stats.accepted,
            capture.stats.rejected()
        );

        Ok(capture)
    }

    /// Decode every line of a log file
    pub fn decode_file(&self, path: &Path) -> Result<TraceCapture> {
        self.decode_source(FileSource::open(path)?)
    }

    /// Decode every line a source yields
    pub fn decode_source<S: LineSource>(&self, source: S) -> Result<TraceCapture> {
        log::info!("Decoding trace from {}", source.describe());
        self.decode_lines(source)
    }

    /// Lazily decode lines into events, skipping malformed ones
    pub fn events<I>(lines: I) -> EventIterator<I::IntoIter>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        EventIterator {
            lines: lines.into_iter(),
            stats: DecodeStats::default(),
        }
    }
}

/// Counters collected while decoding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    /// Raw lines consumed from the source
    pub lines_read: usize,
    /// Lines decoded into events
    pub events_decoded: usize,
    /// Lines rejected for not having five fields
    pub rejected_arity: usize,
    /// Lines rejected for an unparseable time
    pub rejected_time: usize,
    /// Samples appended across all channels (before windowing)
    pub accepted: usize,
}

impl DecodeStats {
    /// Total rejected lines
    pub fn rejected(&self) -> usize {
        self.rejected_arity + self.rejected_time
    }

    /// Count one decode outcome and pass the event through
    fn record(&mut self, outcome: std::result::Result<TraceEvent, Rejected>) -> Option<TraceEvent> {
        self.lines_read += 1;
        match outcome {
            Ok(event) => {
                self.events_decoded += 1;
                Some(event)
            }
            Err(rejected) => {
                match rejected.reason {
                    RejectReason::MalformedArity { .. } => self.rejected_arity += 1,
                    RejectReason::BadTime => self.rejected_time += 1,
                }
                log::trace!("Line {} {}", self.lines_read, rejected);
                None
            }
        }
    }
}

/// Series accumulated for one channel
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSeries {
    pub channel: Channel,
    pub series: Series,
    /// Events the channel accepted before windowing
    pub matched: usize,
}

/// Result of decoding: one series per configured channel, in configuration order
#[derive(Debug, Clone, Serialize)]
pub struct TraceCapture {
    pub channels: Vec<ChannelSeries>,
    pub stats: DecodeStats,
}

impl TraceCapture {
    fn for_channels(channels: &[Channel]) -> Self {
        Self {
            channels: channels
                .iter()
                .map(|channel| ChannelSeries {
                    channel: channel.clone(),
                    series: Series::new(),
                    matched: 0,
                })
                .collect(),
            stats: DecodeStats::default(),
        }
    }

    /// Look up a channel's series by display label
    pub fn series(&self, label: &str) -> Option<&Series> {
        self.channels
            .iter()
            .find(|entry| entry.channel.display_label() == label)
            .map(|entry| &entry.series)
    }

    /// True if no channel collected any sample
    pub fn is_empty(&self) -> bool {
        self.channels.iter().all(|entry| entry.series.is_empty())
    }

    /// Overall (min, max) time across all series
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.channels
            .iter()
            .filter_map(|entry| entry.series.time_range())
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }

    /// Overall (min, max) value across all series
    pub fn value_range(&self) -> Option<(i64, i64)> {
        self.channels
            .iter()
            .filter_map(|entry| entry.series.value_range())
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }
}

/// Iterator that decodes raw lines into events
///
/// Rejected lines are counted in [`EventIterator::stats`] and skipped; source
/// errors are passed through.
pub struct EventIterator<I>
where
    I: Iterator<Item = Result<String>>,
{
    lines: I,
    stats: DecodeStats,
}

impl<I> EventIterator<I>
where
    I: Iterator<Item = Result<String>>,
{
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }
}

impl<I> Iterator for EventIterator<I>
where
    I: Iterator<Item = Result<String>>,
{
    type Item = Result<TraceEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    if let Some(event) = self.stats.record(decode_line(&line)) {
                        return Some(Ok(event));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
