//! Per-channel series accumulation
//!
//! A [`Series`] holds the (time, value) pairs accepted for one channel in input
//! order. Times and values are kept in two vectors of equal length so they can
//! be handed to a renderer as-is.

use crate::channel::Channel;
use crate::types::{DecoderError, Result, TraceEvent};
use serde::{Deserialize, Serialize};

/// Open time interval `(lo, hi)` used to clip a series after decoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub lo: f64,
    pub hi: f64,
}

impl TimeWindow {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// True if `time` lies strictly inside the window
    pub fn contains(&self, time: f64) -> bool {
        self.lo < time && time < self.hi
    }
}

/// Accumulated samples for one channel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    times: Vec<f64>,
    values: Vec<i64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the event's time and extracted value
    ///
    /// The caller has already matched the event against `channel`. A value that
    /// cannot be extracted is reported as [`DecoderError::UnparseableValue`] and
    /// the series is left unchanged.
    pub fn accept(&mut self, channel: &Channel, event: &TraceEvent) -> Result<()> {
        let value = channel.extraction.extract(&event.raw_value).ok_or_else(|| {
            DecoderError::UnparseableValue {
                channel: channel.display_label(),
                time: event.time,
                raw_value: event.raw_value.clone(),
            }
        })?;

        self.push(event.time, value);
        Ok(())
    }

    /// Append a sample directly
    pub fn push(&mut self, time: f64, value: i64) {
        self.times.push(time);
        self.values.push(value);
    }

    /// Clip the series to a time window
    ///
    /// Times are filtered by the window; values are truncated to the first N
    /// entries, where N is the number of times that survived. Values are not
    /// re-paired with the times they were logged with, so a series whose first
    /// samples fall outside the window ends up showing its earliest values.
    pub fn clip_window(&mut self, window: &TimeWindow) {
        self.times.retain(|t| window.contains(*t));
        self.values.truncate(self.times.len());
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over (time, value) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, i64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Smallest and largest finite time, if any
    ///
    /// `inf` and `NaN` parse as valid times but cannot be placed on an axis,
    /// so they are left out of the range.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.times
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold(None, |range, t| match range {
                None => Some((t, t)),
                Some((lo, hi)) => Some((f64::min(lo, t), f64::max(hi, t))),
            })
    }

    /// Smallest and largest value, if any
    pub fn value_range(&self) -> Option<(i64, i64)> {
        let min = *self.values.iter().min()?;
        let max = *self.values.iter().max()?;
        Some((min, max))
    }
}
