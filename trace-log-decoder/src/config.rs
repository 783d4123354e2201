//! Decoder configuration types
//!
//! This module defines the configuration needed by the decoder library: which
//! channels to extract and whether to clip them to a time window. Source
//! selection and rendering options live in the application layer.

use crate::channel::Channel;
use crate::series::TimeWindow;
use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for the decoder library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Channels to extract, in output order
    #[serde(default)]
    pub channels: Vec<Channel>,

    /// Optional: clip every series to this window after decoding
    #[serde(default)]
    pub window: Option<TimeWindow>,

    /// Log each raw line that a channel accepts
    #[serde(default)]
    pub echo_matches: bool,
}

impl TraceConfig {
    /// Create a new configuration with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a channel
    pub fn add_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Builder method: set the clipping window
    pub fn with_window(mut self, lo: f64, hi: f64) -> Self {
        self.window = Some(TimeWindow::new(lo, hi));
        self
    }

    /// Builder method: enable or disable echoing of matched lines
    pub fn with_echo_matches(mut self, enabled: bool) -> Self {
        self.echo_matches = enabled;
        self
    }

    /// Check that the configuration can drive a decode
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(DecoderError::InvalidConfig(
                "at least one channel is required".to_string(),
            ));
        }

        let mut labels = HashSet::new();
        for channel in &self.channels {
            if channel.entity.is_empty() || channel.port.is_empty() {
                return Err(DecoderError::InvalidConfig(format!(
                    "channel '{}' needs both an entity and a port",
                    channel.display_label()
                )));
            }
            if !labels.insert(channel.display_label()) {
                return Err(DecoderError::InvalidConfig(format!(
                    "duplicate channel label '{}'",
                    channel.display_label()
                )));
            }
        }

        if let Some(window) = &self.window {
            if !(window.lo < window.hi) {
                return Err(DecoderError::InvalidConfig(format!(
                    "window lower bound {} must be below upper bound {}",
                    window.lo, window.hi
                )));
            }
        }

        Ok(())
    }
}
