//! Channel selection
//!
//! A [`Channel`] picks one (entity, port) pair out of the trace and says how its
//! value field is turned into a number. Matching is exact and case-sensitive.

use crate::types::TraceEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a channel reads the numeric payload out of the value field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extraction {
    /// Last whitespace-separated token, e.g. `"output: 1"` → `1`
    #[default]
    TrailingToken,
    /// Whole field (surrounding whitespace stripped), e.g. `"0"` → `0`
    Direct,
}

impl Extraction {
    /// Extract the integer payload from a raw value field
    pub fn extract(&self, raw_value: &str) -> Option<i64> {
        match self {
            Extraction::TrailingToken => raw_value.split_whitespace().last()?.parse().ok(),
            Extraction::Direct => raw_value.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::TrailingToken => write!(f, "trailing-token"),
            Extraction::Direct => write!(f, "direct"),
        }
    }
}

/// Rendering hint carried with a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    /// Step line, for signals that hold their value between transitions
    #[default]
    Step,
    /// Unconnected markers, for sparse events
    Scatter,
}

/// A configured (entity, port) selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Display name; defaults to `entity/port`
    #[serde(default)]
    pub label: String,
    /// Entity name to match
    pub entity: String,
    /// Port name to match
    pub port: String,
    /// Value extraction strategy
    #[serde(default)]
    pub extraction: Extraction,
    /// Only accept events whose value equals this target
    #[serde(default)]
    pub equals: Option<i64>,
    /// Rendering hint
    #[serde(default)]
    pub style: PlotStyle,
}

impl Channel {
    /// Create a channel with trailing-token extraction and no value predicate
    pub fn new(entity: impl Into<String>, port: impl Into<String>) -> Self {
        let entity = entity.into();
        let port = port.into();
        Self {
            label: format!("{}/{}", entity, port),
            entity,
            port,
            extraction: Extraction::default(),
            equals: None,
            style: PlotStyle::default(),
        }
    }

    /// Builder method: set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder method: set the extraction strategy
    pub fn with_extraction(mut self, extraction: Extraction) -> Self {
        self.extraction = extraction;
        self
    }

    /// Builder method: only accept events whose value equals `target`
    pub fn with_equals(mut self, target: i64) -> Self {
        self.equals = Some(target);
        self
    }

    /// Builder method: set the rendering hint
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    /// Label to display, falling back to `entity/port` when none was configured
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            format!("{}/{}", self.entity, self.port)
        } else {
            self.label.clone()
        }
    }

    /// Check whether an event belongs to this channel
    ///
    /// With an `equals` predicate, a value that cannot be read as an integer is
    /// a non-match rather than an error.
    pub fn matches(&self, event: &TraceEvent) -> bool {
        if event.entity_name != self.entity || event.port_name != self.port {
            return false;
        }

        match self.equals {
            Some(target) => self.extraction.extract(&event.raw_value) == Some(target),
            None => true,
        }
    }
}
