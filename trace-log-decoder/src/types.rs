//! Core types for the trace log decoder library
//!
//! This module defines the fundamental types the decoder produces when processing
//! trace lines. A decoded line is a [`TraceEvent`]; a line that does not have the
//! expected record shape is a [`Rejected`] value, never an error.

use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Number of `;`-separated fields in a well-formed trace record
pub const FIELD_COUNT: usize = 5;

/// Field separator used by the trace logger
pub const FIELD_SEPARATOR: char = ';';

/// Errors that can occur during decoding
///
/// Malformed records are not represented here: they are rejected by
/// [`crate::record::decode_line`] and silently skipped by the driver.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Channel '{channel}' matched at t={time} but value {raw_value:?} is not numeric")]
    UnparseableValue {
        /// Label of the channel that accepted the event
        channel: String,
        /// Time of the offending event
        time: f64,
        /// The value field as logged
        raw_value: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One decoded trace record
///
/// Produced from a line of the form
/// `<time>;<entity id>;<entity name>;<port name>;<value>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    /// Simulation or wall-clock time in seconds
    pub time: f64,
    /// Entity identifier token (kept, not used for filtering)
    pub entity_id: String,
    /// Name of the component that logged the transition
    pub entity_name: String,
    /// Port that produced the value
    pub port_name: String,
    /// Value field as logged, e.g. `"0"` or `"output: 1"`
    pub raw_value: String,
}

/// Why a line was not decoded into an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Splitting on `;` did not give exactly five fields
    MalformedArity {
        /// Number of fields found (0 for an empty line)
        fields: usize,
    },
    /// The first field is not a floating-point number
    BadTime,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MalformedArity { fields } => {
                write!(f, "expected {} fields, found {}", FIELD_COUNT, fields)
            }
            RejectReason::BadTime => write!(f, "time field is not a number"),
        }
    }
}

/// A line the decoder refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected {
    pub reason: RejectReason,
}

impl Rejected {
    pub fn arity(fields: usize) -> Self {
        Self {
            reason: RejectReason::MalformedArity { fields },
        }
    }

    pub fn bad_time() -> Self {
        Self {
            reason: RejectReason::BadTime,
        }
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected: {}", self.reason)
    }
}
