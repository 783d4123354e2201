//! Record decoding
//!
//! Turns one raw trace line into a [`TraceEvent`]. The line must split on `;`
//! into exactly five fields and the first field must parse as a float. Every
//! other field is passed through untouched; numeric interpretation of the value
//! field is left to the channel that consumes it.

use crate::types::{Rejected, TraceEvent, FIELD_COUNT, FIELD_SEPARATOR};

/// Decode a single trace line
///
/// An empty line (the result of a timed-out read) is rejected with an arity of
/// zero. Decoding has no side effects.
///
/// # Example
/// ```
/// use trace_log_decoder::record::decode_line;
///
/// let event = decode_line("1.5;3;blinky;out;output: 1").unwrap();
/// assert_eq!(event.time, 1.5);
/// assert_eq!(event.entity_name, "blinky");
/// assert_eq!(event.raw_value, "output: 1");
///
/// assert!(decode_line("bad;line").is_err());
/// ```
pub fn decode_line(line: &str) -> Result<TraceEvent, Rejected> {
    if line.is_empty() {
        return Err(Rejected::arity(0));
    }

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(Rejected::arity(fields.len()));
    }

    let time = fields[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| Rejected::bad_time())?;

    Ok(TraceEvent {
        time,
        entity_id: fields[1].to_string(),
        entity_name: fields[2].to_string(),
        port_name: fields[3].to_string(),
        raw_value: fields[4].to_string(),
    })
}

/// Split a line into its raw fields without validating it
///
/// Used by dump tooling that wants to show exactly what arrived.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).collect()
}
