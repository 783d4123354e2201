//! End-to-end decoding scenarios through the public API

use std::io::{Cursor, Write};
use trace_log_decoder::record::decode_line;
use trace_log_decoder::{
    BoundedSource, Channel, DecoderError, Extraction, PlotStyle, RejectReason, TraceConfig,
    TraceDecoder,
};

fn digital_input_channel() -> Channel {
    Channel::new("digitalInput", "out")
        .with_extraction(Extraction::Direct)
        .with_equals(0)
        .with_style(PlotStyle::Scatter)
}

fn decode(config: TraceConfig, raw: &[&str]) -> trace_log_decoder::TraceCapture {
    let decoder = TraceDecoder::new(config).unwrap();
    decoder
        .decode_lines(raw.iter().map(|l| Ok(l.to_string())))
        .unwrap()
}

#[test]
fn labeled_value_is_accepted() {
    let capture = decode(
        TraceConfig::new().add_channel(Channel::new("blinky", "out")),
        &["1.5;3;blinky;out;output: 1"],
    );
    let series = capture.series("blinky/out").unwrap();
    assert_eq!(series.points().collect::<Vec<_>>(), vec![(1.5, 1)]);
}

#[test]
fn equality_predicate_accepts_matching_value() {
    let capture = decode(
        TraceConfig::new().add_channel(digital_input_channel()),
        &["2.0;4;digitalInput;out;0"],
    );
    let series = capture.series("digitalInput/out").unwrap();
    assert_eq!(series.points().collect::<Vec<_>>(), vec![(2.0, 0)]);
}

#[test]
fn equality_predicate_rejects_other_value() {
    let capture = decode(
        TraceConfig::new().add_channel(digital_input_channel()),
        &["2.0;4;digitalInput;out;1"],
    );
    assert!(capture.series("digitalInput/out").unwrap().is_empty());
    assert_eq!(capture.stats.events_decoded, 1);
    assert_eq!(capture.stats.accepted, 0);
}

#[test]
fn malformed_line_is_rejected_before_matching() {
    let rejected = decode_line("bad;line").unwrap_err();
    assert_eq!(rejected.reason, RejectReason::MalformedArity { fields: 2 });

    let capture = decode(
        TraceConfig::new()
            .add_channel(Channel::new("blinky", "out"))
            .add_channel(digital_input_channel()),
        &["bad;line"],
    );
    assert!(capture.is_empty());
    assert_eq!(capture.stats.rejected_arity, 1);
    assert_eq!(capture.stats.events_decoded, 0);
}

#[test]
fn window_clip_keeps_each_channels_own_count() {
    let mut file = tempfile::NamedTempFile::new().unwrap();

    // blinky: 1000 samples, 50 strictly inside (500, 600)
    for i in 0..475 {
        writeln!(file, "{};1;blinky;out;output: {}", i, i % 2).unwrap();
    }
    for k in 0..50 {
        writeln!(file, "{};1;blinky;out;output: {}", 500.5 + k as f64 * 1.9, k % 2).unwrap();
    }
    for k in 0..475 {
        writeln!(file, "{};1;blinky;out;output: {}", 600 + k, k % 2).unwrap();
    }

    // generator: 800 samples, 42 strictly inside; values count up from 0
    let mut value = 0;
    for k in 0..400 {
        writeln!(file, "{};2;generator;out;generator_out: {}", k, value).unwrap();
        value += 1;
    }
    for k in 0..42 {
        writeln!(file, "{};2;generator;out;generator_out: {}", 501 + 2 * k, value).unwrap();
        value += 1;
    }
    for k in 0..358 {
        writeln!(file, "{};2;generator;out;generator_out: {}", 600 + k, value).unwrap();
        value += 1;
    }
    file.flush().unwrap();

    let config = TraceConfig::new()
        .add_channel(Channel::new("blinky", "out"))
        .add_channel(Channel::new("generator", "out").with_style(PlotStyle::Scatter))
        .with_window(500.0, 600.0);
    let decoder = TraceDecoder::new(config).unwrap();
    let capture = decoder.decode_file(file.path()).unwrap();

    assert_eq!(capture.channels[0].matched, 1000);
    assert_eq!(capture.channels[1].matched, 800);

    let blinky = capture.series("blinky/out").unwrap();
    assert_eq!(blinky.times().len(), 50);
    assert_eq!(blinky.values().len(), 50);
    assert!(blinky.times().iter().all(|t| *t > 500.0 && *t < 600.0));
    assert_eq!(blinky.values(), (0..50).map(|i| i % 2).collect::<Vec<i64>>().as_slice());

    let generator = capture.series("generator/out").unwrap();
    assert_eq!(generator.len(), 42);
    assert!(generator.times().iter().all(|t| *t > 500.0 && *t < 600.0));
    // Values are the first 42 accepted, not the ones logged inside the window
    assert_eq!(generator.values(), (0..42).collect::<Vec<i64>>().as_slice());
}

#[test]
fn bounded_stream_tolerates_empty_reads() {
    let stream = Cursor::new(
        b"garbage from reset\n1.0;3;blinky;out;output: 1\n\n2.0;3;blinky;out;output: 0\n".to_vec(),
    );
    let source = BoundedSource::new(stream, 6, "test stream");

    let decoder =
        TraceDecoder::new(TraceConfig::new().add_channel(Channel::new("blinky", "out"))).unwrap();
    let capture = decoder.decode_source(source).unwrap();

    let series = capture.series("blinky/out").unwrap();
    assert_eq!(series.times(), &[1.0, 2.0]);
    assert_eq!(series.values(), &[1, 0]);
    assert_eq!(capture.stats.lines_read, 6);
    assert_eq!(capture.stats.rejected_arity, 4);
}

#[test]
fn missing_log_file_is_fatal() {
    let decoder =
        TraceDecoder::new(TraceConfig::new().add_channel(Channel::new("blinky", "out"))).unwrap();
    let result = decoder.decode_file(std::path::Path::new("/nonexistent/blinkyLog.csv"));
    assert!(matches!(result, Err(DecoderError::SourceUnavailable(_))));
}
