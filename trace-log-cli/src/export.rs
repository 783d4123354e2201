//! Series export (JSON / CSV)

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use trace_log_decoder::TraceCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => bail!("Unsupported export format: {:?} (use .json or .csv)", path),
        }
    }
}

/// Write the capture to `path`, choosing the format from its extension
pub fn export_capture(capture: &TraceCapture, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path)?;
    log::info!("Exporting series to {:?} ({:?})", path, format);

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::Json => write_json(capture, &mut writer)?,
        ExportFormat::Csv => write_csv(capture, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(capture: &TraceCapture, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, capture)?;
    writeln!(writer)?;
    Ok(())
}

/// One `channel,time,value` row per sample, channels in configuration order
pub fn write_csv<W: Write>(capture: &TraceCapture, writer: &mut W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["channel", "time", "value"])?;
    for entry in &capture.channels {
        let label = entry.channel.display_label();
        for (time, value) in entry.series.points() {
            let (time, value) = (time.to_string(), value.to_string());
            writer.write_record([label.as_str(), time.as_str(), value.as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trace_log_decoder::{Channel, TraceConfig, TraceDecoder};

    fn capture() -> TraceCapture {
        let config = TraceConfig::new()
            .add_channel(Channel::new("blinky", "out"))
            .add_channel(Channel::new("generator", "out").with_label("gen, input"));
        TraceDecoder::new(config)
            .unwrap()
            .decode_lines(
                [
                    "1.5;1;blinky;out;output: 1",
                    "2;2;generator;out;generator_out: 0",
                ]
                .iter()
                .map(|l| Ok(l.to_string())),
            )
            .unwrap()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.json")).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("a.CSV")).unwrap(), ExportFormat::Csv);
        assert!(ExportFormat::from_path(Path::new("a.txt")).is_err());
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&capture(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "channel,time,value\nblinky/out,1.5,1\n\"gen, input\",2,0\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&capture(), &mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(doc["channels"][0]["channel"]["entity"], "blinky");
        assert_eq!(doc["channels"][0]["series"]["times"][0], 1.5);
        assert_eq!(doc["channels"][0]["series"]["values"][0], 1);
        assert_eq!(doc["channels"][1]["channel"]["extraction"], "trailing-token");
        assert_eq!(doc["stats"]["accepted"], 2);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        export_capture(&capture(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("channel,time,value\n"));
    }
}
