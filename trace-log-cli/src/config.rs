//! Configuration loading, presets and command-line overrides

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trace_log_decoder::sources::serial::{DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT_MS};
use trace_log_decoder::{Channel, Extraction, PlotStyle, SerialSettings, TimeWindow, TraceConfig};

/// Line budget used when dumping raw lines from a device
pub const DEFAULT_DUMP_LINES: usize = 20;

/// Main application configuration (loaded from a TOML file or a preset)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub window: Option<TimeWindow>,
    #[serde(default)]
    pub echo_matches: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where trace lines come from
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Captured log file, read in full
    File { path: PathBuf },
    /// Live serial stream, read up to a line budget
    Serial(SerialSettings),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// SVG file to write; a timestamped name is used when absent
    pub plot: Option<PathBuf>,
    /// JSON or CSV file to export the series to
    pub export: Option<PathBuf>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_title() -> String {
    "Blinky Output".to_string()
}

fn default_width() -> u32 {
    1500
}

fn default_height() -> u32 {
    500
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plot: None,
            export: None,
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Built-in configurations for the blinky example model
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Blinky board over serial: LED output and button presses
    Embedded,
    /// Blinky simulation log: LED output and generator input in (500, 600)
    Simulation,
}

impl AppConfig {
    /// Build one of the built-in configurations
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Embedded => Self {
                source: SourceConfig::Serial(
                    SerialSettings::new("/dev/ttyACM0")
                        .with_baud_rate(DEFAULT_BAUD_RATE)
                        .with_timeout_ms(DEFAULT_TIMEOUT_MS)
                        .with_max_lines(100),
                ),
                channels: vec![
                    Channel::new("blinky", "out").with_label("output"),
                    Channel::new("digitalInput", "out")
                        .with_label("input")
                        .with_extraction(Extraction::Direct)
                        .with_equals(0)
                        .with_style(PlotStyle::Scatter),
                ],
                window: None,
                echo_matches: true,
                output: OutputConfig::default(),
            },
            Preset::Simulation => Self {
                source: SourceConfig::File {
                    path: PathBuf::from("blinkyLog.csv"),
                },
                channels: vec![
                    Channel::new("blinky", "out").with_label("output"),
                    Channel::new("generator", "out")
                        .with_label("input")
                        .with_style(PlotStyle::Scatter),
                ],
                window: Some(TimeWindow::new(500.0, 600.0)),
                echo_matches: false,
                output: OutputConfig::default(),
            },
        }
    }

    /// Decoder configuration for this application configuration
    pub fn trace_config(&self) -> TraceConfig {
        TraceConfig {
            channels: self.channels.clone(),
            window: self.window,
            echo_matches: self.echo_matches,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .trace_config()
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [source]
            kind = "file"
            path = "blinkyLog.csv"

            [[channels]]
            entity = "blinky"
            port = "out"

            [[channels]]
            label = "button"
            entity = "digitalInput"
            port = "out"
            extraction = "direct"
            equals = 0
            style = "scatter"

            [window]
            lo = 500.0
            hi = 600.0

            [output]
            plot = "blinky.svg"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::File {
                path: PathBuf::from("blinkyLog.csv")
            }
        );
        assert_eq!(config.channels.len(), 2);
        assert_eq!(config.channels[0].display_label(), "blinky/out");
        assert_eq!(config.channels[0].extraction, Extraction::TrailingToken);
        assert_eq!(config.channels[1].extraction, Extraction::Direct);
        assert_eq!(config.channels[1].equals, Some(0));
        assert_eq!(config.channels[1].style, PlotStyle::Scatter);
        assert_eq!(config.window, Some(TimeWindow::new(500.0, 600.0)));
        assert_eq!(config.output.title, "Blinky Output");
        assert_eq!(config.output.width, 1500);
        assert!(config.trace_config().validate().is_ok());
    }

    #[test]
    fn test_serial_source_defaults() {
        let toml_content = r#"
            [source]
            kind = "serial"
            device = "/dev/ttyUSB0"

            [[channels]]
            entity = "blinky"
            port = "out"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        match config.source {
            SourceConfig::Serial(settings) => {
                assert_eq!(settings.device, "/dev/ttyUSB0");
                assert_eq!(settings.baud_rate, 9600);
                assert_eq!(settings.timeout_ms, 1000);
                assert_eq!(settings.max_lines, 100);
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [Preset::Embedded, Preset::Simulation] {
            let config = AppConfig::preset(preset);
            assert!(config.trace_config().validate().is_ok(), "{:?}", preset);
        }

        let embedded = AppConfig::preset(Preset::Embedded);
        assert!(embedded.echo_matches);
        assert_eq!(embedded.channels[1].equals, Some(0));

        let simulation = AppConfig::preset(Preset::Simulation);
        assert_eq!(simulation.window, Some(TimeWindow::new(500.0, 600.0)));
    }

    #[test]
    fn test_load_config_rejects_empty_channels() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"[source]\nkind = \"file\"\npath = \"trace.csv\"\n",
        )
        .unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
