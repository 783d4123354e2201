//! Trace Log Plotter CLI Application
//!
//! This is the command-line interface for the trace log decoder.
//! It uses the trace-log-decoder library and adds:
//! - Configuration files and built-in presets
//! - Source selection (captured log file or live serial device)
//! - SVG plot rendering
//! - Series export (JSON/CSV)
//! - Raw line dumping for bring-up of a new board

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use trace_log_decoder::record::split_fields;
use trace_log_decoder::sources::list_ports;
use trace_log_decoder::{
    FileSource, LineSource, SerialSettings, SerialSource, TimeWindow, TraceCapture, TraceDecoder,
};

mod config;
mod export;
mod plot;

use config::{AppConfig, Preset, SourceConfig, DEFAULT_DUMP_LINES};

/// Trace Log Plotter - Decode and plot discrete-event trace logs
#[derive(Parser, Debug)]
#[command(name = "trace-log-cli")]
#[command(about = "Decode and plot discrete-event trace logs (file or serial)", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a captured trace log to decode
    #[arg(short, long, value_name = "FILE", conflicts_with = "port")]
    log: Option<PathBuf>,

    /// Serial device streaming trace lines (e.g. /dev/ttyACM0)
    #[arg(short, long, value_name = "DEVICE")]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long, value_name = "BAUD")]
    baud: Option<u32>,

    /// Number of lines to read from the serial device
    #[arg(long, value_name = "COUNT")]
    lines: Option<usize>,

    /// Serial read timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in channel configuration
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Keep only samples after this time (requires --to)
    #[arg(long, value_name = "SECONDS", requires = "to")]
    from: Option<f64>,

    /// Keep only samples before this time (requires --from)
    #[arg(long, value_name = "SECONDS", requires = "from")]
    to: Option<f64>,

    /// Output SVG file for the plot (default: timestamped name)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Export decoded series to a .json or .csv file
    #[arg(short, long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Plot title
    #[arg(long)]
    title: Option<String>,

    /// Log every raw line a channel accepts
    #[arg(long)]
    echo: bool,

    /// Print the fields of each raw line instead of plotting
    ///
    /// Without --lines, a serial source from a preset reads 20 lines; a
    /// --config file keeps its own max_lines.
    #[arg(long)]
    dump: bool,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Trace Log Plotter CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", trace_log_decoder::VERSION);

    if args.list_ports {
        list_ports_mode();
        return Ok(());
    }

    let config = match resolve_config(&args)? {
        Some(config) => config,
        None => {
            // No arguments - show help
            println!("Trace Log Plotter - No input specified");
            println!("\nQuick Start:");
            println!("  trace-log-cli --log blinkyLog.csv --from 500 --to 600");
            println!("  trace-log-cli --port /dev/ttyACM0 --preset embedded");
            println!("  trace-log-cli --port /dev/ttyACM0 --dump");
            println!("\nFor custom channels:");
            println!("  trace-log-cli --config plot.toml");
            println!("\nUse --help for more options");
            return Ok(());
        }
    };

    if args.dump {
        dump_mode(&config)
    } else {
        plot_mode(&config)
    }
}

/// Build the effective configuration: config file or preset, then flag overrides
fn resolve_config(args: &Args) -> Result<Option<AppConfig>> {
    let mut config = if let Some(config_path) = &args.config {
        log::info!("Loading configuration from: {:?}", config_path);
        config::load_config(config_path)?
    } else if let Some(preset) = args.preset {
        AppConfig::preset(preset)
    } else if args.port.is_some() {
        AppConfig::preset(Preset::Embedded)
    } else if args.log.is_some() {
        AppConfig::preset(Preset::Simulation)
    } else {
        return Ok(None);
    };

    if let Some(path) = &args.log {
        config.source = SourceConfig::File { path: path.clone() };
    }
    if let Some(device) = &args.port {
        let settings = match &config.source {
            SourceConfig::Serial(settings) => SerialSettings {
                device: device.clone(),
                ..settings.clone()
            },
            SourceConfig::File { .. } => SerialSettings::new(device.clone()),
        };
        config.source = SourceConfig::Serial(settings);
    }

    if let SourceConfig::Serial(settings) = &mut config.source {
        if let Some(baud) = args.baud {
            settings.baud_rate = baud;
        }
        if let Some(timeout_ms) = args.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        match args.lines {
            Some(lines) => settings.max_lines = lines,
            None if args.dump && args.config.is_none() => {
                settings.max_lines = DEFAULT_DUMP_LINES
            }
            None => {}
        }
    }

    if let (Some(lo), Some(hi)) = (args.from, args.to) {
        config.window = Some(TimeWindow::new(lo, hi));
    }
    if args.echo {
        config.echo_matches = true;
    }
    if let Some(output) = &args.output {
        config.output.plot = Some(output.clone());
    }
    if let Some(export) = &args.export {
        config.output.export = Some(export.clone());
    }
    if let Some(title) = &args.title {
        config.output.title = title.clone();
    }

    Ok(Some(config))
}

/// Open the configured line source
fn open_source(source: &SourceConfig) -> Result<Box<dyn LineSource>> {
    match source {
        SourceConfig::File { path } => Ok(Box::new(FileSource::open(path)?)),
        SourceConfig::Serial(settings) => {
            let mut serial = SerialSource::open(settings)?;
            if let Err(e) = serial.clear_input() {
                log::warn!("Could not clear serial input buffer: {}", e);
            }
            Ok(Box::new(serial))
        }
    }
}

/// Plot mode - decode the source, render the plot, optionally export
fn plot_mode(config: &AppConfig) -> Result<()> {
    let decoder = TraceDecoder::new(config.trace_config())?;
    let source = open_source(&config.source)?;
    let capture = decoder.decode_source(source)?;

    print_summary(&capture);

    let plot_path = config
        .output
        .plot
        .clone()
        .unwrap_or_else(default_plot_path);
    let options = plot::PlotOptions {
        title: config.output.title.clone(),
        width: config.output.width,
        height: config.output.height,
    };
    plot::render_to_file(&capture, &options, &plot_path)
        .with_context(|| format!("Failed to render plot to {:?}", plot_path))?;
    println!("\n✓ Plot written to {:?}", plot_path);

    if let Some(export_path) = &config.output.export {
        export::export_capture(&capture, export_path)?;
        println!("✓ Series exported to {:?}", export_path);
    }

    Ok(())
}

/// Dump mode - print the raw fields of every line the source yields
fn dump_mode(config: &AppConfig) -> Result<()> {
    let source = open_source(&config.source)?;
    log::info!("Dumping raw lines from {}", source.describe());

    for line in source {
        let line = line?;
        println!("{:?}", split_fields(&line));
    }

    Ok(())
}

fn list_ports_mode() {
    let ports = list_ports();
    if ports.is_empty() {
        println!("No serial ports found");
        return;
    }
    for port in ports {
        match (port.vid, port.pid) {
            (Some(vid), Some(pid)) => println!(
                "{}  [{:04x}:{:04x}] {}",
                port.name,
                vid,
                pid,
                port.product.as_deref().unwrap_or("")
            ),
            _ => println!("{}", port.name),
        }
    }
}

fn print_summary(capture: &TraceCapture) {
    let stats = &capture.stats;
    println!("📊 Decoded trace:");
    println!("  Lines read:      {}", stats.lines_read);
    println!("  Events decoded:  {}", stats.events_decoded);
    println!(
        "  Lines rejected:  {} ({} malformed, {} bad time)",
        stats.rejected(),
        stats.rejected_arity,
        stats.rejected_time
    );
    for entry in &capture.channels {
        println!(
            "  {:<20} {} samples ({} matched)",
            entry.channel.display_label(),
            entry.series.len(),
            entry.matched
        );
    }
}

fn default_plot_path() -> PathBuf {
    PathBuf::from(format!(
        "trace_plot_{}.svg",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
