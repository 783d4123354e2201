//! Standalone trace log inspection tool
//!
//! Decodes a captured trace log and prints every event, plus a summary of
//! which entities and ports appear in it. Useful for finding channel names
//! before writing a plot configuration.
//!
//! Usage:
//!   decode_log <trace.csv> [--limit <count>] [--entity <name>]
//!
//! Example:
//!   decode_log blinkyLog.csv --limit 50 --entity blinky

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use trace_log_decoder::{FileSource, TraceDecoder, TraceEvent};

struct EventStats {
    total_events: usize,
    by_channel: BTreeMap<(String, String), usize>,
}

impl EventStats {
    fn new() -> Self {
        Self {
            total_events: 0,
            by_channel: BTreeMap::new(),
        }
    }

    fn record(&mut self, event: &TraceEvent) {
        self.total_events += 1;
        *self
            .by_channel
            .entry((event.entity_name.clone(), event.port_name.clone()))
            .or_insert(0) += 1;
    }

    fn print_summary(&self, rejected: usize) {
        println!("\n=== DECODING SUMMARY ===");
        println!("Events decoded: {}", self.total_events);
        println!("Lines rejected: {}", rejected);
        println!("Distinct entity/port pairs: {}", self.by_channel.len());

        if !self.by_channel.is_empty() {
            println!("\nEvents per entity/port:");
            let mut sorted: Vec<_> = self.by_channel.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1));
            for ((entity, port), count) in sorted {
                println!("  {}/{}: {} events", entity, port, count);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <trace.csv> [--limit <count>] [--entity <name>]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} blinkyLog.csv --limit 50 --entity blinky", args[0]);
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);
    let mut limit: Option<usize> = None;
    let mut entity: Option<String> = None;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                i += 1;
                if i < args.len() {
                    limit = Some(args[i].parse()?);
                }
            }
            "--entity" => {
                i += 1;
                if i < args.len() {
                    entity = Some(args[i].clone());
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("=== Trace Log Decoder ===");
    println!("Log file: {:?}", log_file);
    if let Some(n) = limit {
        println!("Limit: {} events", n);
    }
    println!();

    let mut events = TraceDecoder::events(FileSource::open(&log_file)?);
    let mut stats = EventStats::new();
    let mut printed = 0;

    for result in events.by_ref() {
        let event = result?;
        stats.record(&event);

        if entity.as_deref().map_or(false, |name| name != event.entity_name) {
            continue;
        }
        if limit.map_or(false, |max| printed >= max) {
            continue;
        }

        println!(
            "[{:>12.6}s] #{} {}/{} = {:?}",
            event.time, event.entity_id, event.entity_name, event.port_name, event.raw_value
        );
        printed += 1;
    }

    stats.print_summary(events.stats().rejected());

    Ok(())
}
