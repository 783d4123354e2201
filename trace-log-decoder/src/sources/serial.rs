//! Serial port source
//!
//! Reads trace lines from an embedded target over a serial connection
//! (8N1, no flow control) with a read timeout and a fixed line budget.

use super::{BoundedSource, LineSource};
use crate::types::{DecoderError, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortInfo, SerialPortType, StopBits};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(target_os = "linux")]
use std::fs;
use std::io::BufReader;
use std::time::Duration;

/// Default baud rate of the embedded trace output
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default read timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Default number of lines read per session
pub const DEFAULT_MAX_LINES: usize = 100;

/// Connection settings for a serial trace source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Device path, e.g. `/dev/ttyACM0` or `COM3`
    pub device: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

impl SerialSettings {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    /// Builder method: set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Builder method: set the read timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Builder method: set the line budget
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

/// Bounded line source over an open serial port
pub struct SerialSource {
    inner: BoundedSource<BufReader<Box<dyn SerialPort>>>,
}

impl SerialSource {
    /// Open the serial device
    ///
    /// Failure to open the device is reported as
    /// [`DecoderError::SourceUnavailable`].
    pub fn open(settings: &SerialSettings) -> Result<Self> {
        log::info!(
            "Opening serial port {} at {} baud (timeout {} ms, {} lines)",
            settings.device,
            settings.baud_rate,
            settings.timeout_ms,
            settings.max_lines
        );

        let port = serialport::new(settings.device.as_str(), settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(settings.timeout_ms))
            .open()
            .map_err(|e| {
                DecoderError::SourceUnavailable(format!(
                    "failed to open serial port {}: {}",
                    settings.device, e
                ))
            })?;

        Ok(Self {
            inner: BoundedSource::new(BufReader::new(port), settings.max_lines, settings.device.clone()),
        })
    }

    /// Discard anything buffered by the OS before reading
    pub fn clear_input(&mut self) -> Result<()> {
        self.inner_port()
            .clear(serialport::ClearBuffer::Input)
            .map_err(|e| DecoderError::Serial(e.to_string()))
    }

    fn inner_port(&mut self) -> &mut Box<dyn SerialPort> {
        self.inner.get_mut().get_mut()
    }
}

impl Iterator for SerialSource {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl LineSource for SerialSource {
    fn describe(&self) -> String {
        format!("serial {}", self.inner.describe())
    }
}

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g., "/dev/ttyACM0" or "COM3")
    pub name: String,
    /// USB vendor ID (if USB device)
    pub vid: Option<u16>,
    /// USB product ID (if USB device)
    pub pid: Option<u16>,
    /// Product name (if available)
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (vid, pid, product) = match info.port_type {
            SerialPortType::UsbPort(usb_info) => {
                (Some(usb_info.vid), Some(usb_info.pid), usb_info.product)
            }
            _ => (None, None, None),
        };

        Self {
            name: info.port_name,
            vid,
            pid,
            product,
        }
    }
}

/// Sort key so that ttyACM* ports come first (numerically), then ttyUSB*,
/// then everything else by name
fn port_sort_key(name: &str) -> (u8, usize, String) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    if let Some(rest) = basename.strip_prefix("ttyACM") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (0, num, basename.to_string());
    }
    if let Some(rest) = basename.strip_prefix("ttyUSB") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (1, num, basename.to_string());
    }
    (2, 0, basename.to_string())
}

/// List available serial ports in a deterministic order
pub fn list_ports() -> Vec<PortInfo> {
    let mut map: HashMap<String, PortInfo> = HashMap::new();
    for info in serialport::available_ports().unwrap_or_default() {
        let port = PortInfo::from(info);
        map.entry(port.name.clone()).or_insert(port);
    }

    // Boards that enumerate late may only show up under /dev
    #[cfg(target_os = "linux")]
    if let Ok(entries) = fs::read_dir("/dev") {
        for entry in entries.flatten() {
            if let Some(fname) = entry.file_name().to_str() {
                if fname.starts_with("ttyACM") || fname.starts_with("ttyUSB") {
                    let full = format!("/dev/{}", fname);
                    map.entry(full.clone()).or_insert_with(|| PortInfo {
                        name: full,
                        vid: None,
                        pid: None,
                        product: None,
                    });
                }
            }
        }
    }

    let mut ports: Vec<PortInfo> = map.into_values().collect();
    ports.sort_by_key(|p| port_sort_key(&p.name));
    ports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = SerialSettings::new("/dev/ttyACM0");
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.timeout_ms, 1000);
        assert_eq!(settings.max_lines, 100);

        let settings = settings.with_max_lines(20).with_baud_rate(115200).with_timeout_ms(250);
        assert_eq!(settings.max_lines, 20);
        assert_eq!(settings.baud_rate, 115200);
        assert_eq!(settings.timeout_ms, 250);
    }

    #[test]
    fn test_missing_device_is_unavailable() {
        let settings = SerialSettings::new("/dev/does-not-exist-trace0");
        assert!(matches!(
            SerialSource::open(&settings),
            Err(DecoderError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_port_sorting() {
        let mut names = vec![
            "/dev/ttyUSB1",
            "/dev/ttyACM1",
            "/dev/ttyUSB0",
            "/dev/ttyACM0",
            "/dev/someport",
            "/dev/ttyACM10",
        ];
        names.sort_by_key(|n| port_sort_key(n));
        assert_eq!(
            names,
            vec![
                "/dev/ttyACM0",
                "/dev/ttyACM1",
                "/dev/ttyACM10",
                "/dev/ttyUSB0",
                "/dev/ttyUSB1",
                "/dev/someport",
            ]
        );
    }
}
