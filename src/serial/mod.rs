//! # Serial Transport Module
//!
//! Handles serial communication with the GPS/tracker device.
//!
//! This module handles:
//! - Opening the configured serial port (8N1, no flow control)
//! - Line-buffered reads bounded by a timeout
//! - Distinguishing a quiet link (timeout) from a lost link (disconnect)
//! - Reopening the port after a disconnect

pub mod line_source;

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::timeout;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::{GpsBridgeError, Result};
use line_source::{LineSource, ReadOutcome};

/// GPS Serial Port Handler
///
/// Manages the connection to the tracker device and yields raw telemetry
/// lines one at a time.
pub struct GpsSerial {
    /// Buffered reader over the serial stream
    reader: BufReader<tokio_serial::SerialStream>,
    /// Bytes of a line started before a read timeout, kept across attempts
    pending: Vec<u8>,
    /// Device path (e.g., COM3 or /dev/ttyUSB0)
    port: String,
    /// Configured baud rate
    baud_rate: u32,
    /// Bound on each read attempt
    read_timeout: Duration,
}

impl std::fmt::Debug for GpsSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpsSerial")
            .field("port", &self.port)
            .field("baud_rate", &self.baud_rate)
            .finish_non_exhaustive()
    }
}

impl GpsSerial {
    /// Open the configured serial port
    ///
    /// # Arguments
    ///
    /// * `config` - Serial section of the bridge configuration
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be opened
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let stream = Self::open_port(&config.port, config.baud_rate)?;
        info!("Opened serial port {} @ {} baud", config.port, config.baud_rate);

        Ok(Self {
            reader: BufReader::new(stream),
            pending: Vec::new(),
            port: config.port.clone(),
            baud_rate: config.baud_rate,
            read_timeout: Duration::from_millis(config.read_timeout_ms),
        })
    }

    /// Open a specific serial port with NMEA-friendly settings (8N1)
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| GpsBridgeError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Get the device path of the serial port
    pub fn port(&self) -> &str {
        &self.port
    }
}

#[async_trait]
impl LineSource for GpsSerial {
    /// Wait for the next telemetry line
    ///
    /// A timeout yields `ReadOutcome::Timeout`; partial bytes already read
    /// stay in the pending buffer so a slowly arriving line is not lost
    /// across attempts. EOF or a read error maps to `LinkLost`.
    async fn read_line(&mut self) -> Result<ReadOutcome> {
        match timeout(self.read_timeout, self.reader.read_until(b'\n', &mut self.pending)).await {
            Err(_) => Ok(ReadOutcome::Timeout),
            Ok(Ok(0)) => Err(GpsBridgeError::LinkLost(format!(
                "EOF on {}", self.port
            ))),
            Ok(Ok(n)) => {
                debug!("Read {} bytes from {}", n, self.port);
                let raw = std::mem::take(&mut self.pending);
                // Invalid UTF-8 from a glitchy link is replaced, not fatal
                Ok(ReadOutcome::Line(String::from_utf8_lossy(&raw).into_owned()))
            }
            Ok(Err(e)) => Err(GpsBridgeError::LinkLost(format!(
                "Read failed on {}: {}", self.port, e
            ))),
        }
    }

    /// Reopen the port after a disconnect, discarding any partial line
    async fn reopen(&mut self) -> Result<()> {
        let stream = Self::open_port(&self.port, self.baud_rate)?;
        self.reader = BufReader::new(stream);
        self.pending.clear();
        info!("Reconnected to {}", self.port);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unopenable_config() -> SerialConfig {
        SerialConfig {
            port: "/dev/nonexistent_gps_device_12345".to_string(),
            baud_rate: 9600,
            read_timeout_ms: 100,
            reconnect_interval_ms: 1,
        }
    }

    #[test]
    fn test_open_with_invalid_path_returns_error() {
        let result = GpsSerial::open(&unopenable_config());

        assert!(result.is_err());
        match result.unwrap_err() {
            GpsBridgeError::Serial(msg) => {
                assert!(msg.contains("/dev/nonexistent_gps_device_12345"));
                assert!(msg.contains("Failed to open"));
            }
            other => panic!("Expected Serial error, got: {:?}", other),
        }
    }

    #[test]
    fn test_open_port_with_invalid_path_returns_error() {
        let result = GpsSerial::open_port("/dev/nonexistent_gps_device_12345", 9600);
        assert!(result.is_err());
    }

    // Integration test - only runs if a GPS device is connected
    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_read_line_with_real_hardware() {
        let config = SerialConfig {
            port: "/dev/ttyUSB0".to_string(),
            ..SerialConfig::default()
        };

        if let Ok(mut serial) = GpsSerial::open(&config) {
            match serial.read_line().await {
                Ok(ReadOutcome::Line(line)) => println!("RX: {}", line.trim()),
                Ok(ReadOutcome::Timeout) => println!("No data within timeout (link quiet)"),
                Err(e) => panic!("Unexpected read error: {}", e),
            }
        } else {
            println!("No GPS hardware detected (this is OK for CI/CD)");
        }
    }
}
