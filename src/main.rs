//! # GPS Bridge
//!
//! Bridge a serial-connected GPS/tracker device to a remote HTTP ingestion
//! API.
//!
//! Reads line-based telemetry frames (NMEA sentences and `KEY=value`
//! frames), decodes them into position records, and delivers each record to
//! the remote API under an authenticated session.

use anyhow::Result;
use std::time::Duration;
use tracing::info;
use tracing_subscriber;

mod api;
mod bridge;
mod config;
mod error;
mod frame;
mod serial;

use api::{HttpTransport, SessionManager};
use bridge::Bridge;
use config::Config;
use serial::GpsSerial;

/// Default configuration file location
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for the GPS Bridge application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (TOML file if present, env overrides)
///    - Log in against the remote API; a failed login halts startup
///    - Open the serial port; an unopenable port halts startup
///
/// 2. **Main Loop**
///    - Read, decode, and deliver telemetry lines indefinitely
///    - Recover from serial link loss and per-line failures
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if:
/// - Configuration is invalid
/// - The initial login fails (missing or rejected credentials)
/// - The serial port cannot be opened
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("GPS Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(DEFAULT_CONFIG_PATH)?;
    info!("Serial: {} @ {} baud", config.serial.port, config.serial.baud_rate);
    info!("API:    {}", config.api.base_url);

    let transport = HttpTransport::new(Duration::from_millis(config.api.request_timeout_ms))?;
    let mut session = SessionManager::new(transport, &config.api);

    // No point running without credentials
    if !session.login().await {
        anyhow::bail!("Initial login failed, check APP_USER / APP_PASS");
    }

    let serial = GpsSerial::open(&config.serial)?;
    let mut bridge = Bridge::new(serial, session, &config);

    tokio::select! {
        _ = bridge.run() => {}

        // Handle Ctrl+C for graceful shutdown
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}
