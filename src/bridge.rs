//! # Delivery Loop
//!
//! The control component: reads lines from the serial transport, decodes
//! them, and hands records to the session manager for delivery. Enforces the
//! resilience policy — serial reconnection with a fixed backoff, and a brief
//! pause after any unexpected error. The loop never exits on a per-line
//! failure.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::api::transport::ApiTransport;
use crate::api::SessionManager;
use crate::config::Config;
use crate::error::GpsBridgeError;
use crate::frame::decode_line;
use crate::serial::line_source::{LineSource, ReadOutcome};

/// Pause after an unexpected loop error before continuing
const ERROR_PAUSE: Duration = Duration::from_secs(1);

/// Read-decode-deliver loop over one telemetry link
pub struct Bridge<L: LineSource, T: ApiTransport> {
    source: L,
    session: SessionManager<T>,
    default_boat: String,
    reconnect_interval: Duration,
}

impl<L: LineSource, T: ApiTransport> Bridge<L, T> {
    /// Assemble the loop from an opened source and a logged-in session
    pub fn new(source: L, session: SessionManager<T>, config: &Config) -> Self {
        Self {
            source,
            session,
            default_boat: config.boat.default_name.clone(),
            reconnect_interval: Duration::from_millis(config.serial.reconnect_interval_ms),
        }
    }

    /// Run the delivery loop indefinitely
    ///
    /// Every failure mode is terminal only for the line in flight; the loop
    /// itself runs until the process is terminated.
    pub async fn run(&mut self) {
        loop {
            self.step().await;
        }
    }

    /// One iteration: read, decode, deliver, or recover
    async fn step(&mut self) {
        match self.source.read_line().await {
            // A quiet link is not an error
            Ok(ReadOutcome::Timeout) => {}

            Ok(ReadOutcome::Line(raw)) => {
                let line = raw.trim();
                if line.is_empty() {
                    return;
                }
                debug!("RX: {}", line);

                match decode_line(line, &self.default_boat) {
                    Some(record) => {
                        if self.session.deliver(&record).await {
                            info!(
                                "Delivered [{}]: {:.6}, {:.6}",
                                record.boat_name, record.latitude, record.longitude
                            );
                        } else {
                            warn!("Record not delivered, dropping");
                        }
                    }
                    None => debug!("Ignored (no decodable coordinates): {}", line),
                }
            }

            Err(GpsBridgeError::LinkLost(reason)) => {
                warn!(
                    "Serial link lost ({}), reconnecting in {:?}",
                    reason, self.reconnect_interval
                );
                sleep(self.reconnect_interval).await;
                if let Err(e) = self.source.reopen().await {
                    // Reads against the dead link will surface as link loss
                    // again, backing off before the next attempt
                    warn!("Reconnect failed: {}", e);
                }
            }

            Err(e) => {
                error!("Unexpected error in delivery loop: {}", e);
                sleep(ERROR_PAUSE).await;
            }
        }
    }
}
