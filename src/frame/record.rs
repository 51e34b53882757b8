//! # Position Record
//!
//! The canonical decoded unit handed to the delivery pipeline.

use serde::Serialize;

/// One decoded position report
///
/// Constructed only once both coordinates have resolved to finite decimal
/// degrees; a record with a single coordinate never exists. Serializes
/// directly as the ingestion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecord {
    /// Boat identity (falls back to the configured default name)
    pub boat_name: String,

    /// Latitude in decimal degrees, range [-90, 90]
    pub latitude: f64,

    /// Longitude in decimal degrees, range [-180, 180]
    pub longitude: f64,

    /// Original source text, kept for audit/debugging
    pub raw_frame: String,
}
