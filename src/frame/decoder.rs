//! # Frame Dispatch
//!
//! Classifies one trimmed input line and routes it to the matching
//! sub-decoder.

use super::kv;
use super::nmea;
use super::record::PositionRecord;

/// Decode one raw input line into a position record
///
/// Dispatch rule, first success wins:
/// 1. A line containing a `BOAT=`, `RAW=`, or `LAT=` marker (any case) is
///    tried as a key-value frame.
/// 2. A line beginning with `$` is tried as a positioning sentence,
///    attributed to the default boat identity.
/// 3. Anything else yields no record.
///
/// Decoding is stateless: the same line always produces the same result.
///
/// # Arguments
///
/// * `line` - Raw line from the transport (trimmed here)
/// * `default_boat` - Identity used when the frame names no boat
///
/// # Returns
///
/// * `Option<PositionRecord>` - Decoded record, or `None` for lines that
///   carry no extractable coordinate pair
pub fn decode_line(line: &str, default_boat: &str) -> Option<PositionRecord> {
    let line = line.trim();

    let upper = line.to_ascii_uppercase();
    if upper.contains("BOAT=") || upper.contains("RAW=") || upper.contains("LAT=") {
        if let Some(record) = kv::decode_kv_frame(line, default_boat) {
            return Some(record);
        }
    }

    if line.starts_with('$') {
        if let Some(fix) = nmea::decode_sentence(line) {
            return Some(PositionRecord {
                boat_name: default_boat.to_string(),
                latitude: fix.latitude,
                longitude: fix.longitude,
                raw_frame: line.to_string(),
            });
        }
    }

    None
}
