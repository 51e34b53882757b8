//! # Key-Value Frame Decoding
//!
//! Decodes the custom semicolon-delimited `KEY=value` frame format produced
//! by the tracker firmware. A frame carries identity and/or coordinate data
//! and may embed a raw NMEA sentence under the `RAW` key.

use std::collections::BTreeMap;

use super::nmea;
use super::record::PositionRecord;

/// Decode one `KEY=value` frame into a position record
///
/// The line is split on `;`; each field is split on the first `=` into an
/// upper-cased key and a trimmed value (last occurrence of a key wins).
///
/// Resolution order:
/// 1. If both `LAT` and `LON` are present and parse as finite decimals, the
///    literal values are used. `raw_frame` is the `RAW` value when non-empty,
///    else the whole trimmed line. Malformed `LAT`/`LON` text fails the frame
///    outright.
/// 2. Otherwise, a `RAW` value beginning with `$` is decoded as a positioning
///    sentence and wrapped with the frame's boat identity.
///
/// # Arguments
///
/// * `line` - Raw frame text
/// * `default_boat` - Identity used when the frame carries no `BOAT` key
pub fn decode_kv_frame(line: &str, default_boat: &str) -> Option<PositionRecord> {
    let trimmed = line.trim();

    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    for part in trimmed.split(';') {
        if let Some((key, value)) = part.split_once('=') {
            fields.insert(key.trim().to_ascii_uppercase(), value.trim().to_string());
        }
    }

    let boat = fields
        .get("BOAT")
        .map(String::as_str)
        .unwrap_or(default_boat);
    let raw = fields.get("RAW").map(String::as_str).unwrap_or("");

    if fields.contains_key("LAT") && fields.contains_key("LON") {
        let latitude = fields["LAT"].parse::<f64>().ok().filter(|v| v.is_finite())?;
        let longitude = fields["LON"].parse::<f64>().ok().filter(|v| v.is_finite())?;
        return Some(PositionRecord {
            boat_name: boat.to_string(),
            latitude,
            longitude,
            raw_frame: if raw.is_empty() {
                trimmed.to_string()
            } else {
                raw.to_string()
            },
        });
    }

    if raw.starts_with('$') {
        if let Some(fix) = nmea::decode_sentence(raw) {
            return Some(PositionRecord {
                boat_name: boat.to_string(),
                latitude: fix.latitude,
                longitude: fix.longitude,
                raw_frame: raw.to_string(),
            });
        }
    }

    None
}
