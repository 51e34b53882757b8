//! # NMEA Sentence Decoding
//!
//! Decodes the two supported positioning sentence families (GGA and RMC,
//! `GP` and `GN` talkers) into a coordinate fix. No checksum validation is
//! performed.

/// Minimum comma-separated field count for a GGA sentence
const GGA_MIN_FIELDS: usize = 6;

/// Minimum comma-separated field count for an RMC sentence
const RMC_MIN_FIELDS: usize = 7;

/// RMC status value marking a valid fix
const RMC_STATUS_VALID: &str = "A";

/// Coordinate pair extracted from one positioning sentence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceFix {
    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Convert an NMEA degrees-and-minutes coordinate to decimal degrees
///
/// The coordinate is a concatenated numeric string: 2 whole-degree digits for
/// latitude hemispheres (N/S), 3 for longitude hemispheres (E/W), followed by
/// decimal minutes. Decimal value = degrees + minutes / 60, negated for S/W.
///
/// # Arguments
///
/// * `coord` - Raw coordinate text, e.g. `"4807.038"`
/// * `hemi` - Hemisphere letter, e.g. `"N"`
///
/// # Returns
///
/// * `Option<f64>` - Decimal degrees, or `None` when the input is empty or
///   malformed. Absence is the normal "not decodable" signal, not an error.
pub fn nmea_to_decimal(coord: &str, hemi: &str) -> Option<f64> {
    let hemi = hemi.trim().to_ascii_uppercase();
    if coord.is_empty() || hemi.is_empty() {
        return None;
    }

    let deg_len = if hemi == "N" || hemi == "S" { 2 } else { 3 };

    let degrees: f64 = coord.get(..deg_len)?.parse().ok()?;
    let minutes: f64 = coord.get(deg_len..)?.parse().ok()?;

    let mut decimal = degrees + minutes / 60.0;
    if !decimal.is_finite() {
        return None;
    }
    if hemi == "S" || hemi == "W" {
        decimal = -decimal;
    }

    Some(decimal)
}

/// Decode one positioning sentence into a coordinate fix
///
/// Supported sentences:
/// - `$GPGGA`/`$GNGGA`: latitude in field 2 (hemisphere 3), longitude in
///   field 4 (hemisphere 5). The fix-quality field is not checked.
/// - `$GPRMC`/`$GNRMC`: field 2 is a status flag; a non-empty value other
///   than `A` rejects the sentence. Latitude in field 3 (hemisphere 4),
///   longitude in field 5 (hemisphere 6).
///
/// Any other `$`-prefixed line, or a sentence with too few fields or
/// unparseable coordinates, yields `None`.
pub fn decode_sentence(raw: &str) -> Option<SentenceFix> {
    let s = raw.trim();

    if s.starts_with("$GPGGA") || s.starts_with("$GNGGA") {
        let fields: Vec<&str> = s.split(',').collect();
        if fields.len() < GGA_MIN_FIELDS {
            return None;
        }
        let latitude = nmea_to_decimal(fields[2], fields[3])?;
        let longitude = nmea_to_decimal(fields[4], fields[5])?;
        return Some(SentenceFix { latitude, longitude });
    }

    if s.starts_with("$GPRMC") || s.starts_with("$GNRMC") {
        let fields: Vec<&str> = s.split(',').collect();
        if fields.len() < RMC_MIN_FIELDS {
            return None;
        }
        let status = fields[2].trim().to_ascii_uppercase();
        if !status.is_empty() && status != RMC_STATUS_VALID {
            return None;
        }
        let latitude = nmea_to_decimal(fields[3], fields[4])?;
        let longitude = nmea_to_decimal(fields[5], fields[6])?;
        return Some(SentenceFix { latitude, longitude });
    }

    None
}
