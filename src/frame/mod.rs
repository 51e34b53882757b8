//! # Frame Decoder Module
//!
//! Decodes heterogeneous line-based telemetry frames into canonical
//! position records.
//!
//! Two frame families are supported:
//! - NMEA positioning sentences (`$GPGGA`/`$GNGGA` and `$GPRMC`/`$GNRMC`)
//! - Custom semicolon-delimited `KEY=value` frames, optionally embedding a
//!   raw NMEA sentence
//!
//! Lines that carry no extractable coordinate pair decode to `None`; a
//! malformed line is never an error.

pub mod decoder;
pub mod kv;
pub mod nmea;
pub mod record;

pub use decoder::decode_line;
pub use record::PositionRecord;
