//! # GPS Bridge Library
//!
//! Bridge a serial-connected GPS/tracker device to a remote HTTP ingestion
//! API.
//!
//! This library provides the core functionality: decoding line-based
//! telemetry frames into position records, maintaining an authenticated
//! session against the remote API, and running the resilient
//! read-decode-deliver loop.

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod frame;
pub mod serial;
