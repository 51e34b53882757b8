//! # Remote API Module
//!
//! Authenticated delivery of position records to the remote ingestion API.
//!
//! The [`transport`] submodule isolates the HTTP mechanics behind a trait;
//! [`session`] owns the token lifecycle and the retry-on-auth-failure
//! contract.

pub mod session;
pub mod transport;

pub use session::SessionManager;
pub use transport::{ApiResponse, ApiTransport, HttpTransport};
