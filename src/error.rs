//! Custom error types for the crate.
//!
//! This module defines the primary error type, `InstrumentError`, used across
//! the gateway and protocol layers. Using the `thiserror` crate, it provides a
//! centralized and consistent way to handle the two failure classes of
//! instrument communication:
//!
//! - **Connection class**: the resource could not be opened at all, opened to
//!   the wrong session class, or a session was requested while one is already
//!   held. These abort connection establishment entirely; there is no
//!   partially-usable gateway.
//! - **Transport class**: a write or read on an open session failed, either by
//!   exceeding the blocking-I/O window (`Timeout`) or through some other
//!   transport-level fault (`Transport`, `NotConnected`).
//!
//! The split matters to callers: connection errors are surfaced once, at
//! construction time, while transport errors accompany individual commands.
//! `OpcOutcome` (see `traits::common_commands`) is the one place transport
//! errors are folded into a value instead of propagated.

use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type Result<T> = std::result::Result<T, InstrumentError>;

#[derive(Error, Debug)]
pub enum InstrumentError {
    #[error("Failed to open VISA resource '{resource}': {reason}")]
    Connection { resource: String, reason: String },

    #[error("Resource '{0}' is not a message-based session")]
    NotMessageBased(String),

    #[error("Already connected to '{0}'; disconnect before reconnecting")]
    AlreadyConnected(String),

    #[error("No active session")]
    NotConnected,

    #[error("I/O timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("VISA support not enabled. Rebuild with --features instrument_visa")]
    VisaFeatureDisabled,
}

impl InstrumentError {
    /// True for failures raised while establishing a session.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::NotMessageBased(_)
                | Self::AlreadyConnected(_)
                | Self::VisaFeatureDisabled
        )
    }

    /// True for failures raised by I/O on an open session.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::Timeout(_) | Self::Transport(_)
        )
    }
}
