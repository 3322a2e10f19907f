//! Configuration loading using Figment
//!
//! Strongly-typed configuration for instrument connections, loaded from:
//! 1. a TOML file (base configuration)
//! 2. environment variables (prefixed with `DAQVISA_`)
//!
//! # Environment Variable Overrides
//!
//! ```text
//! DAQVISA_RESOURCE="TCPIP0::192.168.1.100::INSTR"
//! DAQVISA_TIMEOUT_MS=2000
//! DAQVISA_OPC_ATTEMPTS=32
//! ```
//!
//! # Example
//!
//! ```no_run
//! use daq_visa::config::GatewayConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = GatewayConfig::load_from("config.toml")?;
//! println!("Resource: {}", config.resource);
//! println!("Timeout: {:?}", config.timeout());
//! # Ok(())
//! # }
//! ```

use crate::error::{InstrumentError, Result};
use crate::traits::DEFAULT_OPC_ATTEMPTS;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_timeout_ms() -> u64 {
    1000
}

fn default_opc_attempts() -> usize {
    DEFAULT_OPC_ATTEMPTS
}

/// Connection settings for one instrument gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// VISA resource string (e.g., "TCPIP0::192.168.1.100::INSTR")
    pub resource: String,
    /// Session timeout in milliseconds, applied at open time and to every
    /// blocking read/write
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Bound on read attempts while waiting for operation complete
    #[serde(default = "default_opc_attempts")]
    pub opc_attempts: usize,
}

impl GatewayConfig {
    /// A config for `resource` with default timeout and OPC bound.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            timeout_ms: default_timeout_ms(),
            opc_attempts: default_opc_attempts(),
        }
    }

    /// Load from the default `config.toml` plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load from a specific TOML file plus environment overrides.
    ///
    /// A missing file is not an error as long as the required fields arrive
    /// through the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("DAQVISA_"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The session timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.resource.trim().is_empty() {
            return Err(InstrumentError::Configuration(
                "resource must not be empty".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(InstrumentError::Configuration(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.opc_attempts == 0 {
            return Err(InstrumentError::Configuration(
                "opc_attempts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
