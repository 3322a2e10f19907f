//! Generic SCPI instrument
//!
//! A [`CommonCommands`] implementation over any [`MessageSession`], suitable
//! for any instrument speaking the IEEE-488.2 common-command set:
//! oscilloscopes, power supplies, multimeters, function generators, spectrum
//! analyzers. Instruments that deviate from the standard sequences get their
//! own type overriding the affected operations.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use daq_visa::hardware::VisaGatewayBuilder;
//! use daq_visa::instrument::ScpiInstrument;
//! use daq_visa::traits::CommonCommands;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let gateway = VisaGatewayBuilder::new("TCPIP0::192.168.1.100::INSTR".to_string())
//!     .with_timeout(Duration::from_secs(2))
//!     .build();
//! gateway.connect().await?;
//!
//! let instrument = ScpiInstrument::new("keysight_34401a", gateway);
//! instrument.reset().await?;
//! println!("Instrument: {}", instrument.identify().await?);
//! # Ok(())
//! # }
//! ```

use crate::traits::{CommonCommands, MessageSession, DEFAULT_OPC_ATTEMPTS};
use async_trait::async_trait;

/// Generic SCPI-compliant instrument over a message session.
pub struct ScpiInstrument<S> {
    id: String,
    session: S,
    opc_attempts: usize,
}

impl<S: MessageSession> ScpiInstrument<S> {
    /// Create an instrument over an already-established session.
    pub fn new(id: impl Into<String>, session: S) -> Self {
        Self {
            id: id.into(),
            session,
            opc_attempts: DEFAULT_OPC_ATTEMPTS,
        }
    }

    /// Bound the operation-complete wait to `attempts` reads.
    pub fn with_opc_attempts(mut self, attempts: usize) -> Self {
        self.opc_attempts = attempts;
        self
    }

    /// Unique instrument identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Give the underlying session back, e.g. to disconnect it.
    pub fn into_session(self) -> S {
        self.session
    }
}

#[async_trait]
impl<S: MessageSession + 'static> CommonCommands for ScpiInstrument<S> {
    fn session(&self) -> &dyn MessageSession {
        &self.session
    }

    fn opc_attempts(&self) -> usize {
        self.opc_attempts
    }
}
