//! IEEE-488.2 common-command layer over VISA message-based sessions.
//!
//! This crate drives laboratory/test instruments over session-oriented
//! transports (GPIB, USB-TMC, LAN/VXI-11, serial) through the IEEE-488.2
//! common-command subset: identification (`*IDN?`), reset (`*RST`), error
//! clearing (`*CLS`) and operation-complete synchronization (`*OPC?`).
//!
//! ## Architecture
//!
//! - [`hardware::VisaGateway`] owns exactly one open VISA session and exposes
//!   the raw write / read-line primitives (feature `instrument_visa`).
//! - [`traits::MessageSession`] is the seam between the gateway and the
//!   protocol layer; [`adapters::MockSession`] implements it for tests.
//! - [`traits::CommonCommands`] implements the command/response contract on
//!   top of any session, with default method bodies concrete instrument types
//!   may override; [`instrument::ScpiInstrument`] is the generic one.
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
//! let gateway = VisaGatewayBuilder::new("GPIB0::22::INSTR".to_string())
//!     .with_timeout(Duration::from_secs(2))
//!     .build();
//! gateway.connect().await?;
//!
//! let dmm = ScpiInstrument::new("dmm", gateway);
//! dmm.reset().await?;
//! println!("{}", dmm.identify().await?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod error;
pub mod hardware;
pub mod instrument;
pub mod traits;

pub use error::{InstrumentError, Result};
pub use traits::{CommonCommands, MessageSession, OpcOutcome};
