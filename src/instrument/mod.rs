//! Concrete instrument types.

mod scpi;

pub use scpi::ScpiInstrument;
