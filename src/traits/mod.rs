//! Trait definitions for instrument communication.

mod common_commands;
mod message_session;

pub use common_commands::{CommonCommands, OpcOutcome, DEFAULT_OPC_ATTEMPTS};
pub use message_session::MessageSession;
