//! CommonCommands trait
//!
//! The IEEE-488.2 common-command surface (`*RST`, `*CLS`, `*OPC?`, `*IDN?`)
//! implemented on top of a [`MessageSession`]. All operations are mandatory;
//! default implementations cover the standard command sequences so concrete
//! instrument types only override the operations their hardware deviates on.

use crate::error::{InstrumentError, Result};
use crate::traits::MessageSession;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Default bound on read attempts while waiting for operation complete.
pub const DEFAULT_OPC_ATTEMPTS: usize = 16;

/// Outcome of an operation-complete wait.
///
/// `wait_operation_complete` never returns an error; every failure mode is
/// folded into this value so callers get a plain completion signal, with the
/// cause still distinguishable:
///
/// - `Completed`: a response to `*OPC?` contained the completion token `"1"`.
/// - `TimedOut`: the instrument answered nothing within the transport window,
///   or kept answering without the token until the attempt bound was reached.
/// - `TransportFailed`: the session failed outright (write rejected, session
///   lost) while waiting.
#[derive(Debug)]
pub enum OpcOutcome {
    Completed,
    TimedOut,
    TransportFailed(InstrumentError),
}

impl OpcOutcome {
    /// True only when the completion token was actually observed.
    pub fn is_complete(&self) -> bool {
        matches!(self, OpcOutcome::Completed)
    }
}

/// IEEE-488.2 common-command surface for message-based instruments.
///
/// ## Exchange discipline
///
/// Every operation here is built from write / read-line pairs on the one
/// underlying session. A write is fully issued before its response is read;
/// no operation retries implicitly. Callers needing a completion guarantee
/// after a command must go through [`wait_operation_complete`], since a plain
/// [`send_and_read`] only guarantees ordering, not instrument-side completion.
///
/// ## Error flow
///
/// `send_and_read`, `reset`, `clear_errors` and `identify` propagate transport
/// errors to the caller. `wait_operation_complete` is the one exception: it
/// converts every failure into an [`OpcOutcome`] value, because downstream
/// sequencing (`clear_errors` in particular) needs a completion signal, not an
/// error path.
///
/// [`wait_operation_complete`]: CommonCommands::wait_operation_complete
/// [`send_and_read`]: CommonCommands::send_and_read
#[async_trait]
pub trait CommonCommands: Send + Sync {
    /// The session all command exchanges go through.
    fn session(&self) -> &dyn MessageSession;

    /// Bound on read attempts during an operation-complete wait.
    fn opc_attempts(&self) -> usize {
        DEFAULT_OPC_ATTEMPTS
    }

    /// Send a raw command string, verbatim, without reading a response.
    async fn write(&self, message: &str) -> Result<()> {
        self.session().write(message).await
    }

    /// Read one response line from the session.
    async fn read_line(&self) -> Result<String> {
        self.session().read_line().await
    }

    /// Send a command and read the paired response.
    ///
    /// Exactly one write followed by exactly one read; the write is fully
    /// issued before the read begins. The instrument may still be processing
    /// when this returns.
    async fn send_and_read(&self, message: &str) -> Result<String> {
        self.write(message).await?;
        self.read_line().await
    }

    /// Reset the instrument to its default operating state.
    ///
    /// Sends `*RST`, then drains the error queue via [`clear_errors`].
    ///
    /// [`clear_errors`]: CommonCommands::clear_errors
    async fn reset(&self) -> Result<()> {
        debug!("resetting instrument");
        self.write("*RST").await?;
        self.clear_errors().await
    }

    /// Clear the instrument error queue and status registers.
    ///
    /// Sends `*CLS`, then waits for operation complete, since clearing status
    /// can itself take instrument-side time. A
    /// non-complete outcome does not fail the call; it is logged and the
    /// instrument is assumed usable.
    async fn clear_errors(&self) -> Result<()> {
        debug!("clearing instrument errors");
        self.write("*CLS").await?;
        let outcome = self.wait_operation_complete().await;
        if !outcome.is_complete() {
            warn!(?outcome, "instrument did not confirm completion after *CLS");
        }
        Ok(())
    }

    /// Wait until the instrument reports the previous operation complete.
    ///
    /// Issues `*OPC?` once, then re-reads the pending response until a line
    /// containing `"1"` arrives. Pacing comes from the transport's blocking
    /// read timeout per attempt; there is no sleep between attempts. The wait
    /// is bounded by [`opc_attempts`] reads, so a silent instrument cannot
    /// block the caller indefinitely.
    ///
    /// Never returns an error; see [`OpcOutcome`] for how failures map.
    ///
    /// [`opc_attempts`]: CommonCommands::opc_attempts
    async fn wait_operation_complete(&self) -> OpcOutcome {
        if let Err(e) = self.write("*OPC?").await {
            return OpcOutcome::TransportFailed(e);
        }
        for attempt in 0..self.opc_attempts() {
            match self.read_line().await {
                Ok(response) if response.contains('1') => {
                    debug!(attempt, "operation complete");
                    return OpcOutcome::Completed;
                }
                // Instrument answered but is not finished; re-read the same
                // pending query rather than re-issuing it.
                Ok(_) => continue,
                Err(InstrumentError::Timeout(_)) => return OpcOutcome::TimedOut,
                Err(e) => return OpcOutcome::TransportFailed(e),
            }
        }
        OpcOutcome::TimedOut
    }

    /// Query the instrument identity (`*IDN?`).
    ///
    /// Returns the raw response string uninterpreted; no parsing into
    /// manufacturer/model/serial/firmware fields.
    async fn identify(&self) -> Result<String> {
        self.send_and_read("*IDN?").await
    }
}
