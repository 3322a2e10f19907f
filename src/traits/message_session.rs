//! MessageSession trait
//!
//! Hardware-agnostic interface over one open, message-based instrument
//! session. Implementations handle transport-specific details (VISA, mock,
//! etc.); the protocol layer above only sees write / read-line primitives.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One exclusive, stateful, message-based connection to a single instrument.
///
/// ## Contract
///
/// - Exactly one session per implementor; all reads and writes are serialized
///   against it.
/// - A `read_line` always pairs with the immediately preceding `write` on the
///   same session; callers must not interleave unrelated exchanges.
/// - Both primitives block the caller until the transport accepts the payload
///   or delivers a response, bounded by the session timeout fixed at open
///   time. A timeout surfaces as [`InstrumentError::Timeout`], distinct from
///   other transport faults.
///
/// [`InstrumentError::Timeout`]: crate::error::InstrumentError::Timeout
#[async_trait]
pub trait MessageSession: Send + Sync {
    /// Send a string payload verbatim on the active session.
    ///
    /// # Errors
    /// Transport-class error if no session is open or the transport rejects
    /// the write.
    async fn write(&self, message: &str) -> Result<()>;

    /// Block until one delimited response is available, returning it with the
    /// delimiter stripped.
    ///
    /// # Errors
    /// `Timeout` when the configured window elapses with no response; other
    /// transport-class errors on session failure.
    async fn read_line(&self) -> Result<String>;

    /// The per-operation I/O timeout configured at session-open time.
    fn timeout(&self) -> Duration;
}
