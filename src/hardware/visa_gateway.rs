//! VISA session gateway
//!
//! Owns exactly one open VISA session and exposes the raw write / read-line
//! primitives the protocol layer is built on. Wraps the `visa-rs` crate,
//! feature-gated with `instrument_visa`; without the feature every operation
//! fails with a clear "rebuild with the feature" error.
//!
//! Supports resource strings like:
//! - "GPIB0::1::INSTR" (GPIB interface)
//! - "USB0::0x1234::0x5678::SERIAL::INSTR" (USB-TMC)
//! - "TCPIP0::192.168.1.100::INSTR" (Ethernet/LXI)
//! - "ASRL1::INSTR" (serial)

use crate::error::{InstrumentError, Result};
use crate::traits::MessageSession;
use async_trait::async_trait;
use std::time::Duration;

#[cfg(feature = "instrument_visa")]
use tokio::sync::Mutex;

#[cfg(feature = "instrument_visa")]
use tracing::{debug, info};

#[cfg(feature = "instrument_visa")]
use visa_rs::{DefaultRM, Instrument, VISA_SUCCESS};

/// Message-based VISA session classes. Resources of any other class (MEMACC,
/// BACKPLANE, ...) may open successfully but cannot carry text command/response
/// traffic, which the gateway reports as a distinct connection failure.
#[cfg_attr(not(feature = "instrument_visa"), allow(dead_code))]
fn is_message_based(resource: &str) -> bool {
    let upper = resource.to_ascii_uppercase();
    upper.ends_with("::INSTR") || upper.ends_with("::SOCKET")
}

/// Builder for constructing a [`VisaGateway`] with custom configuration.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use daq_visa::hardware::VisaGatewayBuilder;
///
/// let gateway = VisaGatewayBuilder::new("TCPIP0::192.168.1.100::INSTR".to_string())
///     .with_timeout(Duration::from_millis(2000))
///     .build();
/// ```
pub struct VisaGatewayBuilder {
    resource: String,
    timeout: Duration,
}

impl VisaGatewayBuilder {
    /// Create a new builder with a VISA resource string.
    ///
    /// Default timeout: 1 second.
    pub fn new(resource: String) -> Self {
        Self {
            resource,
            timeout: Duration::from_secs(1),
        }
    }

    /// Set the session timeout, applied at open time and to every blocking
    /// read and write for the lifetime of the session.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the gateway. No session is opened until
    /// [`VisaGateway::connect`] is called.
    pub fn build(self) -> VisaGateway {
        VisaGateway {
            resource: self.resource,
            timeout: self.timeout,
            #[cfg(feature = "instrument_visa")]
            session: Mutex::new(None),
        }
    }
}

/// Gateway holding at most one open VISA session.
///
/// All reads and writes are serialized against the single session slot. A
/// second `connect` while a session is live is rejected with
/// [`InstrumentError::AlreadyConnected`]; the prior handle must be released
/// through [`disconnect`](VisaGateway::disconnect) first. Dropping the gateway
/// closes any open handle (visa-rs closes the session on drop).
pub struct VisaGateway {
    resource: String,
    timeout: Duration,
    #[cfg(feature = "instrument_visa")]
    session: Mutex<Option<Instrument>>,
}

impl VisaGateway {
    /// Shorthand for [`VisaGatewayBuilder::new`] + `build`.
    pub fn new(resource: String) -> Self {
        VisaGatewayBuilder::new(resource).build()
    }

    /// The VISA resource string this gateway targets.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Open the session to the configured resource.
    ///
    /// The configured timeout is applied as both the open timeout and the
    /// per-operation I/O timeout. Fails with a connection-class error if the
    /// resource cannot be opened, if it opens to a session class that is not
    /// message-based, or if a session is already held.
    #[cfg(feature = "instrument_visa")]
    pub async fn connect(&self) -> Result<()> {
        let mut slot = self.session.lock().await;
        if slot.is_some() {
            return Err(InstrumentError::AlreadyConnected(self.resource.clone()));
        }

        let rm = DefaultRM::new().map_err(|e| InstrumentError::Connection {
            resource: self.resource.clone(),
            reason: format!("failed to initialize VISA resource manager: {}", e),
        })?;

        let timeout_ms = self.timeout.as_millis() as u32;
        let mut session = rm
            .open(&self.resource, timeout_ms, 0)
            .map_err(|e| InstrumentError::Connection {
                resource: self.resource.clone(),
                reason: e.to_string(),
            })?;

        // Some resources open fine but are the wrong session class; reject
        // them before handing the session out. The handle drops here.
        if !is_message_based(&self.resource) {
            return Err(InstrumentError::NotMessageBased(self.resource.clone()));
        }

        // The open timeout bounds connection establishment; this bounds every
        // blocking read and write for the session's lifetime.
        session
            .set_timeout(timeout_ms)
            .map_err(|e| InstrumentError::Connection {
                resource: self.resource.clone(),
                reason: format!("failed to set {}ms timeout: {}", timeout_ms, e),
            })?;

        info!(resource = %self.resource, timeout_ms, "VISA session opened");
        *slot = Some(session);
        Ok(())
    }

    #[cfg(not(feature = "instrument_visa"))]
    pub async fn connect(&self) -> Result<()> {
        Err(InstrumentError::VisaFeatureDisabled)
    }

    /// Release the active session.
    ///
    /// Fails with [`InstrumentError::NotConnected`] if no session is open.
    #[cfg(feature = "instrument_visa")]
    pub async fn disconnect(&self) -> Result<()> {
        let mut slot = self.session.lock().await;
        match slot.take() {
            Some(_session) => {
                info!(resource = %self.resource, "VISA session closed");
                Ok(())
            }
            None => Err(InstrumentError::NotConnected),
        }
    }

    #[cfg(not(feature = "instrument_visa"))]
    pub async fn disconnect(&self) -> Result<()> {
        Err(InstrumentError::VisaFeatureDisabled)
    }

    /// Whether a session is currently held.
    #[cfg(feature = "instrument_visa")]
    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }

    #[cfg(not(feature = "instrument_visa"))]
    pub async fn is_connected(&self) -> bool {
        false
    }

    /// Map a VISA-level failure onto the transport error taxonomy. The VISA
    /// library reports an elapsed I/O window as VI_ERROR_TMO; everything else
    /// is a generic transport fault.
    #[cfg(feature = "instrument_visa")]
    fn classify(&self, err: impl std::fmt::Display) -> InstrumentError {
        let msg = err.to_string();
        let lower = msg.to_ascii_lowercase();
        if lower.contains("tmo") || lower.contains("timed out") || lower.contains("timeout") {
            InstrumentError::Timeout(self.timeout)
        } else {
            InstrumentError::Transport(msg)
        }
    }
}

#[async_trait]
impl MessageSession for VisaGateway {
    async fn write(&self, message: &str) -> Result<()> {
        #[cfg(feature = "instrument_visa")]
        {
            let mut slot = self.session.lock().await;
            let session = slot.as_mut().ok_or(InstrumentError::NotConnected)?;
            debug!(command = message, "VISA write");
            session
                .write_all(message.as_bytes())
                .map_err(|e| self.classify(e))?;
            Ok(())
        }

        #[cfg(not(feature = "instrument_visa"))]
        {
            let _ = message;
            Err(InstrumentError::VisaFeatureDisabled)
        }
    }

    async fn read_line(&self) -> Result<String> {
        #[cfg(feature = "instrument_visa")]
        {
            let mut slot = self.session.lock().await;
            let session = slot.as_mut().ok_or(InstrumentError::NotConnected)?;

            let mut buf = [0u8; 4096];
            let (n, ret) = session.read(&mut buf).map_err(|e| self.classify(e))?;
            if ret != VISA_SUCCESS {
                return Err(InstrumentError::Transport(format!(
                    "VISA read error: status code {}",
                    ret
                )));
            }

            let response = String::from_utf8_lossy(&buf[..n])
                .trim_end_matches(['\r', '\n', '\0'])
                .to_string();
            debug!(response = %response, "VISA read");
            Ok(response)
        }

        #[cfg(not(feature = "instrument_visa"))]
        {
            Err(InstrumentError::VisaFeatureDisabled)
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
