//! Mock message session for testing
//!
//! Provides a simulated instrument session for exercising the protocol layer
//! without hardware:
//! - Scripted read responses, consumed in FIFO order
//! - Controllable failure injection for writes and reads
//! - Call logging for verifying exchange ordering

use crate::error::{InstrumentError, Result};
use crate::traits::MessageSession;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted outcome for one `read_line` call.
enum ReadScript {
    Response(String),
    TimeOut,
    Fail(String),
}

/// Mock session adapter for testing.
///
/// Reads consume a scripted queue; an exhausted queue behaves like a silent
/// instrument and reports a timeout, mirroring a transport whose blocking
/// read window elapsed.
///
/// # Example
///
/// ```
/// use daq_visa::adapters::MockSession;
/// use daq_visa::traits::MessageSession;
///
/// # tokio_test::block_on(async {
/// let session = MockSession::new();
/// session.push_response("ACME,Model1,SN123,v1.0");
/// session.write("*IDN?").await.unwrap();
/// assert_eq!(session.read_line().await.unwrap(), "ACME,Model1,SN123,v1.0");
/// assert_eq!(session.calls(), vec!["write:*IDN?", "read_line"]);
/// # });
/// ```
#[derive(Clone)]
pub struct MockSession {
    reads: Arc<Mutex<VecDeque<ReadScript>>>,
    fail_next_write: Arc<AtomicBool>,
    call_log: Arc<Mutex<Vec<String>>>,
    timeout: Duration,
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSession {
    /// Create a new mock session with an empty read script.
    pub fn new() -> Self {
        Self {
            reads: Arc::new(Mutex::new(VecDeque::new())),
            fail_next_write: Arc::new(AtomicBool::new(false)),
            call_log: Arc::new(Mutex::new(Vec::new())),
            timeout: Duration::from_millis(100),
        }
    }

    /// Set the timeout this session reports.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Script responses for successive reads, in order.
    pub fn with_responses(self, responses: &[&str]) -> Self {
        for &r in responses {
            self.push_response(r);
        }
        self
    }

    /// Queue a response line for the next unscripted read.
    pub fn push_response(&self, response: &str) {
        self.lock_reads().push_back(ReadScript::Response(response.to_string()));
    }

    /// Queue a read that times out.
    pub fn push_timeout(&self) {
        self.lock_reads().push_back(ReadScript::TimeOut);
    }

    /// Queue a read that fails with a transport error.
    pub fn push_read_failure(&self, reason: &str) {
        self.lock_reads().push_back(ReadScript::Fail(reason.to_string()));
    }

    /// Inject a failure for the next write.
    pub fn inject_write_failure(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Get the call log.
    pub fn calls(&self) -> Vec<String> {
        match self.call_log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.lock_log().clear();
    }

    /// Number of scripted reads not yet consumed.
    pub fn remaining_reads(&self) -> usize {
        self.lock_reads().len()
    }

    fn log_call(&self, call: String) {
        self.lock_log().push(call);
    }

    fn lock_reads(&self) -> std::sync::MutexGuard<'_, VecDeque<ReadScript>> {
        match self.reads.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_log(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        match self.call_log.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl MessageSession for MockSession {
    async fn write(&self, message: &str) -> Result<()> {
        self.log_call(format!("write:{}", message));
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(InstrumentError::Transport("injected write failure".into()));
        }
        Ok(())
    }

    async fn read_line(&self) -> Result<String> {
        self.log_call("read_line".to_string());
        match self.lock_reads().pop_front() {
            Some(ReadScript::Response(line)) => Ok(line),
            Some(ReadScript::TimeOut) | None => Err(InstrumentError::Timeout(self.timeout)),
            Some(ReadScript::Fail(reason)) => Err(InstrumentError::Transport(reason)),
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
