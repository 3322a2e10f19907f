//! Integration tests for the command/response protocol layer
//!
//! These tests drive the full command surface against a scripted mock session
//! and verify:
//! - Write/read pairing and ordering for every exchange
//! - The exact command sequences behind reset and error clearing
//! - Operation-complete polling outcomes, including swallowed failures
//! - That responses pass through uninterpreted

use daq_visa::adapters::MockSession;
use daq_visa::instrument::ScpiInstrument;
use daq_visa::traits::{CommonCommands, OpcOutcome};
use daq_visa::InstrumentError;

fn instrument(session: &MockSession) -> ScpiInstrument<MockSession> {
    ScpiInstrument::new("test_instrument", session.clone())
}

/// One write followed by one read, write fully issued before the read begins.
#[tokio::test]
async fn test_send_and_read_ordering() {
    let session = MockSession::new().with_responses(&["+1.234E-02"]);
    let instr = instrument(&session);

    let response = instr.send_and_read("MEAS:VOLT:DC?").await.expect("exchange failed");

    assert_eq!(response, "+1.234E-02");
    assert_eq!(session.calls(), vec!["write:MEAS:VOLT:DC?", "read_line"]);
}

/// A write failure surfaces to the caller before any read is attempted.
#[tokio::test]
async fn test_send_and_read_propagates_write_failure() {
    let session = MockSession::new().with_responses(&["never read"]);
    session.inject_write_failure();
    let instr = instrument(&session);

    let err = instr.send_and_read("OUTP ON").await.unwrap_err();

    assert!(err.is_transport_error());
    assert_eq!(session.calls(), vec!["write:OUTP ON"]);
    assert_eq!(session.remaining_reads(), 1);
}

/// Reset issues *RST, then the full clear-errors sequence.
#[tokio::test]
async fn test_reset_command_sequence() {
    let session = MockSession::new().with_responses(&["1"]);
    let instr = instrument(&session);

    instr.reset().await.expect("reset failed");

    assert_eq!(
        session.calls(),
        vec!["write:*RST", "write:*CLS", "write:*OPC?", "read_line"]
    );
}

/// Completion is reported as soon as a response contains the token, even
/// after several not-finished responses.
#[tokio::test]
async fn test_opc_completes_after_non_matching_responses() {
    let session = MockSession::new().with_responses(&["0", "0", "1"]);
    let instr = instrument(&session);

    let outcome = instr.wait_operation_complete().await;

    assert!(outcome.is_complete());
    assert_eq!(
        session.calls(),
        vec!["write:*OPC?", "read_line", "read_line", "read_line"]
    );
}

/// The completion token is matched by substring, as instruments pad or
/// terminate the response differently.
#[tokio::test]
async fn test_opc_token_substring_match() {
    let session = MockSession::new().with_responses(&["+1"]);
    let instr = instrument(&session);

    assert!(instr.wait_operation_complete().await.is_complete());
}

/// A transport failure on the first read is folded into the outcome, never
/// propagated.
#[tokio::test]
async fn test_opc_transport_failure_on_first_read() {
    let session = MockSession::new();
    session.push_read_failure("connection lost");
    let instr = instrument(&session);

    match instr.wait_operation_complete().await {
        OpcOutcome::TransportFailed(err) => assert!(err.is_transport_error()),
        other => panic!("expected TransportFailed, got {:?}", other),
    }
}

/// A transport failure partway through the wait is also folded in.
#[tokio::test]
async fn test_opc_transport_failure_mid_wait() {
    let session = MockSession::new().with_responses(&["0"]);
    session.push_read_failure("session dropped");
    let instr = instrument(&session);

    assert!(matches!(
        instr.wait_operation_complete().await,
        OpcOutcome::TransportFailed(_)
    ));
}

/// A failure to issue the *OPC? query itself maps to TransportFailed.
#[tokio::test]
async fn test_opc_write_failure() {
    let session = MockSession::new();
    session.inject_write_failure();
    let instr = instrument(&session);

    assert!(matches!(
        instr.wait_operation_complete().await,
        OpcOutcome::TransportFailed(_)
    ));
    // No read should have been attempted.
    assert_eq!(session.calls(), vec!["write:*OPC?"]);
}

/// A read timeout means the instrument has not answered: distinguishable
/// from a transport fault.
#[tokio::test]
async fn test_opc_read_timeout_is_timed_out() {
    let session = MockSession::new();
    session.push_timeout();
    let instr = instrument(&session);

    assert!(matches!(
        instr.wait_operation_complete().await,
        OpcOutcome::TimedOut
    ));
}

/// An instrument that answers but never asserts completion exhausts the
/// attempt bound instead of blocking forever.
#[tokio::test]
async fn test_opc_attempt_bound_reached() {
    let session = MockSession::new();
    for _ in 0..6 {
        session.push_response("0");
    }
    let instr = ScpiInstrument::new("slow", session.clone()).with_opc_attempts(3);

    assert!(matches!(
        instr.wait_operation_complete().await,
        OpcOutcome::TimedOut
    ));
    assert_eq!(session.remaining_reads(), 3);
}

/// The identification response passes through verbatim, uninterpreted.
#[tokio::test]
async fn test_identify_verbatim() {
    let session = MockSession::new().with_responses(&["ACME,Model1,SN123,v1.0"]);
    let instr = instrument(&session);

    assert_eq!(instr.identify().await.unwrap(), "ACME,Model1,SN123,v1.0");
    assert_eq!(session.calls(), vec!["write:*IDN?", "read_line"]);
}

/// clear_errors succeeds even when the completion wait times out; the *CLS
/// write failure is the only error path.
#[tokio::test]
async fn test_clear_errors_tolerates_incomplete_opc() {
    let session = MockSession::new();
    session.push_timeout();
    let instr = instrument(&session);

    instr.clear_errors().await.expect("clear_errors failed");
    assert_eq!(session.calls(), vec!["write:*CLS", "write:*OPC?", "read_line"]);
}

/// clear_errors propagates a failure to send *CLS itself.
#[tokio::test]
async fn test_clear_errors_propagates_cls_write_failure() {
    let session = MockSession::new();
    session.inject_write_failure();
    let instr = instrument(&session);

    let err = instr.clear_errors().await.unwrap_err();
    assert!(err.is_transport_error());
}

/// Two clear_errors calls produce two full *CLS + wait cycles; no caching of
/// prior completion state.
#[tokio::test]
async fn test_clear_errors_is_not_cached() {
    let session = MockSession::new().with_responses(&["1"]);
    let instr = instrument(&session);

    instr.clear_errors().await.expect("first clear failed");
    session.push_response("1");
    instr.clear_errors().await.expect("second clear failed");

    assert_eq!(
        session.calls(),
        vec![
            "write:*CLS",
            "write:*OPC?",
            "read_line",
            "write:*CLS",
            "write:*OPC?",
            "read_line",
        ]
    );
}

/// Raw primitives are exposed on the protocol surface and pass through to
/// the session.
#[tokio::test]
async fn test_raw_primitives_pass_through() {
    let session = MockSession::new().with_responses(&["ok"]);
    let instr = instrument(&session);

    instr.write("SYST:BEEP").await.unwrap();
    assert_eq!(instr.read_line().await.unwrap(), "ok");
}

/// Errors keep their class across the protocol layer.
#[tokio::test]
async fn test_timeout_error_class() {
    let session = MockSession::new();
    let instr = instrument(&session);

    match instr.send_and_read("MEAS?").await {
        Err(InstrumentError::Timeout(_)) => {}
        other => panic!("expected timeout, got {:?}", other),
    }
}
