//! VISA gateway hardware tests
//!
//! Session lifecycle tests against a real VISA instrument. These require the
//! `instrument_visa` feature, a working VISA installation, and an instrument
//! reachable at the resource in `DAQVISA_HW_RESOURCE`.
//!
//! Run with: cargo test --features instrument_visa --test visa_hardware_test -- --ignored

#![cfg(feature = "instrument_visa")]

use daq_visa::hardware::VisaGatewayBuilder;
use daq_visa::instrument::ScpiInstrument;
use daq_visa::traits::CommonCommands;
use daq_visa::InstrumentError;
use std::time::Duration;

fn hw_resource() -> String {
    std::env::var("DAQVISA_HW_RESOURCE").unwrap_or_else(|_| "GPIB0::22::INSTR".to_string())
}

#[tokio::test]
#[ignore]
async fn test_connect_and_identify() {
    let gateway = VisaGatewayBuilder::new(hw_resource())
        .with_timeout(Duration::from_secs(2))
        .build();
    gateway.connect().await.expect("connect failed");
    assert!(gateway.is_connected().await);

    let instr = ScpiInstrument::new("hw_probe", gateway);
    let idn = instr.identify().await.expect("*IDN? failed");
    println!("Instrument: {}", idn);
    assert!(!idn.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_connect_while_connected_is_rejected() {
    let gateway = VisaGatewayBuilder::new(hw_resource()).build();
    gateway.connect().await.expect("connect failed");

    // No silent replace of a live session.
    assert!(matches!(
        gateway.connect().await,
        Err(InstrumentError::AlreadyConnected(_))
    ));

    // Explicit release, then reconnect works.
    gateway.disconnect().await.expect("disconnect failed");
    assert!(!gateway.is_connected().await);
    gateway.connect().await.expect("reconnect failed");
}

#[tokio::test]
#[ignore]
async fn test_disconnect_without_session() {
    let gateway = VisaGatewayBuilder::new(hw_resource()).build();
    assert!(matches!(
        gateway.disconnect().await,
        Err(InstrumentError::NotConnected)
    ));
}

#[tokio::test]
#[ignore]
async fn test_reset_and_clear() {
    let gateway = VisaGatewayBuilder::new(hw_resource())
        .with_timeout(Duration::from_secs(5))
        .build();
    gateway.connect().await.expect("connect failed");

    let instr = ScpiInstrument::new("hw_probe", gateway);
    instr.reset().await.expect("*RST sequence failed");
    let outcome = instr.wait_operation_complete().await;
    assert!(outcome.is_complete(), "instrument never completed: {:?}", outcome);
}
