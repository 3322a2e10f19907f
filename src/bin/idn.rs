//! Instrument identification probe
//!
//! Connects to a VISA resource and prints the `*IDN?` response. Useful for
//! checking cabling and resource strings before wiring an instrument into an
//! acquisition setup.

use anyhow::Result;
use clap::Parser;
use daq_visa::config::GatewayConfig;
use daq_visa::hardware::VisaGatewayBuilder;
use daq_visa::instrument::ScpiInstrument;
use daq_visa::traits::CommonCommands;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "idn", about = "Query a VISA instrument's identification")]
struct Args {
    /// VISA resource string (overrides the config file)
    #[arg(short, long)]
    resource: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Timeout in milliseconds (overrides the config file)
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Reset the instrument (*RST + *CLS) before identifying it
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // A resource on the command line works without any config file.
    let mut config = match GatewayConfig::load_from(&args.config) {
        Ok(config) => config,
        Err(_) if args.resource.is_some() => GatewayConfig::new(""),
        Err(e) => return Err(e.into()),
    };
    if let Some(resource) = args.resource {
        config.resource = resource;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    let gateway = VisaGatewayBuilder::new(config.resource.clone())
        .with_timeout(config.timeout())
        .build();
    gateway.connect().await?;

    let instrument =
        ScpiInstrument::new("probe", gateway).with_opc_attempts(config.opc_attempts);

    if args.reset {
        println!("Resetting {}...", config.resource);
        instrument.reset().await?;
    }

    let idn = instrument.identify().await?;
    println!("{}", idn);

    instrument.into_session().disconnect().await?;
    Ok(())
}
