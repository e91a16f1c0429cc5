//! `dapbridge` binary: connect a debug adapter to a host and relay until
//! interrupted.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use dapbridge::{BridgeConfig, BridgeSession, Endpoints, FrameFormat};
use log::{error, info};
use tokio::signal;

fn config_from(cli: &cli::Cli) -> Result<BridgeConfig, dapbridge::FrameFormatError> {
    let format = FrameFormat::new(cli.header.clone(), cli.separator.clone())?;
    Ok(BridgeConfig::default()
        .frame_format(format)
        .read_capacity(cli.read_capacity)
        .max_payload_length(cli.max_payload))
}

#[cfg(feature = "metrics")]
fn install_exporter(addr: Option<std::net::SocketAddr>) {
    let Some(addr) = addr else { return };
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => info!("metrics exporter listening: addr={addr}"),
        Err(err) => error!("metrics exporter failed: addr={addr}, error={err}"),
    }
}

#[cfg(not(feature = "metrics"))]
fn install_exporter(addr: Option<std::net::SocketAddr>) {
    if let Some(addr) = addr {
        log::warn!("metrics support not compiled in: addr={addr}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let config = match config_from(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("invalid frame format: {err}");
            return ExitCode::FAILURE;
        }
    };
    install_exporter(cli.metrics_addr);

    let session = BridgeSession::new(config);
    let stop = session.stop_handle();
    tokio::spawn(async move {
        let _ = signal::ctrl_c().await;
        info!("interrupt received, stopping bridge");
        stop.stop();
    });

    let endpoints = Endpoints::new(cli.adapter, cli.publish, cli.control);
    match session.start(&endpoints).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("bridge terminated: error={err}");
            ExitCode::FAILURE
        }
    }
}
