use std::process;
use std::time::Duration;

use clap::Parser;
use sensor_simulator::{Publisher, PublisherConfig, ScalarGenerator, SpectralGenerator};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "simulator", about = "Synthetic sensor stream publisher")]
struct Args {
    /// Host to bind the publisher's listening socket to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the publisher's listening socket to.
    #[arg(short, long, default_value_t = 9009)]
    port: u16,

    /// Milliseconds between generated reading ticks.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Disable the synthetic FTIR spectrum generator.
    #[arg(long)]
    no_ftir: bool,
}

fn build_generators(args: &Args) -> (Vec<ScalarGenerator>, Vec<SpectralGenerator>) {
    let scalars = vec![
        ScalarGenerator::new("TempLowerMSP", 22.0, 1.5, 120.0, 0.05),
        ScalarGenerator::new("TempUpperMSP", 23.5, 1.5, 120.0, 0.05),
        ScalarGenerator::new("Pressure", 5.0, 0.3, 45.0, 0.02),
        ScalarGenerator::new("Vibration", 0.2, 0.05, 10.0, 0.01),
    ];
    let spectra = if args.no_ftir {
        Vec::new()
    } else {
        vec![SpectralGenerator::new(
            "FTNIR",
            vec![2200.0, 1950.0, 1600.0],
            0.4,
            6.0,
            0.01,
        )]
    };
    (scalars, spectra)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "simulator starting");

    let args = Args::parse();
    let (scalars, spectra) = build_generators(&args);

    let config = PublisherConfig {
        host: args.host.clone(),
        port: args.port,
        tick_interval: Duration::from_millis(args.tick_ms),
    };
    let publisher = Publisher::new(config, scalars, spectra);
    let stop = publisher.stop_token();

    let run_handle = tokio::spawn(publisher.run());

    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received, stopping");
    stop.cancel();

    match run_handle.await {
        Ok(Ok(())) => info!("simulator stopped"),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "simulator exited with an error");
            process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, "simulator task panicked");
            process::exit(1);
        }
    }
}
