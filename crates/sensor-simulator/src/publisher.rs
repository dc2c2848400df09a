//! TCP publisher loop: accepts client connections and broadcasts NDJSON
//! lines produced by the configured generators on a fixed tick.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sensor_wire::Reading;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::generator::{ScalarGenerator, SpectralGenerator};

pub struct PublisherConfig {
    pub host: String,
    pub port: u16,
    pub tick_interval: Duration,
}

pub struct Publisher {
    config: PublisherConfig,
    scalars: Vec<ScalarGenerator>,
    spectra: Vec<SpectralGenerator>,
    stop: CancellationToken,
}

impl Publisher {
    pub fn new(
        config: PublisherConfig,
        scalars: Vec<ScalarGenerator>,
        spectra: Vec<SpectralGenerator>,
    ) -> Self {
        Self {
            config,
            scalars,
            spectra,
            stop: CancellationToken::new(),
        }
    }

    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// Binds the listening socket and runs the accept + tick loop until
    /// stopped. Returns the bound address so callers (tests, `main`) can
    /// discover an ephemeral port.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "simulator listening");

        let (tx, _rx) = broadcast::channel::<String>(1024);
        let tx_for_accept = tx.clone();
        let stop_for_accept = self.stop.clone();

        let accept_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = stop_for_accept.cancelled() => break,
                    accepted = listener.accept() => {
                        match accepted {
                            Ok((socket, peer)) => {
                                info!(%peer, "client connected");
                                tokio::spawn(serve_client(socket, tx_for_accept.subscribe()));
                            }
                            Err(e) => warn!(error = %e, "accept failed"),
                        }
                    }
                }
            }
        });

        let mut rng = StdRng::from_entropy();
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        loop {
            tokio::select! {
                biased;
                () = self.stop.cancelled() => break,
                _ = ticker.tick() => {
                    for gen in &self.scalars {
                        let line = to_wire_line(&Reading::Scalar(gen.sample(&mut rng)));
                        let _ = tx.send(line);
                    }
                    for gen in &self.spectra {
                        let line = to_wire_line(&Reading::Spectral(gen.sample(&mut rng)));
                        let _ = tx.send(line);
                    }
                }
            }
        }

        accept_task.abort();
        Ok(())
    }
}

fn to_wire_line(reading: &Reading) -> String {
    let (mut value, kind) = match reading {
        Reading::Scalar(r) => (
            serde_json::to_value(r).expect("ScalarReading always serializes"),
            "sensor_reading",
        ),
        Reading::Spectral(r) => (
            serde_json::to_value(r).expect("SpectralReading always serializes"),
            "ftir_spectrum",
        ),
    };
    value
        .as_object_mut()
        .expect("a reading always serializes to a JSON object")
        .insert("type".to_string(), serde_json::Value::String(kind.to_string()));
    value.to_string()
}

async fn serve_client(mut socket: TcpStream, mut rx: broadcast::Receiver<String>) {
    loop {
        match rx.recv().await {
            Ok(line) => {
                if socket
                    .write_all(format!("{line}\n").as_bytes())
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}
