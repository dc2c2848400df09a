//! Owns the outbound TCP connection to the publisher, parses NDJSON, and
//! deposits typed readings onto a bounded queue. Reconnects on any I/O
//! failure; only the stop signal is fatal.

use std::time::Duration;

use sensor_wire::{decode_message, Reading};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    pub reconnect_delay: Duration,
}

/// Connection-lifecycle state machine (§4.1). `Streaming` is entered
/// directly from `connect()` on success and left via `stream_loop`'s
/// return value, rather than being its own match arm here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Disconnected,
    Backoff,
    Stopping,
    Stopped,
}

pub struct Receiver {
    config: ReceiverConfig,
    output: Sender<Reading>,
    stop: CancellationToken,
}

impl Receiver {
    pub fn new(config: ReceiverConfig, output: Sender<Reading>) -> Self {
        Self {
            config,
            output,
            stop: CancellationToken::new(),
        }
    }

    /// A handle a caller can use to request shutdown and unblock any
    /// in-progress read.
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// Spawn the receive loop as a long-lived task. The returned handle
    /// completes once `stop_token().cancel()` is called and the loop
    /// observes it.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut state = State::Disconnected;
        loop {
            state = match state {
                State::Disconnected => self.connect().await,
                State::Backoff => self.backoff().await,
                State::Stopping => State::Stopped,
                State::Stopped => break,
            };
        }
        info!(host = %self.config.host, port = self.config.port, "receiver stopped");
    }

    async fn connect(&self) -> State {
        if self.stop.is_cancelled() {
            return State::Stopping;
        }
        let addr = (self.config.host.as_str(), self.config.port);
        let connect = tokio::time::timeout(self.config.connect_timeout, TcpStream::connect(addr));
        match connect.await {
            Ok(Ok(stream)) => {
                info!(host = %self.config.host, port = self.config.port, "connected");
                self.stream_loop(stream).await
            }
            Ok(Err(e)) => {
                warn!(error = %e, "connect failed, backing off");
                State::Backoff
            }
            Err(_) => {
                warn!("connect timed out, backing off");
                State::Backoff
            }
        }
    }

    async fn stream_loop(&self, stream: TcpStream) -> State {
        let mut lines = BufReader::new(stream).lines();
        loop {
            tokio::select! {
                biased;
                () = self.stop.cancelled() => {
                    return State::Stopping;
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => self.handle_line(&line),
                        Ok(None) => {
                            warn!("connection closed by peer (EOF)");
                            return State::Backoff;
                        }
                        Err(e) => {
                            warn!(error = %e, "read error, backing off");
                            return State::Backoff;
                        }
                    }
                }
            }
        }
    }

    fn handle_line(&self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match decode_message(line) {
            Ok(reading) => {
                if self.output.try_send(reading).is_err() {
                    warn!("Q1 full or closed, dropping newest reading");
                }
            }
            Err(e) => {
                debug!(error = %e, line, "malformed line, skipping");
            }
        }
    }

    async fn backoff(&self) -> State {
        tokio::select! {
            () = sleep(self.config.reconnect_delay) => {
                if self.stop.is_cancelled() {
                    State::Stopped
                } else {
                    State::Disconnected
                }
            }
            () = self.stop.cancelled() => State::Stopped,
        }
    }
}
