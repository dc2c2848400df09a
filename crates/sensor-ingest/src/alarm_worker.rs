//! Consumes Q1, updates the StateStore, runs one alarm evaluation cycle,
//! and publishes the resulting events to Q2.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use sensor_core::{AlarmEngine, StateStore};
use sensor_wire::{AlarmEvent, Reading};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// The atomic "update store, evaluate, publish" sequence performed for
/// every reading. A panic from any step is caught and logged; it must
/// never stop the worker.
pub struct Controller {
    store: Arc<StateStore>,
    engine: Arc<AlarmEngine>,
    output: Sender<AlarmEvent>,
}

impl Controller {
    pub fn new(store: Arc<StateStore>, engine: Arc<AlarmEngine>, output: Sender<AlarmEvent>) -> Self {
        Self {
            store,
            engine,
            output,
        }
    }

    pub fn handle(&self, reading: Reading) {
        // Safety: AssertUnwindSafe is sound here. On a caught panic we only
        // log and return; no state observed by the closure (store, engine)
        // is touched again afterwards in this call.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            match reading {
                Reading::Scalar(r) => self.store.update_scalar(r),
                Reading::Spectral(r) => self.store.update_spectrum(r),
            }
            self.engine.run_once(&self.store, None)
        }));
        let events = match result {
            Ok(events) => events,
            Err(panic) => {
                error!(panic = %panic_message(&panic), "controller step panicked, continuing");
                return;
            }
        };
        for event in events {
            if self.output.try_send(event).is_err() {
                warn!("Q2 full or closed, dropping newest alarm event");
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

pub struct AlarmWorker {
    input: Receiver<Reading>,
    controller: Controller,
    stop: CancellationToken,
}

impl AlarmWorker {
    pub fn new(input: Receiver<Reading>, controller: Controller) -> Self {
        Self {
            input,
            controller,
            stop: CancellationToken::new(),
        }
    }

    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    pub fn start(mut self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = self.stop.cancelled() => break,
                    reading = self.input.recv() => {
                        match reading {
                            Some(reading) => {
                                self.controller.handle(reading);
                            }
                            None => {
                                error!("Q1 closed, stopping AlarmWorker");
                                break;
                            }
                        }
                    }
                }
            }
        })
    }
}
