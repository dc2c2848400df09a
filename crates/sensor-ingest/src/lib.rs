// sensor-ingest: the Receiver (reconnecting NDJSON TCP client) and the
// AlarmWorker that drives the engine from each reading.

pub mod alarm_worker;
pub mod receiver;

pub use alarm_worker::{AlarmWorker, Controller};
pub use receiver::{Receiver, ReceiverConfig};
