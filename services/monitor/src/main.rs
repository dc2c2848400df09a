use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use sensor_core::{AlarmEngine, Criterion, FtirPeakShiftCriterion, ScalarLimitCriterion, StateStore, TempDiffCriterion};
use sensor_ingest::{AlarmWorker, Controller, Receiver, ReceiverConfig};
use sensor_notify::{NotifyAdapter, Notifier, WebhookTarget};
use sensor_wire::{AlarmEvent, AppConfig, NotificationRequest, Reading};
use tokio::sync::mpsc;
use tracing::info;

/// Default extra retry attempts for a failed webhook delivery. Not
/// currently a config-file knob (see DESIGN.md).
const RETRY_COUNT: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

const Q1_CAPACITY: usize = 1000;
const Q2_CAPACITY: usize = 1000;
const Q3_CAPACITY: usize = 1000;

#[derive(Parser, Debug)]
#[command(name = "monitor", about = "Sensor alarm monitoring pipeline")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

fn build_criteria(config: &AppConfig) -> Vec<Box<dyn Criterion>> {
    let mut criteria: Vec<Box<dyn Criterion>> = Vec::new();
    if config.alarms.enable_scalar_limits {
        criteria.push(Box::new(ScalarLimitCriterion));
    }
    if let Some(temp_diff) = &config.alarms.temp_diff {
        criteria.push(Box::new(TempDiffCriterion {
            sensor_lower: temp_diff.sensor_lower.clone(),
            sensor_upper: temp_diff.sensor_upper.clone(),
            max_delta: temp_diff.max_delta,
        }));
    }
    if let Some(ftir) = &config.alarms.ftir_peak_shift {
        criteria.push(Box::new(FtirPeakShiftCriterion::new(
            ftir.sensor_name.clone(),
            ftir.expected_peaks_nm.clone(),
            ftir.max_allowed_shift_nm.clone(),
            ftir.search_window_nm,
            ftir.require_length_match,
        )));
    }
    criteria
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "monitor starting");

    let args = Args::parse();
    let config = AppConfig::load(&args.config).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = %args.config, "failed to load configuration");
        process::exit(1);
    });

    let store = Arc::new(StateStore::new());
    for sensor in &config.sensors {
        store.set_config(sensor.clone());
    }

    let engine = Arc::new(AlarmEngine::new(build_criteria(&config), config.alarms.value_eps));

    let (q1_tx, q1_rx) = mpsc::channel::<Reading>(Q1_CAPACITY);
    let (q2_tx, q2_rx) = mpsc::channel::<AlarmEvent>(Q2_CAPACITY);
    let (q3_tx, q3_rx) = mpsc::channel::<NotificationRequest>(Q3_CAPACITY);

    let receiver = Receiver::new(
        ReceiverConfig {
            host: config.transport.host.clone(),
            port: config.transport.port,
            connect_timeout: Duration::from_secs_f64(config.transport.timeout_s),
            reconnect_delay: Duration::from_secs_f64(config.transport.reconnect_delay_s),
        },
        q1_tx,
    );
    let receiver_stop = receiver.stop_token();
    let receiver_handle = receiver.start();

    let controller = Controller::new(store.clone(), engine, q2_tx);
    let alarm_worker = AlarmWorker::new(q1_rx, controller);
    let alarm_worker_stop = alarm_worker.stop_token();
    let alarm_worker_handle = alarm_worker.start();

    let adapter = NotifyAdapter::new(q2_rx, store, q3_tx.clone());
    let adapter_stop = adapter.stop_token();
    let adapter_handle = adapter.start();

    let targets: Vec<Box<dyn sensor_notify::NotificationTarget>> =
        vec![Box::new(WebhookTarget::new(&config.webhook))];
    let notifier = Notifier::new(q3_rx, targets, RETRY_COUNT, RETRY_BACKOFF);
    let notifier_stop = notifier.stop_token();
    let notifier_handle = notifier.start();

    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received, stopping");

    receiver_stop.cancel();
    alarm_worker_stop.cancel();
    adapter_stop.cancel();
    notifier_stop.cancel();
    let _ = q3_tx.send(NotificationRequest::stop()).await;

    let shutdown_timeout = Duration::from_secs(2);
    for handle in [receiver_handle, alarm_worker_handle, adapter_handle, notifier_handle] {
        if tokio::time::timeout(shutdown_timeout, handle).await.is_err() {
            tracing::warn!("a pipeline task did not stop within the shutdown timeout");
        }
    }

    info!("monitor stopped");
}
