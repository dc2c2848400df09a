//! Typed YAML configuration (§6), following the shape of:
//!
//! ```yaml
//! plot_window_seconds: 20
//! sensors:
//!   scalar_configs:
//!     - {name: Pressure, units: bar, low_limit: 1.0, high_limit: 10.0}
//! transport:
//!   tcp_client: {host: 127.0.0.1, port: 9009, timeout_s: 5.0, reconnect_delay_s: 0.5}
//! alarms:
//!   value_eps: 0.5
//!   enable_scalar_limits: true
//!   temp_diff: {sensor_lower: TLOW, sensor_upper: TUP, max_delta: 3.0}
//!   ftir_peak_shift: {sensor_name: FTIR1, expected_peaks_nm: [...], max_allowed_shift_nm: [...]}
//! webhook:
//!   url: https://example.com/hook
//!   auth_header: secret-token
//! ```
//!
//! Missing optional blocks (`temp_diff`, `ftir_peak_shift`) disable the
//! corresponding criterion. Missing required fields are a startup failure,
//! surfaced by serde's own "missing field" errors.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::SensorConfig;

fn default_plot_window_seconds() -> i64 {
    20
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9009
}

fn default_timeout_s() -> f64 {
    5.0
}

fn default_reconnect_delay_s() -> f64 {
    0.5
}

fn default_value_eps() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_max_delta() -> f64 {
    3.0
}

fn default_search_window_nm() -> f64 {
    12.0
}

fn default_webhook_timeout_s() -> f64 {
    3.0
}

/// TCP client connection settings used by the Receiver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: f64,
    #[serde(default = "default_reconnect_delay_s")]
    pub reconnect_delay_s: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_s: default_timeout_s(),
            reconnect_delay_s: default_reconnect_delay_s(),
        }
    }
}

/// Webhook notifier configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub auth_header: Option<String>,
    #[serde(default = "default_webhook_timeout_s")]
    pub timeout_s: f64,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
}

/// Parameters for `TempDiffCriterion`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TempDiffCriterionConfig {
    pub sensor_lower: String,
    pub sensor_upper: String,
    #[serde(default = "default_max_delta")]
    pub max_delta: f64,
}

/// Parameters for `FtirPeakShiftCriterion`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FtirPeakShiftCriterionConfig {
    pub sensor_name: String,
    pub expected_peaks_nm: Vec<f64>,
    pub max_allowed_shift_nm: Vec<f64>,
    #[serde(default = "default_search_window_nm")]
    pub search_window_nm: f64,
    #[serde(default = "default_true")]
    pub require_length_match: bool,
}

/// Alarm engine + criteria configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlarmConfig {
    #[serde(default = "default_value_eps")]
    pub value_eps: f64,
    #[serde(default = "default_true")]
    pub enable_scalar_limits: bool,
    #[serde(default)]
    pub temp_diff: Option<TempDiffCriterionConfig>,
    #[serde(default)]
    pub ftir_peak_shift: Option<FtirPeakShiftCriterionConfig>,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            value_eps: default_value_eps(),
            enable_scalar_limits: true,
            temp_diff: None,
            ftir_peak_shift: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct SensorsSection {
    #[serde(default)]
    scalar_configs: Vec<SensorConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TransportSection {
    #[serde(default)]
    tcp_client: TransportConfig,
}

/// Root application configuration loaded from YAML. The single source of
/// truth for runtime-tunable values.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub plot_window_seconds: i64,
    pub sensors: Vec<SensorConfig>,
    pub transport: TransportConfig,
    pub alarms: AlarmConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Deserialize)]
struct RawAppConfig {
    #[serde(default = "default_plot_window_seconds")]
    plot_window_seconds: i64,
    #[serde(default)]
    sensors: SensorsSection,
    #[serde(default)]
    transport: TransportSection,
    #[serde(default)]
    alarms: AlarmConfig,
    webhook: WebhookConfig,
}

impl AppConfig {
    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawAppConfig = serde_yaml::from_str(text)?;
        let cfg = AppConfig {
            plot_window_seconds: raw.plot_window_seconds,
            sensors: raw.sensors.scalar_configs,
            transport: raw.transport.tcp_client,
            alarms: raw.alarms,
            webhook: raw.webhook,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from a file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for sensor in &self.sensors {
            if !seen.insert(sensor.name.as_str()) {
                return Err(ConfigError::DuplicateSensor(sensor.name.clone()));
            }
        }
        if let Some(ftir) = &self.alarms.ftir_peak_shift {
            if ftir.expected_peaks_nm.len() != ftir.max_allowed_shift_nm.len() {
                return Err(ConfigError::FtirLengthMismatch(
                    ftir.expected_peaks_nm.len(),
                    ftir.max_allowed_shift_nm.len(),
                ));
            }
        }
        Ok(())
    }
}
