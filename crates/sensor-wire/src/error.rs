use thiserror::Error;

/// Failure decoding one NDJSON line into a typed [`crate::models::Reading`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("line contains no JSON object of dict shape")]
    NoObject,
    #[error("unknown reading type {0:?}")]
    UnknownType(String),
    #[error("missing `type` field")]
    MissingType,
}

/// Failure loading or validating [`crate::config::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("duplicate sensor name in config: {0}")]
    DuplicateSensor(String),
    #[error("ftir_peak_shift config: expected_peaks_nm and max_allowed_shift_nm must have the same length ({0} vs {1})")]
    FtirLengthMismatch(usize, usize),
}
