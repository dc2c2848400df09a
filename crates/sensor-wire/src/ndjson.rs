//! Newline-delimited JSON decoding for the inbound sensor stream.
//!
//! A single line may accidentally carry more than one concatenated JSON
//! object. Only the first object of dict (map) shape is used; anything
//! after it on the same line is ignored.

use serde_json::Value;

use crate::error::DecodeError;
use crate::models::{Reading, ScalarReading, SpectralReading};

/// Decode one NDJSON line into a typed [`Reading`].
///
/// Mirrors the tolerance of the original stream decoder: a line containing
/// `{...}{...}` decodes only the first object, and a non-object JSON value
/// (e.g. a bare number or array) preceding the first object is skipped.
pub fn decode_message(line: &str) -> Result<Reading, DecodeError> {
    let obj = first_json_object(line)?;
    decode_object(obj)
}

/// Walk a stream of concatenated JSON values and return the first one that
/// is a JSON object (map), ignoring any non-object values before it.
fn first_json_object(line: &str) -> Result<Value, DecodeError> {
    let mut stream = serde_json::Deserializer::from_str(line).into_iter::<Value>();
    for item in &mut stream {
        let value = item?;
        if value.is_object() {
            return Ok(value);
        }
    }
    Err(DecodeError::NoObject)
}

fn decode_object(value: Value) -> Result<Reading, DecodeError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();

    match kind.as_str() {
        "sensor_reading" => {
            let reading: ScalarReading = serde_json::from_value(value)?;
            Ok(Reading::Scalar(reading))
        }
        "ftir_spectrum" => {
            let reading: SpectralReading = serde_json::from_value(value)?;
            Ok(Reading::Spectral(reading))
        }
        other => Err(DecodeError::UnknownType(other.to_string())),
    }
}
