//! Determinism fingerprints
//!
//! A SHA-256 digest over the canonical JSON of any serializable record.
//! Two replications with the same seed and config must produce identical
//! fingerprints for their configs and for their results.

use super::SimulationError;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Canonical JSON text: object keys sorted at every level
pub fn canonical_json<T: Serialize>(record: &T) -> Result<String, SimulationError> {
    let value = serde_json::to_value(record)
        .map_err(|e| SimulationError::Serialization(format!("fingerprint input: {}", e)))?;

    serde_json::to_string(&canonicalize(value))
        .map_err(|e| SimulationError::Serialization(format!("fingerprint input: {}", e)))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Lowercase hex SHA-256 of [`canonical_json`]
///
/// # Example
/// ```
/// use ed_simulator_core::{fingerprint, SimulationConfig};
///
/// let a = fingerprint(&SimulationConfig::default()).unwrap();
/// let b = fingerprint(&SimulationConfig::default()).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn fingerprint<T: Serialize>(record: &T) -> Result<String, SimulationError> {
    let json = canonical_json(record)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
