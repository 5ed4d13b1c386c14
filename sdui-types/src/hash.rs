use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Hashes a JSON value into a lowercase hex SHA-256 digest.
///
/// Object keys are sorted before hashing, so two structurally equal values
/// always produce the same hash regardless of how they were built.
pub fn content_hash(value: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical(value).to_string().as_bytes());
    hex::encode(hasher.finalize())
}

fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonical(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}
