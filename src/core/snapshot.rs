//! Comparable representation of fetched content.

use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

/// Number of hex characters shown in logs and notifications.
const SHORT_LEN: usize = 8;

/// Digest of a target's content as last observed.
///
/// Two bodies produce the same snapshot when they carry the same data:
/// JSON bodies are compared after sorting object keys, anything else is
/// compared line by line with trailing whitespace removed.
///
/// # Examples
///
/// ```rust
/// use padel_watch::core::Snapshot;
///
/// let a = Snapshot::of(r#"{"court": "A", "free": true}"#);
/// let b = Snapshot::of(r#"{"free": true, "court": "A"}"#);
/// assert_eq!(a, b);
///
/// let c = Snapshot::of(r#"{"free": false, "court": "A"}"#);
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snapshot {
    digest: String,
}

impl Snapshot {
    /// Derive the snapshot of a response body.
    pub fn of(body: &str) -> Self {
        let normalized = normalize(body);
        Self {
            digest: hex::encode(Sha256::digest(normalized.as_bytes())),
        }
    }

    /// Full hex-encoded SHA-256 digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Digest prefix used for human-readable output.
    pub fn short(&self) -> &str {
        &self.digest[..SHORT_LEN]
    }
}

fn normalize(body: &str) -> String {
    match serde_json::from_str::<JsonValue>(body) {
        Ok(value) => canonical_json(value).to_string(),
        Err(_) => body
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Rebuild objects with their keys in sorted order, independent of how
/// `serde_json::Map` is backed in the final build.
fn canonical_json(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            JsonValue::Object(
                entries
                    .into_iter()
                    .map(|(key, val)| (key, canonical_json(val)))
                    .collect(),
            )
        }
        JsonValue::Array(items) => {
            JsonValue::Array(items.into_iter().map(canonical_json).collect())
        }
        other => other,
    }
}
