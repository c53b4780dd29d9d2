//! Secret records and the fetching abstraction used to resolve them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// A Kubernetes secret as stored in the secret backend.
///
/// The JSON form mirrors the Kubernetes `Secret` object: `data` maps keys to
/// base64-encoded payloads and `type` classifies the secret (`Opaque`,
/// `kubernetes.io/dockerconfigjson`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct K8sSecret {
    /// Decoded payloads keyed by data key.
    #[serde(default, with = "base64_data")]
    pub data: HashMap<String, Vec<u8>>,
    /// Secret type tag.
    #[serde(rename = "type", default)]
    pub secret_type: String,
}

impl K8sSecret {
    /// Decode a secret from the JSON bytes returned by a backend.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Get the payload for a data key.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.data.get(key).map(|v| v.as_slice())
    }

    /// Get the payload for a data key as UTF-8 text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| std::str::from_utf8(v).ok())
    }
}

/// Payloads travel as base64 strings. Values that are not valid base64 are
/// kept verbatim as their UTF-8 bytes. A plain value that happens to be valid
/// base64 (`"test"`, `"abcd"`) is decoded, so plain payloads must not rely on
/// the fallback.
mod base64_data {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        data: &HashMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(data.len()))?;
        for (key, value) in data {
            map.serialize_entry(key, &STANDARD.encode(value))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<String, Vec<u8>>, D::Error> {
        let raw = Option::<HashMap<String, String>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                let bytes = match STANDARD.decode(value.as_bytes()) {
                    Ok(decoded) => decoded,
                    Err(_) => value.into_bytes(),
                };
                (key, bytes)
            })
            .collect())
    }
}

/// Trait for backends that fetch raw secret payloads by identifier.
///
/// Implementations return the JSON encoding of a [`K8sSecret`]. Calls may
/// block; retries and timeouts belong to the implementation.
pub trait SecretFetcher: Send + Sync {
    /// Fetch the raw payload stored under `id`.
    fn get(&self, id: &str) -> Result<Vec<u8>>;
}

impl<T: SecretFetcher + ?Sized> SecretFetcher for &T {
    fn get(&self, id: &str) -> Result<Vec<u8>> {
        (**self).get(id)
    }
}

impl<T: SecretFetcher + ?Sized> SecretFetcher for Box<T> {
    fn get(&self, id: &str) -> Result<Vec<u8>> {
        (**self).get(id)
    }
}

/// In-memory secret backend.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretFetcher {
    secrets: HashMap<String, Vec<u8>>,
}

impl StaticSecretFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw payload under `id`.
    pub fn with_secret(mut self, id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        self.insert(id, payload);
        self
    }

    /// Add a secret record under `id`, stored in its JSON form.
    pub fn with_record(self, id: impl Into<String>, secret: &K8sSecret) -> Result<Self> {
        let payload =
            serde_json::to_vec(secret).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(self.with_secret(id, payload))
    }

    pub fn insert(&mut self, id: impl Into<String>, payload: impl Into<Vec<u8>>) {
        self.secrets.insert(id.into(), payload.into());
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl SecretFetcher for StaticSecretFetcher {
    fn get(&self, id: &str) -> Result<Vec<u8>> {
        self.secrets
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}
