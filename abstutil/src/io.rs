use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stringifies an object to pretty JSON. Used to compare outputs in tests, so the result must be
/// deterministic.
pub fn to_json<T: Serialize>(obj: &T) -> String {
    serde_json::to_string_pretty(obj).unwrap()
}

pub fn write_json<T: Serialize>(path: &str, obj: &T) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(obj)?;
    fs_err::write(path, json)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let raw = fs_err::read_to_string(path)?;
    let obj: T =
        serde_json::from_str(&raw).with_context(|| format!("couldn't deserialize {}", path))?;
    Ok(obj)
}

/// Returns `None` if the file doesn't exist, but fails if it exists and can't be read.
pub fn maybe_read_json<T: DeserializeOwned>(path: &str) -> Result<Option<T>> {
    if !Path::new(path).exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

// For BTreeMaps with struct keys. See https://github.com/serde-rs/json/issues/402.

pub fn serialize_btreemap<S: Serializer, K: Serialize, V: Serialize>(
    map: &BTreeMap<K, V>,
    s: S,
) -> Result<S::Ok, S::Error> {
    map.iter().collect::<Vec<(_, _)>>().serialize(s)
}

pub fn deserialize_btreemap<
    'de,
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
>(
    d: D,
) -> Result<BTreeMap<K, V>, D::Error> {
    let vec = <Vec<(K, V)>>::deserialize(d)?;
    Ok(vec.into_iter().collect())
}
