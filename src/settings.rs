//! Opaque key-value settings forwarded to index creation.
//!
//! Settings are stored flat: nested document objects collapse into dotted
//! keys and every scalar is kept in its string form. Insertion order is
//! preserved so both codecs are deterministic.

use crate::error::{CcrError, Result};
use crate::stream::{StreamInput, StreamOutput, Writeable};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
  entries: IndexMap<String, String>,
}

impl Settings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  /// Parse a setting into any `FromStr` type. Missing keys yield `Ok(None)`.
  pub fn get_as<T>(&self, key: &str) -> Result<Option<T>>
  where
    T: FromStr,
    T::Err: std::fmt::Display,
  {
    self
      .get(key)
      .map(|raw| {
        raw.parse::<T>().map_err(|error| {
          CcrError::Parse(format!("failed to parse setting [{key}] with value [{raw}]: {error}"))
        })
      })
      .transpose()
  }

  pub fn put(mut self, key: impl Into<String>, value: impl ToString) -> Self {
    self.entries.insert(key.into(), value.to_string());
    self
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
    self.entries.insert(key.into(), value.to_string())
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
  }

  /// Build settings from a document value. `null` is treated as no settings.
  pub fn from_document(value: Value) -> Result<Self> {
    match value {
      Value::Null => Ok(Self::new()),
      Value::Object(map) => {
        let mut settings = Self::new();
        for (key, value) in map {
          flatten_into(&mut settings.entries, key, value)?;
        }
        Ok(settings)
      }
      other => Err(CcrError::Parse(format!(
        "settings must be an object, found {}",
        value_kind(&other)
      ))),
    }
  }

  pub fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
    let count = input.read_u32()? as usize;
    // Each entry needs at least two length prefixes.
    if count > input.remaining() / 8 {
      return Err(CcrError::InvalidWire(format!(
        "settings count {count} exceeds remaining {} bytes",
        input.remaining()
      )));
    }

    let mut entries = IndexMap::with_capacity(count);
    for _ in 0..count {
      let key = input.read_string()?;
      let value = input.read_string()?;
      if entries.insert(key.clone(), value).is_some() {
        return Err(CcrError::InvalidWire(format!("duplicate setting [{key}] in stream")));
      }
    }
    Ok(Self { entries })
  }
}

impl Writeable for Settings {
  fn write_to(&self, out: &mut StreamOutput) -> Result<()> {
    let count = u32::try_from(self.entries.len())
      .map_err(|_| CcrError::InvalidWire(format!("too many settings: {}", self.entries.len())))?;
    out.write_u32(count)?;
    for (key, value) in &self.entries {
      out.write_string(key)?;
      out.write_string(value)?;
    }
    Ok(())
  }
}

impl Serialize for Settings {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    self.entries.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for Settings {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Self::from_document(value).map_err(serde::de::Error::custom)
  }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Settings {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    iter
      .into_iter()
      .fold(Self::new(), |settings, (key, value)| settings.put(key, value))
  }
}

fn flatten_into(entries: &mut IndexMap<String, String>, key: String, value: Value) -> Result<()> {
  match value {
    Value::Object(map) => {
      for (child, value) in map {
        flatten_into(entries, format!("{key}.{child}"), value)?;
      }
      Ok(())
    }
    Value::Array(items) => {
      for (idx, value) in items.into_iter().enumerate() {
        flatten_into(entries, format!("{key}.{idx}"), value)?;
      }
      Ok(())
    }
    Value::Null => Err(CcrError::Parse(format!("null value for setting [{key}]"))),
    Value::String(raw) => insert_unique(entries, key, raw),
    Value::Bool(flag) => insert_unique(entries, key, flag.to_string()),
    Value::Number(number) => insert_unique(entries, key, number.to_string()),
  }
}

fn insert_unique(entries: &mut IndexMap<String, String>, key: String, value: String) -> Result<()> {
  if entries.contains_key(&key) {
    return Err(CcrError::Parse(format!("duplicate setting [{key}]")));
  }
  entries.insert(key, value);
  Ok(())
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
