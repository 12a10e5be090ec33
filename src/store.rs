use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CheckError;

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    read_only: bool,
}

/// Scratch store carrying state from one case to the next
#[derive(Debug, Clone, Default)]
pub struct Store {
    entries: Arc<DashMap<String, Entry>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a value under `key`. A read-only entry can never be replaced.
    pub fn save<V: Serialize>(&self, key: &str, value: &V, read_only: bool) -> Result<(), CheckError> {
        if self.entries.get(key).is_some_and(|entry| entry.read_only) {
            return Err(CheckError::ReadOnly(key.to_string()));
        }

        let value = serde_json::to_value(value)?;
        self.entries.insert(key.to_string(), Entry { value, read_only });

        Ok(())
    }

    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<V, CheckError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| CheckError::MissingState(key.to_string()))?;

        Ok(serde_json::from_value(entry.value.clone())?)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
