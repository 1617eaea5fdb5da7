use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One raw telemetry value as delivered by the acquisition layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawEntry {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawEntry {
    /// Integer view. Floats truncate toward zero, text must parse whole.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawEntry::Int(v) => Some(*v),
            RawEntry::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            RawEntry::Float(_) => None,
            RawEntry::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Text view. Numbers render with their natural formatting.
    pub fn as_text(&self) -> String {
        match self {
            RawEntry::Int(v) => v.to_string(),
            RawEntry::Float(v) => v.to_string(),
            RawEntry::Text(s) => s.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawEntry::Int(_) => "int",
            RawEntry::Float(_) => "float",
            RawEntry::Text(_) => "text",
        }
    }
}

impl From<i64> for RawEntry {
    fn from(v: i64) -> Self {
        RawEntry::Int(v)
    }
}

impl From<i32> for RawEntry {
    fn from(v: i32) -> Self {
        RawEntry::Int(i64::from(v))
    }
}

impl From<f64> for RawEntry {
    fn from(v: f64) -> Self {
        RawEntry::Float(v)
    }
}

impl From<&str> for RawEntry {
    fn from(v: &str) -> Self {
        RawEntry::Text(v.to_string())
    }
}

impl From<String> for RawEntry {
    fn from(v: String) -> Self {
        RawEntry::Text(v)
    }
}

/// Key-addressed view of the external telemetry table.
/// An unknown key is `None`, never a fault.
pub trait RawSource: Send + Sync {
    fn entry(&self, key: &str) -> Option<RawEntry>;
}

impl<T: RawSource + ?Sized> RawSource for Arc<T> {
    fn entry(&self, key: &str) -> Option<RawEntry> {
        (**self).entry(key)
    }
}

/// In-memory raw table. Hosts that already hold parsed telemetry feed it
/// through `insert`; tests use it directly.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    entries: Arc<RwLock<HashMap<String, RawEntry>>>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<RawEntry>) {
        let (key, value) = (key.into(), value.into());
        self.entries.write().insert(key, value);
    }

    pub fn remove(&self, key: &str) -> Option<RawEntry> {
        self.entries.write().remove(key)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RawSource for RawTable {
    fn entry(&self, key: &str) -> Option<RawEntry> {
        self.entries.read().get(key).cloned()
    }
}
