//! Device records: the flat key-value data driving one render call
//!
//! A record maps dotted keys (`account.1.sip_transport`) to string values for
//! one device. Records are built from CSV rows, JSON objects, or directly
//! from pairs; values are whitespace-trimmed at construction. A missing key
//! is distinct from a key mapped to the empty string: both are falsy for
//! is-set guards, but only a present key resolves a placeholder directly.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while loading device records
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read record file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse CSV records: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Failed to parse JSON records: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unsupported JSON shape: expected an object, an array of objects, or a {{\"phones\": [...]}} wrapper")]
    JsonShape,
}

/// One device's provisioning data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRecord {
    fields: BTreeMap<String, String>,
}

impl DataRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from key/value pairs, trimming values
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.as_ref().trim().to_string()))
            .collect();
        Self { fields }
    }

    /// Insert a value, trimming it
    pub fn set(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.fields
            .insert(key.into(), value.as_ref().trim().to_string());
    }

    /// Insert a value only when the key is missing or empty
    pub fn set_if_unset(&mut self, key: &str, value: &str) {
        let unset = self.fields.get(key).map(|v| v.is_empty()).unwrap_or(true);
        if unset {
            self.fields.insert(key.to_string(), value.trim().to_string());
        }
    }

    /// Value for a key; `None` means the key is absent, not empty
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|s| s.as_str())
    }

    /// Whether the key exists, regardless of value
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All keys, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }
}

/// Primary-account fields the batch loader fills before rendering; they are
/// not in the engine's default table, which only covers keys that may stay
/// unresolved after substitution
pub const PRIMARY_ACCOUNT_DEFAULTS: &[(&str, &str)] = &[
    ("account.1.sip_port", "5060"),
    ("account.1.register_expires", "3600"),
    ("account.1.sip_transport", "udp"),
];

/// Apply [`PRIMARY_ACCOUNT_DEFAULTS`] to fields that are missing or empty
pub fn apply_primary_defaults(record: &mut DataRecord) {
    for (key, value) in PRIMARY_ACCOUNT_DEFAULTS {
        record.set_if_unset(key, value);
    }
}

/// Read one record per CSV row, using the header row for keys
pub fn read_csv(path: &Path) -> Result<Vec<DataRecord>, RecordError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(DataRecord::from_pairs(
            headers.iter().map(str::to_string).zip(row.iter()),
        ));
    }
    Ok(records)
}

/// Read records from a JSON file: an array of objects, a
/// `{"phones": [...]}` wrapper, or a single object
pub fn read_json(path: &Path) -> Result<Vec<DataRecord>, RecordError> {
    let content = std::fs::read_to_string(path)?;
    parse_json_records(&content)
}

/// Parse records from JSON text; see [`read_json`] for the accepted shapes
pub fn parse_json_records(content: &str) -> Result<Vec<DataRecord>, RecordError> {
    let value: Value = serde_json::from_str(content)?;
    let items: Vec<&Value> = match &value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => match obj.get("phones") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(_) => return Err(RecordError::JsonShape),
            None => vec![&value],
        },
        _ => return Err(RecordError::JsonShape),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(obj) => Ok(record_from_object(obj)),
            _ => Err(RecordError::JsonShape),
        })
        .collect()
}

fn record_from_object(obj: &serde_json::Map<String, Value>) -> DataRecord {
    DataRecord::from_pairs(obj.iter().map(|(k, v)| (k.clone(), json_field(v))))
}

/// Scalar JSON values become their string form; null becomes empty
fn json_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
