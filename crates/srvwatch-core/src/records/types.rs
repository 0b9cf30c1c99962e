use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Server identifier as written in the source document.
///
/// Integer and string ids are kept apart, so `1` and `"1"` are two servers.
/// `UInt` only holds integers above `i64::MAX`, so integer ids still sort
/// numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum ServerId {
    Int(i64),
    UInt(u64),
    Text(String),
}

impl ServerId {
    /// Accepts JSON strings and integral numbers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(ServerId::Text(text.clone())),
            Value::Number(number) => number
                .as_i64()
                .map(ServerId::Int)
                .or_else(|| number.as_u64().map(ServerId::UInt)),
            _ => None,
        }
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerId::Int(id) => write!(f, "{}", id),
            ServerId::UInt(id) => write!(f, "{}", id),
            ServerId::Text(id) => f.write_str(id),
        }
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        ServerId::Text(id.to_string())
    }
}

impl From<i64> for ServerId {
    fn from(id: i64) -> Self {
        ServerId::Int(id)
    }
}

/// Reported server status. Unknown values are kept, not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Warn,
    Error,
    Other(String),
}

impl Status {
    /// Canonical column order of a tally.
    pub const KNOWN: [Status; 3] = [Status::Ok, Status::Warn, Status::Error];

    /// Case-sensitive: `"ok"` is an unknown status.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OK" => Status::Ok,
            "WARN" => Status::Warn,
            "ERROR" => Status::Error,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Ok => "OK",
            Status::Warn => "WARN",
            Status::Error => "ERROR",
            Status::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Other(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One status observation for one server at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub server_id: ServerId,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    /// Object key the record was read from.
    pub source_key: String,
    /// Remaining flattened fields, keyed by dotted path.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// Every record visible at one fetch, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Last `rows` records, fewer if the batch is smaller.
    pub fn tail(&self, rows: usize) -> &[Record] {
        let start = self.records.len().saturating_sub(rows);
        &self.records[start..]
    }

    /// Appends records from one source document, keeping their order.
    pub fn extend(&mut self, records: Vec<Record>) {
        self.records.extend(records);
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
