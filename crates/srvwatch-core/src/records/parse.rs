//! Decoding of status documents into [`Record`]s.
//!
//! A document is a JSON object (one record) or an array of objects (one
//! record per element). Nested objects are flattened into dotted field names
//! before the required fields are looked up, so `{"meta": {"dc": "eu"}}`
//! becomes the field `meta.dc`.

use crate::records::errors::RecordError;
use crate::records::types::{Record, ServerId, Status};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const SERVER_ID_FIELD: &str = "server_id";
pub const STATUS_FIELD: &str = "status";
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Offset-less formats, read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

type Row = BTreeMap<String, Value>;

/// Parse one object's bytes into records.
///
/// The whole document fails on the first invalid record.
pub fn parse_document(key: &str, bytes: &[u8]) -> Result<Vec<Record>, RecordError> {
    let text = std::str::from_utf8(bytes).map_err(|_| RecordError::InvalidUtf8 {
        key: key.to_string(),
    })?;

    let document: Value = serde_json::from_str(text).map_err(|e| RecordError::InvalidJson {
        key: key.to_string(),
        message: e.to_string(),
    })?;

    normalize(key, document)?
        .into_iter()
        .enumerate()
        .map(|(index, row)| record_from_row(key, index, row))
        .collect()
}

/// Turn a document into flat rows.
fn normalize(key: &str, document: Value) -> Result<Vec<Row>, RecordError> {
    match document {
        Value::Object(object) => Ok(vec![flatten_object(object)]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(flatten_object(object)),
                other => Err(RecordError::UnexpectedShape {
                    key: key.to_string(),
                    found: value_kind(&other),
                }),
            })
            .collect(),
        other => Err(RecordError::UnexpectedShape {
            key: key.to_string(),
            found: value_kind(&other),
        }),
    }
}

/// Flatten nested objects into dotted field names. Arrays are kept as values.
pub fn flatten_object(object: Map<String, Value>) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(&mut flat, None, object);
    flat
}

fn flatten_into(flat: &mut Row, prefix: Option<&str>, object: Map<String, Value>) {
    for (field, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field,
        };

        match value {
            Value::Object(nested) if !nested.is_empty() => {
                flatten_into(flat, Some(&name), nested);
            }
            other => {
                flat.insert(name, other);
            }
        }
    }
}

fn record_from_row(key: &str, index: usize, mut row: Row) -> Result<Record, RecordError> {
    let server_id = take_required(&mut row, key, index, SERVER_ID_FIELD)?;
    let server_id =
        ServerId::from_value(&server_id).ok_or_else(|| RecordError::InvalidServerId {
            key: key.to_string(),
            index,
            found: value_kind(&server_id),
        })?;

    let status = match take_required(&mut row, key, index, STATUS_FIELD)? {
        Value::String(raw) => Status::parse(&raw),
        other => {
            return Err(RecordError::InvalidStatus {
                key: key.to_string(),
                index,
                found: value_kind(&other),
            });
        }
    };

    let raw_timestamp = take_required(&mut row, key, index, TIMESTAMP_FIELD)?;
    let timestamp =
        parse_timestamp(&raw_timestamp).ok_or_else(|| RecordError::InvalidTimestamp {
            key: key.to_string(),
            index,
            value: raw_timestamp.to_string(),
        })?;

    Ok(Record {
        server_id,
        status,
        timestamp,
        source_key: key.to_string(),
        extra: row,
    })
}

/// Null counts as missing.
fn take_required(
    row: &mut Row,
    key: &str,
    index: usize,
    field: &'static str,
) -> Result<Value, RecordError> {
    match row.remove(field) {
        Some(Value::Null) | None => Err(RecordError::MissingField {
            key: key.to_string(),
            index,
            field,
        }),
        Some(value) => Ok(value),
    }
}

/// Parse a timestamp field into a UTC instant.
///
/// Accepts RFC 3339, offset-less date-times (as UTC), plain dates, and
/// integer Unix epoch seconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_str(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.and_utc())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "non-integer number",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
