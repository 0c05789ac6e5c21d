//! Versioned record files and schema migrations
//!
//! Every record file is an envelope `{"schema_version": N, "records": [...]}`.
//! A bare JSON array (the shape of a raw key-value dump) is version 0.
//! Loading walks each record through `Record::migrate` one version at a time
//! until it reaches `CURRENT_SCHEMA_VERSION`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BankError, BankResult};

use super::repository::Record;

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// On-disk envelope for a record file
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionedFile<T> {
    pub schema_version: u32,
    pub records: Vec<T>,
}

impl<T> VersionedFile<T> {
    pub fn current(records: Vec<T>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            records,
        }
    }
}

/// Split a raw document into its schema version and raw records
pub fn unpack(doc: Value) -> BankResult<(u32, Vec<Value>)> {
    match doc {
        Value::Array(items) => Ok((0, items)),
        Value::Object(mut map) => {
            let raw_version = map
                .get("schema_version")
                .and_then(Value::as_u64)
                .ok_or_else(|| BankError::Migration("Missing schema_version".into()))?;
            let version = u32::try_from(raw_version).map_err(|_| {
                BankError::Migration(format!("Unsupported schema_version {}", raw_version))
            })?;
            let records = match map.remove("records") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(BankError::Migration(format!(
                        "Expected a records array, found {}",
                        json_kind(&other)
                    )))
                }
            };
            Ok((version, records))
        }
        other => Err(BankError::Migration(format!(
            "Expected an object or array, found {}",
            json_kind(&other)
        ))),
    }
}

/// Bring raw records of type `T` from `version` up to the current schema
pub fn upgrade<T: Record>(version: u32, records: Vec<Value>) -> BankResult<Vec<Value>> {
    if version > CURRENT_SCHEMA_VERSION {
        return Err(BankError::Migration(format!(
            "{} file has schema version {}, newer than supported version {}",
            T::KEY,
            version,
            CURRENT_SCHEMA_VERSION
        )));
    }

    records
        .into_iter()
        .map(|mut record| {
            for from in version..CURRENT_SCHEMA_VERSION {
                record = T::migrate(from, record)?;
            }
            Ok(record)
        })
        .collect()
}

/// Decode a raw document into typed records, migrating as needed
///
/// Returns the records and whether a migration happened.
pub fn decode<T: Record>(doc: Value) -> BankResult<(Vec<T>, bool)> {
    let (version, raw) = unpack(doc)?;
    let migrated = version != CURRENT_SCHEMA_VERSION;
    let upgraded = upgrade::<T>(version, raw)?;

    let records = upgraded
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|e| {
                BankError::Migration(format!("{} record #{}: {}", T::KEY, index + 1, e))
            })
        })
        .collect::<BankResult<Vec<T>>>()?;

    Ok((records, migrated))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Transaction};
    use serde_json::json;

    fn raw_transaction(amount: i64, incoming: Option<bool>) -> Value {
        let mut value = json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "account_id": "550e8400-e29b-41d4-a716-446655440001",
            "name": "Pharmacy",
            "category": "Health",
            "amount": amount,
            "date": "2026-10-01",
            "created_at": "2026-10-01T10:00:00Z"
        });
        if let Some(incoming) = incoming {
            value["is_incoming"] = json!(incoming);
        }
        value
    }

    #[test]
    fn test_unpack_bare_array_is_version_zero() {
        let (version, records) = unpack(json!([1, 2])).unwrap();
        assert_eq!(version, 0);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_unpack_envelope() {
        let (version, records) = unpack(json!({"schema_version": 1, "records": []})).unwrap();
        assert_eq!(version, 1);
        assert!(records.is_empty());
        assert!(unpack(json!({"records": []})).is_err());
        assert!(unpack(json!("text")).is_err());
    }

    #[test]
    fn test_newer_version_rejected() {
        let doc = json!({"schema_version": CURRENT_SCHEMA_VERSION + 1, "records": []});
        let result = decode::<Transaction>(doc);
        assert!(matches!(result, Err(BankError::Migration(_))));
    }

    #[test]
    fn test_schema_version_beyond_u32_rejected() {
        // Truncating 2^32 + 1 would read as version 1
        let doc = json!({"schema_version": 4_294_967_297u64, "records": []});
        assert!(matches!(unpack(doc), Err(BankError::Migration(_))));
    }

    #[test]
    fn test_signed_legacy_transactions_migrate() {
        let doc = json!([raw_transaction(-25000, None), raw_transaction(100000, None)]);
        let (records, migrated) = decode::<Transaction>(doc).unwrap();

        assert!(migrated);
        assert!(!records[0].is_incoming);
        assert_eq!(records[0].amount, Money::from_units(250));
        assert!(records[1].is_incoming);
        assert_eq!(records[1].amount, Money::from_units(1000));
    }

    #[test]
    fn test_current_file_is_not_migrated() {
        let doc = json!({"schema_version": 1, "records": [raw_transaction(500, Some(false))]});
        let (records, migrated) = decode::<Transaction>(doc).unwrap();
        assert!(!migrated);
        assert_eq!(records.len(), 1);
    }
}
