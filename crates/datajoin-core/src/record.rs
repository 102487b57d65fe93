#![forbid(unsafe_code)]

//! Input records and validated record sequences.
//!
//! A [`Record`] is the unit of data bound to a visual element. A [`RecordSet`]
//! is an ordered sequence of records whose keys are known to be unique, which
//! is the precondition for a one-to-one element mapping.
//!
//! # Example
//! ```
//! use datajoin_core::record::{Record, RecordSet};
//!
//! let set = RecordSet::from_json_str(r#"[{"k": 1, "v": 1}, {"key": 2, "value": 4}]"#).unwrap();
//! assert_eq!(set.as_slice(), &[Record::new(1, 1), Record::new(2, 4)]);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable `{ key, value }` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Identity of the record; becomes the element identifier.
    #[serde(alias = "k")]
    pub key: i64,
    /// Payload; drives the visual encoding and the displayed text.
    #[serde(alias = "v")]
    pub value: i64,
}

impl Record {
    /// The canonical five-record dataset: squares of `1..=5`.
    pub const DEFAULT_DATASET: [Record; 5] = [
        Record::new(1, 1),
        Record::new(2, 4),
        Record::new(3, 9),
        Record::new(4, 16),
        Record::new(5, 25),
    ];

    /// Create a record.
    #[inline]
    pub const fn new(key: i64, value: i64) -> Self {
        Self { key, value }
    }
}

impl From<(i64, i64)> for Record {
    fn from((key, value): (i64, i64)) -> Self {
        Self::new(key, value)
    }
}

/// Errors raised while building a [`RecordSet`].
#[derive(Debug)]
pub enum RecordError {
    /// Two records share a key.
    DuplicateKey {
        key: i64,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        second: usize,
    },
    /// The JSON input could not be parsed as a record array.
    Parse(serde_json::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { key, first, second } => write!(
                f,
                "duplicate record key {key} at positions {first} and {second}"
            ),
            Self::Parse(err) => write!(f, "invalid record data: {err}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::DuplicateKey { .. } => None,
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// An ordered sequence of records with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Validate `records`, rejecting the first repeated key.
    pub fn new(records: Vec<Record>) -> Result<Self, RecordError> {
        let mut seen: HashMap<i64, usize> = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if let Some(&first) = seen.get(&record.key) {
                return Err(RecordError::DuplicateKey {
                    key: record.key,
                    first,
                    second: idx,
                });
            }
            seen.insert(record.key, idx);
        }
        Ok(Self { records })
    }

    /// The canonical dataset from [`Record::DEFAULT_DATASET`].
    pub fn default_dataset() -> Self {
        Self {
            records: Record::DEFAULT_DATASET.to_vec(),
        }
    }

    /// Parse a JSON array of records.
    ///
    /// Both `{"key", "value"}` and the short `{"k", "v"}` field names are accepted.
    pub fn from_json_str(json: &str) -> Result<Self, RecordError> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Records in input order.
    #[inline]
    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the set and return the underlying records.
    pub fn into_vec(self) -> Vec<Record> {
        self.records
    }
}

impl AsRef<[Record]> for RecordSet {
    fn as_ref(&self) -> &[Record] {
        &self.records
    }
}

impl TryFrom<Vec<Record>> for RecordSet {
    type Error = RecordError;

    fn try_from(records: Vec<Record>) -> Result<Self, Self::Error> {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dataset_is_squares() {
        let set = RecordSet::default_dataset();
        let values: Vec<i64> = set.as_slice().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1, 4, 9, 16, 25]);
        assert!(set.as_slice().iter().all(|r| r.value == r.key * r.key));
    }

    #[test]
    fn duplicate_key_reports_both_positions() {
        let err = RecordSet::new(vec![
            Record::new(1, 1),
            Record::new(2, 4),
            Record::new(1, 9),
        ])
        .unwrap_err();
        match err {
            RecordError::DuplicateKey { key, first, second } => {
                assert_eq!((key, first, second), (1, 0, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_set_is_valid() {
        let set = RecordSet::new(Vec::new()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn json_accepts_short_and_long_field_names() {
        let set = RecordSet::from_json_str(
            r#"[{"k": 3, "v": 9}, {"key": 4, "value": 16}]"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0], Record::new(3, 9));
        assert_eq!(set.as_slice()[1], Record::new(4, 16));
    }

    #[test]
    fn json_errors_are_parse_errors() {
        let err = RecordSet::from_json_str(r#"[{"k": "one", "v": 1}]"#).unwrap_err();
        assert!(matches!(err, RecordError::Parse(_)));
        assert!(err.to_string().starts_with("invalid record data"));
    }

    #[test]
    fn json_duplicates_are_rejected() {
        let err = RecordSet::from_json_str(r#"[{"k": 7, "v": 1}, {"k": 7, "v": 2}]"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "duplicate record key 7 at positions 0 and 1");
    }

    #[test]
    fn serializes_with_long_names() {
        let json = serde_json::to_string(&Record::new(2, 4)).unwrap();
        assert_eq!(json, r#"{"key":2,"value":4}"#);
    }
}
