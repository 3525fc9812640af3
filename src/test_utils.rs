//! Helpers shared by unit tests.
#![cfg(test)]

use serde_json::Value;

use crate::types::{
    TranslationTable,
    VarsMap,
};

/// Build a table from a `json!` literal, panicking on a malformed shape.
#[allow(clippy::unwrap_used)]
pub(crate) fn table_from_json(json: &Value) -> TranslationTable {
    TranslationTable::from_json(json).unwrap()
}

/// Build a vars map from `(name, value)` pairs.
pub(crate) fn vars(pairs: &[(&str, &str)]) -> VarsMap {
    pairs.iter().map(|(name, value)| ((*name).to_string(), (*value).to_string())).collect()
}
