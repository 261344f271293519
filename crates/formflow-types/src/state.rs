//! Per-session form answer state.
//!
//! Answers are stored as a map of field name to [`FormValue`]. A value is
//! either a scalar, an ordered list, or a nested record; keeping that split
//! explicit is what lets the state merge be total.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Reserved state field holding the form instance's reference number.
pub const REFERENCE_NUMBER_FIELD: &str = "$$__referenceNumber";

/// A single answer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    /// Ordered sequence (checkbox answers, repeat items).
    List(Vec<FormValue>),
    /// Nested record.
    Record(BTreeMap<String, FormValue>),
}

impl FormValue {
    /// Returns the text content for a [`FormValue::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FormValue::List(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, FormValue::Record(_))
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Number(value.into())
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        // JSON has no NaN/infinity
        serde_json::Number::from_f64(value)
            .map(FormValue::Number)
            .unwrap_or(FormValue::Null)
    }
}

impl<T: Into<FormValue>> From<Vec<T>> for FormValue {
    fn from(values: Vec<T>) -> Self {
        FormValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<FormState> for FormValue {
    fn from(state: FormState) -> Self {
        FormValue::Record(state.0)
    }
}

/// Answers captured for one form instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState(BTreeMap<String, FormValue>);

impl FormState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Option<FormValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<FormValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FormValue> {
        self.0.iter()
    }

    /// The reference number assigned to this form instance, if any.
    pub fn reference_number(&self) -> Option<&str> {
        self.get(REFERENCE_NUMBER_FIELD).and_then(FormValue::as_str)
    }

    /// Builder-style insert, handy for composing updates.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn into_inner(self) -> BTreeMap<String, FormValue> {
        self.0
    }
}

impl From<BTreeMap<String, FormValue>> for FormState {
    fn from(map: BTreeMap<String, FormValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for FormState {
    type Item = (String, FormValue);
    type IntoIter = btree_map::IntoIter<String, FormValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
