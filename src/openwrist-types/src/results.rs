use std::collections::HashMap;

use serde::{Deserialize, Serialize, ser::SerializeMap};

use crate::ConfigError;

/// One cell of the results table. Missing cells and NaN numbers both
/// serialize to `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl ResultValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for ResultValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Values produced for a single day, merged into [`ResultsTable`] as one row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayRecord {
    values: Vec<(String, ResultValue)>,
}

impl DayRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ResultValue>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ResultValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn extend<I, N>(&mut self, values: I)
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        for (name, value) in values {
            self.set(name, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Column-oriented, day-indexed results. Columns are reserved up front and
/// every row has one cell per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultsTable {
    columns: Vec<String>,
    values: Vec<Vec<ResultValue>>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a column. Existing rows get a missing cell for it.
    pub fn reserve(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(ConfigError::DuplicateColumn(name));
        }
        self.values.push(vec![ResultValue::Missing; self.n_days()]);
        self.columns.push(name);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[ResultValue]> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(&self.values[idx])
    }

    pub fn n_days(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Appends one row. Columns absent from `record` stay missing; names in
    /// `record` that were never reserved are returned and dropped.
    pub fn push_day(&mut self, record: DayRecord) -> Vec<String> {
        let mut incoming: HashMap<String, ResultValue> = record.values.into_iter().collect();

        for (name, column) in self.columns.iter().zip(self.values.iter_mut()) {
            column.push(incoming.remove(name).unwrap_or_default());
        }

        let mut unknown: Vec<String> = incoming.into_keys().collect();
        unknown.sort();
        unknown
    }
}

impl Serialize for ResultsTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, column) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(name, column)?;
        }
        map.end()
    }
}
