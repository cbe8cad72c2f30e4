use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

static NULL_VALUE: Value = Value::Null;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Display text of the value. Dates render as `YYYY-MM-DD`, null as "".
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Bool(value) => value.to_string(),
            Value::Text(value) => value.clone(),
            Value::Date(value) => value.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Missing cells read as [`Value::Null`].
    pub fn get(&self, column: &str) -> &Value {
        self.cells.get(column).unwrap_or(&NULL_VALUE)
    }
}

/// Row-oriented table of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// All values of one column in row order.
    pub fn column_values(&self, column: &str) -> Vec<Value> {
        self.rows.iter().map(|row| row.get(column).clone()).collect()
    }

    /// Overwrite a column with `values`, one per row.
    pub fn set_column_values(&mut self, column: &str, values: Vec<Value>) {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.cells.insert(column.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_formats_dates() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(Value::Date(date).render(), "2020-01-01");
        assert_eq!(Value::Null.render(), "");
        assert_eq!(Value::Float(2.5).render(), "2.5");
    }

    #[test]
    fn column_round_trip() {
        let mut table = Table::new("people", vec!["name".to_string()]);
        table.push_row(Row::new().with("name", "Ann"));
        table.push_row(Row::new());
        assert_eq!(
            table.column_values("name"),
            vec![Value::from("Ann"), Value::Null]
        );
        table.set_column_values("name", vec![Value::from("A"), Value::from("B")]);
        assert_eq!(table.rows[1].get("name"), &Value::from("B"));
    }
}
