//! Column and table metadata as supplied by the metadata loader.

use serde::{Deserialize, Serialize};

use crate::enums::DataType;
use crate::error::ValidationError;

fn default_true() -> bool {
    true
}

fn default_database() -> String {
    "default".to_string()
}

/// Metadata for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name. Must be non-empty.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
    /// Free-text description, may be empty.
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub is_key: bool,
    /// Sample values in source order.
    #[serde(default)]
    pub examples: Vec<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            nullable: true,
            is_key: false,
            examples: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_key(mut self, is_key: bool) -> Self {
        self.is_key = is_key;
        self
    }

    #[must_use]
    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    /// Check the metadata contract: the name must not be blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyColumnName);
        }
        Ok(())
    }

    /// Text the classifiers match against.
    ///
    /// Name, description and declared type joined by spaces, split at
    /// camelCase boundaries, lower-cased, with identifier separators
    /// (`_ - . /`) turned into spaces and whitespace collapsed.
    pub fn search_text(&self) -> String {
        let combined = format!(
            "{} {} {}",
            self.name,
            self.description,
            self.data_type.as_str()
        );
        normalize_search_text(&combined)
    }
}

/// Split camelCase words, lower-case, replace separators with spaces and
/// collapse whitespace.
///
/// `phoneNumber` becomes `phone number` and `SSNNumber` becomes
/// `ssn number`.
pub fn normalize_search_text(text: &str) -> String {
    split_camel_case(text)
        .to_lowercase()
        .replace(['_', '-', '.', '/'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insert a space at every lower-to-upper boundary and before the last
/// capital of an acronym that starts a new word.
fn split_camel_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

/// Metadata for a table and its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub table_name: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            table_name: table_name.into(),
            database: default_database(),
            description: String::new(),
            owner: String::new(),
            columns,
        }
    }

    /// Find a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_text_normalizes_separators() {
        let column = ColumnMetadata::new("Customer_Email", DataType::String)
            .with_description("Primary  e-mail address.");
        assert_eq!(
            column.search_text(),
            "customer email primary e mail address string"
        );
    }

    #[test]
    fn camel_case_names_split_into_words() {
        assert_eq!(normalize_search_text("phoneNumber"), "phone number");
        assert_eq!(normalize_search_text("customerEmail"), "customer email");
        assert_eq!(normalize_search_text("SSNNumber"), "ssn number");
        assert_eq!(normalize_search_text("address2Line"), "address2 line");
        assert_eq!(normalize_search_text("ZIP_CODE"), "zip code");
        let column = ColumnMetadata::new("dateOfBirth", DataType::Date);
        assert_eq!(column.search_text(), "date of birth date");
    }

    #[test]
    fn blank_name_fails_validation() {
        let column = ColumnMetadata::new("   ", DataType::Int);
        assert_eq!(column.validate(), Err(ValidationError::EmptyColumnName));
        assert!(ColumnMetadata::new("id", DataType::Int).validate().is_ok());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"name": "zip_code", "data_type": "string"}"#;
        let column: ColumnMetadata = serde_json::from_str(json).unwrap();
        assert!(column.nullable);
        assert!(!column.is_key);
        assert!(column.description.is_empty());
        assert!(column.examples.is_empty());
    }
}
