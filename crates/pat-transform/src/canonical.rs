//! Canonical text of a cell for keyed and hashed transforms.
//!
//! Equal logical values must produce equal digests, so numbers are
//! normalized through parsing, booleans are lower-cased and dates are
//! trimmed. Free text under [`DataType::String`] is taken verbatim.

use pat_model::{DataType, Value};

pub fn canonicalize(value: &Value, data_type: DataType) -> String {
    match data_type {
        DataType::Int => canonical_int(value),
        DataType::Float => canonical_float(value),
        DataType::Bool => value.render().trim().to_lowercase(),
        DataType::Date => value.render().trim().to_string(),
        DataType::String => value.render(),
    }
}

fn canonical_int(value: &Value) -> String {
    match value {
        Value::Int(number) => number.to_string(),
        Value::Float(number) if number.fract() == 0.0 && number.is_finite() => {
            format!("{number:.0}")
        }
        Value::Text(text) => {
            let trimmed = text.trim();
            if let Ok(number) = trimmed.parse::<i64>() {
                number.to_string()
            } else if let Ok(number) = trimmed.parse::<f64>() {
                canonical_int(&Value::Float(number))
            } else {
                trimmed.to_string()
            }
        }
        other => other.render(),
    }
}

fn canonical_float(value: &Value) -> String {
    match value {
        Value::Float(number) => number.to_string(),
        Value::Int(number) => (*number as f64).to_string(),
        Value::Text(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<f64>()
                .map(|number| number.to_string())
                .unwrap_or_else(|_| trimmed.to_string())
        }
        other => other.render(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_normalize_across_representations() {
        assert_eq!(canonicalize(&Value::Int(42), DataType::Int), "42");
        assert_eq!(canonicalize(&Value::from(" 042 "), DataType::Int), "42");
        assert_eq!(canonicalize(&Value::Float(42.0), DataType::Int), "42");
        assert_eq!(canonicalize(&Value::from("2.50"), DataType::Float), "2.5");
        assert_eq!(canonicalize(&Value::Int(3), DataType::Float), "3");
    }

    #[test]
    fn booleans_and_dates() {
        assert_eq!(canonicalize(&Value::from("TRUE"), DataType::Bool), "true");
        assert_eq!(canonicalize(&Value::Bool(false), DataType::Bool), "false");
        assert_eq!(canonicalize(&Value::from(" 2020-01-01 "), DataType::Date), "2020-01-01");
    }

    #[test]
    fn strings_are_verbatim() {
        assert_eq!(canonicalize(&Value::from(" John "), DataType::String), " John ");
    }
}
