use pat_model::{SensitivityClass, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    /// No policy for the consumer type, or (with `sensitivity`) no rule for that class.
    #[error("{}", format_not_found(.consumer_type, .sensitivity))]
    NotFound {
        consumer_type: String,
        sensitivity: Option<SensitivityClass>,
    },

    #[error("policy `{consumer_type}` is missing rules for: {}", format_missing(.missing))]
    Incomplete {
        consumer_type: String,
        missing: Vec<SensitivityClass>,
    },

    #[error("policy `{consumer_type}`: {source}")]
    Validation {
        consumer_type: String,
        #[source]
        source: ValidationError,
    },

    #[error("invalid policy TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

fn format_not_found(consumer_type: &str, sensitivity: &Option<SensitivityClass>) -> String {
    match sensitivity {
        Some(class) => format!("policy `{consumer_type}` has no rule for {class}"),
        None => format!("no policy registered for consumer type `{consumer_type}`"),
    }
}

fn format_missing(missing: &[SensitivityClass]) -> String {
    missing
        .iter()
        .map(SensitivityClass::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PolicyError>;
