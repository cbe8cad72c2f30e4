use thiserror::Error;

use crate::enums::TransformKind;

/// Contract violations in metadata and rule vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("column name must not be empty")]
    EmptyColumnName,
    #[error("unknown data type: {0}")]
    UnknownDataType(String),
    #[error("unknown sensitivity class: {0}")]
    UnknownSensitivity(String),
    #[error("unknown transform kind: {0}")]
    UnknownTransformKind(String),
    #[error("unknown parameter `{param}` for {kind} rule")]
    UnknownParameter { kind: TransformKind, param: String },
    #[error("sensitivity class {0} is mapped more than once")]
    DuplicateSensitivity(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
