//! Shared data model for privacy-aware column classification and transformation.
//!
//! - **metadata**: column and table metadata supplied by the loader
//! - **enums**: data types, sensitivity classes, classification methods, transform kinds
//! - **classification**: per-column classification results and summaries
//! - **rule**: transformation rules and their parameters
//! - **table**: cell values and row-oriented tables

pub mod classification;
pub mod enums;
pub mod error;
pub mod metadata;
pub mod rule;
pub mod table;

pub use classification::{ClassificationResult, ClassificationSummary, clamp_confidence};
pub use enums::{ClassificationMethod, DataType, SensitivityClass, TransformKind};
pub use error::{Result, ValidationError};
pub use metadata::{ColumnMetadata, TableMetadata, normalize_search_text};
pub use rule::{ParamValue, TransformationRule};
pub use table::{Row, Table, Value};
