//! Consumer-type policies for privacy transformations.
//!
//! The [`PolicyEngine`] answers one question: given a column's sensitivity
//! class and the consumer receiving the data, which [`TransformationRule`]
//! applies? Policies are registered at setup time, either in code or from
//! TOML definitions, and are read-only afterwards.
//!
//! [`TransformationRule`]: pat_model::TransformationRule

mod definition;
mod engine;
mod error;

pub use definition::{PolicyDefinition, RuleDefinition, parse_definitions};
pub use engine::{
    ConsumerPolicy, EXTERNAL_PARTNER, INTERNAL_ANALYST, PUBLIC, PolicyEngine, REPORTING,
};
pub use error::{PolicyError, Result};
