//! Table-level privacy pipeline.
//!
//! [`PrivacyPipeline`] ties the stages together: column metadata is
//! classified into sensitivity classes, then each classified column of a
//! table is transformed with the rule its class and the receiving consumer
//! type select. [`PipelineConfig`] carries the classifier settings, secret
//! key sources, extra consumer policies and logging options.
//!
//! ```ignore
//! use pat_core::{PipelineConfig, PrivacyPipeline};
//! use pat_core::logging::init_logging;
//!
//! let config = PipelineConfig::load("privacy.toml")?;
//! init_logging(&config.logging.to_log_config()?)?;
//!
//! let pipeline = PrivacyPipeline::from_config(&config)?;
//! let (classification, shared) = pipeline.run(&table, &metadata, "external_partner")?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
mod pipeline;

pub use config::{ClassifierConfig, KeySource, LoggingConfig, PipelineConfig};
pub use error::{ConfigError, LoggingError, PipelineError};
pub use pipeline::{PrivacyPipeline, TableClassification};
