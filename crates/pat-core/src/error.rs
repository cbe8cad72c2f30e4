use std::path::PathBuf;

use pat_classify::ClassifyError;
use pat_policy::PolicyError;
use pat_transform::TransformError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("secret key `{key}` reads environment variable `{var}`, which is not set")]
    MissingEnv { key: String, var: String },

    #[error("secret key `{key}` is empty")]
    EmptySecret { key: String },

    #[error("invalid config: {message}")]
    Invalid { message: String },

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("table `{table}` has no metadata for column `{column}`")]
    UnknownColumn { table: String, column: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized(#[source] tracing_subscriber::util::TryInitError),
}
