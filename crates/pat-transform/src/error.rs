use pat_model::TransformKind;
use pat_policy::PolicyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("no transformer registered for `{kind}`")]
    UnsupportedTransform { kind: TransformKind },

    #[error("invalid `{param}` for {kind}: {reason}")]
    InvalidParameter {
        kind: TransformKind,
        param: String,
        reason: String,
    },

    #[error("secret key `{name}` is not configured")]
    MissingSecretKey { name: String },
}

impl TransformError {
    pub(crate) fn invalid(kind: TransformKind, param: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            kind,
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
