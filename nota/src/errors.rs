//! Definition of errors.

use thiserror::Error;

pub type Result<T, E = NotaError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum NotaError {
    #[error(transparent)]
    InvalidModel(#[from] InvalidModelError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    DecodeError(#[from] bincode::error::DecodeError),

    #[error(transparent)]
    EncodeError(#[from] bincode::error::EncodeError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl NotaError {
    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }
}

/// Error used when the model is invalid.
#[derive(Debug, Error)]
#[error("InvalidModelError: {msg}")]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

/// Error used when the argument is invalid.
#[derive(Debug, Error)]
#[error("InvalidArgumentError: {arg}: {msg}")]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

/// Error used when a model was trained against a different feature schema.
#[derive(Debug, Error)]
#[error("SchemaMismatchError: expected `{expected}`, found {found}")]
pub struct SchemaMismatchError {
    /// Schema identifier this build extracts.
    pub(crate) expected: &'static str,

    /// Schema identifier, or a description of the offending keys.
    pub(crate) found: String,
}
