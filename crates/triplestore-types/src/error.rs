use thiserror::Error;

use crate::xsd::XsdType;

/// Errors produced by fact-model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported literal type: {0}")]
    UnsupportedLiteral(String),

    #[error("object is not a literal")]
    NotALiteral,

    #[error("literal is not {expected} but {actual}")]
    TypeMismatch { expected: XsdType, actual: XsdType },

    #[error("invalid {datatype} value {value:?}: {reason}")]
    InvalidValue {
        datatype: XsdType,
        value: String,
        reason: String,
    },
}

/// Result alias for fact-model operations.
pub type TypeResult<T> = Result<T, TypeError>;
