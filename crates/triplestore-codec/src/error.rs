use thiserror::Error;

use crate::wire::Field;

/// Boxed error from a pluggable decoder.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{field} too large: {size} bytes (max {max})")]
    TooLarge {
        field: Field,
        size: usize,
        max: usize,
    },

    #[error("cannot decode {field}: {source}")]
    Field {
        field: Field,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} is not valid utf-8")]
    InvalidUtf8 { field: Field },

    #[error("unknown object type tag: {0}")]
    UnknownObjectTag(u8),

    #[error("source {name}: {source}")]
    Source {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("dataset worker failed: {0}")]
    Worker(#[source] BoxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;
