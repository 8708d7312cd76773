use thiserror::Error;

/// Errors produced while lexing, parsing, or encoding N-Triples.
#[derive(Debug, Error)]
pub enum NTriplesError {
    #[error("line {line}: invalid utf-8 at byte {offset}")]
    InvalidUtf8 { line: usize, offset: usize },

    #[error("line {line}: invalid blank node: expecting ':', got {found:?}")]
    InvalidBlankNode { line: usize, found: Option<char> },

    #[error("line {line}: invalid datatype: expecting '{expected}', got {found:?}")]
    InvalidDatatype {
        line: usize,
        expected: char,
        found: char,
    },

    #[error("line {line}: blank node can only be subject or object")]
    BlankNodePredicate { line: usize },

    #[error("line {line}: literal {token:?} misplaced (node count {count})")]
    MisplacedLiteral {
        line: usize,
        token: String,
        count: usize,
    },

    #[error("line {line}: langtag {token:?} misplaced")]
    MisplacedLangTag { line: usize, token: String },

    #[error("line {line}: reaching full stop but missing element (node count {count})")]
    MissingElement { line: usize, count: usize },

    #[error("line {line}: cannot parse at token {token:?} (node count {count})")]
    WrongElementCount {
        line: usize,
        token: String,
        count: usize,
    },

    #[error("line {line}: reached end with no triple")]
    NoTriple { line: usize },

    #[error("line {line}: read failed")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NTriplesError {
    /// The 1-based input line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidUtf8 { line, .. }
            | Self::InvalidBlankNode { line, .. }
            | Self::InvalidDatatype { line, .. }
            | Self::BlankNodePredicate { line }
            | Self::MisplacedLiteral { line, .. }
            | Self::MisplacedLangTag { line, .. }
            | Self::MissingElement { line, .. }
            | Self::WrongElementCount { line, .. }
            | Self::NoTriple { line }
            | Self::Read { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Result alias for N-Triples operations.
pub type NTriplesResult<T> = Result<T, NTriplesError>;
