//! N-Triples support for the triplestore.
//!
//! - [`Lexer`] -- rune-level scanner with lookahead-based token boundaries
//! - [`Parser`] / [`NTriplesDecoder`] -- line-oriented statement parser
//! - [`NTriplesEncoder`] -- canonical writer, optionally applying a
//!   prefix/base [`Context`]
//!
//! Token text is kept raw: escape sequences inside IRIs and literals are
//! neither interpreted on input nor produced on output.

pub mod context;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod parser;

pub use context::{escape_iri, Context};
pub use encoder::{encode_triple, NTriplesEncoder};
pub use error::{NTriplesError, NTriplesResult};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_str, NTriplesDecoder, Parser};
