//! Fact model for the triplestore.
//!
//! This crate defines the subject–predicate–object [`Triple`], its
//! [`Object`] position, typed [`Literal`] values, and the [`Encoder`] /
//! [`Decoder`] traits that every wire format implements. Every other
//! triplestore crate depends on `triplestore-types`.
//!
//! # Key Types
//!
//! - [`Triple`] -- a fact, identified by its canonical [`TripleKey`]
//! - [`Object`] -- either a resource reference or a literal
//! - [`Literal`] -- a value in canonical lexical form plus its [`XsdType`]
//! - [`Record`] -- explicit field table for mapping structs onto triples
//!
//! # Blank Nodes
//!
//! Blank nodes are ordinary resource identifiers that start with `_:`.
//! See [`is_blank_node`].

pub mod codec;
pub mod error;
pub mod literal;
pub mod object;
pub mod record;
pub mod triple;
pub mod xsd;

pub use codec::{Decoder, Encoder};
pub use error::{TypeError, TypeResult};
pub use literal::{Literal, NativeValue, ToLiteral};
pub use object::{is_blank_node, Object, BLANK_NODE_PREFIX};
pub use record::{triples_from_record, EmbedSubject, Field, FieldValue, Record};
pub use triple::{Triple, TripleBuilder, TripleKey};
pub use xsd::{XsdType, XSD_NAMESPACE};
