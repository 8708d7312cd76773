//! In-memory triple store with point-in-time snapshots.
//!
//! A store is a mutable key→triple map. Reading goes through a snapshot:
//! [`TripleStore::snapshot`] copies the current contents into a [`Graph`]
//! with six secondary indices, after which the graph never changes.
//!
//! # Key Types
//!
//! - [`InMemoryStore`] -- `RwLock<HashMap>` store, the only mutable piece
//! - [`Graph`] -- immutable view answering subject / predicate / object and
//!   pairwise lookups
//! - [`dot`] -- Graphviz rendering of one predicate's edges
//!
//! # Design Rules
//!
//! 1. Triples are identified by their canonical key, so adds and removes
//!    are idempotent.
//! 2. A graph is a pure function of the store at snapshot time.
//! 3. Indices share triples through `Arc`; triples are never mutated.

pub mod dot;
pub mod error;
pub mod graph;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use graph::Graph;
pub use memory::InMemoryStore;
pub use traits::TripleStore;
