use triplestore_types::{Decoder, Triple};

use crate::error::{StoreError, StoreResult};
use crate::graph::Graph;

/// Mutable triple container that hands out immutable snapshots.
///
/// All implementations must satisfy these invariants:
/// - Triples are identified by their canonical key. Adding a triple whose
///   key is present replaces it; removing an absent one is a no-op.
/// - A [`Graph`] returned by `snapshot` never observes later mutations.
pub trait TripleStore: Send + Sync {
    /// Insert triples, replacing any with the same key.
    fn add(&self, triples: &[Triple]);

    /// Remove triples by key.
    fn remove(&self, triples: &[Triple]);

    /// Capture the current contents as an indexed, read-only view.
    fn snapshot(&self) -> Graph;

    /// Drain `decoder` into the store and return how many triples it produced.
    fn load<D: Decoder>(&self, decoder: &mut D) -> StoreResult<usize>
    where
        Self: Sized,
    {
        let triples = decoder
            .decode()
            .map_err(|e| StoreError::Load(Box::new(e)))?;
        self.add(&triples);
        Ok(triples.len())
    }
}
