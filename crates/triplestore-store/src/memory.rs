use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;
use triplestore_types::{Triple, TripleKey};

use crate::graph::Graph;
use crate::traits::TripleStore;

/// In-memory triple store.
///
/// The key→triple map sits behind one `RwLock`. Mutations take the write
/// lock; [`snapshot`](TripleStore::snapshot) holds the read lock while it
/// builds the indices, so a snapshot never sees a half-applied `add`.
pub struct InMemoryStore {
    triples: RwLock<HashMap<TripleKey, Arc<Triple>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            triples: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct triples currently stored.
    pub fn len(&self) -> usize {
        self.triples.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.triples.read().expect("lock poisoned").is_empty()
    }

    /// Remove all triples from the store.
    pub fn clear(&self) {
        self.triples.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleStore for InMemoryStore {
    fn add(&self, triples: &[Triple]) {
        let mut map = self.triples.write().expect("lock poisoned");
        for triple in triples {
            map.insert(triple.key(), Arc::new(triple.clone()));
        }
    }

    fn remove(&self, triples: &[Triple]) {
        let mut map = self.triples.write().expect("lock poisoned");
        for triple in triples {
            map.remove(&triple.key());
        }
    }

    fn snapshot(&self) -> Graph {
        let map = self.triples.read().expect("lock poisoned");
        let graph = Graph::new(map.values().cloned());
        debug!(count = graph.count(), "snapshot taken");
        graph
    }
}

impl FromIterator<Triple> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let map = iter
            .into_iter()
            .map(|t| (t.key(), Arc::new(t)))
            .collect();
        Self {
            triples: RwLock::new(map),
        }
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryStore")
            .field("triple_count", &count)
            .finish()
    }
}
