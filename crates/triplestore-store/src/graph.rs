use std::collections::HashMap;
use std::sync::Arc;

use triplestore_types::{Object, Triple, TripleKey};

use crate::dot;

type Index = HashMap<String, Vec<Arc<Triple>>>;
type PairIndex = HashMap<(String, String), Vec<Arc<Triple>>>;

/// Immutable, multiply-indexed view of a set of triples.
///
/// Every lookup is a map access into an index built once at construction;
/// nothing is computed per query. A `Graph` owns its indices, so it can be
/// shared between threads without locking.
#[derive(Clone, Default)]
pub struct Graph {
    spo: HashMap<TripleKey, Arc<Triple>>,
    s: Index,
    p: Index,
    o: Index,
    sp: PairIndex,
    so: PairIndex,
    po: PairIndex,
}

impl Graph {
    /// Build a graph, keeping the last triple seen for each key.
    pub fn new(triples: impl IntoIterator<Item = Arc<Triple>>) -> Self {
        let mut spo = HashMap::new();
        for triple in triples {
            spo.insert(triple.key(), triple);
        }

        let mut graph = Self::default();
        for triple in spo.values() {
            graph.index(triple);
        }
        graph.spo = spo;
        graph
    }

    fn index(&mut self, triple: &Arc<Triple>) {
        let s = triple.subject();
        let p = triple.predicate();
        let o = triple.object().key();

        push(&mut self.s, s.to_owned(), triple);
        push(&mut self.p, p.to_owned(), triple);
        push(&mut self.o, o.clone(), triple);
        push(&mut self.sp, (s.to_owned(), p.to_owned()), triple);
        push(&mut self.so, (s.to_owned(), o.clone()), triple);
        push(&mut self.po, (p.to_owned(), o), triple);
    }

    /// Returns `true` if the graph holds a triple with the same key.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.spo.contains_key(&triple.key())
    }

    /// Number of distinct triples.
    pub fn count(&self) -> usize {
        self.spo.len()
    }

    /// Returns `true` if the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.spo.is_empty()
    }

    /// All triples, deduplicated, in no particular order.
    pub fn triples(&self) -> impl ExactSizeIterator<Item = &Triple> + '_ {
        self.spo.values().map(Arc::as_ref)
    }

    /// Triples whose subject is `subject`.
    pub fn with_subject(&self, subject: &str) -> &[Arc<Triple>] {
        lookup(&self.s, subject)
    }

    /// Triples whose predicate is `predicate`.
    pub fn with_predicate(&self, predicate: &str) -> &[Arc<Triple>] {
        lookup(&self.p, predicate)
    }

    /// Triples whose object has the same key as `object`.
    pub fn with_object(&self, object: &Object) -> &[Arc<Triple>] {
        lookup(&self.o, &object.key())
    }

    /// Triples matching both `subject` and `predicate`.
    pub fn with_subj_pred(&self, subject: &str, predicate: &str) -> &[Arc<Triple>] {
        lookup(&self.sp, &(subject.to_owned(), predicate.to_owned()))
    }

    /// Triples matching both `subject` and `object`.
    pub fn with_subj_obj(&self, subject: &str, object: &Object) -> &[Arc<Triple>] {
        lookup(&self.so, &(subject.to_owned(), object.key()))
    }

    /// Triples matching both `predicate` and `object`.
    pub fn with_pred_obj(&self, predicate: &str, object: &Object) -> &[Arc<Triple>] {
        lookup(&self.po, &(predicate.to_owned(), object.key()))
    }

    /// Render the resource edges under `predicate` in Graphviz dot syntax.
    pub fn to_dot(&self, predicate: &str) -> String {
        dot::render(predicate, self.with_predicate(predicate).iter().map(Arc::as_ref))
    }
}

fn push<K: std::hash::Hash + Eq>(
    index: &mut HashMap<K, Vec<Arc<Triple>>>,
    key: K,
    triple: &Arc<Triple>,
) {
    index.entry(key).or_default().push(Arc::clone(triple));
}

fn lookup<'a, K, Q>(index: &'a HashMap<K, Vec<Arc<Triple>>>, key: &Q) -> &'a [Arc<Triple>]
where
    K: std::borrow::Borrow<Q> + std::hash::Hash + Eq,
    Q: std::hash::Hash + Eq + ?Sized,
{
    index.get(key).map(Vec::as_slice).unwrap_or(&[])
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Arc::new))
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("triple_count", &self.spo.len())
            .field("subject_count", &self.s.len())
            .field("predicate_count", &self.p.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Graph {
        [
            Triple::build("a", "knows").resource("b"),
            Triple::build("a", "knows").resource("c"),
            Triple::build("b", "knows").resource("c"),
            Triple::build("a", "name").string_literal("Alice"),
            Triple::build("b", "name").string_literal("Bob"),
            Triple::build("b", "age").integer_literal(30),
            Triple::build("c", "label").lang_literal("see", "en"),
        ]
        .into_iter()
        .collect()
    }

    fn all_buckets(g: &Graph, t: &Triple) -> [Vec<Arc<Triple>>; 6] {
        let (s, p, o) = (t.subject(), t.predicate(), t.object());
        [
            g.with_subject(s).to_vec(),
            g.with_predicate(p).to_vec(),
            g.with_object(o).to_vec(),
            g.with_subj_pred(s, p).to_vec(),
            g.with_subj_obj(s, o).to_vec(),
            g.with_pred_obj(p, o).to_vec(),
        ]
    }

    // --- Lookups ---

    #[test]
    fn counts_and_contains() {
        let g = graph();
        assert_eq!(g.count(), 7);
        assert_eq!(g.triples().len(), 7);
        assert!(g.contains(&Triple::build("a", "knows").resource("b")));
        assert!(!g.contains(&Triple::build("a", "knows").resource("a")));
    }

    #[test]
    fn single_key_lookups() {
        let g = graph();
        assert_eq!(g.with_subject("a").len(), 3);
        assert_eq!(g.with_predicate("knows").len(), 3);
        assert_eq!(g.with_object(&Object::resource("c")).len(), 2);
        assert_eq!(g.with_object(&Object::integer(30)).len(), 1);
        assert!(g.with_subject("zzz").is_empty());
    }

    #[test]
    fn pair_lookups() {
        let g = graph();
        assert_eq!(g.with_subj_pred("a", "knows").len(), 2);
        assert_eq!(g.with_subj_obj("b", &Object::resource("c")).len(), 1);
        assert_eq!(g.with_pred_obj("knows", &Object::resource("c")).len(), 2);
        assert!(g.with_subj_pred("c", "knows").is_empty());
    }

    #[test]
    fn object_lookup_distinguishes_kind() {
        let g: Graph = [
            Triple::build("s", "p").resource("42"),
            Triple::build("s", "p").string_literal("42"),
            Triple::build("s", "p").integer_literal(42),
        ]
        .into_iter()
        .collect();
        assert_eq!(g.count(), 3);
        assert_eq!(g.with_object(&Object::resource("42")).len(), 1);
        assert_eq!(g.with_object(&Object::string("42")).len(), 1);
        assert_eq!(g.with_object(&Object::integer(42)).len(), 1);
        assert!(g.with_object(&Object::lang_string("42", "en")).is_empty());
    }

    #[test]
    fn duplicate_keys_collapse() {
        let g: Graph = [
            Triple::build("s", "p").resource("o"),
            Triple::build("s", "p").resource("o"),
        ]
        .into_iter()
        .collect();
        assert_eq!(g.count(), 1);
        assert_eq!(g.with_subject("s").len(), 1);
    }

    #[test]
    fn empty_graph() {
        let g = Graph::default();
        assert!(g.is_empty());
        assert_eq!(g.triples().count(), 0);
        assert!(g.with_predicate("p").is_empty());
    }

    // --- Index consistency ---

    #[test]
    fn every_triple_is_in_its_own_buckets() {
        let g = graph();
        for t in g.triples() {
            for bucket in all_buckets(&g, t) {
                assert!(bucket.iter().any(|b| b.as_ref() == t), "{t} missing");
            }
        }
    }

    #[test]
    fn buckets_hold_only_matching_triples() {
        let g = graph();
        for (s, bucket) in &g.s {
            assert!(bucket.iter().all(|t| t.subject() == s));
        }
        for (p, bucket) in &g.p {
            assert!(bucket.iter().all(|t| t.predicate() == p));
        }
        for (o, bucket) in &g.o {
            assert!(bucket.iter().all(|t| &t.object().key() == o));
        }
        for ((s, p), bucket) in &g.sp {
            assert!(bucket.iter().all(|t| t.subject() == s && t.predicate() == p));
        }
        for ((s, o), bucket) in &g.so {
            assert!(bucket.iter().all(|t| t.subject() == s && &t.object().key() == o));
        }
        for ((p, o), bucket) in &g.po {
            assert!(bucket.iter().all(|t| t.predicate() == p && &t.object().key() == o));
        }

        // Each index partitions the triple set.
        for total in [
            g.s.values().map(Vec::len).sum::<usize>(),
            g.p.values().map(Vec::len).sum(),
            g.o.values().map(Vec::len).sum(),
            g.sp.values().map(Vec::len).sum(),
            g.so.values().map(Vec::len).sum(),
            g.po.values().map(Vec::len).sum(),
        ] {
            assert_eq!(total, g.count());
        }
    }

    #[test]
    fn graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph>();
    }
}
