//! A symmetric two-level map from unordered node pairs to an edge payload.
//!
//! Grounded in `examples/original_source/C/impl/sonLibEdgeContainer.c`
//! (`stEdgeContainer`, there a hash-of-linked-lists; here a
//! `HashMap<N, HashMap<N, E>>`, the idiomatic Rust equivalent of the same
//! "adjacency map" shape).

use std::collections::HashMap;
use std::hash::Hash;

/// Maps unordered pairs `{u, v}` to a payload `E`, storing both directions so
/// lookups from either endpoint are O(1).
#[derive(Debug)]
pub struct EdgeContainer<N, E>
where
    N: Eq + Hash + Clone,
{
    adjacency: HashMap<N, HashMap<N, E>>,
}

impl<N, E> Default for EdgeContainer<N, E>
where
    N: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> EdgeContainer<N, E>
where
    N: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }

    /// Registers a node with no incident edges, so `incident_nodes` can
    /// answer for it even before its first edge is added.
    pub fn register_node(&mut self, v: N) {
        self.adjacency.entry(v).or_default();
    }

    /// Drops a node's row entirely. Precondition: it has no incident edges.
    pub fn unregister_node(&mut self, v: &N) {
        debug_assert!(
            self.adjacency.get(v).map_or(true, |m| m.is_empty()),
            "edge_container: unregister_node requires no incident edges"
        );
        self.adjacency.remove(v);
    }

    /// Records `{u, v}` with independent payloads for each direction.
    pub fn add(&mut self, u: N, v: N, forward: E, backward: E) {
        debug_assert!(u != v, "edge_container: self-loops are not supported");
        debug_assert!(!self.has(&u, &v), "edge_container: edge already present");
        self.adjacency.entry(u.clone()).or_default().insert(v.clone(), forward);
        self.adjacency.entry(v).or_default().insert(u, backward);
    }

    /// Removes `{u, v}`, returning the `(forward, backward)` payloads if it
    /// was present.
    pub fn delete(&mut self, u: &N, v: &N) -> Option<(E, E)> {
        let forward = self.adjacency.get_mut(u)?.remove(v)?;
        let backward = self.adjacency.get_mut(v)?.remove(u)?;
        Some((forward, backward))
    }

    pub fn has(&self, u: &N, v: &N) -> bool {
        self.adjacency.get(u).map_or(false, |row| row.contains_key(v))
    }

    pub fn get(&self, u: &N, v: &N) -> Option<&E> {
        self.adjacency.get(u)?.get(v)
    }

    /// All neighbors of `v` known to this container, in arbitrary order.
    pub fn incident_nodes(&self, v: &N) -> Vec<N> {
        self.adjacency
            .get(v)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn degree(&self, v: &N) -> usize {
        self.adjacency.get(v).map_or(0, HashMap::len)
    }

    /// Every recorded edge, each yielded once per direction stored (so twice
    /// per undirected edge); callers that need deduplicated pairs should
    /// filter e.g. on `u <= v`.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &N, &E)> {
        self.adjacency
            .iter()
            .flat_map(|(u, row)| row.iter().map(move |(v, e)| (u, v, e)))
    }
}
