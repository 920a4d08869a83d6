//! An Euler-tour tree: a dynamic forest represented as one treap per
//! component, holding the component's Euler tour over half-edges.
//!
//! Grounded in `examples/original_source/C/impl/sonLibEulerTour.c`
//! (`stEulerTour`), ported half-edge-for-half-edge onto the arena treap in
//! [`crate::treap`]. Vertices and half-edges here are internal, opaque
//! `usize` handles; the public, user-facing node-id type lives one layer up
//! in [`crate::connectivity`], which is also where the generic edge
//! container from [`crate::edge_container`] is used — this module never
//! needs its own, since [`EulerTourTree::cut`] takes the half-edge handle
//! directly rather than re-deriving it from a pair of vertices, matching the
//! teacher's `EulerTourTree::disconnect(edge: EdgeRef)` shape in
//! `euler_tour_tree.rs`.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::ConnectivityError;
use crate::treap::{NodeId, Treap};

pub type VertexId = usize;
pub type HalfEdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy)]
struct HalfEdge {
    from: VertexId,
    to: VertexId,
    inverse: HalfEdgeId,
    #[allow(dead_code)]
    direction: Direction,
    node: NodeId,
}

fn incident(edge: &HalfEdge, v: VertexId) -> bool {
    edge.from == v || edge.to == v
}

#[derive(Debug, Clone, Copy, Default)]
struct EulerVertex {
    left_out: Option<HalfEdgeId>,
    right_in: Option<HalfEdgeId>,
}

/// A forest of Euler tours, one treap per connected component.
#[derive(Debug)]
pub struct EulerTourTree {
    vertices: Vec<EulerVertex>,
    free_vertices: Vec<VertexId>,
    half_edges: Vec<Option<HalfEdge>>,
    free_half_edges: Vec<HalfEdgeId>,
    treap: Treap<HalfEdgeId>,
    representatives: HashSet<VertexId>,
    num_components: usize,
}

impl EulerTourTree {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            vertices: Vec::new(),
            free_vertices: Vec::new(),
            half_edges: Vec::new(),
            free_half_edges: Vec::new(),
            treap: Treap::new(seed),
            representatives: HashSet::new(),
            num_components: 0,
        }
    }

    fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        self.half_edges[id].as_ref().expect("euler_tour_tree: stale half-edge id")
    }

    fn half_edge_of_node(&self, node: NodeId) -> HalfEdgeId {
        *self.treap.payload(node)
    }

    fn set_anchors(&mut self, v: VertexId, left_out: HalfEdgeId, right_in: HalfEdgeId) {
        self.vertices[v].left_out = Some(left_out);
        self.vertices[v].right_in = Some(right_in);
    }

    fn clear_anchors(&mut self, v: VertexId) {
        self.vertices[v].left_out = None;
        self.vertices[v].right_in = None;
    }

    fn new_half_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        direction: Direction,
    ) -> Result<HalfEdgeId, ConnectivityError> {
        let id = if let Some(id) = self.free_half_edges.pop() {
            id
        } else {
            self.half_edges
                .try_reserve(1)
                .map_err(|_| ConnectivityError::AllocationFailed)?;
            self.half_edges.push(None);
            self.half_edges.len() - 1
        };
        let node = self.treap.construct(id)?;
        self.half_edges[id] = Some(HalfEdge {
            from,
            to,
            inverse: id,
            direction,
            node,
        });
        Ok(id)
    }

    fn free_half_edge(&mut self, id: HalfEdgeId) {
        self.half_edges[id] = None;
        self.free_half_edges.push(id);
    }

    /// Inserts a new singleton vertex and registers it as its own
    /// component representative.
    pub fn create_vertex(&mut self) -> VertexId {
        let v = if let Some(id) = self.free_vertices.pop() {
            self.vertices[id] = EulerVertex::default();
            id
        } else {
            self.vertices.push(EulerVertex::default());
            self.vertices.len() - 1
        };
        self.representatives.insert(v);
        self.num_components += 1;
        log::trace!("euler_tour_tree: created vertex {v}");
        v
    }

    /// Removes a singleton vertex. Precondition: `is_singleton(v)`.
    pub fn remove_vertex(&mut self, v: VertexId) {
        debug_assert!(
            self.is_singleton(v),
            "euler_tour_tree: remove_vertex requires a singleton"
        );
        self.representatives.remove(&v);
        self.num_components -= 1;
        self.free_vertices.push(v);
        log::trace!("euler_tour_tree: removed vertex {v}");
    }

    pub fn is_singleton(&self, v: VertexId) -> bool {
        debug_assert_eq!(
            self.vertices[v].left_out.is_none(),
            self.vertices[v].right_in.is_none(),
            "euler_tour_tree: left_out/right_in must agree on singleton-ness"
        );
        self.vertices[v].left_out.is_none()
    }

    pub fn connected(&self, u: VertexId, v: VertexId) -> bool {
        if u == v {
            return true;
        }
        match (self.vertices[u].left_out, self.vertices[v].left_out) {
            (Some(fu), Some(fv)) => {
                let ru = self.treap.find_root(self.half_edge(fu).node);
                let rv = self.treap.find_root(self.half_edge(fv).node);
                ru == rv
            }
            _ => false,
        }
    }

    /// Number of vertices in `v`'s component.
    pub fn component_size(&self, v: VertexId) -> usize {
        match self.vertices[v].left_out {
            None => 1,
            Some(f) => {
                let tour_len = self.treap.size(self.half_edge(f).node);
                tour_len / 2 + 1
            }
        }
    }

    /// The designated representative vertex of `v`'s component.
    pub fn tour_root(&self, v: VertexId) -> VertexId {
        if self.is_singleton(v) {
            return v;
        }
        let f = self.vertices[v].left_out.expect("checked above");
        let min_node = self.treap.find_min(self.half_edge(f).node);
        self.half_edge(self.half_edge_of_node(min_node)).from
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn representatives(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.representatives.iter().copied()
    }

    /// All half-edges of `v`'s component's tour, in tour order. Empty for a
    /// singleton.
    pub fn tour_half_edges(&self, v: VertexId) -> Vec<HalfEdgeId> {
        if self.is_singleton(v) {
            return Vec::new();
        }
        let root = self.tour_root(v);
        let start = self.vertices[root].left_out.expect("checked above");
        let mut out = Vec::new();
        let mut node = Some(self.half_edge(start).node);
        while let Some(n) = node {
            out.push(self.half_edge_of_node(n));
            node = self.treap.next(n);
        }
        out
    }

    /// All vertices of `v`'s component, derived from the tour's
    /// `from` endpoints plus the final `to`.
    pub fn component_vertices(&self, v: VertexId) -> Vec<VertexId> {
        if self.is_singleton(v) {
            return vec![v];
        }
        let half_edges = self.tour_half_edges(v);
        let mut seen = HashSet::with_capacity(half_edges.len() / 2 + 1);
        let mut out = Vec::new();
        for &he in &half_edges {
            let from = self.half_edge(he).from;
            if seen.insert(from) {
                out.push(from);
            }
        }
        out
    }

    /// Tree edges (as vertex pairs) of `v`'s component, each yielded once.
    pub fn component_tree_edges(&self, v: VertexId) -> Vec<(VertexId, VertexId)> {
        if self.is_singleton(v) {
            return Vec::new();
        }
        let half_edges = self.tour_half_edges(v);
        let mut seen = HashSet::with_capacity(half_edges.len() / 2);
        let mut out = Vec::new();
        for &he in &half_edges {
            if seen.contains(&he) {
                continue;
            }
            let edge = self.half_edge(he);
            seen.insert(edge.inverse);
            out.push((edge.from, edge.to));
        }
        out
    }

    /// Re-roots `v`'s component's tour at `v`, in place. O(log size)
    /// amortized.
    ///
    /// Faithful port of `stEulerTour_makeRoot`: the case analysis below
    /// decides, from the edge following `v`'s first appearance in the tour,
    /// which node to split the tour after so that concatenating the two
    /// halves in swapped order makes `v` the new first element.
    pub fn make_root(&mut self, v: VertexId) {
        if self.is_singleton(v) {
            return;
        }

        let old_root = self.tour_root(v);
        self.representatives.remove(&old_root);
        self.representatives.insert(v);

        let a = self.vertices[v].left_out.expect("checked above");
        let root_node = self.treap.find_root(self.half_edge(a).node);

        if self.treap.size(root_node) == 2 {
            let first_node = self.treap.find_min(root_node);
            let first_he = self.half_edge_of_node(first_node);
            if self.half_edge(first_he).from == v {
                return;
            }
            let second = self
                .treap
                .split_after(first_node)
                .expect("tour of size 2 must have a successor");
            self.treap.concat(Some(second), Some(first_node));
            return;
        }

        let b = self.vertices[v].right_in.expect("checked above");
        let (mut f, b) = {
            let an = self.half_edge(a).node;
            let bn = self.half_edge(b).node;
            if self.treap.compare(an, bn) == Ordering::Greater {
                (b, a)
            } else {
                (a, b)
            }
        };

        let other = {
            let fe = self.half_edge(f);
            if fe.to == v {
                fe.from
            } else {
                fe.to
            }
        };

        let f_node = self.half_edge(f).node;
        let next_node = self
            .treap
            .next(f_node)
            .expect("a tour longer than 2 has a successor after f");
        let next_he = self.half_edge_of_node(next_node);

        if !incident(self.half_edge(next_he), v) {
            match self.treap.prev(f_node) {
                None => return,
                Some(p) => f = self.half_edge_of_node(p),
            }
        } else if incident(self.half_edge(next_he), other) {
            let next_next = self
                .treap
                .next(next_node)
                .or_else(|| self.treap.prev(f_node));
            if let Some(nn) = next_next {
                let nn_he = self.half_edge_of_node(nn);
                if incident(self.half_edge(nn_he), v) {
                    f = next_he;
                }
            }
        }

        let f_node = self.half_edge(f).node;
        if let Some(right) = self.treap.split_after(f_node) {
            self.treap.concat(Some(right), Some(f_node));
        }
    }

    /// Adds a tree edge `{u, v}`. Returns `None` if `u` and `v` are already
    /// connected (no state changes), or the new `(forward, backward)`
    /// half-edge handles otherwise.
    pub fn link(
        &mut self,
        u: VertexId,
        v: VertexId,
    ) -> Result<Option<(HalfEdgeId, HalfEdgeId)>, ConnectivityError> {
        debug_assert_ne!(u, v, "euler_tour_tree: link requires distinct vertices");
        if self.connected(u, v) {
            return Ok(None);
        }

        let fwd = self.new_half_edge(u, v, Direction::Forward)?;
        let bwd = self.new_half_edge(v, u, Direction::Backward)?;
        self.half_edges[fwd].as_mut().expect("just created").inverse = bwd;
        self.half_edges[bwd].as_mut().expect("just created").inverse = fwd;

        self.make_root(u);
        self.make_root(v);

        let rep_u = self.tour_root(u);
        let rep_v = self.tour_root(v);
        self.representatives.remove(&rep_u);
        self.representatives.remove(&rep_v);

        let fwd_node = self.half_edge(fwd).node;
        let bwd_node = self.half_edge(bwd).node;

        let u_tour_min = self.vertices[u].left_out.map(|first| {
            let node = self.half_edge(first).node;
            self.treap.find_min(self.treap.find_root(node))
        });
        if let Some(min) = u_tour_min {
            self.treap.concat(Some(min), Some(fwd_node));
        } else {
            self.vertices[u].left_out = Some(fwd);
        }

        if let Some(v_first) = self.vertices[v].left_out {
            let node = self.half_edge(v_first).node;
            self.treap.concat(Some(fwd_node), Some(node));
        } else {
            self.vertices[v].left_out = Some(fwd);
        }

        if let Some(v_last) = self.vertices[v].right_in {
            let node = self.half_edge(v_last).node;
            self.treap.concat(Some(node), Some(bwd_node));
        } else {
            self.vertices[v].right_in = Some(bwd);
            let u_first = self.vertices[u].left_out.expect("set above");
            let u_first_node = self.half_edge(u_first).node;
            self.treap.concat(Some(u_first_node), Some(bwd_node));
        }

        self.vertices[u].right_in = Some(bwd);

        self.num_components -= 1;
        let new_rep = self.tour_root(u);
        self.representatives.insert(new_rep);

        log::trace!("euler_tour_tree: linked {u} -- {v}");
        Ok(Some((fwd, bwd)))
    }

    /// Removes the tree edge identified by half-edge `forward`, splitting
    /// `forward.from`'s component into (up to) two components.
    ///
    /// Faithful port of `stEulerTour_cut`: splits the tour around the edge's
    /// two half-edges, re-stitches the remainder, and recomputes each
    /// endpoint's tour anchors from what ends up adjacent to it.
    pub fn cut(&mut self, forward: HalfEdgeId) {
        self.num_components += 1;

        let backward = self.half_edge(forward).inverse;
        let (mut f, mut b) = (forward, backward);
        {
            let fnode = self.half_edge(f).node;
            let bnode = self.half_edge(b).node;
            if self.treap.compare(fnode, bnode) == Ordering::Greater {
                std::mem::swap(&mut f, &mut b);
            }
        }
        let from = self.half_edge(f).from;
        let to = self.half_edge(f).to;

        let old_rep = self.tour_root(from);
        self.representatives.remove(&old_rep);

        let f_node = self.half_edge(f).node;
        let b_node = self.half_edge(b).node;

        let p = self.treap.prev(f_node);
        let n = self.treap.next(b_node);
        let pn = self
            .treap
            .next(f_node)
            .expect("cut: f has a successor before the tour is split");
        let nn = self
            .treap
            .prev(b_node)
            .expect("cut: b has a predecessor before the tour is split");

        let tree1 = self.treap.split_before(f_node);
        let tree2 = self.treap.split_after(b_node);
        if let (Some(t1), Some(t2)) = (tree1, tree2) {
            self.treap.concat(Some(t1), Some(t2));
        }

        let pn_he = self.half_edge_of_node(pn);
        let nn_he = self.half_edge_of_node(nn);
        let pn_has_from = incident(self.half_edge(pn_he), from);
        let pn_has_to = incident(self.half_edge(pn_he), to);

        let fill_missing = |tree: &Treap<HalfEdgeId>,
                             n: Option<NodeId>,
                             p: Option<NodeId>|
         -> (Option<NodeId>, Option<NodeId>) {
            match (n, p) {
                (Some(_), Some(_)) => (n, p),
                (None, Some(p)) => (Some(tree.find_min(tree.find_root(p))), Some(p)),
                (Some(n), None) => (Some(n), Some(tree.find_max(tree.find_root(n)))),
                (None, None) => (None, None),
            }
        };

        if pn_has_from && pn_has_to {
            let (n, p) = fill_missing(&self.treap, n, p);
            match (n, p) {
                (Some(n), Some(p)) => {
                    let n_he = self.half_edge_of_node(n);
                    let p_he = self.half_edge_of_node(p);
                    if incident(self.half_edge(n_he), from) {
                        self.set_anchors(from, n_he, p_he);
                        self.clear_anchors(to);
                    } else {
                        self.set_anchors(to, n_he, p_he);
                        self.clear_anchors(from);
                    }
                }
                _ => {
                    self.clear_anchors(from);
                    self.clear_anchors(to);
                }
            }
        } else if pn_has_from {
            self.set_anchors(from, pn_he, nn_he);
            let (n, p) = fill_missing(&self.treap, n, p);
            match (n, p) {
                (Some(n), Some(p)) => {
                    self.set_anchors(to, self.half_edge_of_node(n), self.half_edge_of_node(p));
                }
                _ => self.clear_anchors(to),
            }
        } else {
            debug_assert!(pn_has_to, "cut: the edge after f must touch from or to");
            self.set_anchors(to, pn_he, nn_he);
            let (n, p) = fill_missing(&self.treap, n, p);
            match (n, p) {
                (Some(n), Some(p)) => {
                    self.set_anchors(from, self.half_edge_of_node(n), self.half_edge_of_node(p));
                }
                _ => self.clear_anchors(from),
            }
        }

        self.treap.split_after(f_node);
        self.treap.split_before(b_node);

        if let Some(anchor) = self.vertices[from].left_out {
            if self.treap.size(self.half_edge(anchor).node) == 1 {
                self.clear_anchors(from);
            }
        }
        if let Some(anchor) = self.vertices[to].left_out {
            if self.treap.size(self.half_edge(anchor).node) == 1 {
                self.clear_anchors(to);
            }
        }

        self.treap.destroy(f_node);
        self.treap.destroy(b_node);
        self.free_half_edge(f);
        self.free_half_edge(b);

        self.representatives.insert(self.tour_root(from));
        self.representatives.insert(self.tour_root(to));

        log::trace!("euler_tour_tree: cut edge between {from} and {to}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(ett: &mut EulerTourTree, u: VertexId, v: VertexId) -> HalfEdgeId {
        ett.link(u, v).unwrap().expect("not yet connected").0
    }

    #[test]
    fn path_of_three_is_connected_and_sized() {
        let mut ett = EulerTourTree::new(Some(1));
        let a = ett.create_vertex();
        let b = ett.create_vertex();
        let c = ett.create_vertex();
        assert_eq!(ett.num_components(), 3);
        connect(&mut ett, a, b);
        connect(&mut ett, b, c);
        assert!(ett.connected(a, c));
        assert_eq!(ett.component_size(a), 3);
        assert_eq!(ett.num_components(), 1);
        let mut vs = ett.component_vertices(a);
        vs.sort();
        assert_eq!(vs, vec![a, b, c]);
    }

    #[test]
    fn cut_splits_component() {
        let mut ett = EulerTourTree::new(Some(2));
        let a = ett.create_vertex();
        let b = ett.create_vertex();
        let c = ett.create_vertex();
        connect(&mut ett, a, b);
        let bc = connect(&mut ett, b, c);
        assert!(ett.connected(a, c));
        ett.cut(bc);
        assert!(ett.connected(a, b));
        assert!(!ett.connected(a, c));
        assert_eq!(ett.num_components(), 2);
    }

    #[test]
    fn make_root_preserves_connectivity() {
        let mut ett = EulerTourTree::new(Some(3));
        let vs: Vec<_> = (0..6).map(|_| ett.create_vertex()).collect();
        for w in vs.windows(2) {
            connect(&mut ett, w[0], w[1]);
        }
        for &v in &vs {
            ett.make_root(v);
            for &w in &vs {
                assert!(ett.connected(v, w));
            }
            assert_eq!(ett.component_size(v), 6);
        }
    }

    #[test]
    fn relink_after_cut_reconnects() {
        let mut ett = EulerTourTree::new(Some(4));
        let a = ett.create_vertex();
        let b = ett.create_vertex();
        let c = ett.create_vertex();
        let d = ett.create_vertex();
        connect(&mut ett, a, b);
        connect(&mut ett, b, c);
        let cd = connect(&mut ett, c, d);
        ett.cut(cd);
        assert!(!ett.connected(a, d));
        connect(&mut ett, a, d);
        assert!(ett.connected(a, d));
        assert!(ett.connected(b, d));
        assert_eq!(ett.num_components(), 1);
    }

    #[test]
    fn remove_vertex_requires_singleton() {
        let mut ett = EulerTourTree::new(Some(5));
        let a = ett.create_vertex();
        ett.remove_vertex(a);
        assert_eq!(ett.num_components(), 0);
    }

    #[test]
    #[should_panic(expected = "remove_vertex requires a singleton")]
    fn remove_vertex_panics_on_non_singleton() {
        let mut ett = EulerTourTree::new(Some(6));
        let a = ett.create_vertex();
        let b = ett.create_vertex();
        connect(&mut ett, a, b);
        ett.remove_vertex(a);
    }
}
