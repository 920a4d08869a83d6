//! A randomized treap over an arena, used as the ordered-list backbone of the
//! Euler-tour tree.
//!
//! Ordering is *implicit*: nodes carry no key, only a heap-ordered random
//! priority. Position in the tour is defined purely by where a node sits in
//! the in-order traversal, so `compare` walks parent pointers instead of
//! comparing stored values. An optional integer `key` is carried alongside
//! for callers who do want ordinary keyed lookup (`insert_by_key` /
//! `find_by_key` / `remove_by_key`); the Euler-tour tree never uses it.
//!
//! Grounded in `examples/original_source/C/impl/treap.c`, with the arena
//! layout, `Derivative`-based `Debug`, and `debug_tree` pretty-printing
//! carried over from the teacher's `lists/treap.rs`. The rotation direction
//! in `move_up`/`move_down` is *not* copied literally from the C source: that
//! file's `treap_moveUp` swaps the left/right branches (it rotates a node
//! that is its parent's left child with `rotateLeft`, which promotes a
//! *right* child) and its `treap_rotateLeft`/`treap_rotateRight` reference an
//! undeclared `b->count`. Both are transcription bugs in the original; the
//! rotation logic below implements the textbook mapping instead.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};

use debug_tree::{add_branch_to, add_leaf_to, TreeBuilder};
use derivative::Derivative;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConnectivityError;

/// Index into a [`Treap`]'s arena. Stable for the lifetime of the node.
pub type NodeId = usize;

const NIL: NodeId = usize::MAX;

fn fmt_link(id: &NodeId, f: &mut Formatter) -> fmt::Result {
    if *id == NIL {
        write!(f, "-")
    } else {
        write!(f, "{id}")
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
struct Node<T> {
    #[derivative(Debug(format_with = "fmt_link"))]
    parent: NodeId,
    #[derivative(Debug(format_with = "fmt_link"))]
    left: NodeId,
    #[derivative(Debug(format_with = "fmt_link"))]
    right: NodeId,
    size: usize,
    key: Option<i64>,
    #[derivative(Debug = "ignore")]
    priority: u64,
    payload: T,
}

/// An arena of treap nodes. `T` is an opaque payload carried at each node
/// (the Euler-tour tree stores a half-edge id there).
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Treap<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
    #[derivative(Debug = "ignore")]
    rng: StdRng,
}

impl<T: Debug> Treap<T> {
    /// Creates an empty treap. `seed = None` seeds the priority generator
    /// from entropy; `Some(seed)` makes priority assignment (and therefore
    /// tree shape) fully deterministic, for reproducible tests.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            rng,
        }
    }

    fn node(&self, n: NodeId) -> &Node<T> {
        self.nodes[n].as_ref().expect("treap: stale node id")
    }

    fn node_mut(&mut self, n: NodeId) -> &mut Node<T> {
        self.nodes[n].as_mut().expect("treap: stale node id")
    }

    /// Allocates a new singleton node holding `payload`, with a freshly
    /// rolled priority.
    pub fn construct(&mut self, payload: T) -> Result<NodeId, ConnectivityError> {
        let priority = self.rng.gen();
        let node = Node {
            parent: NIL,
            left: NIL,
            right: NIL,
            size: 1,
            key: None,
            priority,
            payload,
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            log::trace!("treap: reused node {id}");
            return Ok(id);
        }
        self.nodes
            .try_reserve(1)
            .map_err(|_| ConnectivityError::AllocationFailed)?;
        self.nodes.push(Some(node));
        let id = self.nodes.len() - 1;
        log::trace!("treap: allocated node {id}");
        Ok(id)
    }

    /// Frees an isolated node (no parent, no children) back to the arena.
    pub fn destroy(&mut self, n: NodeId) {
        debug_assert!(
            self.is_isolated(n),
            "treap: destroy requires an isolated node"
        );
        self.nodes[n] = None;
        self.free.push(n);
        log::trace!("treap: destroyed node {n}");
    }

    fn is_isolated(&self, n: NodeId) -> bool {
        let node = self.node(n);
        node.parent == NIL && node.left == NIL && node.right == NIL
    }

    pub fn payload(&self, n: NodeId) -> &T {
        &self.node(n).payload
    }

    pub fn payload_mut(&mut self, n: NodeId) -> &mut T {
        &mut self.node_mut(n).payload
    }

    /// The root of the tour `n` belongs to. O(height).
    pub fn find_root(&self, mut n: NodeId) -> NodeId {
        while self.node(n).parent != NIL {
            n = self.node(n).parent;
        }
        n
    }

    /// The first node (in-order) of the tour `n` belongs to.
    pub fn find_min(&self, n: NodeId) -> NodeId {
        self.leftmost(self.find_root(n))
    }

    /// The last node (in-order) of the tour `n` belongs to.
    pub fn find_max(&self, n: NodeId) -> NodeId {
        self.rightmost(self.find_root(n))
    }

    fn leftmost(&self, mut n: NodeId) -> NodeId {
        while self.node(n).left != NIL {
            n = self.node(n).left;
        }
        n
    }

    fn rightmost(&self, mut n: NodeId) -> NodeId {
        while self.node(n).right != NIL {
            n = self.node(n).right;
        }
        n
    }

    /// In-order successor of `n`, or `None` if `n` is the last node of its
    /// tour.
    pub fn next(&self, n: NodeId) -> Option<NodeId> {
        if self.node(n).right != NIL {
            return Some(self.leftmost(self.node(n).right));
        }
        let mut cur = n;
        let mut parent = self.node(cur).parent;
        while parent != NIL && self.node(parent).right == cur {
            cur = parent;
            parent = self.node(cur).parent;
        }
        if parent == NIL {
            None
        } else {
            Some(parent)
        }
    }

    /// In-order predecessor of `n`, or `None` if `n` is the first node of its
    /// tour.
    pub fn prev(&self, n: NodeId) -> Option<NodeId> {
        if self.node(n).left != NIL {
            return Some(self.rightmost(self.node(n).left));
        }
        let mut cur = n;
        let mut parent = self.node(cur).parent;
        while parent != NIL && self.node(parent).left == cur {
            cur = parent;
            parent = self.node(cur).parent;
        }
        if parent == NIL {
            None
        } else {
            Some(parent)
        }
    }

    /// Number of nodes in `n`'s whole tour.
    pub fn size(&self, n: NodeId) -> usize {
        self.node(self.find_root(n)).size
    }

    fn size_of(&self, n: NodeId) -> usize {
        if n == NIL {
            0
        } else {
            self.node(n).size
        }
    }

    fn priority_of(&self, n: NodeId) -> u64 {
        if n == NIL {
            0
        } else {
            self.node(n).priority
        }
    }

    fn recompute_size(&mut self, n: NodeId) {
        let l = self.node(n).left;
        let r = self.node(n).right;
        let size = 1 + self.size_of(l) + self.size_of(r);
        self.node_mut(n).size = size;
    }

    fn attach_left(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).left = child;
        if child != NIL {
            self.node_mut(child).parent = parent;
        }
    }

    fn attach_right(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).right = child;
        if child != NIL {
            self.node_mut(child).parent = parent;
        }
    }

    /// Depth of `n` below its tour root. O(height); used only by `compare`.
    fn depth(&self, mut n: NodeId) -> usize {
        let mut d = 0;
        while self.node(n).parent != NIL {
            n = self.node(n).parent;
            d += 1;
        }
        d
    }

    /// Orders two nodes of the *same* tour by tour position, without
    /// consulting keys. Climbs both nodes toward the root in lockstep after
    /// equalizing depth, so it costs O(height) rather than O(size).
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        debug_assert_eq!(
            self.find_root(a),
            self.find_root(b),
            "treap: compare requires nodes from the same tour"
        );
        let mut a = a;
        let mut b = b;
        let mut depth_a = self.depth(a);
        let mut depth_b = self.depth(b);
        while depth_a > depth_b {
            let parent = self.node(a).parent;
            if parent == b {
                return if a == self.node(b).left {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            a = parent;
            depth_a -= 1;
        }
        while depth_b > depth_a {
            let parent = self.node(b).parent;
            if parent == a {
                return if b == self.node(a).left {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
            b = parent;
            depth_b -= 1;
        }
        let mut remaining = depth_a;
        while remaining > 0 {
            let pa = self.node(a).parent;
            let pb = self.node(b).parent;
            if pa == pb {
                return if a == self.node(pa).left {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            a = pa;
            b = pb;
            remaining -= 1;
        }
        unreachable!("treap: compare found no common ancestor for nodes of one tour")
    }

    fn rotate_left(&mut self, u: NodeId) {
        let w = self.node(u).right;
        debug_assert_ne!(w, NIL, "treap: rotate_left requires a right child");
        let parent = self.node(u).parent;
        self.attach_right(u, self.node(w).left);
        self.attach_left(w, u);
        self.node_mut(w).parent = parent;
        if parent != NIL {
            if self.node(parent).left == u {
                self.node_mut(parent).left = w;
            } else {
                self.node_mut(parent).right = w;
            }
        }
        self.recompute_size(u);
        self.recompute_size(w);
    }

    fn rotate_right(&mut self, u: NodeId) {
        let w = self.node(u).left;
        debug_assert_ne!(w, NIL, "treap: rotate_right requires a left child");
        let parent = self.node(u).parent;
        self.attach_left(u, self.node(w).right);
        self.attach_right(w, u);
        self.node_mut(w).parent = parent;
        if parent != NIL {
            if self.node(parent).left == u {
                self.node_mut(parent).left = w;
            } else {
                self.node_mut(parent).right = w;
            }
        }
        self.recompute_size(u);
        self.recompute_size(w);
    }

    /// Rotates `n` upward until the heap property holds again above it.
    fn move_up(&mut self, n: NodeId) {
        while self.node(n).parent != NIL
            && self.node(n).priority >= self.node(self.node(n).parent).priority
        {
            let parent = self.node(n).parent;
            if self.node(parent).left == n {
                self.rotate_right(parent);
            } else {
                self.rotate_left(parent);
            }
        }
    }

    /// Rotates the higher-priority child of `n` upward repeatedly until `n`
    /// is a leaf, then detaches it. Used by `remove_by_key`.
    fn move_down_and_detach(&mut self, n: NodeId) {
        loop {
            let l = self.node(n).left;
            let r = self.node(n).right;
            match (l == NIL, r == NIL) {
                (true, true) => break,
                (true, false) => self.rotate_left(n),
                (false, true) => self.rotate_right(n),
                (false, false) => {
                    if self.priority_of(l) >= self.priority_of(r) {
                        self.rotate_right(n);
                    } else {
                        self.rotate_left(n);
                    }
                }
            }
        }
        let parent = self.node(n).parent;
        if parent != NIL {
            if self.node(parent).left == n {
                self.node_mut(parent).left = NIL;
            } else {
                self.node_mut(parent).right = NIL;
            }
            self.node_mut(n).parent = NIL;
            let mut p = parent;
            loop {
                self.recompute_size(p);
                let next = self.node(p).parent;
                if next == NIL {
                    break;
                }
                p = next;
            }
        }
    }

    fn restore_priority_after_split(&mut self, n: NodeId) {
        let l = self.node(n).left;
        let r = self.node(n).right;
        let priority = self.priority_of(l).max(self.priority_of(r)).saturating_add(1);
        self.node_mut(n).priority = priority;
    }

    fn raise_to_root(&mut self, n: NodeId) {
        self.node_mut(n).priority = u64::MAX;
        self.move_up(n);
        debug_assert_eq!(self.node(n).parent, NIL, "treap: raise_to_root failed");
    }

    /// Splits `n`'s tour immediately after `n`: `n` and everything before it
    /// stay in `n`'s tree, everything after it is detached and returned as a
    /// new tree root.
    pub fn split_after(&mut self, n: NodeId) -> Option<NodeId> {
        self.raise_to_root(n);
        let right = self.node(n).right;
        if right != NIL {
            self.node_mut(right).parent = NIL;
            self.node_mut(n).right = NIL;
        }
        self.recompute_size(n);
        self.restore_priority_after_split(n);
        if right == NIL {
            None
        } else {
            Some(right)
        }
    }

    /// Splits `n`'s tour immediately before `n`: `n` and everything after it
    /// stay in `n`'s tree, everything before it is detached and returned as a
    /// new tree root.
    pub fn split_before(&mut self, n: NodeId) -> Option<NodeId> {
        self.raise_to_root(n);
        let left = self.node(n).left;
        if left != NIL {
            self.node_mut(left).parent = NIL;
            self.node_mut(n).left = NIL;
        }
        self.recompute_size(n);
        self.restore_priority_after_split(n);
        if left == NIL {
            None
        } else {
            Some(left)
        }
    }

    /// Concatenates two tours in order: every node of `a` precedes every
    /// node of `b`. Either side may be empty, and `a`/`b` need not already be
    /// tour roots — each is re-rooted via `find_root` before merging, matching
    /// `treap_concat`'s `ra = treap_findRoot(a)` / `rb = treap_findRoot(b)`
    /// normalization in the original C and the teacher's `Treaps::concat`
    /// (`let (u, v) = (self.root(u), self.root(v))`).
    pub fn concat(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        match (a, b) {
            (None, None) => None,
            (None, Some(x)) | (Some(x), None) => {
                let r = self.find_root(x);
                self.node_mut(r).parent = NIL;
                Some(r)
            }
            (Some(a), Some(b)) => {
                let ra = self.find_root(a);
                let rb = self.find_root(b);
                let merged = self.concat_inner(ra, rb);
                self.node_mut(merged).parent = NIL;
                Some(merged)
            }
        }
    }

    fn concat_inner(&mut self, a: NodeId, b: NodeId) -> NodeId {
        if self.node(a).priority > self.node(b).priority {
            let r = self.node(a).right;
            let merged = if r == NIL { b } else { self.concat_inner(r, b) };
            self.attach_right(a, merged);
            self.recompute_size(a);
            a
        } else {
            let l = self.node(b).left;
            let merged = if l == NIL { a } else { self.concat_inner(a, l) };
            self.attach_left(b, merged);
            self.recompute_size(b);
            b
        }
    }

    /// Renders the tour rooted at `root` as an indented tree (in-order, so
    /// it reads left-to-right the same as the tour itself), for `trace!`
    /// logging. Not used on any hot path.
    #[allow(dead_code)]
    pub fn dump_tree(&self, root: NodeId) -> String {
        let builder = TreeBuilder::new();
        add_branch_to!(builder, "treap");
        self.dump_inorder(root, &builder);
        builder.string()
    }

    fn dump_inorder(&self, n: NodeId, tree: &TreeBuilder) {
        let node = self.node(n);
        let left = node.left;
        let right = node.right;
        if left != NIL {
            add_branch_to!(*tree, "left of {n}");
            self.dump_inorder(left, tree);
        } else {
            add_leaf_to!(*tree, "<empty>");
        }
        add_branch_to!(*tree, "[{n}] {node:?}");
        if right != NIL {
            add_branch_to!(*tree, "right of {n}");
            self.dump_inorder(right, tree);
        } else {
            add_leaf_to!(*tree, "<empty>");
        }
    }

    /// Inserts a fresh node keyed by `key` into the tour rooted at `root`
    /// (or starts a new tour if `root` is `None`). Keys must be distinct
    /// within one tour. Returns the new node and the tour's (possibly
    /// unchanged) root.
    pub fn insert_by_key(
        &mut self,
        root: Option<NodeId>,
        key: i64,
        payload: T,
    ) -> Result<(NodeId, NodeId), ConnectivityError> {
        let n = self.construct(payload)?;
        self.node_mut(n).key = Some(key);
        let root = match root {
            None => return Ok((n, n)),
            Some(r) => r,
        };
        let mut cur = root;
        loop {
            let cur_key = self.node(cur).key.expect("treap: insert_by_key requires keyed nodes");
            debug_assert_ne!(cur_key, key, "treap: duplicate key");
            if key < cur_key {
                let l = self.node(cur).left;
                if l == NIL {
                    self.attach_left(cur, n);
                    break;
                }
                cur = l;
            } else {
                let r = self.node(cur).right;
                if r == NIL {
                    self.attach_right(cur, n);
                    break;
                }
                cur = r;
            }
        }
        let mut p = cur;
        loop {
            self.recompute_size(p);
            let next = self.node(p).parent;
            if next == NIL {
                break;
            }
            p = next;
        }
        self.move_up(n);
        Ok((n, self.find_root(n)))
    }

    /// Finds the node keyed by `key` in the tour rooted at `root`.
    pub fn find_by_key(&self, root: NodeId, key: i64) -> Option<NodeId> {
        let mut cur = root;
        loop {
            let cur_key = self.node(cur).key.expect("treap: find_by_key requires keyed nodes");
            match key.cmp(&cur_key) {
                Ordering::Equal => return Some(cur),
                Ordering::Less => {
                    let l = self.node(cur).left;
                    if l == NIL {
                        return None;
                    }
                    cur = l;
                }
                Ordering::Greater => {
                    let r = self.node(cur).right;
                    if r == NIL {
                        return None;
                    }
                    cur = r;
                }
            }
        }
    }

    /// Removes the node keyed by `key` from the tour rooted at `root`,
    /// returning the new root (`None` if the tour is now empty) along with
    /// the removed payload.
    pub fn remove_by_key(&mut self, root: NodeId, key: i64) -> Option<(Option<NodeId>, T)> {
        let n = self.find_by_key(root, key)?;
        let other_root = if n == root {
            let l = self.node(n).left;
            let r = self.node(n).right;
            if l != NIL {
                Some(self.find_root(l))
            } else if r != NIL {
                Some(self.find_root(r))
            } else {
                None
            }
        } else {
            Some(root)
        };
        self.move_down_and_detach(n);
        let new_root = other_root.map(|r| self.find_root(r));
        let payload = self.nodes[n].take().expect("treap: stale node id").payload;
        self.free.push(n);
        Some((new_root, payload))
    }
}
