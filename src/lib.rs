//! Online dynamic connectivity for undirected graphs.
//!
//! Maintains a spanning forest under interleaved edge insertions and
//! deletions, answering "are `u` and `v` connected?" and related component
//! queries in O(log n) amortized time per operation. Built from a randomized
//! treap ([`treap`]) giving an Euler-tour tree ([`euler_tour_tree`]) one tour
//! per spanning-forest component; [`Connectivity`] is the thin public facade
//! over an arbitrary node type.
//!
//! ## Usage
//!
//! ```
//! use dynamic_connectivity::Connectivity;
//!
//! let mut g = Connectivity::new();
//! for id in ["a", "b", "c", "d"] {
//!     g.add_node(id);
//! }
//! g.add_edge(&"a", &"b").unwrap();
//! g.add_edge(&"b", &"c").unwrap();
//! assert!(g.connected(&"a", &"c"));
//! assert!(!g.connected(&"a", &"d"));
//! g.remove_edge(&"a", &"b");
//! assert!(!g.connected(&"a", &"c"));
//! ```
//!
//! See `src/bin/example.rs` for a larger walkthrough; run it with `cargo run`.
//!
//! ## Implementation
//!
//! - Treap: [`treap::Treap`], a pointer-free arena treap with implicit
//!   (position-only) ordering — no stored keys are needed to answer "does a
//!   precede b in this tour?".
//! - Euler-tour tree: [`euler_tour_tree::EulerTourTree`], one treap per
//!   spanning-forest component, `link`/`cut`/`make_root` all expressed as
//!   split/concat sequences on that treap.
//! - Edge container: [`edge_container::EdgeContainer`], a symmetric
//!   node-pair map used by [`Connectivity`] to find the half-edge handle for
//!   a given edge.
//!
//! This core maintains a spanning forest only: it never searches for a
//! replacement edge after a cut, and rejects a second edge between an
//! already-connected pair rather than filing it away for later (see
//! `DESIGN.md` for the rationale).
//!
//! ## Testing
//!
//! ```text
//! cargo test
//! ```
//!
//! Add `-- --ignored` to also run the stress tests, which fuzz against a
//! naive reference model until they either run forever or find a
//! discrepancy. Use `cargo bench` for the `criterion` benchmarks.

pub mod connectivity;
pub mod edge_container;
pub mod error;
pub mod euler_tour_tree;
pub mod treap;

pub use connectivity::Connectivity;
pub use error::ConnectivityError;
