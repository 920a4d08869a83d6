//! Error types surfaced by this crate.
//!
//! Precondition violations (duplicate node, cutting a non-edge, removing a
//! non-singleton vertex, linking an already-connected pair) are programmer
//! errors: they are checked with `debug_assert!`/`assert!` and panic, the same
//! policy the original C implementation enforces with `assert()`. The one
//! error condition a caller can legitimately hit and want to handle is
//! resource exhaustion while growing an internal arena, which is why this is
//! the only variant below.

use thiserror::Error;

/// Errors a caller of this crate can recover from.
///
/// Everything else (precondition violations) is a programmer bug and panics
/// instead of returning a `Result`; see the module documentation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectivityError {
    /// Growing an internal arena (treap nodes, half-edges, or vertices)
    /// failed because the system is out of memory.
    #[error("allocation failed while growing the connectivity structure")]
    AllocationFailed,
    /// An internal invariant did not hold. Only ever returned by
    /// [`crate::Connectivity::validate`]; never by a mutating operation.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
