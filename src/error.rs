/*!
# Errors

Every fallible operation of this crate returns [`Result`]. The variants separate
caller contract violations (malformed arrays, undersized buffers, bad vertex ids)
from precondition violations (negative weights) and from named algorithmic
outcomes (negative cycles). Unreachable vertices are *not* errors; they are
encoded through the caller's infinity sentinel.
*/

use thiserror::Error;

use crate::{EdgeIndex, Node};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The CSR arrays or the reverse-edge index break a structural invariant.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// A parameter is out of range or inconsistent with the graph.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A caller buffer is shorter than required. Retry with `required` entries.
    #[error("buffer `{what}` too small: {required} entries required, {provided} provided")]
    BufferTooSmall {
        what: &'static str,
        required: usize,
        provided: usize,
    },

    /// An algorithm requiring non-negative weights found a negative one.
    #[error("edge {edge} has negative weight {weight}")]
    NegativeWeight { edge: EdgeIndex, weight: f64 },

    /// A negative-weight cycle is reachable from the source.
    #[error("graph contains a negative-weight cycle reachable from the source")]
    NegativeCycle,
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Shorthand for creating a [`GraphError::InvalidGraph`]
macro_rules! invalid_graph {
    ($($arg:tt)*) => {
        $crate::error::GraphError::InvalidGraph(format!($($arg)*))
    };
}

/// Shorthand for creating a [`GraphError::InvalidInput`]
macro_rules! invalid_input {
    ($($arg:tt)*) => {
        $crate::error::GraphError::InvalidInput(format!($($arg)*))
    };
}

/// Shorthand for returning `Err(GraphError)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

pub(crate) use invalid_graph;
pub(crate) use invalid_input;
pub(crate) use raise_error_unless;

/// Returns an error unless `u` is a vertex of a graph with `n` vertices.
pub(crate) fn check_vertex(u: Node, n: usize, what: &str) -> Result<()> {
    raise_error_unless!(
        (u as usize) < n,
        invalid_input!("{what} vertex {u} out of range for {n} vertices")
    );
    Ok(())
}

/// Returns an error unless the buffer holds at least `required` entries.
pub(crate) fn check_buffer(what: &'static str, provided: usize, required: usize) -> Result<()> {
    raise_error_unless!(
        provided >= required,
        GraphError::BufferTooSmall {
            what,
            required,
            provided
        }
    );
    Ok(())
}
