/*!
Event hooks of the search algorithms.

Every search engine of this crate reports its progress to a *visitor*. All hooks have a
default no-op implementation, so a visitor only implements the events it cares about.
Vertex hooks receive the vertex `u`, edge hooks receive the edge handle `e` together with
its endpoints `(u, v)`.

Each hook returns a [`Control`]: returning `ControlFlow::Break(())` stops the search
promptly and the engine returns `Ok(SearchStatus::Stopped)`, leaving all state computed so
far intact. `()` is the visitor that observes nothing.
*/

use super::*;

/// Result of a visitor hook
pub type Control = ControlFlow<()>;

/// Shorthand for the hook result that continues the search
pub const CONTINUE: Control = ControlFlow::Continue(());

/// Outcome of a search that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The search ran to completion
    Completed,
    /// The configured target vertex was reached and the search terminated early
    TargetReached,
    /// A visitor hook requested to stop
    Stopped,
}

/// Per-vertex state of a search: `White` vertices are undiscovered, `Gray` vertices are
/// discovered but not finished and `Black` vertices are finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    White,
    Gray,
    Black,
}

/// Returns `Ok(SearchStatus::Stopped)` from the enclosing function if a hook breaks
macro_rules! visit {
    ($hook:expr) => {
        if $hook.is_break() {
            return Ok(SearchStatus::Stopped);
        }
    };
}

pub(crate) use visit;

macro_rules! vertex_hooks {
    ($($(#[$doc:meta])* $hook:ident),*) => {
        $(
            $(#[$doc])*
            fn $hook(&mut self, _u: Node) -> Control {
                CONTINUE
            }
        )*
    };
}

macro_rules! edge_hooks {
    ($($(#[$doc:meta])* $hook:ident),*) => {
        $(
            $(#[$doc])*
            fn $hook(&mut self, _e: EdgeHandle, _u: Node, _v: Node) -> Control {
                CONTINUE
            }
        )*
    };
}

/// Hooks of the breadth-first search
pub trait BfsVisitor {
    vertex_hooks!(
        /// Called once for every vertex before the search starts
        initialize_vertex,
        /// Called when `u` is first encountered and enqueued
        discover_vertex,
        /// Called when `u` is dequeued
        examine_vertex,
        /// Called after all out-edges of `u` were examined
        finish_vertex
    );

    edge_hooks!(
        /// Called for every out-edge of an examined vertex
        examine_edge,
        /// Called if `v` is discovered via `e`
        tree_edge,
        /// Called if `v` was discovered before
        non_tree_edge,
        /// Called if `v` is discovered but not finished
        gray_target,
        /// Called if `v` is finished
        black_target
    );
}

/// Hooks of the depth-first search
pub trait DfsVisitor {
    vertex_hooks!(
        /// Called once for every vertex before the search starts
        initialize_vertex,
        /// Called for the root of every search tree
        start_vertex,
        discover_vertex,
        /// Called once the subtree of `u` is complete
        finish_vertex
    );

    edge_hooks!(
        examine_edge,
        /// Called if `v` is discovered via `e`
        tree_edge,
        /// Called if `v` is an ancestor of `u` in the search tree (including self-loops)
        back_edge,
        /// Called if `v` is finished already
        forward_or_cross_edge
    );
}

/// Hooks of Dijkstra's algorithm
pub trait DijkstraVisitor {
    vertex_hooks!(
        initialize_vertex,
        /// Called when `u` first receives a finite distance
        discover_vertex,
        /// Called when `u` is popped from the priority queue with its final distance
        examine_vertex,
        finish_vertex
    );

    edge_hooks!(
        examine_edge,
        /// Called if `e` improved the distance of `v`
        edge_relaxed,
        edge_not_relaxed
    );
}

/// Hooks of the A* search
pub trait AStarVisitor {
    vertex_hooks!(
        initialize_vertex,
        discover_vertex,
        examine_vertex,
        finish_vertex
    );

    edge_hooks!(
        examine_edge,
        edge_relaxed,
        edge_not_relaxed,
        /// Called if `e` improved the distance of the already closed vertex `v`, which is re-opened
        black_target
    );
}

/// Hooks of the Bellman-Ford algorithm
pub trait BellmanFordVisitor {
    vertex_hooks!(initialize_vertex);

    edge_hooks!(
        /// Called for every edge in every relaxation round
        examine_edge,
        edge_relaxed,
        edge_not_relaxed,
        /// Called in the verification pass if `e` satisfies the triangle inequality
        edge_minimized,
        /// Called in the verification pass if `e` lies on a negative cycle's frontier
        edge_not_minimized
    );
}

impl BfsVisitor for () {}
impl DfsVisitor for () {}
impl DijkstraVisitor for () {}
impl AStarVisitor for () {}
impl BellmanFordVisitor for () {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every hook invocation as `(event, u, v)`; vertex events use `v = INVALID_NODE`.
    /// Breaks once the recorded event equals `stop_on`.
    #[derive(Debug, Default)]
    pub(crate) struct EventLog {
        pub events: Vec<(&'static str, Node, Node)>,
        pub stop_on: Option<(&'static str, Node, Node)>,
    }

    impl EventLog {
        pub fn stopping_on(event: &'static str, u: Node) -> Self {
            Self::stopping_on_edge(event, u, INVALID_NODE)
        }

        pub fn stopping_on_edge(event: &'static str, u: Node, v: Node) -> Self {
            Self {
                events: Vec::new(),
                stop_on: Some((event, u, v)),
            }
        }

        fn record(&mut self, event: &'static str, u: Node, v: Node) -> Control {
            self.events.push((event, u, v));
            if self.stop_on == Some((event, u, v)) {
                ControlFlow::Break(())
            } else {
                CONTINUE
            }
        }

        pub fn vertex(&mut self, event: &'static str, u: Node) -> Control {
            self.record(event, u, INVALID_NODE)
        }

        pub fn edge(&mut self, event: &'static str, u: Node, v: Node) -> Control {
            self.record(event, u, v)
        }

        pub fn of(&self, event: &str) -> Vec<(Node, Node)> {
            self.events
                .iter()
                .filter(|(name, _, _)| *name == event)
                .map(|&(_, u, v)| (u, v))
                .collect()
        }
    }

    macro_rules! log_vertex_hooks {
        ($($hook:ident),*) => {
            $(
                fn $hook(&mut self, u: Node) -> Control {
                    self.vertex(stringify!($hook), u)
                }
            )*
        };
    }

    macro_rules! log_edge_hooks {
        ($($hook:ident),*) => {
            $(
                fn $hook(&mut self, _e: EdgeHandle, u: Node, v: Node) -> Control {
                    self.edge(stringify!($hook), u, v)
                }
            )*
        };
    }

    impl BfsVisitor for EventLog {
        log_vertex_hooks!(
            initialize_vertex,
            discover_vertex,
            examine_vertex,
            finish_vertex
        );
        log_edge_hooks!(
            examine_edge,
            tree_edge,
            non_tree_edge,
            gray_target,
            black_target
        );
    }

    impl DfsVisitor for EventLog {
        log_vertex_hooks!(
            initialize_vertex,
            start_vertex,
            discover_vertex,
            finish_vertex
        );
        log_edge_hooks!(examine_edge, tree_edge, back_edge, forward_or_cross_edge);
    }

    impl DijkstraVisitor for EventLog {
        log_vertex_hooks!(
            initialize_vertex,
            discover_vertex,
            examine_vertex,
            finish_vertex
        );
        log_edge_hooks!(examine_edge, edge_relaxed, edge_not_relaxed);
    }

    impl AStarVisitor for EventLog {
        log_vertex_hooks!(
            initialize_vertex,
            discover_vertex,
            examine_vertex,
            finish_vertex
        );
        log_edge_hooks!(examine_edge, edge_relaxed, edge_not_relaxed, black_target);
    }

    impl BellmanFordVisitor for EventLog {
        log_vertex_hooks!(initialize_vertex);
        log_edge_hooks!(
            examine_edge,
            edge_relaxed,
            edge_not_relaxed,
            edge_minimized,
            edge_not_minimized
        );
    }
}
