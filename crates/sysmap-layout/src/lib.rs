#![forbid(unsafe_code)]

//! Hierarchical (layered) graph layout.
//!
//! The pipeline is the classic Sugiyama sequence, scaled to the small graphs
//! a focused diagram produces:
//!
//! 1. [`rank`]: assign each vertex to a layer consistent with edge direction
//!    (longest-path over a deterministic topological order),
//! 2. [`order`]: reorder vertices within each layer to reduce edge
//!    crossings (barycenter sweeps, best ordering kept),
//! 3. [`position`]: assign coordinates from measured vertex sizes and the
//!    configured separations.
//!
//! Positions are vertex **centers**. Callers that render with a top-left
//! anchor subtract half the vertex size themselves.
//!
//! The pipeline is deterministic: identical graphs and options produce
//! identical coordinates, so re-running layout is idempotent.

pub mod graph;
pub mod order;
pub mod position;
pub mod rank;

pub use graph::{LayoutGraph, NodeLabel};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    /// Parses a direction name, defaulting to top-to-bottom for anything
    /// unrecognized ("TD" is accepted as an alias of "TB").
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "BT" => RankDir::BT,
            "LR" => RankDir::LR,
            "RL" => RankDir::RL,
            _ => RankDir::TB,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub ranksep: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            ranksep: 50.0,
        }
    }
}

/// Runs the full pipeline, leaving center coordinates on every vertex.
pub fn layout(g: &mut LayoutGraph, options: &LayoutOptions) {
    rank::rank(g);
    order::order(g);
    position::position(g, options);
}
