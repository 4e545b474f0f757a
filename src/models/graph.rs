//! Galaxy graph types.
//!
//! The galaxy is an undirected weighted graph over prompts: nodes carry the
//! display attributes a 3D renderer needs (position, size, color), edges
//! carry similarity weights in \[0,1\]. Everything here is computed fresh
//! per invocation of [`crate::services::GalaxyBuilder`] and never
//! persisted by the core.

use crate::models::PromptId;
use serde::{Deserialize, Serialize};

/// A 3D position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate from the 2D spring layout.
    pub x: f64,
    /// Vertical coordinate from the 2D spring layout.
    pub y: f64,
    /// Depth, monotonic in use count plus bounded jitter.
    pub z: f64,
}

impl Position {
    /// Creates a position from coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A renderable prompt node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalaxyNode {
    /// The prompt this node represents.
    pub id: PromptId,
    /// Display label (the prompt title).
    pub label: String,
    /// Category, used for color grouping.
    pub category: String,
    /// Tags, surfaced in hover text.
    pub tags: Vec<String>,
    /// Favorite flag; favorites get a size bonus and a distinct color.
    pub is_favorite: bool,
    /// Usage counter; drives depth and size.
    pub use_count: u64,
    /// 3D position assigned by the layout engine.
    pub position: Position,
    /// Marker size.
    pub size: f64,
    /// Hex color string, e.g. `#2563EB`.
    pub color: String,
}

/// An undirected similarity edge between two prompts.
///
/// The `(source, target)` pair is unordered; builders emit each pair once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    /// One endpoint.
    pub source: PromptId,
    /// The other endpoint.
    pub target: PromptId,
    /// Similarity weight in \[0,1\], strictly above the build threshold.
    pub weight: f64,
}

impl SimilarityEdge {
    /// Creates an edge between two prompts.
    #[must_use]
    pub const fn new(source: PromptId, target: PromptId, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns whether this edge touches the given prompt.
    #[must_use]
    pub fn connects(&self, id: &PromptId) -> bool {
        self.source == *id || self.target == *id
    }

    /// Returns the opposite endpoint, if `id` is one of the two.
    #[must_use]
    pub fn other(&self, id: &PromptId) -> Option<&PromptId> {
        if self.source == *id {
            Some(&self.target)
        } else if self.target == *id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// The similarity graph over a filtered prompt set.
///
/// Nodes include isolated prompts (no edges) — they still render, just
/// disconnected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalaxyGraph {
    /// All prompts surviving the filter.
    pub nodes: Vec<GalaxyNode>,
    /// Similarity edges strictly above the threshold.
    pub edges: Vec<SimilarityEdge>,
}

impl GalaxyGraph {
    /// Returns the number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by prompt ID.
    #[must_use]
    pub fn node(&self, id: &PromptId) -> Option<&GalaxyNode> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    /// Returns the degree (incident edge count) of a node.
    #[must_use]
    pub fn degree(&self, id: &PromptId) -> usize {
        self.edges.iter().filter(|e| e.connects(id)).count()
    }
}

/// Summary statistics over a galaxy graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalaxyStats {
    /// Number of prompts in the graph.
    pub prompt_count: usize,
    /// Number of similarity edges.
    pub edge_count: usize,
    /// Number of connected components (clusters); isolated nodes count as
    /// singleton clusters.
    pub component_count: usize,
    /// Mean edge weight; exactly 0.0 when there are no edges.
    pub average_similarity: f64,
    /// Category with the highest total degree across its member nodes;
    /// ties break to the lexicographically smallest name. `None` for an
    /// edgeless graph.
    pub most_connected_category: Option<String>,
}
