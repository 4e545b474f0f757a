//! Galaxy graph construction and statistics.
//!
//! [`GalaxyBuilder`] turns a prompt snapshot into a renderable graph:
//! filter, score every remaining unordered pair, keep edges strictly above
//! the threshold, style nodes, and hand the graph to the layout engine.
//! The pass is O(n²) in the filtered prompt count — fine at the target
//! scale of hundreds of prompts, with an optional cap for safety.

use crate::config::GalaxyConfig;
use crate::models::{
    GalaxyGraph, GalaxyNode, GalaxyStats, Position, Prompt, PromptId, SimilarityEdge,
};
use crate::services::components::connected_components;
use crate::services::layout::{LayoutEngine, SpringLayout};
use crate::services::similarity::pairwise_similarity;
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Filter applied to the prompt snapshot before scoring.
///
/// Filtering never mutates the input; it selects which prompts become
/// nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalaxyFilter {
    /// Keep only prompts in this category, when set.
    pub category: Option<String>,
    /// Keep only favorite prompts.
    pub favorites_only: bool,
}

impl GalaxyFilter {
    /// Creates a filter that keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a single category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to favorites.
    #[must_use]
    pub const fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    /// Checks whether a prompt survives the filter.
    #[must_use]
    pub fn matches(&self, prompt: &Prompt) -> bool {
        if let Some(category) = &self.category
            && prompt.category != *category
        {
            return false;
        }
        if self.favorites_only && !prompt.is_favorite {
            return false;
        }
        true
    }
}

/// Builds similarity graphs from prompt snapshots.
///
/// Stateless between calls; holds only validated configuration and the
/// injected layout strategy. Safe to share across sessions.
pub struct GalaxyBuilder {
    config: GalaxyConfig,
    layout: Box<dyn LayoutEngine>,
}

impl GalaxyBuilder {
    /// Creates a builder with the default spring layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the configuration fails
    /// validation (bad weights, threshold, or node style).
    pub fn new(config: GalaxyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layout: Box::new(SpringLayout::new()),
        })
    }

    /// Replaces the layout strategy.
    #[must_use]
    pub fn with_layout_engine(mut self, layout: Box<dyn LayoutEngine>) -> Self {
        self.layout = layout;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    /// Builds the similarity graph for a prompt snapshot.
    ///
    /// An empty snapshot (or one the filter empties) yields an empty
    /// graph, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the filtered prompt count
    /// exceeds the configured `max_prompts` cap.
    pub fn build(&self, prompts: &[Prompt], filter: &GalaxyFilter) -> Result<GalaxyGraph> {
        let filtered: Vec<&Prompt> = prompts.iter().filter(|p| filter.matches(p)).collect();
        tracing::debug!(
            total = prompts.len(),
            filtered = filtered.len(),
            category = filter.category.as_deref().unwrap_or("*"),
            favorites_only = filter.favorites_only,
            "building galaxy graph"
        );

        if let Some(cap) = self.config.max_prompts
            && filtered.len() > cap
        {
            return Err(Error::InvalidConfig(format!(
                "{} prompts exceed the max_prompts cap of {cap}",
                filtered.len()
            )));
        }

        // Palette slots in category first-appearance order, so colors are
        // stable for a given snapshot.
        let mut category_slots: HashMap<&str, usize> = HashMap::new();
        for prompt in &filtered {
            let next = category_slots.len();
            category_slots.entry(prompt.category.as_str()).or_insert(next);
        }

        let style = &self.config.node_style;
        let nodes: Vec<GalaxyNode> = filtered
            .iter()
            .map(|prompt| {
                let slot = category_slots.get(prompt.category.as_str()).copied();
                GalaxyNode {
                    id: prompt.id.clone(),
                    label: prompt.title.clone(),
                    category: prompt.category.clone(),
                    tags: prompt.tags.clone(),
                    is_favorite: prompt.is_favorite,
                    use_count: prompt.use_count,
                    position: Position::default(),
                    size: style.size_for(prompt.is_favorite, prompt.use_count),
                    color: style.color_for(slot.unwrap_or(0), prompt.is_favorite),
                }
            })
            .collect();

        let mut edges = Vec::new();
        for (i, a) in filtered.iter().enumerate() {
            for b in &filtered[(i + 1)..] {
                let score = pairwise_similarity(a, b, &self.config.weights);
                if score > self.config.threshold {
                    edges.push(SimilarityEdge::new(a.id.clone(), b.id.clone(), score));
                }
            }
        }

        let mut graph = GalaxyGraph { nodes, edges };
        let positions = self.layout.layout(&graph, self.config.seed);
        for node in &mut graph.nodes {
            if let Some(position) = positions.get(&node.id) {
                node.position = *position;
            }
        }

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "galaxy graph built"
        );
        Ok(graph)
    }

    /// Computes summary statistics for a built graph.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn statistics(&self, graph: &GalaxyGraph) -> GalaxyStats {
        let components = connected_components(graph);

        let average_similarity = if graph.edges.is_empty() {
            0.0
        } else {
            graph.edges.iter().map(|e| e.weight).sum::<f64>() / graph.edges.len() as f64
        };

        GalaxyStats {
            prompt_count: graph.node_count(),
            edge_count: graph.edge_count(),
            component_count: components.len(),
            average_similarity,
            most_connected_category: most_connected_category(graph),
        }
    }
}

/// Category with the highest total degree across its member nodes.
///
/// Ties break to the lexicographically smallest name; `None` when the
/// graph has no edges.
fn most_connected_category(graph: &GalaxyGraph) -> Option<String> {
    if graph.edges.is_empty() {
        return None;
    }

    let category_of: HashMap<&PromptId, &str> = graph
        .nodes
        .iter()
        .map(|n| (&n.id, n.category.as_str()))
        .collect();

    let mut degree_by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for edge in &graph.edges {
        for id in [&edge.source, &edge.target] {
            if let Some(category) = category_of.get(id) {
                *degree_by_category.entry(category).or_insert(0) += 1;
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, degree) in degree_by_category {
        // Strict '>' keeps the lexicographically smallest on ties, since
        // BTreeMap iterates in ascending key order.
        if best.is_none_or(|(_, best_degree)| degree > best_degree) {
            best = Some((category, degree));
        }
    }

    best.map(|(category, _)| category.to_string())
}
