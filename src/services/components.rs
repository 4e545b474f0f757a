//! Connected-component partitioning of the galaxy graph.

use crate::models::{GalaxyGraph, PromptId};
use std::collections::{BTreeSet, HashMap};

/// Union-find over node indices with path compression and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Partitions the graph into connected components.
///
/// Every node belongs to exactly one component; isolated nodes form
/// singleton components. Components are ordered by the first appearance
/// of any member in the graph's node order, members sorted by ID.
#[must_use]
pub fn connected_components(graph: &GalaxyGraph) -> Vec<BTreeSet<PromptId>> {
    let index_of: HashMap<&PromptId, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (&n.id, i))
        .collect();

    let mut uf = UnionFind::new(graph.nodes.len());
    for edge in &graph.edges {
        if let (Some(&a), Some(&b)) = (index_of.get(&edge.source), index_of.get(&edge.target)) {
            uf.union(a, b);
        }
    }

    let mut component_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<BTreeSet<PromptId>> = Vec::new();

    for (i, node) in graph.nodes.iter().enumerate() {
        let root = uf.find(i);
        let slot = *component_of_root.entry(root).or_insert_with(|| {
            components.push(BTreeSet::new());
            components.len() - 1
        });
        components[slot].insert(node.id.clone());
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GalaxyNode, Position, SimilarityEdge};

    fn node(id: &str) -> GalaxyNode {
        GalaxyNode {
            id: PromptId::from(id),
            label: id.to_string(),
            category: "General".to_string(),
            tags: Vec::new(),
            is_favorite: false,
            use_count: 0,
            position: Position::default(),
            size: 10.0,
            color: "#2563EB".to_string(),
        }
    }

    fn edge(a: &str, b: &str) -> SimilarityEdge {
        SimilarityEdge::new(PromptId::from(a), PromptId::from(b), 0.9)
    }

    #[test]
    fn test_empty_graph_has_no_components() {
        assert!(connected_components(&GalaxyGraph::default()).is_empty());
    }

    #[test]
    fn test_isolated_nodes_are_singletons() {
        let graph = GalaxyGraph {
            nodes: vec![node("a"), node("b"), node("c")],
            edges: Vec::new(),
        };

        let components = connected_components(&graph);
        assert_eq!(components.len(), 3);
        assert!(components.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_edges_merge_components() {
        let graph = GalaxyGraph {
            nodes: vec![node("a"), node("b"), node("c"), node("d")],
            edges: vec![edge("a", "b"), edge("b", "c")],
        };

        let components = connected_components(&graph);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].len(), 3);
        assert!(components[0].contains(&PromptId::from("a")));
        assert!(components[0].contains(&PromptId::from("c")));
        assert_eq!(components[1].len(), 1);
        assert!(components[1].contains(&PromptId::from("d")));
    }

    #[test]
    fn test_every_node_in_exactly_one_component() {
        let graph = GalaxyGraph {
            nodes: vec![node("a"), node("b"), node("c"), node("d"), node("e")],
            edges: vec![edge("a", "c"), edge("d", "e")],
        };

        let components = connected_components(&graph);
        let total: usize = components.iter().map(BTreeSet::len).sum();
        assert_eq!(total, graph.node_count());

        for n in &graph.nodes {
            let holders = components.iter().filter(|c| c.contains(&n.id)).count();
            assert_eq!(holders, 1);
        }
    }

    #[test]
    fn test_cycle_is_single_component() {
        let graph = GalaxyGraph {
            nodes: vec![node("a"), node("b"), node("c")],
            edges: vec![edge("a", "b"), edge("b", "c"), edge("c", "a")],
        };

        let components = connected_components(&graph);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 3);
    }
}
