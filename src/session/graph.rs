//! Interaction graph construction.
//!
//! The graph links subgroup nodes to agent-persona nodes. It is rebuilt
//! from scratch on every session start: each subgroup gets edges to a
//! random subset of 2 or 3 distinct personas, sampled without
//! replacement. Edges only ever connect a subgroup to a persona, so the
//! graph is bipartite between the two node kinds.

use petgraph::graph::{NodeIndex, UnGraph};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::personas::PersonaRegistry;
use crate::session::subgroup::Subgroup;

/// Fewest personas a subgroup is linked to.
pub const MIN_AGENT_LINKS: usize = 2;
/// Most personas a subgroup is linked to. The roster must be at least
/// this large for sampling to be well defined.
pub const MAX_AGENT_LINKS: usize = 3;

/// Size attribute stamped on every agent node.
pub const AGENT_NODE_SIZE: u32 = 10;

/// Node category in the interaction graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A participant subgroup
    Subgroup,
    /// An agent persona
    Agent,
}

/// Node payload: label, category, and size attribute.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkNode {
    /// Display label (`Subgroup_<id>` or the persona key)
    pub label: String,
    /// Node category
    pub kind: NodeKind,
    /// Size attribute (participant count for subgroups, constant for agents)
    pub size: u32,
}

/// Undirected subgroup/persona interaction graph.
#[derive(Debug)]
pub struct InteractionGraph {
    graph: UnGraph<NetworkNode, ()>,
}

impl Default for InteractionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
        }
    }

    /// Rebuild the graph for a fresh session.
    ///
    /// Clears every node and edge from any prior session, then adds one
    /// node per subgroup, one node per persona in roster order, and the
    /// random subgroup-to-persona links.
    pub fn rebuild(
        &mut self,
        subgroups: &[Subgroup],
        personas: &PersonaRegistry,
        rng: &mut impl Rng,
    ) {
        self.graph.clear();

        let subgroup_nodes: Vec<NodeIndex> = subgroups
            .iter()
            .map(|sg| {
                self.graph.add_node(NetworkNode {
                    label: sg.label(),
                    kind: NodeKind::Subgroup,
                    size: sg.size() as u32,
                })
            })
            .collect();

        let agent_nodes: Vec<NodeIndex> = personas
            .iter()
            .map(|card| {
                self.graph.add_node(NetworkNode {
                    label: card.key.clone(),
                    kind: NodeKind::Agent,
                    size: AGENT_NODE_SIZE,
                })
            })
            .collect();

        for &sg_node in &subgroup_nodes {
            let link_count = rng.gen_range(MIN_AGENT_LINKS..=MAX_AGENT_LINKS);
            for &agent_node in agent_nodes.choose_multiple(rng, link_count) {
                if !self.graph.contains_edge(sg_node, agent_node) {
                    self.graph.add_edge(sg_node, agent_node, ());
                }
            }
        }
    }

    /// Borrow the underlying petgraph structure
    pub fn as_graph(&self) -> &UnGraph<NetworkNode, ()> {
        &self.graph
    }

    /// Total node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of subgroup nodes
    pub fn subgroup_count(&self) -> usize {
        self.nodes().filter(|n| n.kind == NodeKind::Subgroup).count()
    }

    /// Number of agent nodes
    pub fn agent_count(&self) -> usize {
        self.nodes().filter(|n| n.kind == NodeKind::Agent).count()
    }

    /// Iterate over node payloads in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &NetworkNode> {
        self.graph.node_weights()
    }

    /// Look up a node by label
    pub fn find(&self, label: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].label == label)
    }

    /// Degree of the node with the given label, if present
    pub fn degree_of(&self, label: &str) -> Option<usize> {
        self.find(label)
            .map(|idx| self.graph.neighbors(idx).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::subgroup::partition_participants;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn build(participants: u32, seed: u64) -> InteractionGraph {
        let subgroups = partition_participants(participants);
        let personas = PersonaRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut graph = InteractionGraph::new();
        graph.rebuild(&subgroups, &personas, &mut rng);
        graph
    }

    #[test]
    fn test_node_counts_and_unique_labels() {
        let graph = build(75, 1);
        assert_eq!(graph.subgroup_count(), 15);
        assert_eq!(graph.agent_count(), 7);
        assert_eq!(graph.node_count(), 22);

        let labels: HashSet<&str> = graph.nodes().map(|n| n.label.as_str()).collect();
        assert_eq!(labels.len(), 22);
        assert!(labels.contains("Subgroup_0"));
        assert!(labels.contains("creative"));
        assert!(labels.contains("innovator"));
    }

    #[test]
    fn test_subgroup_degrees_in_range() {
        let graph = build(75, 2);
        for id in 0..15 {
            let degree = graph.degree_of(&format!("Subgroup_{id}")).unwrap();
            assert!(
                (MIN_AGENT_LINKS..=MAX_AGENT_LINKS).contains(&degree),
                "Subgroup_{id} has degree {degree}"
            );
        }
    }

    #[test]
    fn test_edges_are_bipartite() {
        let graph = build(60, 3);
        let inner = graph.as_graph();
        for edge in inner.edge_indices() {
            let (a, b) = inner.edge_endpoints(edge).unwrap();
            let kinds = (inner[a].kind, inner[b].kind);
            assert!(
                kinds == (NodeKind::Subgroup, NodeKind::Agent)
                    || kinds == (NodeKind::Agent, NodeKind::Subgroup),
                "edge connects {kinds:?}"
            );
        }
    }

    #[test]
    fn test_edge_targets_are_distinct() {
        let graph = build(100, 4);
        let inner = graph.as_graph();
        for idx in inner.node_indices() {
            if inner[idx].kind != NodeKind::Subgroup {
                continue;
            }
            let neighbors: Vec<NodeIndex> = inner.neighbors(idx).collect();
            let unique: HashSet<NodeIndex> = neighbors.iter().copied().collect();
            assert_eq!(neighbors.len(), unique.len());
        }
    }

    #[test]
    fn test_rebuild_is_destructive() {
        let subgroups_a = partition_participants(75);
        let subgroups_b = partition_participants(10);
        let personas = PersonaRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut graph = InteractionGraph::new();
        graph.rebuild(&subgroups_a, &personas, &mut rng);
        assert_eq!(graph.node_count(), 22);

        graph.rebuild(&subgroups_b, &personas, &mut rng);
        assert_eq!(graph.node_count(), 9);
        assert!(graph.find("Subgroup_5").is_none());
        assert!(graph.find("Subgroup_1").is_some());
    }

    #[test]
    fn test_rebuild_with_no_subgroups() {
        let graph = build(0, 6);
        assert_eq!(graph.subgroup_count(), 0);
        assert_eq!(graph.agent_count(), 7);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_node_size_attributes() {
        let graph = build(25, 7);
        for node in graph.nodes() {
            match node.kind {
                NodeKind::Subgroup => assert_eq!(node.size, 5),
                NodeKind::Agent => assert_eq!(node.size, AGENT_NODE_SIZE),
            }
        }
    }

    #[test]
    fn test_same_seed_same_edges() {
        let a = build(45, 8);
        let b = build(45, 8);

        let edges = |g: &InteractionGraph| -> HashSet<(String, String)> {
            let inner = g.as_graph();
            inner
                .edge_indices()
                .map(|e| {
                    let (s, t) = inner.edge_endpoints(e).unwrap();
                    (inner[s].label.clone(), inner[t].label.clone())
                })
                .collect()
        };
        assert_eq!(edges(&a), edges(&b));
    }
}
