// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Validated spread-graph arena.
//!
//! `SpreadGraph::new` checks the topology once (single tumor source, known
//! targets, no duplicates, acyclic, fully reachable); after that the graph
//! shape is immutable and only edge probabilities can change.

use ahash::AHashMap;

use crate::edge::{Edge, EdgeId, Parent};
use crate::error::{GraphError, GraphResult};
use crate::node::{Node, NodeId};
use crate::topology::{Topology, TUMOR};

/// Directed acyclic progression graph of lymph node levels fed by a
/// single tumor source.
#[derive(Debug, Clone)]
pub struct SpreadGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    base_edges: Vec<EdgeId>,
    trans_edges: Vec<EdgeId>,
    name_to_id: AHashMap<String, NodeId>,
}

impl SpreadGraph {
    /// Build and validate a graph from a topology description.
    ///
    /// All spread probabilities start at 0.
    pub fn new(topology: &Topology) -> GraphResult<Self> {
        let tumor_rows = topology
            .rows
            .iter()
            .filter(|row| row.source == TUMOR)
            .count();
        match tumor_rows {
            0 => return Err(GraphError::MissingTumor),
            1 => {}
            n => return Err(GraphError::MultipleTumorRows(n)),
        }

        let names = topology.node_names();
        let mut name_to_id: AHashMap<String, NodeId> = AHashMap::new();
        let mut nodes: Vec<Node> = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            name_to_id.insert(name.clone(), NodeId(idx));
            nodes.push(Node::new(name.clone()));
        }

        let mut edges: Vec<Edge> = Vec::new();
        let mut base_edges: Vec<EdgeId> = Vec::new();
        let mut trans_edges: Vec<EdgeId> = Vec::new();
        let mut seen: Vec<(Parent, NodeId)> = Vec::new();

        for row in &topology.rows {
            let parent = if row.source == TUMOR {
                Parent::Tumor
            } else {
                // node_names() registered every row source, so this cannot miss
                Parent::Lnl(name_to_id[&row.source])
            };

            for target in &row.targets {
                if target == TUMOR {
                    return Err(GraphError::TumorAsTarget);
                }
                let child = *name_to_id
                    .get(target)
                    .ok_or_else(|| GraphError::UnknownNode(target.clone()))?;
                if let Parent::Lnl(source) = parent {
                    if source == child {
                        return Err(GraphError::SelfLoop(target.clone()));
                    }
                }
                if seen.contains(&(parent, child)) {
                    return Err(GraphError::DuplicateEdge {
                        parent: row.source.clone(),
                        child: target.clone(),
                    });
                }
                seen.push((parent, child));

                let edge_id = EdgeId(edges.len());
                edges.push(Edge::new(parent, child));
                nodes[child.index()].push_incoming(edge_id);
                match parent {
                    Parent::Tumor => base_edges.push(edge_id),
                    Parent::Lnl(source) => {
                        nodes[source.index()].push_outgoing(edge_id);
                        trans_edges.push(edge_id);
                    }
                }
            }
        }

        let graph = Self {
            nodes,
            edges,
            base_edges,
            trans_edges,
            name_to_id,
        };
        graph.check_acyclic()?;
        graph.check_reachability()?;
        Ok(graph)
    }

    /// Number of lymph node levels
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Tumor → LNL edges, in declaration order
    pub fn base_edges(&self) -> &[EdgeId] {
        &self.base_edges
    }

    /// LNL → LNL edges, in declaration order
    pub fn trans_edges(&self) -> &[EdgeId] {
        &self.trans_edges
    }

    /// Edges pointing into the given level
    pub fn incoming(&self, id: NodeId) -> &[EdgeId] {
        self.nodes[id.index()].incoming()
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    /// Human-readable `parent -> child` label, used in error messages
    pub fn edge_label(&self, id: EdgeId) -> String {
        let edge = &self.edges[id.index()];
        let parent = match edge.parent() {
            Parent::Tumor => TUMOR,
            Parent::Lnl(source) => self.nodes[source.index()].name(),
        };
        format!("{} -> {}", parent, self.nodes[edge.child().index()].name())
    }

    /// Range-checked write of a single edge probability
    pub fn set_edge_prob(&mut self, id: EdgeId, prob: f64) -> GraphResult<()> {
        if id.index() >= self.edges.len() {
            return Err(GraphError::InvalidEdgeId(id.index()));
        }
        if !(0.0..=1.0).contains(&prob) || prob.is_nan() {
            return Err(GraphError::ProbabilityOutOfRange {
                edge: self.edge_label(id),
                value: prob,
            });
        }
        self.edges[id.index()].set_spread_prob(prob);
        Ok(())
    }

    /// DFS three-color cycle check over the LNL → LNL subgraph
    fn check_acyclic(&self) -> GraphResult<()> {
        const WHITE: u8 = 0;
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;

        let mut color = vec![WHITE; self.nodes.len()];

        fn visit(
            graph: &SpreadGraph,
            node: usize,
            color: &mut [u8],
        ) -> Result<(), usize> {
            color[node] = GRAY;
            for &edge_id in graph.nodes[node].outgoing() {
                let child = graph.edges[edge_id.index()].child().index();
                match color[child] {
                    GRAY => return Err(child),
                    WHITE => visit(graph, child, color)?,
                    _ => {}
                }
            }
            color[node] = BLACK;
            Ok(())
        }

        for start in 0..self.nodes.len() {
            if color[start] == WHITE {
                if let Err(node) = visit(self, start, &mut color) {
                    return Err(GraphError::CircularDependency(
                        self.nodes[node].name().to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Every LNL must be reachable from the tumor source
    fn check_reachability(&self) -> GraphResult<()> {
        let mut reached = vec![false; self.nodes.len()];
        let mut frontier: Vec<usize> = self
            .base_edges
            .iter()
            .map(|id| self.edges[id.index()].child().index())
            .collect();
        for &node in &frontier {
            reached[node] = true;
        }
        while let Some(node) = frontier.pop() {
            for &edge_id in self.nodes[node].outgoing() {
                let child = self.edges[edge_id.index()].child().index();
                if !reached[child] {
                    reached[child] = true;
                    frontier.push(child);
                }
            }
        }
        if let Some(idx) = reached.iter().position(|r| !r) {
            return Err(GraphError::Unreachable(self.nodes[idx].name().to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    fn chain() -> Topology {
        Topology::new(&[("tumor", ["A"].as_slice()), ("A", ["B"].as_slice())])
    }

    #[test]
    fn test_chain_construction() {
        let graph = SpreadGraph::new(&chain()).unwrap();
        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.base_edges().len(), 1);
        assert_eq!(graph.trans_edges().len(), 1);
        assert_eq!(graph.node_id("A"), Some(NodeId(0)));
        assert_eq!(graph.node_id("B"), Some(NodeId(1)));
        // B's only incoming edge is the trans edge from A
        let incoming = graph.incoming(NodeId(1));
        assert_eq!(incoming.len(), 1);
        assert_eq!(graph.edge(incoming[0]).parent(), Parent::Lnl(NodeId(0)));
    }

    #[test]
    fn test_edge_order_is_declaration_order() {
        let topology = Topology::new(&[
            ("tumor", ["II", "III", "IV"].as_slice()),
            ("II", ["III"].as_slice()),
            ("III", ["IV"].as_slice()),
        ]);
        let graph = SpreadGraph::new(&topology).unwrap();
        let base_labels: Vec<String> = graph
            .base_edges()
            .iter()
            .map(|&id| graph.edge_label(id))
            .collect();
        assert_eq!(base_labels, vec!["tumor -> II", "tumor -> III", "tumor -> IV"]);
        let trans_labels: Vec<String> = graph
            .trans_edges()
            .iter()
            .map(|&id| graph.edge_label(id))
            .collect();
        assert_eq!(trans_labels, vec!["II -> III", "III -> IV"]);
    }

    #[test]
    fn test_missing_tumor() {
        let topology = Topology::new(&[("A", ["B"].as_slice())]);
        assert!(matches!(
            SpreadGraph::new(&topology),
            Err(GraphError::MissingTumor)
        ));
    }

    #[test]
    fn test_cycle_detected() {
        let topology = Topology::new(&[
            ("tumor", ["A"].as_slice()),
            ("A", ["B"].as_slice()),
            ("B", ["A"].as_slice()),
        ]);
        assert!(matches!(
            SpreadGraph::new(&topology),
            Err(GraphError::CircularDependency(_))
        ));
    }

    #[test]
    fn test_unreachable_level() {
        let topology = Topology::new(&[
            ("tumor", ["A"].as_slice()),
            ("B", ["C"].as_slice()),
            ("C", ["B"].as_slice()),
        ]);
        // the B/C island is cyclic as well; the cycle check fires first
        assert!(SpreadGraph::new(&topology).is_err());

        let empty: &[&str] = &[];
        let topology = Topology::new(&[("tumor", empty), ("A", ["B"].as_slice())]);
        assert!(matches!(
            SpreadGraph::new(&topology),
            Err(GraphError::Unreachable(_))
        ));
    }

    #[test]
    fn test_duplicate_edge_and_self_loop() {
        let topology = Topology::new(&[("tumor", ["A", "A"].as_slice())]);
        assert!(matches!(
            SpreadGraph::new(&topology),
            Err(GraphError::DuplicateEdge { .. })
        ));

        let topology = Topology::new(&[("tumor", ["A"].as_slice()), ("A", ["A"].as_slice())]);
        assert!(matches!(
            SpreadGraph::new(&topology),
            Err(GraphError::SelfLoop(name)) if name == "A"
        ));
    }

    #[test]
    fn test_set_edge_prob_range_check() {
        let mut graph = SpreadGraph::new(&chain()).unwrap();
        let base = graph.base_edges()[0];
        graph.set_edge_prob(base, 0.3).unwrap();
        assert!((graph.edge(base).spread_prob() - 0.3).abs() < 1e-12);

        assert!(matches!(
            graph.set_edge_prob(base, 1.5),
            Err(GraphError::ProbabilityOutOfRange { .. })
        ));
        // failed write leaves the previous value
        assert!((graph.edge(base).spread_prob() - 0.3).abs() < 1e-12);
    }
}
