// Graph store - canonical node/edge collections and their invariants

use eframe::egui;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use std::fmt;

/// Stable numeric key for a node, independent of petgraph indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unordered endpoint pair, stored in canonical order so that
/// `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub a: NodeId,
    pub b: NodeId,
}

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

#[derive(Clone)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    /// Pinned position supplied by the layout provider at creation.
    pub pos: egui::Pos2,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} already exists")]
    DuplicateId(NodeId),
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),
    #[error("nodes {} and {} are already connected", .0.a, .0.b)]
    DuplicateEdge(EdgeKey),
    #[error("no edge between {} and {}", .0.a, .0.b)]
    EdgeNotFound(EdgeKey),
    #[error("edge weight must be a positive integer")]
    InvalidWeight,
}

/// Undirected weighted graph backed by a stable petgraph, with a
/// side map from stable ids to graph indices. All mutations either
/// apply the single described change or return a typed error.
pub struct GraphStore {
    graph: StableUnGraph<Node, u32>,
    ids: BTreeMap<NodeId, NodeIndex>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            ids: BTreeMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.ids.get(&id).map(|&ix| &self.graph[ix])
    }

    /// Smallest numeric id not yet in use.
    pub fn next_node_id(&self) -> NodeId {
        let mut candidate = 0;
        while self.ids.contains_key(&NodeId(candidate)) {
            candidate += 1;
        }
        NodeId(candidate)
    }

    pub fn add_node(
        &mut self,
        id: NodeId,
        label: String,
        pos: egui::Pos2,
    ) -> Result<NodeId, GraphError> {
        if self.ids.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        let ix = self.graph.add_node(Node { id, label, pos });
        self.ids.insert(id, ix);
        Ok(id)
    }

    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: u32,
    ) -> Result<EdgeKey, GraphError> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let key = EdgeKey::new(a, b);
        if self.graph.find_edge(ia, ib).is_some() {
            return Err(GraphError::DuplicateEdge(key));
        }
        if weight == 0 {
            return Err(GraphError::InvalidWeight);
        }
        self.graph.add_edge(ia, ib, weight);
        Ok(key)
    }

    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<EdgeKey, GraphError> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        let key = EdgeKey::new(a, b);
        match self.graph.find_edge(ia, ib) {
            Some(edge_ix) => {
                self.graph.remove_edge(edge_ix);
                Ok(key)
            }
            None => Err(GraphError::EdgeNotFound(key)),
        }
    }

    pub fn set_weight(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: u32,
    ) -> Result<EdgeKey, GraphError> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        let key = EdgeKey::new(a, b);
        let edge_ix = self
            .graph
            .find_edge(ia, ib)
            .ok_or(GraphError::EdgeNotFound(key))?;
        if weight == 0 {
            return Err(GraphError::InvalidWeight);
        }
        self.graph[edge_ix] = weight;
        Ok(key)
    }

    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<u32> {
        let ia = *self.ids.get(&a)?;
        let ib = *self.ids.get(&b)?;
        let edge_ix = self.graph.find_edge(ia, ib)?;
        self.graph.edge_weight(edge_ix).copied()
    }

    /// Every incident edge of `id` as `(peer, weight)`. Unknown ids
    /// have no neighbors.
    pub fn neighbors(&self, id: NodeId) -> Vec<(NodeId, u32)> {
        let Some(&ix) = self.ids.get(&id) else {
            return Vec::new();
        };
        self.graph
            .edges(ix)
            .map(|edge| {
                let other = if edge.source() == ix {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other].id, *edge.weight())
            })
            .collect()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.keys().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.ids.values().map(|&ix| &self.graph[ix])
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, u32)> + '_ {
        self.graph.edge_indices().filter_map(|edge_ix| {
            let (ia, ib) = self.graph.edge_endpoints(edge_ix)?;
            let key = EdgeKey::new(self.graph[ia].id, self.graph[ib].id);
            Some((key, self.graph[edge_ix]))
        })
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex, GraphError> {
        self.ids
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownNode(id))
    }
}
