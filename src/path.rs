// Shortest-path engine - Dijkstra over the current graph contents

use crate::graph_store::{GraphStore, NodeId};
use std::collections::{HashMap, HashSet};

/// Route from source to target, endpoints inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub nodes: Vec<NodeId>,
    /// Accumulated in u64: individual weights are u32, so even a
    /// few hundred maximal edges cannot overflow the total.
    pub total_weight: u64,
}

impl PathResult {
    /// Whether the path traverses the edge between `a` and `b`,
    /// in either direction.
    pub fn contains_leg(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes
            .windows(2)
            .any(|leg| (leg[0] == a && leg[1] == b) || (leg[0] == b && leg[1] == a))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }
}

/// Classic Dijkstra with a linear scan for the minimum unvisited
/// node; fine at the graph sizes this editor targets. Returns `None`
/// when no path connects the two nodes, which is a normal outcome.
/// Both endpoints must already exist in the graph.
pub fn shortest_path(
    graph: &GraphStore,
    source: NodeId,
    target: NodeId,
) -> Option<PathResult> {
    let mut unvisited: HashSet<NodeId> = graph.node_ids().collect();
    let mut dist: HashMap<NodeId, u64> = HashMap::new();
    let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
    dist.insert(source, 0);

    loop {
        // Minimum-distance unvisited node; ties broken by whatever
        // order the map iterates, which callers must not rely on.
        let current = unvisited
            .iter()
            .filter_map(|&id| dist.get(&id).map(|&d| (id, d)))
            .min_by_key(|&(_, d)| d)
            .map(|(id, _)| id);

        let Some(current) = current else {
            // Every reachable node has been settled.
            return None;
        };
        if current == target {
            break;
        }
        unvisited.remove(&current);

        let base = dist[&current];
        for (peer, weight) in graph.neighbors(current) {
            if !unvisited.contains(&peer) {
                continue;
            }
            let candidate = base + u64::from(weight);
            if dist.get(&peer).is_none_or(|&d| candidate < d) {
                dist.insert(peer, candidate);
                prev.insert(peer, current);
            }
        }
    }

    let mut nodes = vec![target];
    let mut cursor = target;
    while let Some(&p) = prev.get(&cursor) {
        nodes.push(p);
        cursor = p;
    }
    nodes.reverse();

    Some(PathResult {
        nodes,
        total_weight: dist[&target],
    })
}
