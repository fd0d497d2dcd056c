// Session store - graph, active edit mode, and display state

use crate::graph_store::{GraphStore, NodeId};
use crate::highlight::Highlights;
use crate::layout::{self, SpacingConfig};
use crate::path::PathResult;
use eframe::egui;
use std::collections::BTreeSet;

/// The single active interactive task. Exactly one variant is live
/// at a time and carries all of its scratch fields, so two modes can
/// never be active together.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    /// A node has been reserved (id + position) but not inserted;
    /// picks toggle membership in the peer set it will connect to.
    SelectingPeers {
        pending_id: NodeId,
        pending_pos: egui::Pos2,
        peers: BTreeSet<NodeId>,
    },
    AddingEdge {
        source: Option<NodeId>,
        target: Option<NodeId>,
    },
    RemovingEdge {
        source: Option<NodeId>,
        target: Option<NodeId>,
    },
    ModifyingWeight {
        source: Option<NodeId>,
        target: Option<NodeId>,
        /// Editable weight text, validated only on submit.
        input: String,
    },
    FindingPath {
        source: Option<NodeId>,
        target: Option<NodeId>,
    },
}

impl Mode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::Idle)
    }

    /// Short label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::SelectingPeers { .. } => "Add node: pick neighbors",
            Mode::AddingEdge { .. } => "Add edge",
            Mode::RemovingEdge { .. } => "Remove edge",
            Mode::ModifyingWeight { .. } => "Modify weight",
            Mode::FindingPath { .. } => "Find path",
        }
    }
}

pub struct Store {
    pub graph: GraphStore,
    pub mode: Mode,
    pub highlights: Highlights,
    pub path_result: Option<PathResult>,
    pub error_message: Option<String>,
    /// Tick clock driving highlight expiry.
    pub clock: u64,
    /// Canvas center reported by the renderer, fed to the layout
    /// provider when a node placement is reserved.
    pub canvas_center: egui::Pos2,
    pub spacing: SpacingConfig,
}

impl Store {
    pub fn new(graph: GraphStore) -> Self {
        Self {
            graph,
            mode: Mode::Idle,
            highlights: Highlights::new(),
            path_result: None,
            error_message: None,
            clock: 0,
            canvas_center: egui::Pos2::new(400.0, 300.0),
            spacing: SpacingConfig::default(),
        }
    }

    /// Default starting graph: a small triangle to edit from.
    pub fn with_demo_graph() -> Self {
        let mut store = Self::new(GraphStore::new());
        for i in 0..3u32 {
            let pos = layout::place_node(store.canvas_center, i as usize, store.spacing);
            store
                .graph
                .add_node(NodeId(i), format!("Node {i}"), pos)
                .ok();
        }
        store.graph.add_edge(NodeId(0), NodeId(1), 1).ok();
        store.graph.add_edge(NodeId(1), NodeId(2), 2).ok();
        store.graph.add_edge(NodeId(2), NodeId(0), 3).ok();
        store
    }

    /// Switch to `mode`, dropping every other mode's scratch state,
    /// the displayed path, any error, and all live highlights.
    pub fn enter_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.path_result = None;
        self.error_message = None;
        self.highlights.clear();
    }
}
