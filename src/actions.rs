// Edit-session state machine: actions dispatched by the UI and the
// reducer that applies them to the store

use crate::graph_store::{EdgeKey, GraphError, NodeId};
use crate::highlight::HighlightKey;
use crate::layout;
use crate::path;
use crate::store::{Mode, Store};
use eframe::egui;
use rand::Rng;
use std::collections::BTreeSet;

/// Actions that can be dispatched to modify the editor state
#[derive(Debug, Clone)]
pub enum Action {
    /// Reserve the next node id and a placement, then collect peers
    BeginAddNode,
    /// Start the two-pick add-edge flow
    BeginAddEdge,
    /// Start the two-pick remove-edge flow
    BeginRemoveEdge,
    /// Start the two-pick weight-edit flow
    BeginModifyWeight,
    /// Start the two-pick shortest-path query
    BeginFindPath,
    /// A node was picked on the canvas
    NodePicked { id: NodeId },
    /// Replace the weight-edit text buffer
    SetWeightInput { text: String },
    /// Validate and commit the weight-edit text buffer
    SubmitWeight,
    /// Insert the pending node and connect it to every chosen peer
    ConfirmPeers,
    /// Abandon the active mode and return to idle
    Cancel,
    /// Advance the highlight clock by one tick
    Tick,
    /// Renderer-reported canvas center, used for node placement
    SetCanvasCenter { center: egui::Pos2 },
}

/// Session-level failures that do not come from the graph store.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
enum SessionError {
    #[error("pick at least one neighbor for the new node")]
    NoPeersSelected,
    #[error("no path connects {0} and {1}")]
    NoPathExists(NodeId, NodeId),
}

/// Generated weights stay small so they remain legible on the canvas.
fn fresh_weight() -> u32 {
    rand::rng().random_range(1..=9)
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) {
    match action {
        Action::BeginAddNode => {
            let pending_id = store.graph.next_node_id();
            let pending_pos = layout::place_node(
                store.canvas_center,
                store.graph.node_count(),
                store.spacing,
            );
            store.enter_mode(Mode::SelectingPeers {
                pending_id,
                pending_pos,
                peers: BTreeSet::new(),
            });
        }
        Action::BeginAddEdge => store.enter_mode(Mode::AddingEdge {
            source: None,
            target: None,
        }),
        Action::BeginRemoveEdge => store.enter_mode(Mode::RemovingEdge {
            source: None,
            target: None,
        }),
        Action::BeginModifyWeight => store.enter_mode(Mode::ModifyingWeight {
            source: None,
            target: None,
            input: String::new(),
        }),
        Action::BeginFindPath => store.enter_mode(Mode::FindingPath {
            source: None,
            target: None,
        }),
        Action::NodePicked { id } => node_picked(store, id),
        Action::SetWeightInput { text } => {
            if let Mode::ModifyingWeight { input, .. } = &mut store.mode {
                *input = text;
            }
        }
        Action::SubmitWeight => submit_weight(store),
        Action::ConfirmPeers => confirm_peers(store),
        Action::Cancel => {
            if matches!(store.mode, Mode::FindingPath { .. }) {
                store.path_result = None;
            }
            store.mode = Mode::Idle;
            store.error_message = None;
        }
        Action::Tick => {
            store.clock += 1;
            store.highlights.prune(store.clock);
        }
        Action::SetCanvasCenter { center } => {
            store.canvas_center = center;
        }
    }
}

/// Route a pick to the active mode. Every pick is validated against
/// the graph; the scratch fields here are the only record of what
/// has been picked so far.
fn node_picked(store: &mut Store, id: NodeId) {
    if !store.graph.contains(id) {
        store.error_message = Some(GraphError::UnknownNode(id).to_string());
        return;
    }
    let now = store.clock;
    match &mut store.mode {
        Mode::Idle => {}
        Mode::SelectingPeers { peers, .. } => {
            // Picks toggle peer membership; nothing touches the
            // graph until the selection is confirmed.
            if !peers.remove(&id) {
                peers.insert(id);
            }
            store.error_message = None;
        }
        Mode::AddingEdge { source, target } => match *source {
            None => {
                *source = Some(id);
                store.error_message = None;
            }
            Some(s) if s == id => {}
            Some(s) => match store.graph.add_edge(s, id, fresh_weight()) {
                Ok(key) => {
                    *target = Some(id);
                    store.error_message = None;
                    store.path_result = None;
                    store.highlights.register(HighlightKey::Edge(key), now);
                }
                // Source stays fixed so a different target can be
                // picked right away.
                Err(err) => store.error_message = Some(err.to_string()),
            },
        },
        Mode::RemovingEdge { source, target } => match *source {
            None => {
                *source = Some(id);
                store.error_message = None;
            }
            Some(s) if s == id => {}
            Some(s) => match store.graph.remove_edge(s, id) {
                Ok(key) => {
                    *target = Some(id);
                    store.error_message = None;
                    store.path_result = None;
                    store.highlights.remove(HighlightKey::Edge(key));
                }
                Err(err) => store.error_message = Some(err.to_string()),
            },
        },
        Mode::ModifyingWeight {
            source,
            target,
            input,
        } => match *source {
            None => {
                *source = Some(id);
                store.error_message = None;
            }
            Some(s) if s == id => {}
            Some(s) => match store.graph.edge_weight(s, id) {
                Some(weight) => {
                    *target = Some(id);
                    *input = weight.to_string();
                    store.error_message = None;
                }
                None => {
                    store.error_message =
                        Some(GraphError::EdgeNotFound(EdgeKey::new(s, id)).to_string());
                }
            },
        },
        Mode::FindingPath { source, target } => match *source {
            None => {
                *source = Some(id);
                store.error_message = None;
            }
            Some(s) if s == id => {}
            Some(s) => match path::shortest_path(&store.graph, s, id) {
                Some(result) => {
                    *target = Some(id);
                    store.path_result = Some(result);
                    store.error_message = None;
                }
                None => {
                    store.path_result = None;
                    store.error_message =
                        Some(SessionError::NoPathExists(s, id).to_string());
                }
            },
        },
    }
}

fn submit_weight(store: &mut Store) {
    let now = store.clock;
    let Mode::ModifyingWeight {
        source: Some(source),
        target,
        input,
    } = &mut store.mode
    else {
        return;
    };
    let Some(picked) = *target else {
        return;
    };
    let source = *source;

    match input.trim().parse::<u32>() {
        Ok(weight) => match store.graph.set_weight(source, picked, weight) {
            Ok(key) => {
                input.clear();
                *target = None;
                store.error_message = None;
                store.path_result = None;
                store.highlights.register(HighlightKey::Edge(key), now);
            }
            Err(err) => store.error_message = Some(err.to_string()),
        },
        // Non-numeric and negative text both land here; the stored
        // weight is left as it was.
        Err(_) => store.error_message = Some(GraphError::InvalidWeight.to_string()),
    }
}

fn confirm_peers(store: &mut Store) {
    let Mode::SelectingPeers {
        pending_id,
        pending_pos,
        peers,
    } = &store.mode
    else {
        return;
    };
    if peers.is_empty() {
        store.error_message = Some(SessionError::NoPeersSelected.to_string());
        return;
    }
    let (id, pos, peers) = (*pending_id, *pending_pos, peers.clone());

    let now = store.clock;
    match store.graph.add_node(id, format!("Node {id}"), pos) {
        Ok(id) => {
            store.highlights.register(HighlightKey::Node(id), now);
            store.error_message = None;
            for peer in peers {
                match store.graph.add_edge(id, peer, fresh_weight()) {
                    Ok(key) => store.highlights.register(HighlightKey::Edge(key), now),
                    Err(err) => store.error_message = Some(err.to_string()),
                }
            }
            store.path_result = None;
            store.mode = Mode::Idle;
        }
        Err(err) => store.error_message = Some(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_store::GraphStore;
    use crate::highlight::HIGHLIGHT_TICKS;

    fn session(nodes: u32, edges: &[(u32, u32, u32)]) -> Store {
        let mut graph = GraphStore::new();
        for i in 0..nodes {
            graph
                .add_node(NodeId(i), format!("Node {i}"), egui::Pos2::ZERO)
                .unwrap();
        }
        for &(a, b, w) in edges {
            graph.add_edge(NodeId(a), NodeId(b), w).unwrap();
        }
        Store::new(graph)
    }

    fn pick(store: &mut Store, id: u32) {
        update(store, Action::NodePicked { id: NodeId(id) });
    }

    #[test]
    fn add_edge_records_source_then_creates_edge() {
        let mut store = session(3, &[]);
        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        assert_eq!(
            store.mode,
            Mode::AddingEdge {
                source: Some(NodeId(0)),
                target: None
            }
        );

        pick(&mut store, 1);
        let weight = store.graph.edge_weight(NodeId(0), NodeId(1)).unwrap();
        assert!((1..=9).contains(&weight));
        let key = EdgeKey::new(NodeId(0), NodeId(1));
        assert!(store.highlights.contains(HighlightKey::Edge(key), store.clock));
    }

    #[test]
    fn add_edge_chains_from_the_same_source() {
        let mut store = session(3, &[]);
        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        pick(&mut store, 1);
        pick(&mut store, 2);

        assert!(store.graph.edge_weight(NodeId(0), NodeId(1)).is_some());
        assert!(store.graph.edge_weight(NodeId(0), NodeId(2)).is_some());
        assert!(store.graph.edge_weight(NodeId(1), NodeId(2)).is_none());
    }

    #[test]
    fn duplicate_edge_keeps_source_for_a_retry() {
        let mut store = session(3, &[(0, 1, 5)]);
        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        pick(&mut store, 1);
        assert!(store.error_message.is_some());
        assert_eq!(store.graph.edge_weight(NodeId(0), NodeId(1)), Some(5));

        // Retry with a different target succeeds and clears the error.
        pick(&mut store, 2);
        assert!(store.error_message.is_none());
        assert!(store.graph.edge_weight(NodeId(0), NodeId(2)).is_some());
    }

    #[test]
    fn picking_the_source_again_is_ignored() {
        let mut store = session(2, &[]);
        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        pick(&mut store, 0);
        assert_eq!(
            store.mode,
            Mode::AddingEdge {
                source: Some(NodeId(0)),
                target: None
            }
        );
        assert!(store.error_message.is_none());
    }

    #[test]
    fn unknown_pick_reports_an_error() {
        let mut store = session(1, &[]);
        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 42);
        assert!(store.error_message.is_some());
        assert_eq!(
            store.mode,
            Mode::AddingEdge {
                source: None,
                target: None
            }
        );
    }

    #[test]
    fn remove_edge_flow_removes_and_reports_missing() {
        let mut store = session(2, &[(0, 1, 3)]);
        update(&mut store, Action::BeginRemoveEdge);
        pick(&mut store, 0);
        pick(&mut store, 1);
        assert_eq!(store.graph.edge_weight(NodeId(0), NodeId(1)), None);
        assert!(store.error_message.is_none());

        // The edge is gone, so a second removal attempt fails cleanly.
        update(&mut store, Action::BeginRemoveEdge);
        pick(&mut store, 0);
        pick(&mut store, 1);
        assert!(store.error_message.is_some());
    }

    #[test]
    fn modify_weight_exposes_current_weight_then_commits() {
        let mut store = session(2, &[(0, 1, 5)]);
        update(&mut store, Action::BeginModifyWeight);
        pick(&mut store, 0);
        pick(&mut store, 1);
        assert_eq!(
            store.mode,
            Mode::ModifyingWeight {
                source: Some(NodeId(0)),
                target: Some(NodeId(1)),
                input: "5".into()
            }
        );
        // Nothing has been written yet.
        assert_eq!(store.graph.edge_weight(NodeId(0), NodeId(1)), Some(5));

        update(&mut store, Action::SetWeightInput { text: "12".into() });
        update(&mut store, Action::SubmitWeight);
        assert_eq!(store.graph.edge_weight(NodeId(0), NodeId(1)), Some(12));
        assert!(store.error_message.is_none());
        let key = EdgeKey::new(NodeId(0), NodeId(1));
        assert!(store.highlights.contains(HighlightKey::Edge(key), store.clock));
        // Source is retained for another edit, the commit is done.
        assert_eq!(
            store.mode,
            Mode::ModifyingWeight {
                source: Some(NodeId(0)),
                target: None,
                input: String::new()
            }
        );
    }

    #[test]
    fn bad_weight_text_is_rejected_without_mutation() {
        for text in ["abc", "", "0", "-5", "1.5"] {
            let mut store = session(2, &[(0, 1, 5)]);
            update(&mut store, Action::BeginModifyWeight);
            pick(&mut store, 0);
            pick(&mut store, 1);
            update(
                &mut store,
                Action::SetWeightInput { text: text.into() },
            );
            update(&mut store, Action::SubmitWeight);
            assert!(store.error_message.is_some(), "{text:?} should be rejected");
            assert_eq!(store.graph.edge_weight(NodeId(0), NodeId(1)), Some(5));
        }
    }

    #[test]
    fn modify_weight_on_missing_edge_reports_error() {
        let mut store = session(3, &[(0, 1, 5)]);
        update(&mut store, Action::BeginModifyWeight);
        pick(&mut store, 0);
        pick(&mut store, 2);
        assert!(store.error_message.is_some());
        assert_eq!(
            store.mode,
            Mode::ModifyingWeight {
                source: Some(NodeId(0)),
                target: None,
                input: String::new()
            }
        );
    }

    #[test]
    fn submit_weight_before_a_target_is_a_no_op() {
        let mut store = session(2, &[(0, 1, 5)]);
        update(&mut store, Action::SubmitWeight);
        update(&mut store, Action::BeginModifyWeight);
        pick(&mut store, 0);
        update(&mut store, Action::SubmitWeight);
        assert!(store.error_message.is_none());
        assert_eq!(store.graph.edge_weight(NodeId(0), NodeId(1)), Some(5));
    }

    #[test]
    fn find_path_stores_result_and_no_path_is_reported() {
        let mut store = session(4, &[(0, 1, 1), (2, 3, 1)]);
        update(&mut store, Action::BeginFindPath);
        pick(&mut store, 0);
        pick(&mut store, 1);
        let result = store.path_result.clone().unwrap();
        assert_eq!(result.nodes, vec![NodeId(0), NodeId(1)]);
        assert_eq!(result.total_weight, 1);

        // Source stays fixed; an unreachable target is a notice, not
        // a reset.
        pick(&mut store, 3);
        assert!(store.path_result.is_none());
        assert!(store.error_message.is_some());
        assert_eq!(
            store.mode,
            Mode::FindingPath {
                source: Some(NodeId(0)),
                target: Some(NodeId(1))
            }
        );
    }

    #[test]
    fn entering_a_mode_clears_other_scratch_and_path() {
        let mut store = session(3, &[(0, 1, 1), (1, 2, 1)]);
        update(&mut store, Action::BeginFindPath);
        pick(&mut store, 0);
        pick(&mut store, 2);
        assert!(store.path_result.is_some());

        update(&mut store, Action::BeginAddEdge);
        assert!(store.path_result.is_none());
        pick(&mut store, 0);

        // Switching modes abandons the pending edge source.
        update(&mut store, Action::BeginFindPath);
        assert_eq!(
            store.mode,
            Mode::FindingPath {
                source: None,
                target: None
            }
        );
        pick(&mut store, 1);
        pick(&mut store, 2);
        // No stray edge appeared from the abandoned source.
        assert!(store.graph.edge_weight(NodeId(0), NodeId(2)).is_none());
        assert_eq!(store.graph.neighbors(NodeId(0)).len(), 1);
    }

    #[test]
    fn entering_a_mode_clears_live_highlights() {
        let mut store = session(3, &[]);
        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        pick(&mut store, 1);
        assert!(!store.highlights.is_empty());

        update(&mut store, Action::BeginFindPath);
        assert!(store.highlights.is_empty());
    }

    #[test]
    fn cancel_is_idempotent_and_total() {
        let mut store = session(2, &[]);
        update(&mut store, Action::Cancel);
        update(&mut store, Action::Cancel);
        assert!(store.mode.is_idle());

        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        update(&mut store, Action::Cancel);
        assert!(store.mode.is_idle());
        assert!(store.error_message.is_none());
    }

    #[test]
    fn cancel_from_find_path_drops_the_displayed_path() {
        let mut store = session(2, &[(0, 1, 1)]);
        update(&mut store, Action::BeginFindPath);
        pick(&mut store, 0);
        pick(&mut store, 1);
        assert!(store.path_result.is_some());
        update(&mut store, Action::Cancel);
        assert!(store.path_result.is_none());
    }

    #[test]
    fn add_node_reserves_an_id_without_inserting() {
        let mut store = session(3, &[]);
        update(&mut store, Action::BeginAddNode);
        assert_eq!(store.graph.node_count(), 3);
        let Mode::SelectingPeers { pending_id, .. } = &store.mode else {
            panic!("expected peer selection mode");
        };
        assert_eq!(*pending_id, NodeId(3));
    }

    #[test]
    fn peer_picks_toggle_membership() {
        let mut store = session(3, &[]);
        update(&mut store, Action::BeginAddNode);
        pick(&mut store, 0);
        pick(&mut store, 2);
        pick(&mut store, 0);
        let Mode::SelectingPeers { peers, .. } = &store.mode else {
            panic!("expected peer selection mode");
        };
        assert_eq!(peers.iter().copied().collect::<Vec<_>>(), vec![NodeId(2)]);
    }

    #[test]
    fn confirm_with_no_peers_is_rejected() {
        let mut store = session(3, &[]);
        update(&mut store, Action::BeginAddNode);
        update(&mut store, Action::ConfirmPeers);
        assert!(store.error_message.is_some());
        assert!(matches!(store.mode, Mode::SelectingPeers { .. }));
        assert_eq!(store.graph.node_count(), 3);
    }

    #[test]
    fn confirm_inserts_the_node_and_wires_every_peer() {
        let mut store = session(3, &[]);
        update(&mut store, Action::BeginAddNode);
        pick(&mut store, 0);
        pick(&mut store, 2);
        update(&mut store, Action::ConfirmPeers);

        assert!(store.mode.is_idle());
        assert!(store.error_message.is_none());
        assert_eq!(store.graph.node_count(), 4);
        let w0 = store.graph.edge_weight(NodeId(3), NodeId(0)).unwrap();
        let w2 = store.graph.edge_weight(NodeId(3), NodeId(2)).unwrap();
        assert!((1..=9).contains(&w0) && (1..=9).contains(&w2));
        assert!(store.graph.edge_weight(NodeId(3), NodeId(1)).is_none());

        let now = store.clock;
        assert!(store.highlights.contains(HighlightKey::Node(NodeId(3)), now));
        assert!(store.highlights.contains(
            HighlightKey::Edge(EdgeKey::new(NodeId(3), NodeId(0))),
            now
        ));
    }

    #[test]
    fn cancel_discards_the_pending_node() {
        let mut store = session(2, &[]);
        update(&mut store, Action::BeginAddNode);
        pick(&mut store, 0);
        update(&mut store, Action::Cancel);
        assert!(store.mode.is_idle());
        assert_eq!(store.graph.node_count(), 2);
    }

    #[test]
    fn highlights_expire_as_ticks_pass() {
        let mut store = session(2, &[]);
        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        pick(&mut store, 1);
        let key = HighlightKey::Edge(EdgeKey::new(NodeId(0), NodeId(1)));
        assert!(store.highlights.contains(key, store.clock));

        for _ in 0..HIGHLIGHT_TICKS {
            update(&mut store, Action::Tick);
        }
        assert!(!store.highlights.contains(key, store.clock));
    }

    #[test]
    fn end_to_end_add_edge_then_find_path() {
        // Nodes A=0, B=1, C=2 with edges (A,B,1) and (B,C,1).
        let mut store = session(3, &[(0, 1, 1), (1, 2, 1)]);

        update(&mut store, Action::BeginAddEdge);
        pick(&mut store, 0);
        pick(&mut store, 2);
        let w = store.graph.edge_weight(NodeId(0), NodeId(2)).unwrap();
        assert!(w > 0);
        let key = EdgeKey::new(NodeId(0), NodeId(2));
        assert!(store.highlights.contains(HighlightKey::Edge(key), store.clock));

        update(&mut store, Action::BeginFindPath);
        pick(&mut store, 0);
        pick(&mut store, 2);
        let result = store.path_result.clone().unwrap();
        assert_eq!(result.total_weight, u64::from(w.min(2)));
        if w < 2 {
            assert_eq!(result.nodes, vec![NodeId(0), NodeId(2)]);
        } else if w > 2 {
            assert_eq!(result.nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        }
    }
}
