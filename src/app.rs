// Renderer - toolbar, canvas painting, and node-pick hit testing.
// Reads core state and feeds user gestures back as actions.

use crate::actions::Action;
use crate::graph_store::{Node, NodeId};
use crate::highlight::HighlightKey;
use crate::state::State;
use crate::store::{Mode, Store};
use eframe::egui;
use std::time::Duration;

// UI Constants
const NODE_RADIUS: f32 = 14.0;
const EDGE_STROKE_WIDTH: f32 = 2.0;
const PATH_STROKE_WIDTH: f32 = 4.0;
const NODE_FILL: egui::Color32 = egui::Color32::from_rgb(45, 55, 75);
const NODE_STROKE: egui::Color32 = egui::Color32::from_gray(220);
const EDGE_COLOR: egui::Color32 = egui::Color32::from_gray(130);
const HIGHLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(245, 185, 45);
const PEER_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 180, 255);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 90, 90);

/// Wall-clock seconds per highlight tick (~10 Hz).
const TICK_SECONDS: f64 = 0.1;

const PATH_GRADIENT: colorous::Gradient = colorous::VIRIDIS;

pub struct App {
    state: State,
    last_tick: f64,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: State::new(Store::with_demo_graph()),
            last_tick: 0.0,
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add Node").clicked() {
                self.state.dispatch(Action::BeginAddNode);
            }
            if ui.button("Add Edge").clicked() {
                self.state.dispatch(Action::BeginAddEdge);
            }
            if ui.button("Remove Edge").clicked() {
                self.state.dispatch(Action::BeginRemoveEdge);
            }
            if ui.button("Modify Weight").clicked() {
                self.state.dispatch(Action::BeginModifyWeight);
            }
            if ui.button("Find Path").clicked() {
                self.state.dispatch(Action::BeginFindPath);
            }
            ui.separator();
            if ui.button("Cancel").clicked() {
                self.state.dispatch(Action::Cancel);
            }
        });

        let mode = self.state.store.mode.clone();
        ui.horizontal(|ui| {
            ui.label(mode.label());
            match &mode {
                Mode::SelectingPeers { peers, .. } => {
                    ui.label(format!("{} neighbor(s) chosen", peers.len()));
                    if ui.button("Confirm").clicked() {
                        self.state.dispatch(Action::ConfirmPeers);
                    }
                }
                Mode::ModifyingWeight {
                    target: Some(_),
                    input,
                    ..
                } => {
                    let mut text = input.clone();
                    let response = ui.text_edit_singleline(&mut text);
                    if response.changed() {
                        self.state.dispatch(Action::SetWeightInput { text });
                    }
                    let enter = response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Apply").clicked() || enter {
                        self.state.dispatch(Action::SubmitWeight);
                    }
                }
                _ => {}
            }
        });

        let store = &self.state.store;
        if let Some(message) = &store.error_message {
            ui.colored_label(ERROR_COLOR, message.as_str());
        } else if let Some(result) = &store.path_result {
            let route = result
                .nodes
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(" → ");
            ui.label(format!("Path: {route} (total {})", result.total_weight));
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
        let painter = ui.painter_at(rect);

        if rect.center() != self.state.store.canvas_center {
            self.state.dispatch(Action::SetCanvasCenter {
                center: rect.center(),
            });
        }

        let store = &self.state.store;
        let now = store.clock;

        // Edges first so nodes draw over the line ends.
        for (key, weight) in store.graph.edges() {
            let (Some(a), Some(b)) = (store.graph.node(key.a), store.graph.node(key.b))
            else {
                continue;
            };
            let on_path = store
                .path_result
                .as_ref()
                .is_some_and(|p| p.contains_leg(key.a, key.b));
            let (color, width) = if on_path {
                (path_leg_color(store, key.a, key.b), PATH_STROKE_WIDTH)
            } else if store.highlights.contains(HighlightKey::Edge(key), now) {
                (HIGHLIGHT_COLOR, PATH_STROKE_WIDTH)
            } else {
                (EDGE_COLOR, EDGE_STROKE_WIDTH)
            };
            painter.line_segment([a.pos, b.pos], egui::Stroke::new(width, color));

            let mid = a.pos + (b.pos - a.pos) / 2.0;
            painter.text(
                mid,
                egui::Align2::CENTER_CENTER,
                weight.to_string(),
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }

        // Ghost of the node being added, plus its chosen peers.
        if let Mode::SelectingPeers {
            pending_pos, peers, ..
        } = &store.mode
        {
            for peer in peers {
                if let Some(node) = store.graph.node(*peer) {
                    painter.line_segment(
                        [*pending_pos, node.pos],
                        egui::Stroke::new(1.0, PEER_COLOR),
                    );
                }
            }
            painter.circle_stroke(
                *pending_pos,
                NODE_RADIUS,
                egui::Stroke::new(1.5, PEER_COLOR),
            );
        }

        for node in store.graph.nodes() {
            self.draw_node(&painter, node);
        }

        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
            && let Some(id) = hit_test(store, pos)
        {
            self.state.dispatch(Action::NodePicked { id });
        }
    }

    fn draw_node(&self, painter: &egui::Painter, node: &Node) {
        let store = &self.state.store;
        let highlighted = store
            .highlights
            .contains(HighlightKey::Node(node.id), store.clock);
        let on_path = store
            .path_result
            .as_ref()
            .is_some_and(|p| p.contains_node(node.id));
        let picked = picked_ids(&store.mode).contains(&node.id);

        let stroke_color = if highlighted || picked {
            HIGHLIGHT_COLOR
        } else if on_path {
            PEER_COLOR
        } else {
            NODE_STROKE
        };
        painter.circle(
            node.pos,
            NODE_RADIUS,
            NODE_FILL,
            egui::Stroke::new(if picked { 3.0 } else { 1.5 }, stroke_color),
        );
        painter.text(
            node.pos,
            egui::Align2::CENTER_CENTER,
            node.id.to_string(),
            egui::FontId::proportional(13.0),
            egui::Color32::WHITE,
        );
        painter.text(
            node.pos + egui::vec2(0.0, NODE_RADIUS + 10.0),
            egui::Align2::CENTER_CENTER,
            node.label.clone(),
            egui::FontId::proportional(11.0),
            egui::Color32::from_gray(180),
        );
    }
}

/// Color a path leg by its position along the route.
fn path_leg_color(store: &Store, a: NodeId, b: NodeId) -> egui::Color32 {
    let Some(result) = &store.path_result else {
        return HIGHLIGHT_COLOR;
    };
    let legs = result.nodes.len().saturating_sub(1).max(1);
    let index = result
        .nodes
        .windows(2)
        .position(|leg| (leg[0] == a && leg[1] == b) || (leg[0] == b && leg[1] == a))
        .unwrap_or(0);
    let c = PATH_GRADIENT.eval_rational(index + 1, legs + 1);
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

/// Ids the active mode has already recorded, for emphasis.
fn picked_ids(mode: &Mode) -> Vec<NodeId> {
    match mode {
        Mode::Idle => Vec::new(),
        Mode::SelectingPeers { peers, .. } => peers.iter().copied().collect(),
        Mode::AddingEdge { source, target }
        | Mode::RemovingEdge { source, target }
        | Mode::FindingPath { source, target }
        | Mode::ModifyingWeight { source, target, .. } => {
            source.iter().chain(target.iter()).copied().collect()
        }
    }
}

fn hit_test(store: &Store, pos: egui::Pos2) -> Option<NodeId> {
    store
        .graph
        .nodes()
        .filter(|node| (node.pos - pos).length() <= NODE_RADIUS + 2.0)
        .min_by(|a, b| {
            (a.pos - pos)
                .length()
                .total_cmp(&(b.pos - pos).length())
        })
        .map(|node| node.id)
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        while now - self.last_tick >= TICK_SECONDS {
            self.last_tick += TICK_SECONDS;
            self.state.dispatch(Action::Tick);
        }
        self.state.flush_actions();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas(ui);
        });

        self.state.flush_actions();
        ctx.request_repaint_after(Duration::from_millis(16)); // ~60 FPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_store::GraphStore;

    #[test]
    fn hit_test_picks_the_nearest_node_within_radius() {
        let mut graph = GraphStore::new();
        graph
            .add_node(NodeId(0), "Node 0".into(), egui::Pos2::new(100.0, 100.0))
            .unwrap();
        graph
            .add_node(NodeId(1), "Node 1".into(), egui::Pos2::new(130.0, 100.0))
            .unwrap();
        let store = Store::new(graph);

        assert_eq!(
            hit_test(&store, egui::Pos2::new(104.0, 100.0)),
            Some(NodeId(0))
        );
        assert_eq!(
            hit_test(&store, egui::Pos2::new(126.0, 100.0)),
            Some(NodeId(1))
        );
        assert_eq!(hit_test(&store, egui::Pos2::new(200.0, 200.0)), None);
    }
}
