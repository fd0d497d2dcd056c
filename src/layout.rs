// Position provider - initial placement for nodes on the canvas

use eframe::egui;

/// Configuration for spacing/radius of node placement
#[derive(Debug, Clone, Copy)]
pub struct SpacingConfig {
    /// Base radius when there are few nodes
    pub base_radius: f32,
    /// Additional radius per node (for auto-scaling)
    pub radius_per_node: f32,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            base_radius: 120.0,
            radius_per_node: 6.0,
        }
    }
}

// Successive placements fan out without ever landing on the same
// angle twice.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Initial position for the node with ordinal `index` around
/// `center`. The core stores the returned position verbatim and
/// never moves it afterwards.
pub fn place_node(center: egui::Pos2, index: usize, spacing: SpacingConfig) -> egui::Pos2 {
    // Start at top (-π/2), then walk the golden angle outwards.
    let angle = -std::f32::consts::PI / 2.0 + index as f32 * GOLDEN_ANGLE;
    let radius = spacing.base_radius + index as f32 * spacing.radius_per_node;
    egui::Pos2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}
