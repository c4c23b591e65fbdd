//! Colour table and stroke sizing handed to renderers.
//!
//! The crate never paints anything itself; hosts read these values when they
//! draw the simulated positions.

use egui::Color32;

/// Fill colours per actor category
pub mod category {
    use super::*;

    /// National and local government bodies - blue
    pub const GOVERNMENT: Color32 = Color32::from_rgb(59, 130, 246);

    /// Multilateral and international organisations - cyan
    pub const INTERNATIONAL: Color32 = Color32::from_rgb(6, 182, 212);

    /// Non-governmental organisations - green
    pub const NGO: Color32 = Color32::from_rgb(34, 197, 94);

    /// Private sector - orange
    pub const PRIVATE: Color32 = Color32::from_rgb(255, 149, 0);

    /// Universities and research institutes - purple
    pub const ACADEMIC: Color32 = Color32::from_rgb(155, 89, 182);

    /// Community groups and civil society - red
    pub const COMMUNITY: Color32 = Color32::from_rgb(239, 68, 68);
}

/// Emphasis colours for interaction state
pub mod emphasis {
    use super::*;

    /// Outline for the selected node
    pub const SELECTED: Color32 = Color32::from_rgb(255, 220, 80);

    /// Outline for the hovered node
    pub const HOVERED: Color32 = Color32::WHITE;

    /// Multiplier applied to nodes outside a non-empty highlight set
    pub const DIM_FACTOR: f32 = 0.25;
}

/// Edge line colour
pub const EDGE: Color32 = Color32::from_rgb(120, 125, 135);

/// Stroke width for an edge; heavier relationships draw thicker lines.
pub fn edge_width(weight: f32) -> f32 {
    (weight.max(0.0) * 1.5).clamp(0.5, 6.0)
}
