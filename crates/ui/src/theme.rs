//! Egui style matched to the satellite viewer.
//!
//! Window chrome is built from the viewer background so panels read as part
//! of the same instrument. Selection uses the NDVI accent and warning/error
//! text uses the stress palette, so "red" always means severe stress.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use field::{AnalysisLayer, VisualConfig};
use rendering::surface::mix;
use rendering::viewer::hud;

use crate::textures::to_color32;

fn shade(amount: f32) -> egui::Color32 {
    to_color32(mix(hud::BACKGROUND, Srgba::WHITE, amount))
}

/// Style for every window, derived from `base` and the field palette.
pub fn field_style(base: &egui::Style, config: &VisualConfig) -> egui::Style {
    let mut style = base.clone();
    let visuals = &mut style.visuals;

    let panel = shade(0.06);
    let accent = to_color32(config.layers.info(AnalysisLayer::Ndvi).accent);

    for (widgets, amount) in [
        (&mut visuals.widgets.noninteractive, 0.06),
        (&mut visuals.widgets.inactive, 0.12),
        (&mut visuals.widgets.hovered, 0.2),
    ] {
        widgets.bg_fill = shade(amount);
        widgets.weak_bg_fill = shade(amount);
        widgets.corner_radius = egui::CornerRadius::same(2);
    }
    visuals.widgets.active.bg_fill = accent;
    visuals.widgets.active.weak_bg_fill = accent;
    visuals.widgets.active.corner_radius = egui::CornerRadius::same(2);

    visuals.window_fill = panel;
    visuals.panel_fill = panel;
    visuals.extreme_bg_color = to_color32(hud::BACKGROUND);
    visuals.faint_bg_color = shade(0.09);
    // Square-ish corners, like the HUD brackets.
    visuals.window_corner_radius = egui::CornerRadius::same(3);

    visuals.selection.bg_fill = accent.gamma_multiply(0.6);
    visuals.selection.stroke = egui::Stroke::new(1.0, accent);
    visuals.warn_fg_color = to_color32(config.palette.high);
    visuals.error_fg_color = to_color32(config.palette.severe);

    // Telemetry grids are dense.
    style.spacing.item_spacing = egui::vec2(6.0, 3.0);
    style
}

pub fn apply_field_theme(mut contexts: EguiContexts, config: Res<VisualConfig>) {
    let ctx = contexts.ctx_mut();
    let style = field_style(&ctx.style(), &config);
    ctx.set_style(style);
}
