use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use field::VisualConfig;
use rendering::ViewerSession;

use crate::textures::to_color32;
use crate::viewer_panel::ViewerPanel;

/// Stress palette swatches and the active layer's accent, bottom-left.
pub fn stress_legend_ui(
    mut contexts: EguiContexts,
    panel: Res<ViewerPanel>,
    session: Res<ViewerSession>,
    config: Res<VisualConfig>,
) {
    if !panel.open {
        return;
    }
    let active = session.viewer().map(|v| v.state().active_layer());

    let screen = contexts.ctx_mut().screen_rect();
    egui::Area::new(egui::Id::new("stress_legend"))
        .fixed_pos(egui::pos2(12.0, screen.bottom() - 12.0))
        .pivot(egui::Align2::LEFT_BOTTOM)
        .interactable(false)
        .show(contexts.ctx_mut(), |ui| {
            egui::Frame::popup(ui.style())
                .fill(egui::Color32::from_rgba_premultiplied(12, 16, 20, 225))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("Stress level")
                            .strong()
                            .color(egui::Color32::from_rgb(215, 225, 235)),
                    );
                    for (level, color) in config.palette.entries() {
                        ui.horizontal(|ui| {
                            let (rect, _) = ui.allocate_exact_size(
                                egui::vec2(14.0, 10.0),
                                egui::Sense::hover(),
                            );
                            ui.painter().rect_filled(rect, 2.0, to_color32(color));
                            ui.small(level.label());
                        });
                    }
                    if let Some(layer) = active {
                        let info = config.layers.info(layer);
                        ui.add_space(4.0);
                        ui.colored_label(
                            to_color32(info.accent),
                            format!("{} {}", info.icon, info.label),
                        );
                    }
                });
        });
}
