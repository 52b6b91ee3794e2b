//! "Satellite Viewer" window: layer picker, opacity and HUD toggles, and the
//! Viewer / Spectral tabs.
//!
//! Closing the window unmounts the viewer; opening it mounts a fresh one.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use field::config::{LAYOUT_HEIGHT, LAYOUT_WIDTH};
use field::{VisualConfig, ZoneDataset};
use rendering::viewer::{OPACITY_MAX, OPACITY_MIN};
use rendering::{SpectralChart, SpeckleSeed, ViewerSession, ViewerSurface};

use crate::textures::{show_raster, to_color32, RasterTexture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerTab {
    #[default]
    Viewer,
    Spectral,
}

/// Window visibility, active tab and the textures mirroring both rasters.
#[derive(Resource)]
pub struct ViewerPanel {
    pub open: bool,
    pub tab: ViewerTab,
    viewer_texture: RasterTexture,
    chart_texture: RasterTexture,
}

impl Default for ViewerPanel {
    fn default() -> Self {
        Self {
            open: true,
            tab: ViewerTab::default(),
            viewer_texture: RasterTexture::default(),
            chart_texture: RasterTexture::default(),
        }
    }
}

/// Keep the mounted viewer in step with the window's open flag.
pub fn sync_viewer_mount(
    panel: Res<ViewerPanel>,
    mut session: ResMut<ViewerSession>,
    mut surface: ResMut<ViewerSurface>,
    dataset: Res<ZoneDataset>,
    config: Res<VisualConfig>,
    seed: Res<SpeckleSeed>,
) {
    if panel.open && !session.is_open() {
        if let Err(err) = session.open(&dataset, &config, *seed) {
            error!("Could not mount satellite viewer: {err}");
        }
    } else if !panel.open && session.is_open() {
        session.close();
        surface.detach();
    }
}

/// V toggles the viewer window; closing it unmounts the viewer.
pub fn viewer_keybinds(keys: Res<ButtonInput<KeyCode>>, mut panel: ResMut<ViewerPanel>) {
    if keys.just_pressed(KeyCode::KeyV) {
        panel.open = !panel.open;
    }
}

pub fn viewer_window_ui(
    mut contexts: EguiContexts,
    mut panel: ResMut<ViewerPanel>,
    mut session: ResMut<ViewerSession>,
    mut surface: ResMut<ViewerSurface>,
    chart: Res<SpectralChart>,
    config: Res<VisualConfig>,
) {
    if !panel.open {
        return;
    }
    let panel = &mut *panel;
    let mut open = panel.open;

    // Attaching is what lets the frame loop start drawing.
    surface.attach(LAYOUT_WIDTH as u32, LAYOUT_HEIGHT as u32);

    egui::Window::new("Satellite Viewer")
        .open(&mut open)
        .default_width(LAYOUT_WIDTH + 24.0)
        .resizable(true)
        .show(contexts.ctx_mut(), |ui| {
            let Some(viewer) = session.viewer_mut() else {
                ui.label("Mounting viewer…");
                return;
            };

            // Layer picker
            ui.horizontal_wrapped(|ui| {
                for info in config.layers.iter() {
                    let active = viewer.state().active_layer() == info.layer;
                    let text = egui::RichText::new(format!("{} {}", info.icon, info.label))
                        .color(to_color32(info.accent));
                    if ui.selectable_label(active, text).clicked() {
                        viewer.set_active_layer(info.layer);
                    }
                }
            });

            ui.horizontal(|ui| {
                let mut pct = i32::from(viewer.state().overlay_opacity());
                let slider = egui::Slider::new(
                    &mut pct,
                    i32::from(OPACITY_MIN)..=i32::from(OPACITY_MAX),
                )
                .text("Overlay opacity")
                .suffix("%");
                if ui.add(slider).changed() {
                    viewer.set_overlay_opacity(pct);
                }
                ui.separator();
                if ui
                    .selectable_label(viewer.state().grid_visible(), "Grid")
                    .clicked()
                {
                    viewer.toggle_grid();
                }
                if ui
                    .selectable_label(viewer.state().labels_visible(), "Labels")
                    .clicked()
                {
                    viewer.toggle_labels();
                }
            });

            let info = config.layers.info(viewer.state().active_layer());
            ui.label(
                egui::RichText::new(info.blurb)
                    .small()
                    .color(egui::Color32::from_gray(170)),
            );

            ui.separator();
            ui.horizontal(|ui| {
                ui.selectable_value(&mut panel.tab, ViewerTab::Viewer, "Viewer");
                ui.selectable_value(&mut panel.tab, ViewerTab::Spectral, "Spectral");
            });

            let width = ui.available_width();
            match panel.tab {
                ViewerTab::Viewer => match surface.raster() {
                    Some(raster) => {
                        show_raster(
                            ui,
                            &mut panel.viewer_texture,
                            "satellite_viewer",
                            raster,
                            surface.revision(),
                            width,
                        );
                    }
                    None => {
                        ui.label("Waiting for the first frame…");
                    }
                },
                ViewerTab::Spectral => {
                    let heading = viewer
                        .state()
                        .selected_zone()
                        .map(|code| format!("Spectral signature: {code}"))
                        .unwrap_or_else(|| "Spectral signature".to_string());
                    ui.strong(heading);
                    show_raster(
                        ui,
                        &mut panel.chart_texture,
                        "spectral_chart",
                        chart.raster(),
                        chart.revision(),
                        width,
                    );
                }
            }
        });

    panel.open = open;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_window_unmounts_viewer() {
        let mut app = App::new();
        app.insert_resource(ZoneDataset::embedded().expect("valid"))
            .init_resource::<VisualConfig>()
            .insert_resource(SpeckleSeed(Some(5)))
            .init_resource::<ViewerSession>()
            .init_resource::<ViewerSurface>()
            .init_resource::<ViewerPanel>()
            .add_systems(Update, sync_viewer_mount);

        app.update();
        assert!(app.world().resource::<ViewerSession>().is_open());

        app.world_mut()
            .resource_mut::<ViewerSurface>()
            .attach(80, 50);
        app.world_mut().resource_mut::<ViewerPanel>().open = false;
        app.update();
        assert!(!app.world().resource::<ViewerSession>().is_open());
        assert!(app.world().resource::<ViewerSurface>().raster().is_none());

        app.world_mut().resource_mut::<ViewerPanel>().open = true;
        app.update();
        let session = app.world().resource::<ViewerSession>();
        assert!(session.is_open());
        assert_eq!(
            session.viewer().and_then(|v| v.state().selected_zone()),
            Some("Z1")
        );
    }
}
