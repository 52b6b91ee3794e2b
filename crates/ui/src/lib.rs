use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod inspector;
pub mod stress_legend;
pub mod textures;
pub mod theme;
pub mod viewer_panel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<viewer_panel::ViewerPanel>()
            .add_systems(Startup, theme::apply_field_theme)
            .add_systems(
                Update,
                (
                    viewer_panel::viewer_keybinds,
                    viewer_panel::sync_viewer_mount,
                    viewer_panel::viewer_window_ui,
                    inspector::inspector_ui,
                    stress_legend::stress_legend_ui,
                )
                    .chain(),
            );
    }
}
