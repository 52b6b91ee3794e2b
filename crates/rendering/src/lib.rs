use bevy::prelude::*;

pub mod color_ramps;
pub mod compositor;
pub mod error;
pub mod layer_colors;
pub mod layout;
pub mod session;
pub mod spectral;
pub mod surface;
pub mod viewer;

pub use compositor::FieldCompositor;
pub use error::RenderError;
pub use layer_colors::{color_for, color_for_id, LayerColor};
pub use session::{SpectralChart, SpeckleSeed, ViewerSession, ViewerSurface};
pub use viewer::{FrameOutcome, SatelliteViewer, ViewerState};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SpeckleSeed::from_env())
            .init_resource::<ViewerSession>()
            .init_resource::<ViewerSurface>()
            .init_resource::<SpectralChart>()
            .add_systems(Startup, session::open_viewer)
            .add_systems(
                Update,
                (
                    session::drive_viewer_frames,
                    session::refresh_spectral_chart,
                )
                    .chain(),
            );
    }
}
