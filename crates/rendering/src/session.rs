//! Bevy glue for the satellite viewer and the spectral chart.
//!
//! The viewer is driven by a [`FrameQueue`] drained once per app update.
//! The UI attaches the raster it displays through [`ViewerSurface`]; until
//! it does, delivered frames are skipped.

use bevy::prelude::*;

use field::config::SEED_ENV_VAR;
use field::{VisualConfig, ZoneDataset};

use crate::compositor::FieldCompositor;
use crate::error::RenderError;
use crate::spectral::render_chart;
use crate::surface::{Raster, Surface};
use crate::viewer::{FrameQueue, SatelliteViewer, SystemClock};

/// Pixel size of the spectral chart raster.
pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 300;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Optional fixed seed for compositor speckle, read from the environment.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeckleSeed(pub Option<u64>);

impl SpeckleSeed {
    pub fn from_env() -> Self {
        match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => {
                    info!("Speckle noise seeded with {seed} from {SEED_ENV_VAR}");
                    Self(Some(seed))
                }
                Err(_) => {
                    warn!("Ignoring {SEED_ENV_VAR}={raw:?}: not an unsigned integer");
                    Self(None)
                }
            },
            Err(_) => Self(None),
        }
    }
}

/// The mounted viewer, if the viewer window is open.
#[derive(Resource, Default)]
pub struct ViewerSession {
    viewer: Option<SatelliteViewer<FrameQueue>>,
}

impl ViewerSession {
    /// Mount a fresh viewer. Replaces (and unmounts) any current one.
    pub fn open(
        &mut self,
        dataset: &ZoneDataset,
        config: &VisualConfig,
        seed: SpeckleSeed,
    ) -> Result<(), RenderError> {
        self.close();
        let compositor = FieldCompositor::new(dataset, config)?;
        let compositor = match seed.0 {
            Some(seed) => compositor.with_seed(seed),
            None => compositor,
        };
        self.viewer = Some(SatelliteViewer::mount(compositor, config, FrameQueue::default()));
        Ok(())
    }

    /// Unmount and drop the viewer together with its state.
    pub fn close(&mut self) {
        if let Some(mut viewer) = self.viewer.take() {
            viewer.unmount();
        }
    }

    pub fn is_open(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn viewer(&self) -> Option<&SatelliteViewer<FrameQueue>> {
        self.viewer.as_ref()
    }

    pub fn viewer_mut(&mut self) -> Option<&mut SatelliteViewer<FrameQueue>> {
        self.viewer.as_mut()
    }
}

/// Raster the viewer draws into, attached by whoever displays it.
#[derive(Resource, Default)]
pub struct ViewerSurface {
    raster: Option<Raster>,
    revision: u64,
}

impl ViewerSurface {
    /// Attach a raster of the given size, reusing the current one when the
    /// size matches.
    pub fn attach(&mut self, width: u32, height: u32) {
        let matches = self
            .raster
            .as_ref()
            .is_some_and(|r| r.width() == width && r.height() == height);
        if !matches && width > 0 && height > 0 {
            self.raster = Some(Raster::new(width, height));
        }
    }

    pub fn detach(&mut self) {
        self.raster = None;
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    /// Bumped after every drawn frame.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Rendered spectral chart for the selected zone.
#[derive(Resource)]
pub struct SpectralChart {
    raster: Raster,
    rendered_for: Option<String>,
    revision: u64,
}

impl Default for SpectralChart {
    fn default() -> Self {
        Self {
            raster: Raster::new(CHART_WIDTH, CHART_HEIGHT),
            rendered_for: None,
            revision: 0,
        }
    }
}

impl SpectralChart {
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn rendered_for(&self) -> Option<&str> {
        self.rendered_for.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Redraw for `code` unless it is already shown. Returns whether it drew.
    pub fn refresh(&mut self, code: &str, dataset: &ZoneDataset, config: &VisualConfig) -> bool {
        if self.rendered_for.as_deref() == Some(code) {
            return false;
        }
        let Some(zone) = dataset.get(code) else {
            debug_assert!(false, "spectral chart asked for unknown zone {code}");
            return false;
        };
        render_chart(&mut self.raster, zone, &config.palette);
        self.rendered_for = Some(code.to_string());
        self.revision += 1;
        true
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Mount the viewer at startup.
pub fn open_viewer(
    mut session: ResMut<ViewerSession>,
    dataset: Res<ZoneDataset>,
    config: Res<VisualConfig>,
    seed: Res<SpeckleSeed>,
) {
    if let Err(err) = session.open(&dataset, &config, *seed) {
        error!("Could not mount satellite viewer: {err}");
    }
}

/// Deliver due frames to the mounted viewer.
pub fn drive_viewer_frames(
    mut session: ResMut<ViewerSession>,
    mut surface: ResMut<ViewerSurface>,
) {
    let Some(viewer) = session.viewer_mut() else {
        return;
    };
    let surface = &mut *surface;
    let clock = SystemClock;
    for id in viewer.scheduler_mut().take_due() {
        let target = surface.raster.as_mut().map(|r| r as &mut dyn Surface);
        if viewer.on_frame(id, target, &clock) == crate::viewer::FrameOutcome::Drawn {
            surface.revision += 1;
        }
    }
}

/// Re-render the spectral chart when the selected zone changes.
pub fn refresh_spectral_chart(
    session: Res<ViewerSession>,
    dataset: Res<ZoneDataset>,
    config: Res<VisualConfig>,
    mut chart: ResMut<SpectralChart>,
) {
    let Some(code) = session.viewer().and_then(|v| v.state().selected_zone()) else {
        return;
    };
    if chart.rendered_for() != Some(code) {
        chart.refresh(code, &dataset, &config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> (ZoneDataset, VisualConfig) {
        (ZoneDataset::embedded().expect("valid"), VisualConfig::default())
    }

    #[test]
    fn test_close_then_open_gives_fresh_state() {
        let (dataset, config) = inputs();
        let mut session = ViewerSession::default();
        session
            .open(&dataset, &config, SpeckleSeed(Some(1)))
            .expect("mounts");
        let viewer = session.viewer_mut().expect("open");
        viewer.toggle_grid();
        viewer.set_overlay_opacity(20);

        session.close();
        assert!(!session.is_open());

        session
            .open(&dataset, &config, SpeckleSeed(None))
            .expect("mounts");
        let state = session.viewer().expect("open").state();
        assert!(state.grid_visible());
        assert_eq!(state.overlay_opacity(), 70);
    }

    #[test]
    fn test_surface_attach_reuses_matching_size() {
        let mut surface = ViewerSurface::default();
        assert!(surface.raster().is_none());
        surface.attach(320, 200);
        surface.attach(320, 200);
        assert_eq!(surface.raster().map(|r| r.width()), Some(320));
        surface.attach(0, 200);
        assert_eq!(surface.raster().map(|r| r.width()), Some(320));
        surface.attach(640, 400);
        assert_eq!(surface.raster().map(|r| r.height()), Some(400));
    }

    #[test]
    fn test_chart_refresh_only_on_zone_change() {
        let (dataset, config) = inputs();
        let mut chart = SpectralChart::default();
        assert!(chart.refresh("Z1", &dataset, &config));
        assert!(!chart.refresh("Z1", &dataset, &config));
        assert!(chart.refresh("Z2", &dataset, &config));
        assert_eq!(chart.revision(), 2);
        assert_eq!(chart.rendered_for(), Some("Z2"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unknown zone Z99")]
    fn test_chart_unknown_zone_asserts_in_debug() {
        let (dataset, config) = inputs();
        let mut chart = SpectralChart::default();
        chart.refresh("Z99", &dataset, &config);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_chart_unknown_zone_keeps_previous_chart() {
        let (dataset, config) = inputs();
        let mut chart = SpectralChart::default();
        assert!(chart.refresh("Z2", &dataset, &config));
        assert!(!chart.refresh("Z99", &dataset, &config));
        assert_eq!(chart.rendered_for(), Some("Z2"));
    }

    #[test]
    fn test_frames_skip_until_surface_attached() {
        let mut app = App::new();
        let (dataset, config) = inputs();
        app.insert_resource(dataset)
            .insert_resource(config)
            .insert_resource(SpeckleSeed(Some(3)))
            .init_resource::<ViewerSession>()
            .init_resource::<ViewerSurface>()
            .init_resource::<SpectralChart>()
            .add_systems(Startup, open_viewer)
            .add_systems(Update, (drive_viewer_frames, refresh_spectral_chart));

        app.update();
        app.update();
        assert_eq!(app.world().resource::<ViewerSurface>().revision(), 0);
        assert_eq!(
            app.world().resource::<SpectralChart>().rendered_for(),
            Some("Z1")
        );

        app.world_mut()
            .resource_mut::<ViewerSurface>()
            .attach(200, 125);
        app.update();
        app.update();
        assert_eq!(app.world().resource::<ViewerSurface>().revision(), 2);
    }
}
