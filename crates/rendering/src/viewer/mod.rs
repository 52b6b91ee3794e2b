//! Satellite viewer: the per-frame render loop over the composited field.
//!
//! A mounted viewer owns its [`ViewerState`] and a [`FrameLoop`]. Each
//! delivered frame draws the full stack (base pass, overlay, HUD) and
//! requests the next one. User operations only change state; the next frame
//! picks them up.

pub mod clock;
pub mod hud;
pub mod schedule;
pub mod state;

use bevy::log::{debug, error, info, warn};
use chrono::{DateTime, Utc};

use field::{AnalysisLayer, LayerCatalog, VisualConfig};

use crate::compositor::FieldCompositor;
use crate::error::RenderError;
use crate::surface::Surface;

pub use clock::{Clock, FixedClock, SystemClock};
pub use schedule::{FrameId, FrameLoop, FrameQueue, FrameScheduler};
pub use state::{ViewerState, OPACITY_DEFAULT, OPACITY_MAX, OPACITY_MIN};

/// Opacity of the true-color base pass drawn under every layer.
pub const BASE_OPACITY: f32 = 0.8;

/// What happened to a delivered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// No surface attached yet (or the pass failed); retried next frame.
    Skipped,
    /// Stale or post-cancellation frame; nothing was touched.
    Ignored,
}

pub struct SatelliteViewer<S: FrameScheduler> {
    compositor: FieldCompositor,
    layers: LayerCatalog,
    state: ViewerState,
    frames: FrameLoop<S>,
    frames_drawn: u64,
}

impl<S: FrameScheduler> SatelliteViewer<S> {
    /// Mount the viewer and request its first frame. The most stressed zone
    /// starts selected.
    pub fn mount(compositor: FieldCompositor, config: &VisualConfig, scheduler: S) -> Self {
        let selected_zone = field::most_stressed(compositor.zones()).map(|zone| zone.code.clone());

        let mut frames = FrameLoop::new(scheduler);
        frames.start();

        info!(
            "Satellite viewer mounted ({} zones, selected {:?})",
            compositor.zones().len(),
            selected_zone
        );

        Self {
            compositor,
            layers: config.layers.clone(),
            state: ViewerState {
                selected_zone,
                ..ViewerState::default()
            },
            frames,
            frames_drawn: 0,
        }
    }

    /// Stop the frame loop. Frames delivered afterwards are ignored.
    pub fn unmount(&mut self) {
        if self.frames.is_running() {
            self.frames.cancel();
            info!("Satellite viewer unmounted after {} frames", self.frames_drawn);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.frames.is_running()
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn compositor(&self) -> &FieldCompositor {
        &self.compositor
    }

    pub fn scheduler(&self) -> &S {
        self.frames.scheduler()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.frames.scheduler_mut()
    }

    // -----------------------------------------------------------------------
    // User operations
    // -----------------------------------------------------------------------

    pub fn set_active_layer(&mut self, layer: AnalysisLayer) {
        self.state.active_layer = layer;
    }

    /// Select a layer by id; unknown ids are rejected and leave state as is.
    pub fn set_active_layer_id(&mut self, id: &str) -> Result<(), RenderError> {
        let layer: AnalysisLayer = id.parse()?;
        self.set_active_layer(layer);
        Ok(())
    }

    /// Set overlay opacity in percent, clamped to `OPACITY_MIN..=OPACITY_MAX`.
    pub fn set_overlay_opacity(&mut self, pct: i32) -> u8 {
        let effective = self.state.set_overlay_opacity(pct);
        if i32::from(effective) != pct {
            warn!("Overlay opacity {pct}% clamped to {effective}%");
        }
        effective
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.state.grid_visible = !self.state.grid_visible;
        self.state.grid_visible
    }

    pub fn toggle_labels(&mut self) -> bool {
        self.state.labels_visible = !self.state.labels_visible;
        self.state.labels_visible
    }

    /// Select the zone shown by the inspector and spectral chart.
    pub fn select_zone(&mut self, code: &str) -> Result<(), RenderError> {
        if !self.compositor.zones().iter().any(|zone| zone.code == code) {
            return Err(RenderError::UnknownZone(code.to_string()));
        }
        self.state.selected_zone = Some(code.to_string());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    /// Handle a frame delivered by the scheduler.
    ///
    /// Draws when `id` is the outstanding request and a surface is attached,
    /// then requests the next frame. After [`Self::unmount`] every frame is
    /// ignored and nothing is requested.
    pub fn on_frame(
        &mut self,
        id: FrameId,
        surface: Option<&mut dyn Surface>,
        clock: &dyn Clock,
    ) -> FrameOutcome {
        if !self.frames.begin_frame(id) {
            return FrameOutcome::Ignored;
        }

        let outcome = match surface {
            None => {
                debug!("Skipping frame {:?}: {}", id, RenderError::SurfaceUnavailable);
                FrameOutcome::Skipped
            }
            Some(surface) => match self.draw_frame(surface, clock.now()) {
                Ok(()) => {
                    self.frames_drawn += 1;
                    FrameOutcome::Drawn
                }
                Err(err) => {
                    error!("Satellite viewer frame failed: {err}");
                    debug_assert!(false, "viewer state produced a failing frame: {err}");
                    FrameOutcome::Skipped
                }
            },
        };

        self.frames.schedule_next();
        outcome
    }

    /// Draw one complete frame for the current state at `now`.
    pub fn draw_frame(
        &mut self,
        surface: &mut dyn Surface,
        now: DateTime<Utc>,
    ) -> Result<(), RenderError> {
        let active = self.state.active_layer;

        surface.clear(hud::BACKGROUND);

        self.compositor.set_pulse_intensity(hud::pulse_intensity(now));
        self.compositor
            .paint_layer(surface, AnalysisLayer::TrueColor, BASE_OPACITY)?;
        if active != AnalysisLayer::TrueColor {
            self.compositor
                .paint_layer(surface, active, self.state.overlay_alpha())?;
        }

        if self.state.grid_visible {
            hud::draw_grid(surface);
        }
        if active != AnalysisLayer::TrueColor {
            let y = hud::scan_line_y(now, surface.size().y);
            hud::draw_scan_line(surface, y, self.layers.info(active).accent);
        }
        hud::draw_corner_brackets(surface);
        hud::draw_crosshair(surface);
        if self.state.labels_visible {
            hud::draw_labels(surface, now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::surface::{DrawOp, Paint, RecordingSurface};
    use field::ZoneDataset;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, 9, 0, 0)
            .single()
            .expect("valid")
    }

    fn viewer() -> SatelliteViewer<FrameQueue> {
        let dataset = ZoneDataset::embedded().expect("valid");
        let config = VisualConfig::default();
        let compositor = FieldCompositor::new(&dataset, &config)
            .expect("layout")
            .without_speckle();
        SatelliteViewer::mount(compositor, &config, FrameQueue::default())
    }

    fn solid_fill_alphas(surface: &RecordingSurface) -> Vec<f32> {
        surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRoundedRect {
                    paint: Paint::Solid(c),
                    ..
                } => Some(c.alpha),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_mount_selects_most_stressed_zone() {
        let viewer = viewer();
        assert!(viewer.is_mounted());
        assert_eq!(viewer.state().selected_zone(), Some("Z1"));
        assert_eq!(viewer.scheduler().pending(), 1);
    }

    #[test]
    fn test_mount_breaks_ties_by_dataset_order() {
        let mut zones = ZoneDataset::embedded().expect("valid").zones().to_vec();
        zones[1].stress_score = zones[0].stress_score;
        zones[1].stress_level = zones[0].stress_level;
        let dataset = ZoneDataset::from_zones(zones).expect("valid");
        let config = VisualConfig::default();
        let compositor = FieldCompositor::new(&dataset, &config)
            .expect("layout")
            .without_speckle();
        let viewer = SatelliteViewer::mount(compositor, &config, FrameQueue::default());
        let expected = dataset.most_stressed().map(|z| z.code.as_str());
        assert_eq!(viewer.state().selected_zone(), expected);
        assert_eq!(expected, Some("Z1"));
    }

    #[test]
    fn test_true_color_draws_single_pass_without_scan_line() {
        let mut viewer = viewer();
        let mut surface = RecordingSurface::new(800, 500);
        viewer.draw_frame(&mut surface, now()).expect("draws");
        assert!(matches!(surface.ops()[0], DrawOp::Clear(_)));
        assert_eq!(solid_fill_alphas(&surface).len(), 6);
        assert!(!surface
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::FillRect { paint: Paint::Linear { .. }, .. })));
    }

    #[test]
    fn test_overlay_pass_uses_user_opacity() {
        let mut viewer = viewer();
        viewer.set_active_layer(AnalysisLayer::Ndvi);
        viewer.set_overlay_opacity(40);
        let mut surface = RecordingSurface::new(800, 500);
        viewer.draw_frame(&mut surface, now()).expect("draws");

        let alphas = solid_fill_alphas(&surface);
        assert_eq!(alphas.len(), 12);
        assert!(alphas[..6].iter().all(|a| (a - BASE_OPACITY).abs() < 1e-6));
        assert!(alphas[6..].iter().all(|a| (a - 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_labels_toggle_controls_hud_text() {
        let mut viewer = viewer();
        let mut surface = RecordingSurface::new(800, 500);
        viewer.draw_frame(&mut surface, now()).expect("draws");
        assert!(surface.texts().contains(&hud::COORDINATES));
        assert!(surface.texts().contains(&"SENTINEL-2 L2A · 2025-07-14"));

        assert!(!viewer.toggle_labels());
        surface.reset();
        viewer.draw_frame(&mut surface, now()).expect("draws");
        assert!(!surface.texts().contains(&hud::COORDINATES));
    }

    #[test]
    fn test_set_layer_by_id() {
        let mut viewer = viewer();
        viewer.set_active_layer_id("thermal").expect("known layer");
        assert_eq!(viewer.state().active_layer(), AnalysisLayer::Thermal);
        assert_eq!(
            viewer.set_active_layer_id("lidar"),
            Err(RenderError::UnknownLayer("lidar".to_string()))
        );
        assert_eq!(viewer.state().active_layer(), AnalysisLayer::Thermal);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "failing frame")]
    fn test_failing_frame_asserts_in_debug() {
        let mut viewer = viewer();
        viewer.state.active_layer = AnalysisLayer::Thermal;
        viewer.state.overlay_opacity = 250;
        let due = viewer.scheduler_mut().take_due();
        let mut surface = RecordingSurface::new(800, 500);
        viewer.on_frame(due[0], Some(&mut surface), &FixedClock(now()));
    }

    #[test]
    fn test_select_unknown_zone_rejected() {
        let mut viewer = viewer();
        assert_eq!(
            viewer.select_zone("Z42"),
            Err(RenderError::UnknownZone("Z42".to_string()))
        );
        viewer.select_zone("Z3").expect("known zone");
        assert_eq!(viewer.state().selected_zone(), Some("Z3"));
    }

    #[test]
    fn test_missing_surface_skips_and_retries() {
        let mut viewer = viewer();
        let clock = FixedClock(now());
        let first = viewer.scheduler_mut().take_due();
        assert_eq!(
            viewer.on_frame(first[0], None, &clock),
            FrameOutcome::Skipped
        );
        assert_eq!(viewer.frames_drawn(), 0);

        let second = viewer.scheduler_mut().take_due();
        assert_eq!(second.len(), 1, "retry requested");
        let mut surface = RecordingSurface::new(800, 500);
        assert_eq!(
            viewer.on_frame(second[0], Some(&mut surface), &clock),
            FrameOutcome::Drawn
        );
        assert_eq!(viewer.frames_drawn(), 1);
    }

    #[test]
    fn test_state_changes_do_not_draw() {
        let mut viewer = viewer();
        viewer.set_active_layer(AnalysisLayer::RedEdge);
        viewer.toggle_grid();
        viewer.set_overlay_opacity(90);
        assert_eq!(viewer.frames_drawn(), 0);
        assert_eq!(viewer.scheduler().pending(), 1);
    }
}
