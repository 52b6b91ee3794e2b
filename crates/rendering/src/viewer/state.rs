//! Session-local viewer state. Only user actions mutate it; the frame loop
//! reads it.

use field::AnalysisLayer;

/// Lowest overlay opacity the setter accepts, in percent.
pub const OPACITY_MIN: u8 = 10;
/// Highest overlay opacity, in percent.
pub const OPACITY_MAX: u8 = 100;
pub const OPACITY_DEFAULT: u8 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    pub(crate) active_layer: AnalysisLayer,
    pub(crate) overlay_opacity: u8,
    pub(crate) grid_visible: bool,
    pub(crate) labels_visible: bool,
    pub(crate) selected_zone: Option<String>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            active_layer: AnalysisLayer::default(),
            overlay_opacity: OPACITY_DEFAULT,
            grid_visible: true,
            labels_visible: true,
            selected_zone: None,
        }
    }
}

impl ViewerState {
    pub fn active_layer(&self) -> AnalysisLayer {
        self.active_layer
    }

    /// Overlay opacity in percent, always within `OPACITY_MIN..=OPACITY_MAX`.
    pub fn overlay_opacity(&self) -> u8 {
        self.overlay_opacity
    }

    /// Overlay opacity as a `0..=1` alpha.
    pub fn overlay_alpha(&self) -> f32 {
        f32::from(self.overlay_opacity) / 100.0
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub fn selected_zone(&self) -> Option<&str> {
        self.selected_zone.as_deref()
    }

    /// Clamp and store `pct`. Returns the stored value.
    pub(crate) fn set_overlay_opacity(&mut self, pct: i32) -> u8 {
        let clamped = pct.clamp(i32::from(OPACITY_MIN), i32::from(OPACITY_MAX));
        // Clamped into u8 range above.
        self.overlay_opacity = clamped as u8;
        self.overlay_opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ViewerState::default();
        assert_eq!(state.active_layer(), AnalysisLayer::TrueColor);
        assert_eq!(state.overlay_opacity(), 70);
        assert!(state.grid_visible());
        assert!(state.labels_visible());
        assert_eq!(state.selected_zone(), None);
    }

    #[test]
    fn test_opacity_clamps_to_bounds() {
        let mut state = ViewerState::default();
        assert_eq!(state.set_overlay_opacity(5), 10);
        assert_eq!(state.set_overlay_opacity(150), 100);
        assert_eq!(state.set_overlay_opacity(-40), 10);
        assert_eq!(state.set_overlay_opacity(55), 55);
        assert!((state.overlay_alpha() - 0.55).abs() < 1e-6);
    }
}
