// ---------------------------------------------------------------------------
// RenderError: failures of the layer renderers and the viewer
// ---------------------------------------------------------------------------

use std::fmt;

use field::layers::UnknownLayerId;

/// Errors raised by the compositor, the viewer and its operations.
///
/// Every variant except `SurfaceUnavailable` signals a programming error:
/// lookups run over closed, statically-known sets, and the public opacity
/// setter clamps before anything reaches the compositor.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Layer id outside the closed set of analysis layers.
    UnknownLayer(String),
    /// Overlay opacity outside `[0, 1]` after normalization.
    InvalidOpacity(f32),
    /// The raster surface is not attached yet. Recovered by skipping the frame.
    SurfaceUnavailable,
    /// Zone code not present in the dataset.
    UnknownZone(String),
    /// A dataset zone has no entry in the static field layout.
    MissingFootprint(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownLayer(id) => write!(f, "Unknown analysis layer: {id}"),
            RenderError::InvalidOpacity(v) => {
                write!(f, "Invalid overlay opacity {v}: expected a value in [0, 1]")
            }
            RenderError::SurfaceUnavailable => write!(f, "Raster surface is not attached"),
            RenderError::UnknownZone(code) => write!(f, "Unknown zone code: {code}"),
            RenderError::MissingFootprint(code) => {
                write!(f, "No field footprint defined for zone {code}")
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<UnknownLayerId> for RenderError {
    fn from(e: UnknownLayerId) -> Self {
        RenderError::UnknownLayer(e.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_layer() {
        let msg = format!("{}", RenderError::UnknownLayer("sar".to_string()));
        assert!(msg.contains("sar"), "got: {msg}");
    }

    #[test]
    fn test_display_invalid_opacity() {
        let msg = format!("{}", RenderError::InvalidOpacity(1.5));
        assert!(msg.contains("1.5"), "got: {msg}");
    }

    #[test]
    fn test_from_unknown_layer_id() {
        let err: RenderError = UnknownLayerId("lidar".to_string()).into();
        assert_eq!(err, RenderError::UnknownLayer("lidar".to_string()));
    }
}
