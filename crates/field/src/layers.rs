//! The closed set of analysis layers and their display metadata.

use std::fmt;
use std::str::FromStr;

use bevy::color::Srgba;

// ---------------------------------------------------------------------------
// AnalysisLayer
// ---------------------------------------------------------------------------

/// One selectable rendering mode of the satellite viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisLayer {
    #[default]
    TrueColor,
    Ndvi,
    Thermal,
    Hyperspectral,
    StressFusion,
    RedEdge,
}

/// Every layer, in picker order.
pub const ALL_LAYERS: [AnalysisLayer; 6] = [
    AnalysisLayer::TrueColor,
    AnalysisLayer::Ndvi,
    AnalysisLayer::Thermal,
    AnalysisLayer::Hyperspectral,
    AnalysisLayer::StressFusion,
    AnalysisLayer::RedEdge,
];

impl AnalysisLayer {
    /// Stable identifier used by callers that select layers by name.
    pub fn id(self) -> &'static str {
        match self {
            Self::TrueColor => "trueColor",
            Self::Ndvi => "ndvi",
            Self::Thermal => "thermal",
            Self::Hyperspectral => "hyperspectral",
            Self::StressFusion => "stressFusion",
            Self::RedEdge => "redEdge",
        }
    }

    /// Layers whose high/severe zones get the radial pulse.
    pub fn has_pulse(self) -> bool {
        matches!(self, Self::StressFusion | Self::Hyperspectral)
    }

    fn index(self) -> usize {
        match self {
            Self::TrueColor => 0,
            Self::Ndvi => 1,
            Self::Thermal => 2,
            Self::Hyperspectral => 3,
            Self::StressFusion => 4,
            Self::RedEdge => 5,
        }
    }
}

impl fmt::Display for AnalysisLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a layer id is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayerId(pub String);

impl fmt::Display for UnknownLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown analysis layer: {}", self.0)
    }
}

impl std::error::Error for UnknownLayerId {}

impl FromStr for AnalysisLayer {
    type Err = UnknownLayerId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_LAYERS
            .iter()
            .copied()
            .find(|layer| layer.id() == s)
            .ok_or_else(|| UnknownLayerId(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// LayerInfo / LayerCatalog
// ---------------------------------------------------------------------------

/// Display metadata for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerInfo {
    pub layer: AnalysisLayer,
    pub label: &'static str,
    pub icon: &'static str,
    pub accent: Srgba,
    pub blurb: &'static str,
}

/// Metadata for every layer, indexable by `AnalysisLayer`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCatalog {
    entries: [LayerInfo; 6],
}

impl Default for LayerCatalog {
    fn default() -> Self {
        Self {
            entries: [
                LayerInfo {
                    layer: AnalysisLayer::TrueColor,
                    label: "True Color",
                    icon: "◉",
                    accent: Srgba::rgb(0.58, 0.64, 0.72),
                    blurb: "Natural RGB composite. Early stress is nearly invisible here: \
                            canopies only yellow once damage is advanced.",
                },
                LayerInfo {
                    layer: AnalysisLayer::Ndvi,
                    label: "NDVI",
                    icon: "❦",
                    accent: Srgba::rgb(0.13, 0.77, 0.37),
                    blurb: "Normalized Difference Vegetation Index. Contrasts near-infrared \
                            and red reflectance to map canopy vigor.",
                },
                LayerInfo {
                    layer: AnalysisLayer::Thermal,
                    label: "Thermal",
                    icon: "♨",
                    accent: Srgba::rgb(0.98, 0.45, 0.09),
                    blurb: "Land-surface temperature. Water-stressed crops close their \
                            stomata and run hotter than irrigated neighbours.",
                },
                LayerInfo {
                    layer: AnalysisLayer::Hyperspectral,
                    label: "Hyperspectral",
                    icon: "◈",
                    accent: Srgba::rgb(0.66, 0.33, 0.97),
                    blurb: "False-color composite of narrow spectral bands, separating \
                            stress signatures that broadband sensors blend together.",
                },
                LayerInfo {
                    layer: AnalysisLayer::StressFusion,
                    label: "Stress Fusion",
                    icon: "⚠",
                    accent: Srgba::rgb(0.94, 0.27, 0.27),
                    blurb: "Fused stress classification combining vegetation, thermal and \
                            red-edge evidence into one per-zone level.",
                },
                LayerInfo {
                    layer: AnalysisLayer::RedEdge,
                    label: "Red-Edge / N",
                    icon: "◐",
                    accent: Srgba::rgb(0.92, 0.70, 0.03),
                    blurb: "Red-edge reflectance tracks chlorophyll and nitrogen status \
                            before visible symptoms appear.",
                },
            ],
        }
    }
}

impl LayerCatalog {
    pub fn info(&self, layer: AnalysisLayer) -> &LayerInfo {
        &self.entries[layer.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerInfo> {
        self.entries.iter()
    }
}
