use bevy::prelude::*;

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod layers;
pub mod palette;
pub mod zone;

pub use dataset::{DatasetError, ZoneDataset};
pub use layers::{AnalysisLayer, LayerCatalog, LayerInfo, ALL_LAYERS};
pub use palette::StressPalette;
pub use zone::{most_stressed, FieldZone, StressLevel};

/// Static visual configuration handed to every renderer.
///
/// Renderers take this by reference instead of reading globals so the
/// color-mapping functions stay pure.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct VisualConfig {
    pub palette: StressPalette,
    pub layers: LayerCatalog,
}

/// Loads the zone dataset and visual configuration at startup.
///
/// The embedded dataset is validated here; a malformed record aborts
/// startup instead of rendering a partial field.
pub struct FieldPlugin;

impl Plugin for FieldPlugin {
    fn build(&self, app: &mut App) {
        let dataset = match ZoneDataset::embedded() {
            Ok(dataset) => dataset,
            Err(e) => {
                error!("Failed to load zone dataset: {e}");
                panic!("invalid embedded zone dataset: {e}");
            }
        };
        info!(
            "Loaded {} field zones covering {:.1} ha",
            dataset.len(),
            dataset.total_area_ha()
        );

        app.insert_resource(dataset)
            .init_resource::<VisualConfig>();
    }
}
