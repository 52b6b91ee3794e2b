//! Zone inspector: field summary, health distribution, zone list and the
//! selected zone's telemetry, alert, NDVI anomaly, forecast and spectral
//! indices.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use field::analytics::{
    advisory, distribution, ndvi_anomalies, summarize, zone_forecast, AlertLevel,
};
use field::{FieldZone, VisualConfig, ZoneDataset};
use rendering::spectral::{synthesize, SpectralIndices};
use rendering::ViewerSession;

use crate::textures::to_color32;
use crate::viewer_panel::ViewerPanel;

fn alert_color(level: AlertLevel) -> egui::Color32 {
    match level {
        AlertLevel::Safe => egui::Color32::from_rgb(60, 200, 110),
        AlertLevel::Monitor => egui::Color32::from_rgb(240, 180, 40),
        AlertLevel::Critical => egui::Color32::from_rgb(235, 70, 70),
    }
}

fn share_bar(ui: &mut egui::Ui, label: &str, pct: f32, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.label(format!("{label:<9}"));
        ui.add(
            egui::ProgressBar::new(pct / 100.0)
                .desired_width(140.0)
                .fill(color)
                .text(format!("{pct:.1}%")),
        );
    });
}

fn telemetry_row(ui: &mut egui::Ui, name: &str, value: String) {
    ui.label(name);
    ui.monospace(value);
    ui.end_row();
}

fn forecast_strip(ui: &mut egui::Ui, zone: &FieldZone) {
    ui.label(egui::RichText::new("7-day stress forecast").strong());
    egui::Grid::new("zone_forecast")
        .num_columns(7)
        .spacing([6.0, 0.0])
        .show(ui, |ui| {
            let days = zone_forecast(zone);
            for day in &days {
                ui.small(format!("D{}", day.day));
            }
            ui.end_row();
            for day in &days {
                ui.colored_label(alert_color(day.alert), format!("{:.0}", day.stress));
            }
            ui.end_row();
        });
}

fn zone_details(ui: &mut egui::Ui, zone: &FieldZone, anomaly: f32, config: &VisualConfig) {
    let level_color = to_color32(config.palette.color(zone.stress_level));
    ui.horizontal(|ui| {
        ui.strong(format!("{} · {}", zone.code, zone.name));
        ui.colored_label(level_color, zone.stress_level.label());
    });

    egui::Grid::new("zone_telemetry")
        .num_columns(2)
        .spacing([16.0, 2.0])
        .show(ui, |ui| {
            telemetry_row(ui, "Crop", zone.crop.clone());
            telemetry_row(ui, "Area", format!("{:.1} ha", zone.area_ha));
            telemetry_row(ui, "Centroid", format!("{:.4}, {:.4}", zone.lat, zone.lon));
            telemetry_row(ui, "Stress", format!("{}%", zone.stress_score));
            telemetry_row(ui, "Water", format!("{:.1}%", zone.water_content));
            telemetry_row(ui, "Nitrogen", format!("{:.2}", zone.nitrogen_index));
            telemetry_row(ui, "NDVI", format!("{:.2}", zone.ndvi));
            telemetry_row(ui, "NDVI anomaly", format!("{anomaly:.2} σ"));
            telemetry_row(ui, "NDWI", format!("{:+.2}", zone.ndwi));
            telemetry_row(ui, "LST", format!("{:.1} °C", zone.lst));
            let alert_age = match zone.alert_age {
                Some(days) => format!("{days} days ago"),
                None => "never".to_string(),
            };
            telemetry_row(ui, "Pre-visual alert", alert_age);
        });

    let pct = f32::from(zone.stress_score);
    let alert = AlertLevel::from_percent(pct);
    ui.add_space(4.0);
    ui.colored_label(alert_color(alert), format!("Alert: {}", alert.label()));
    ui.label(egui::RichText::new(advisory(pct)).small());

    let indices = SpectralIndices::from_signature(&synthesize(zone));
    ui.add_space(4.0);
    ui.label(egui::RichText::new("Synthesized indices").strong());
    ui.monospace(format!(
        "NDVI {:.3}   NDRE {:.3}   MSI {:.3}",
        indices.ndvi, indices.ndre, indices.msi
    ));

    ui.add_space(4.0);
    forecast_strip(ui, zone);
}

pub fn inspector_ui(
    mut contexts: EguiContexts,
    panel: Res<ViewerPanel>,
    mut session: ResMut<ViewerSession>,
    dataset: Res<ZoneDataset>,
    config: Res<VisualConfig>,
) {
    if !panel.open {
        return;
    }
    let Some(viewer) = session.viewer_mut() else {
        return;
    };

    let screen = contexts.ctx_mut().screen_rect();
    egui::Window::new("Zone Inspector")
        .default_pos(egui::pos2(screen.right() - 340.0, 40.0))
        .default_width(320.0)
        .show(contexts.ctx_mut(), |ui| {
            let summary = summarize(&dataset);
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} zones · {:.1} ha · mean stress {:.0}%",
                    summary.zone_count, summary.total_area_ha, summary.mean_stress
                ));
            });
            ui.horizontal(|ui| {
                ui.colored_label(
                    alert_color(summary.alert),
                    format!("Field alert: {}", summary.alert.label()),
                );
                ui.label(format!("· {} pre-visual", summary.pre_visual_alerts));
            });

            let dist = distribution(&dataset);
            share_bar(ui, "Healthy", dist.healthy, alert_color(AlertLevel::Safe));
            share_bar(ui, "Moderate", dist.moderate, alert_color(AlertLevel::Monitor));
            share_bar(ui, "Critical", dist.critical, alert_color(AlertLevel::Critical));

            ui.separator();
            for zone in dataset.iter() {
                let selected = viewer.state().selected_zone() == Some(zone.code.as_str());
                let dot = to_color32(config.palette.color(zone.stress_level));
                ui.horizontal(|ui| {
                    ui.colored_label(dot, "●");
                    let text = format!("{}  {}  {}%", zone.code, zone.name, zone.stress_score);
                    if ui.selectable_label(selected, text).clicked() {
                        if let Err(err) = viewer.select_zone(&zone.code) {
                            warn!("Zone selection rejected: {err}");
                        }
                    }
                });
            }

            ui.separator();
            let anomalies = ndvi_anomalies(&dataset);
            let selected = viewer.state().selected_zone().and_then(|code| {
                dataset
                    .iter()
                    .zip(&anomalies)
                    .find(|(zone, _)| zone.code == code)
            });
            match selected {
                Some((zone, &anomaly)) => zone_details(ui, zone, anomaly, &config),
                None => {
                    ui.label("Select a zone.");
                }
            }
        });
}
