//! Raster-to-egui plumbing: texture upload and text-run painting.

use bevy::color::Srgba;
use bevy_egui::egui;

use rendering::surface::{Raster, TextAlign, TextRun};

pub fn to_color32(c: Srgba) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(c.red),
        channel(c.green),
        channel(c.blue),
        channel(c.alpha),
    )
}

fn anchor(align: TextAlign) -> egui::Align2 {
    match align {
        TextAlign::Left => egui::Align2::LEFT_CENTER,
        TextAlign::Center => egui::Align2::CENTER_CENTER,
        TextAlign::Right => egui::Align2::RIGHT_CENTER,
    }
}

/// An egui texture mirroring a [`Raster`], re-uploaded when its revision
/// changes.
#[derive(Default)]
pub struct RasterTexture {
    handle: Option<egui::TextureHandle>,
    revision: Option<u64>,
}

impl RasterTexture {
    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        raster: &Raster,
        revision: u64,
    ) -> egui::TextureId {
        let image = || {
            egui::ColorImage::from_rgba_unmultiplied(
                [raster.width() as usize, raster.height() as usize],
                &raster.to_rgba_bytes(),
            )
        };
        match &mut self.handle {
            Some(handle) if self.revision == Some(revision) => handle.id(),
            Some(handle) => {
                handle.set(image(), egui::TextureOptions::LINEAR);
                self.revision = Some(revision);
                handle.id()
            }
            None => {
                let handle = ctx.load_texture(name, image(), egui::TextureOptions::LINEAR);
                let id = handle.id();
                self.handle = Some(handle);
                self.revision = Some(revision);
                id
            }
        }
    }
}

/// Show `raster` scaled to fit `max_width`, with its text runs on top.
pub fn show_raster(
    ui: &mut egui::Ui,
    texture: &mut RasterTexture,
    name: &str,
    raster: &Raster,
    revision: u64,
    max_width: f32,
) -> egui::Response {
    let id = texture.sync(ui.ctx(), name, raster, revision);
    let native = egui::vec2(raster.width() as f32, raster.height() as f32);
    let scale = (max_width / native.x).min(1.0).max(0.1);
    let (rect, response) = ui.allocate_exact_size(native * scale, egui::Sense::click());

    let painter = ui.painter_at(rect);
    painter.image(
        id,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
    paint_text_runs(&painter, rect.min, scale, raster.text_runs());
    response
}

fn paint_text_runs(painter: &egui::Painter, origin: egui::Pos2, scale: f32, runs: &[TextRun]) {
    for run in runs {
        let size = (run.style.size * scale).max(6.0);
        let font = if run.style.monospace {
            egui::FontId::monospace(size)
        } else {
            egui::FontId::proportional(size)
        };
        let pos = origin + egui::vec2(run.position.x, run.position.y) * scale;
        painter.text(
            pos,
            anchor(run.style.align),
            &run.text,
            font,
            to_color32(run.style.color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_color32_rounds_channels() {
        let c = to_color32(Srgba::new(1.0, 0.5, 0.0, 1.0));
        assert_eq!(c, egui::Color32::from_rgb(255, 128, 0));
    }

    #[test]
    fn test_anchor_matches_alignment() {
        assert_eq!(anchor(TextAlign::Right), egui::Align2::RIGHT_CENTER);
        assert_eq!(anchor(TextAlign::Center), egui::Align2::CENTER_CENTER);
    }
}
