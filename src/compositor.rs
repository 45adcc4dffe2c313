// Merges the rasterized drawing layer, the live camera frame, and the header
// overlay into the displayable image, then draws the static affordances:
// the header boundary rule, the brush-size controls, and the auto-clear
// countdown. Pure per-frame transform.

use crate::config::{BrushAction, Config};
use crate::raster;
use crate::types::{Bgr, Frame, Point};

const BUTTON_FILL: Bgr = Bgr::new(50, 50, 50);
const COUNTDOWN_COLOR: Bgr = Bgr::new(0, 0, 255);

/// Compose one output frame.
///
/// Ink wins over camera: any non-black layer pixel replaces the camera pixel
/// outright (no blending). The header replaces the top strip entirely, but
/// only when its dimensions match the expected footprint; a malformed overlay
/// is skipped rather than risking a bad row copy.
pub fn compose(
    camera: &Frame,
    layer: &Frame,
    header: Option<&Frame>,
    brush_thickness: u32,
    countdown_secs: Option<f32>,
    config: &Config,
) -> Frame {
    let mut out = camera.clone();

    // Ink mask: non-background layer pixels take the layer color.
    let n = out.pixels.len().min(layer.pixels.len());
    for i in 0..n {
        let ink = layer.pixels[i];
        if ink != 0 {
            out.pixels[i] = ink;
        }
    }

    // Header strip, full width, replacing camera content.
    if let Some(header) = header {
        if header.height == config.header_height.max(0) as usize && header.width == out.width {
            let strip = header.height * out.width;
            out.pixels[..strip].copy_from_slice(&header.pixels[..strip]);
        }
    }

    // Boundary rule under the header: black underlay, white centerline.
    raster::draw_hline(&mut out, config.header_height, 3, Bgr::BLACK.packed());
    raster::draw_hline(&mut out, config.header_height, 1, Bgr::WHITE.packed());

    draw_brush_controls(&mut out, brush_thickness, config);

    if let Some(remaining) = countdown_secs {
        let text = format!("AUTO-CLEAR IN {remaining:.1}S");
        raster::draw_text_5x7(
            &mut out,
            20,
            out.height as i32 - 40,
            &text,
            2,
            COUNTDOWN_COLOR.packed(),
        );
    }

    out
}

/// The +/- buttons mirror the selection hit regions so what is drawn is what
/// is hittable, with the current thickness rendered beneath the stack.
fn draw_brush_controls(out: &mut Frame, brush_thickness: u32, config: &Config) {
    let mut bottom = 0;
    for region in &config.brush_regions {
        let rect = region.rect;
        raster::fill_rect(
            out,
            Point::new(rect.min_x, rect.min_y),
            Point::new(rect.max_x, rect.max_y),
            BUTTON_FILL.packed(),
        );
        let glyph = match region.action {
            BrushAction::Increase => "+",
            BrushAction::Decrease => "-",
        };
        let scale = 4;
        let cx = (rect.min_x + rect.max_x) / 2 - 5 * scale / 2;
        let cy = (rect.min_y + rect.max_y) / 2 - 7 * scale / 2;
        raster::draw_text_5x7(out, cx, cy, glyph, scale, Bgr::WHITE.packed());
        bottom = bottom.max(rect.max_y);
    }
    if !config.brush_regions.is_empty() {
        let x = config.brush_regions[0].rect.min_x + 15;
        raster::draw_text_5x7(
            out,
            x,
            bottom + 30,
            &brush_thickness.to_string(),
            3,
            Bgr::WHITE.packed(),
        );
    }
}
