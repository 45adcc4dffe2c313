// Startup configuration: canvas geometry, timing constants, selection hit
// regions, and overlay sources. Loaded once, immutable afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{Bgr, Rect};

// Palette values in BGR order.
pub const RED_COLOR: Bgr = Bgr::new(0, 0, 255);
pub const BLUE_COLOR: Bgr = Bgr::new(255, 50, 10);
pub const GREEN_COLOR: Bgr = Bgr::new(0, 255, 0);
pub const ERASER_COLOR: Bgr = Bgr::new(255, 192, 203);

/// A named color swatch in the header: hitting its rectangle while in select
/// mode switches the active color and overlay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorRegion {
    pub rect: Rect,
    pub name: String,
    pub color: Bgr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushAction {
    Increase,
    Decrease,
}

/// A brush-size control button on the right edge of the canvas.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrushRegion {
    pub rect: Rect,
    pub action: BrushAction,
}

/// A header overlay source: overlay key plus the image file name inside
/// `overlay_dir`. Order matters; the first loadable entry is the fallback
/// when the default key is missing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverlaySource {
    pub key: String,
    pub file: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Height in pixels of the menu strip across the top of the canvas.
    pub header_height: i32,
    /// Seconds a committed stroke stays on the canvas before expiring.
    pub stroke_lifetime_secs: f32,
    pub default_color: Bgr,
    pub default_brush_thickness: u32,
    /// Eraser collision thickness = brush thickness times this.
    pub eraser_multiplier: u32,
    /// Forwarded to hand tracker implementations.
    pub detection_confidence: f32,
    pub tracking_confidence: f32,
    /// Seconds without a detected hand before the canvas is wiped.
    pub hand_timeout_secs: f32,
    /// Maximum Manhattan displacement between consecutive fingertip positions
    /// before a draw is suppressed as tracking noise.
    pub jump_threshold: i32,
    pub brush_step: i32,
    pub brush_min: u32,
    pub brush_max: u32,
    /// Minimum interval between applied gesture brush-size adjustments.
    pub brush_debounce_ms: u64,
    pub color_regions: Vec<ColorRegion>,
    pub brush_regions: Vec<BrushRegion>,
    pub overlay_dir: PathBuf,
    pub overlays: Vec<OverlaySource>,
    /// Show the auto-clear countdown while no hand is detected.
    pub show_countdown: bool,
    pub debug_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        let w = 1920usize;
        let h = 1080usize;
        let header = 125i32;
        Self {
            canvas_width: w,
            canvas_height: h,
            header_height: header,
            stroke_lifetime_secs: 30.0,
            default_color: RED_COLOR,
            default_brush_thickness: 5,
            eraser_multiplier: 2,
            detection_confidence: 0.85,
            tracking_confidence: 0.5,
            hand_timeout_secs: 10.0,
            jump_threshold: 100,
            brush_step: 5,
            brush_min: 1,
            brush_max: 100,
            brush_debounce_ms: 300,
            color_regions: default_color_regions(w, header),
            brush_regions: default_brush_regions(w),
            overlay_dir: PathBuf::from("assets/overlays"),
            overlays: vec![
                OverlaySource { key: "red".into(), file: "0_red_option.jpg".into() },
                OverlaySource { key: "blue".into(), file: "1_blue_option.jpg".into() },
                OverlaySource { key: "green".into(), file: "2_green_option.jpg".into() },
                OverlaySource { key: "eraser".into(), file: "3_eraser_option.jpg".into() },
            ],
            show_countdown: true,
            debug_mode: false,
        }
    }
}

/// Swatch rectangles as fractions of the canvas width, spanning 1-95% of the
/// header height.
fn default_color_regions(canvas_width: usize, header_height: i32) -> Vec<ColorRegion> {
    let w = canvas_width as f32;
    let h = header_height as f32;
    let band = |lo: f32, hi: f32, name: &str, color: Bgr| ColorRegion {
        rect: Rect::new(
            (w * lo) as i32,
            (w * hi) as i32,
            (h * 0.01) as i32,
            (h * 0.95) as i32,
        ),
        name: name.into(),
        color,
    };
    vec![
        band(0.12, 0.20, "blue", BLUE_COLOR),
        band(0.43, 0.51, "green", GREEN_COLOR),
        band(0.73, 0.81, "red", RED_COLOR),
        band(0.91, 0.98, "eraser", ERASER_COLOR),
    ]
}

/// Plus button above, minus button below, stacked on the right edge.
fn default_brush_regions(canvas_width: usize) -> Vec<BrushRegion> {
    let w = canvas_width as i32;
    vec![
        BrushRegion { rect: Rect::new(w - 70, w - 20, 200, 250), action: BrushAction::Increase },
        BrushRegion { rect: Rect::new(w - 70, w - 20, 270, 320), action: BrushAction::Decrease },
    ]
}

impl Config {
    /// Read a JSON config file. Missing fields fall back to the defaults
    /// above, so a partial file only has to name what it overrides.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))
    }

    pub fn stroke_lifetime(&self) -> Duration {
        Duration::from_secs_f32(self.stroke_lifetime_secs)
    }

    pub fn hand_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.hand_timeout_secs)
    }

    pub fn brush_debounce(&self) -> Duration {
        Duration::from_millis(self.brush_debounce_ms)
    }

    /// The fixed palette the `C` key cycles through, with the overlay key
    /// each entry activates.
    pub fn palette(&self) -> [(&'static str, Bgr); 4] {
        [
            ("red", RED_COLOR),
            ("blue", BLUE_COLOR),
            ("green", GREEN_COLOR),
            ("eraser", ERASER_COLOR),
        ]
    }
}
