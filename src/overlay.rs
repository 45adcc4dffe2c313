// Header overlay loading. Each overlay image is cropped to the header height
// if taller, resized to the full canvas width, and kept immutable. When no
// image loads at all, a neutral synthesized header stands in so startup never
// fails on missing assets.

use std::collections::HashMap;

use image::RgbImage;
use image::imageops::{self, FilterType};
use log::{debug, warn};

use crate::config::Config;
use crate::error::Error;
use crate::types::{Bgr, Frame};

const FALLBACK_KEY: &str = "red";
const FALLBACK_GRAY: Bgr = Bgr::new(50, 50, 50);

pub struct OverlaySet {
    images: HashMap<String, Frame>,
    /// First key that actually loaded, in configuration order.
    first_key: String,
}

impl OverlaySet {
    /// Load every configured overlay, skipping the ones that fail. An empty
    /// result synthesizes a dark-gray header under the fallback key.
    pub fn load(config: &Config) -> Self {
        let mut images = HashMap::new();
        let mut first_key: Option<String> = None;

        for source in &config.overlays {
            let path = config.overlay_dir.join(&source.file);
            match load_one(&path, config) {
                Ok(frame) => {
                    debug!("loaded overlay '{}' from {}", source.key, path.display());
                    first_key.get_or_insert_with(|| source.key.clone());
                    images.insert(source.key.clone(), frame);
                }
                Err(e) => warn!("skipping overlay '{}': {e}", source.key),
            }
        }

        if images.is_empty() {
            warn!("no overlay images loaded, synthesizing a blank header");
            return Self::synthesized(config);
        }

        // Prefer the default key when it loaded.
        let first_key = if images.contains_key(FALLBACK_KEY) {
            FALLBACK_KEY.to_string()
        } else {
            first_key.unwrap_or_else(|| FALLBACK_KEY.to_string())
        };
        Self { images, first_key }
    }

    /// The asset-free fallback: one dark-gray header under the default key.
    pub fn synthesized(config: &Config) -> Self {
        let header = Frame::filled(
            config.canvas_width,
            config.header_height.max(0) as usize,
            FALLBACK_GRAY,
        );
        let mut images = HashMap::new();
        images.insert(FALLBACK_KEY.to_string(), header);
        Self { images, first_key: FALLBACK_KEY.to_string() }
    }

    /// The overlay key the session starts on.
    pub fn initial_key(&self) -> &str {
        &self.first_key
    }

    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Frame> {
        self.images.get(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn load_one(path: &std::path::Path, config: &Config) -> Result<Frame, Error> {
    let img = image::open(path)
        .map_err(|e| Error::Overlay(format!("{}: {e}", path.display())))?
        .to_rgb8();
    Ok(fit_to_header(img, config))
}

/// Crop anything below the header height, then resize to the exact header
/// footprint and pack for the framebuffer.
fn fit_to_header(img: RgbImage, config: &Config) -> Frame {
    let header_h = config.header_height.max(1) as u32;
    let target_w = config.canvas_width as u32;

    let img = if img.height() > header_h {
        imageops::crop_imm(&img, 0, 0, img.width(), header_h).to_image()
    } else {
        img
    };
    let img = imageops::resize(&img, target_w, header_h, FilterType::Triangle);

    let mut pixels = Vec::with_capacity((target_w * header_h) as usize);
    for pixel in img.pixels() {
        let r = pixel[0] as u32;
        let g = pixel[1] as u32;
        let b = pixel[2] as u32;
        pixels.push((r << 16) | (g << 8) | b);
    }
    Frame { width: target_w as usize, height: header_h as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_assets_fall_back_to_synthesized_header() {
        let config = Config {
            overlay_dir: std::path::PathBuf::from("/nonexistent"),
            ..Default::default()
        };
        let overlays = OverlaySet::load(&config);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays.initial_key(), "red");
        let header = overlays.get("red").unwrap();
        assert_eq!(header.width, config.canvas_width);
        assert_eq!(header.height, config.header_height as usize);
        assert!(header.pixels.iter().all(|&p| p == FALLBACK_GRAY.packed()));
    }

    #[test]
    fn synthesized_header_matches_the_expected_footprint() {
        let config = Config { canvas_width: 640, header_height: 40, ..Default::default() };
        let overlays = OverlaySet::synthesized(&config);
        let header = overlays.get("red").unwrap();
        assert_eq!((header.width, header.height), (640, 40));
        assert!(overlays.contains("red"));
        assert!(!overlays.contains("blue"));
    }
}
