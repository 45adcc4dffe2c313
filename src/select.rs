// Resolves a select-mode fingertip position against the static hit regions:
// color swatches in the header, brush-size buttons on the right edge.

use crate::config::{BrushAction, Config};
use crate::types::{Bgr, Point};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectAction {
    /// Switch the active color and overlay to the named swatch.
    SelectColor { key: String, color: Bgr },
    /// Adjust brush thickness by the signed step.
    AdjustBrush(i32),
}

/// Test the fingertip against the color regions first, then the brush
/// controls, each in definition order. First matching region wins; the
/// regions are configured non-overlapping, and under a broken configuration
/// this order is the defined behavior.
pub fn resolve(p: Point, config: &Config) -> Option<SelectAction> {
    for region in &config.color_regions {
        if region.rect.contains(p) {
            return Some(SelectAction::SelectColor {
                key: region.name.clone(),
                color: region.color,
            });
        }
    }
    for region in &config.brush_regions {
        if region.rect.contains(p) {
            let step = match region.action {
                BrushAction::Increase => config.brush_step,
                BrushAction::Decrease => -config.brush_step,
            };
            return Some(SelectAction::AdjustBrush(step));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BLUE_COLOR, BrushRegion, ColorRegion, ERASER_COLOR};
    use crate::types::Rect;

    #[test]
    fn hit_inside_blue_swatch() {
        let config = Config::default();
        // 12-20% of 1920 is x = 230..384; middle of the header band.
        let action = resolve(Point::new(300, 60), &config);
        assert_eq!(
            action,
            Some(SelectAction::SelectColor { key: "blue".into(), color: BLUE_COLOR })
        );
    }

    #[test]
    fn hit_inside_eraser_swatch() {
        let config = Config::default();
        let action = resolve(Point::new((1920.0 * 0.95) as i32, 60), &config);
        assert_eq!(
            action,
            Some(SelectAction::SelectColor { key: "eraser".into(), color: ERASER_COLOR })
        );
    }

    #[test]
    fn hit_between_swatches_is_none() {
        let config = Config::default();
        // 30% of the width falls between the blue and green bands.
        assert_eq!(resolve(Point::new((1920.0 * 0.30) as i32, 60), &config), None);
        // Below the header, away from the brush buttons.
        assert_eq!(resolve(Point::new(500, 600), &config), None);
    }

    #[test]
    fn brush_buttons_emit_signed_steps() {
        let config = Config::default();
        let plus = resolve(Point::new(1920 - 45, 225), &config);
        assert_eq!(plus, Some(SelectAction::AdjustBrush(5)));
        let minus = resolve(Point::new(1920 - 45, 295), &config);
        assert_eq!(minus, Some(SelectAction::AdjustBrush(-5)));
    }

    #[test]
    fn overlapping_regions_resolve_first_match() {
        // Deliberately broken configuration: two swatches and a brush button
        // sharing the same rectangle. Definition order decides.
        let mut config = Config::default();
        let rect = Rect::new(0, 100, 0, 100);
        config.color_regions = vec![
            ColorRegion { rect, name: "first".into(), color: BLUE_COLOR },
            ColorRegion { rect, name: "second".into(), color: ERASER_COLOR },
        ];
        config.brush_regions = vec![BrushRegion { rect, action: BrushAction::Increase }];

        let action = resolve(Point::new(50, 50), &config);
        assert_eq!(
            action,
            Some(SelectAction::SelectColor { key: "first".into(), color: BLUE_COLOR })
        );
    }
}
