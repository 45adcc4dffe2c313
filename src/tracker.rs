// The hand-tracker seam. The crate treats hand tracking as an external
// capability: anything that can look at a frame and report landmark pixel
// positions plus a finger-extension vector plugs in here.

use crate::types::{Frame, Point};

/// Landmark ids follow the usual 21-point hand model.
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;

#[derive(Clone, Copy, Debug)]
pub struct Landmark {
    pub id: usize,
    pub pos: Point,
}

/// One frame's worth of tracking output.
#[derive(Clone, Debug)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
    /// Extension per finger, thumb through pinky.
    pub fingers_up: [bool; 5],
}

impl HandObservation {
    pub fn landmark(&self, id: usize) -> Option<Point> {
        self.landmarks.iter().find(|l| l.id == id).map(|l| l.pos)
    }

    pub fn index_tip(&self) -> Option<Point> {
        self.landmark(INDEX_TIP)
    }

    pub fn middle_tip(&self) -> Option<Point> {
        self.landmark(MIDDLE_TIP)
    }
}

/// Confidence thresholds forwarded from the configuration to whatever
/// detector backs the trait.
#[derive(Clone, Copy, Debug)]
pub struct TrackerSettings {
    pub detection_confidence: f32,
    pub tracking_confidence: f32,
}

/// Stateless-per-frame contract: zero or one observation per frame.
pub trait HandTracker {
    fn detect(&mut self, frame: &Frame) -> Option<HandObservation>;
}

/// A tracker that never sees a hand. Useful headless and as the default when
/// no detector is wired in; the hand-absence timeout still exercises the
/// ledger wipe.
pub struct NullTracker;

impl HandTracker for NullTracker {
    fn detect(&mut self, _frame: &Frame) -> Option<HandObservation> {
        None
    }
}

/// Window pointer state fed to [`PointerTracker`] each frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    pub pos: Option<Point>,
    /// Left button: behave like an extended index finger (draw).
    pub draw_held: bool,
    /// Right button: behave like index + middle extended (select).
    pub select_held: bool,
}

/// Synthesizes observations from the window mouse, so the whole pipeline can
/// be driven at a desk without a camera-facing hand. Left button maps to the
/// draw gesture, right button to the select gesture, neither to "no hand".
pub struct PointerTracker {
    pointer: PointerState,
}

impl PointerTracker {
    pub fn new(settings: TrackerSettings) -> Self {
        log::debug!(
            "pointer tracker standing in for a hand detector (detection {:.2}, tracking {:.2})",
            settings.detection_confidence,
            settings.tracking_confidence
        );
        Self { pointer: PointerState::default() }
    }

    /// Called once per frame before `detect`.
    pub fn set_pointer(&mut self, pointer: PointerState) {
        self.pointer = pointer;
    }
}

impl HandTracker for PointerTracker {
    fn detect(&mut self, _frame: &Frame) -> Option<HandObservation> {
        let pos = self.pointer.pos?;
        let fingers_up = if self.pointer.draw_held {
            [false, true, false, false, false]
        } else if self.pointer.select_held {
            [false, true, true, false, false]
        } else {
            return None;
        };
        // The middle fingertip sits a little beside the index tip, enough for
        // the select feedback rectangle to have area.
        Some(HandObservation {
            landmarks: vec![
                Landmark { id: INDEX_TIP, pos },
                Landmark { id: MIDDLE_TIP, pos: Point::new(pos.x + 24, pos.y) },
            ],
            fingers_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TrackerSettings {
        TrackerSettings { detection_confidence: 0.85, tracking_confidence: 0.5 }
    }

    #[test]
    fn null_tracker_never_detects() {
        let frame = Frame::blank(8, 8);
        assert!(NullTracker.detect(&frame).is_none());
    }

    #[test]
    fn pointer_tracker_maps_buttons_to_gestures() {
        let frame = Frame::blank(8, 8);
        let mut tracker = PointerTracker::new(settings());

        tracker.set_pointer(PointerState {
            pos: Some(Point::new(100, 200)),
            draw_held: true,
            select_held: false,
        });
        let obs = tracker.detect(&frame).unwrap();
        assert_eq!(obs.fingers_up, [false, true, false, false, false]);
        assert_eq!(obs.index_tip(), Some(Point::new(100, 200)));

        tracker.set_pointer(PointerState {
            pos: Some(Point::new(100, 200)),
            draw_held: false,
            select_held: true,
        });
        let obs = tracker.detect(&frame).unwrap();
        assert_eq!(obs.fingers_up, [false, true, true, false, false]);
        assert!(obs.middle_tip().is_some());
    }

    #[test]
    fn pointer_tracker_reports_no_hand_when_idle() {
        let frame = Frame::blank(8, 8);
        let mut tracker = PointerTracker::new(settings());
        tracker.set_pointer(PointerState {
            pos: Some(Point::new(1, 1)),
            draw_held: false,
            select_held: false,
        });
        assert!(tracker.detect(&frame).is_none());
    }
}
