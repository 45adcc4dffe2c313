// Per-frame session logic and the UI selection state it owns: active color,
// brush thickness, eraser flag, overlay key, previous pointer position, and
// the timers behind brush debouncing and the hand-absence wipe.
//
// Everything here is clock-parameterized (`now` comes in as an argument) and
// window-free, so the whole state machine is exercised in tests with a
// scripted tracker.

use std::time::{Duration, Instant};

use log::info;

use crate::config::Config;
use crate::gesture::{self, Gesture};
use crate::ledger::Ledger;
use crate::overlay::OverlaySet;
use crate::raster;
use crate::select::{self, SelectAction};
use crate::tracker::HandObservation;
use crate::types::{Bgr, Frame, Point};

/// Discrete keyboard commands, decoded by the window layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    /// Cycle the fixed palette red, blue, green, eraser.
    CyclePalette,
    ClearCanvas,
    BrushUp,
    BrushDown,
    /// One digit of the nine-digit BGR color entry.
    Digit(u8),
}

pub struct SessionState {
    color: Bgr,
    thickness: u32,
    eraser_mode: bool,
    overlay_key: String,
    prev_point: Option<Point>,
    last_hand_seen: Instant,
    digit_buffer: Vec<u8>,
    last_brush_adjust: Option<Instant>,
}

impl SessionState {
    pub fn new(config: &Config, initial_overlay: &str, now: Instant) -> Self {
        Self {
            color: config.default_color,
            thickness: config.default_brush_thickness,
            eraser_mode: false,
            overlay_key: initial_overlay.to_string(),
            prev_point: None,
            last_hand_seen: now,
            digit_buffer: Vec::new(),
            last_brush_adjust: None,
        }
    }

    pub fn color(&self) -> Bgr {
        self.color
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    pub fn eraser_mode(&self) -> bool {
        self.eraser_mode
    }

    pub fn overlay_key(&self) -> &str {
        &self.overlay_key
    }

    pub fn time_since_hand(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_hand_seen)
    }

    /// Remaining seconds before the auto-clear wipe, when a countdown should
    /// be shown (no hand this frame, countdown enabled, timeout not reached).
    pub fn countdown(&self, hand_present: bool, now: Instant, config: &Config) -> Option<f32> {
        if hand_present || !config.show_countdown {
            return None;
        }
        let elapsed = self.time_since_hand(now).as_secs_f32();
        if elapsed > 0.0 && elapsed < config.hand_timeout_secs {
            Some(config.hand_timeout_secs - elapsed)
        } else {
            None
        }
    }

    /// Run one frame of gesture handling against the ledger. `frame` is the
    /// live camera image; fingertip feedback is drawn straight onto it before
    /// compositing.
    pub fn step(
        &mut self,
        frame: &mut Frame,
        observation: Option<&HandObservation>,
        ledger: &mut Ledger,
        config: &Config,
        now: Instant,
    ) {
        let Some(obs) = observation else {
            // No hand this frame: drop the stroke anchor, and wipe the canvas
            // once the absence outlasts the timeout.
            self.prev_point = None;
            if self.time_since_hand(now) >= config.hand_timeout() && !ledger.is_empty() {
                ledger.clear();
                info!(
                    "canvas cleared after {:.1}s with no hand detected",
                    self.time_since_hand(now).as_secs_f32()
                );
            }
            return;
        };

        self.last_hand_seen = now;
        match gesture::classify(Some(&obs.fingers_up)) {
            Gesture::Select => {
                self.prev_point = None;
                if let Some(tip) = obs.index_tip() {
                    self.draw_select_feedback(frame, tip, obs.middle_tip());
                    if let Some(action) = select::resolve(tip, config) {
                        self.apply_selection(action, config, now);
                    }
                }
            }
            Gesture::Draw => {
                if let Some(tip) = obs.index_tip() {
                    self.draw_pointer_feedback(frame, tip);
                    self.advance_stroke(tip, ledger, config, now);
                }
            }
            Gesture::Idle | Gesture::NoHand => {
                self.prev_point = None;
            }
        }
    }

    /// Extend the active stroke to the new fingertip position. An oversized
    /// jump or a pair of points entirely inside the header band commits
    /// nothing; the pointer still advances so drawing re-anchors at the new
    /// position instead of surfacing an error.
    fn advance_stroke(&mut self, tip: Point, ledger: &mut Ledger, config: &Config, now: Instant) {
        let Some(prev) = self.prev_point else {
            // First tracked position: anchor only, no segment from origin.
            self.prev_point = Some(tip);
            return;
        };
        if tip.manhattan(prev) < config.jump_threshold
            && (tip.y > config.header_height || prev.y > config.header_height)
        {
            if self.eraser_mode {
                let eraser_thickness = self.thickness * config.eraser_multiplier;
                ledger.erase(prev, tip, eraser_thickness, now);
            } else {
                ledger.commit(prev, tip, self.color, self.thickness, now);
            }
        }
        self.prev_point = Some(tip);
    }

    fn apply_selection(&mut self, action: SelectAction, config: &Config, now: Instant) {
        match action {
            SelectAction::SelectColor { key, color } => {
                self.color = color;
                self.eraser_mode = key == "eraser";
                info!("changed to {key}, color: {color:?}");
                self.overlay_key = key;
            }
            SelectAction::AdjustBrush(step) => {
                // Rate-limited so a held finger does not repeat every frame.
                let ready = self
                    .last_brush_adjust
                    .is_none_or(|t| now.saturating_duration_since(t) >= config.brush_debounce());
                if ready {
                    self.set_thickness(self.thickness as i32 + step, config);
                    self.last_brush_adjust = Some(now);
                    info!("brush thickness set to {}", self.thickness);
                }
            }
        }
    }

    fn set_thickness(&mut self, value: i32, config: &Config) {
        self.thickness = value.clamp(config.brush_min as i32, config.brush_max as i32) as u32;
    }

    /// Filled box between the index and middle fingertips while selecting.
    fn draw_select_feedback(&self, frame: &mut Frame, index: Point, middle: Option<Point>) {
        let far = middle.unwrap_or(index);
        raster::fill_rect(
            frame,
            Point::new(index.x, index.y - 15),
            Point::new(far.x, far.y + 25),
            self.color.packed(),
        );
    }

    /// Pointer dot while drawing: a white disc with a black ring in eraser
    /// mode, a filled dot in the active color otherwise.
    fn draw_pointer_feedback(&self, frame: &mut Frame, tip: Point) {
        if self.eraser_mode {
            raster::draw_ring(frame, tip.x, tip.y, 27, 2, Bgr::BLACK.packed());
            raster::fill_disc(frame, tip.x, tip.y, 25, Bgr::WHITE.packed());
        } else {
            raster::fill_disc(frame, tip.x, tip.y, 15, self.color.packed());
        }
    }

    /// Apply one discrete keyboard command. `Quit` is handled by the caller;
    /// it reaches here as a no-op.
    pub fn handle_key(
        &mut self,
        cmd: KeyCommand,
        ledger: &mut Ledger,
        overlays: &OverlaySet,
        config: &Config,
    ) {
        match cmd {
            KeyCommand::Quit => {}
            KeyCommand::CyclePalette => self.cycle_palette(overlays, config),
            KeyCommand::ClearCanvas => ledger.clear(),
            KeyCommand::BrushUp => {
                self.set_thickness(self.thickness as i32 + config.brush_step, config);
            }
            KeyCommand::BrushDown => {
                self.set_thickness(self.thickness as i32 - config.brush_step, config);
            }
            KeyCommand::Digit(d) => self.push_digit(d),
        }
    }

    /// Advance to the next palette entry after the one matching the current
    /// color (or from the start when the current color is custom), switching
    /// the overlay and eraser flag when that overlay is available.
    fn cycle_palette(&mut self, overlays: &OverlaySet, config: &Config) {
        let palette = config.palette();
        let current = palette.iter().position(|(_, c)| *c == self.color).unwrap_or(0);
        let (key, color) = palette[(current + 1) % palette.len()];
        self.color = color;
        if overlays.contains(key) {
            self.overlay_key = key.to_string();
            self.eraser_mode = key == "eraser";
        }
        info!("color changed to {:?}, mode: {}", self.color, self.overlay_key);
    }

    /// Accumulate one digit of the nine-digit BGR entry. On the ninth digit
    /// the three 3-digit groups become the blue, green, and red channels,
    /// each clamped to 255, and the buffer resets.
    fn push_digit(&mut self, digit: u8) {
        self.digit_buffer.push(digit.min(9));
        if self.digit_buffer.len() == 9 {
            let b = channel(&self.digit_buffer[0..3]);
            let g = channel(&self.digit_buffer[3..6]);
            let r = channel(&self.digit_buffer[6..9]);
            self.color = Bgr::new(b, g, r);
            self.eraser_mode = false;
            self.digit_buffer.clear();
            info!("color set to {:?}", self.color);
        }
    }
}

fn channel(digits: &[u8]) -> u8 {
    let value: u32 = digits.iter().fold(0, |acc, &d| acc * 10 + d as u32);
    value.min(255) as u8
}
