// The stroke ledger: every committed line segment on the canvas, with
// age-based expiry, subtractive bounding-box erasure, and per-frame
// rasterization into a drawing layer.

use std::time::{Duration, Instant};

use crate::raster;
use crate::types::{Bgr, Frame, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// A committed stroke; rendered until it expires or is erased.
    Drawn,
    /// A transient record of eraser motion. Never rendered, never retained
    /// past the rasterize pass of the cycle that recorded it.
    EraserTrace,
}

/// A single straight stroke unit.
#[derive(Clone, Debug)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub color: Bgr,
    pub thickness: u32,
    pub stamp: Instant,
    pub kind: SegmentKind,
}

impl Segment {
    fn expired(&self, now: Instant, lifetime: Duration) -> bool {
        now.saturating_duration_since(self.stamp) > lifetime
    }
}

/// Expand both segments' axis-aligned bounding boxes by `margin` and test for
/// overlap. Deliberately box-only, not true segment distance: nearby strokes
/// may be swept up with the eraser, which is accepted behavior.
fn boxes_collide(a: &Segment, b: &Segment, margin: i32) -> bool {
    let a_min_x = a.start.x.min(a.end.x) - margin;
    let a_max_x = a.start.x.max(a.end.x) + margin;
    let a_min_y = a.start.y.min(a.end.y) - margin;
    let a_max_y = a.start.y.max(a.end.y) + margin;

    let b_min_x = b.start.x.min(b.end.x) - margin;
    let b_max_x = b.start.x.max(b.end.x) + margin;
    let b_min_y = b.start.y.min(b.end.y) - margin;
    let b_max_y = b.start.y.max(b.end.y) + margin;

    !(b_max_x < a_min_x || b_min_x > a_max_x || b_max_y < a_min_y || b_min_y > a_max_y)
}

/// The retained segment sequence. Insertion order is kept stable within a
/// frame so eraser collision results are deterministic.
pub struct Ledger {
    segments: Vec<Segment>,
    lifetime: Duration,
}

impl Ledger {
    pub fn new(lifetime: Duration) -> Self {
        Self { segments: Vec::new(), lifetime }
    }

    /// Append a drawn segment stamped `now`.
    ///
    /// Contract with the caller: the jump-rejection threshold and the
    /// header-boundary rule are enforced by the session loop before calling.
    /// A violating pair of points must be treated there as "no draw this
    /// frame", never passed in.
    pub fn commit(&mut self, start: Point, end: Point, color: Bgr, thickness: u32, now: Instant) {
        self.segments.push(Segment {
            start,
            end,
            color,
            thickness,
            stamp: now,
            kind: SegmentKind::Drawn,
        });
    }

    /// Subtract every drawn segment whose expanded bounding box collides with
    /// the eraser motion, then record the motion as a transient eraser trace
    /// so the next `rasterize` runs its second suppression pass over whatever
    /// was committed after this call within the same cycle.
    pub fn erase(&mut self, start: Point, end: Point, eraser_thickness: u32, now: Instant) {
        let trace = Segment {
            start,
            end,
            color: Bgr::BLACK,
            thickness: eraser_thickness,
            stamp: now,
            kind: SegmentKind::EraserTrace,
        };
        self.segments.retain(|seg| {
            if seg.kind == SegmentKind::EraserTrace {
                // Erasers do not erase erasers.
                return true;
            }
            let margin = (eraser_thickness + seg.thickness) as i32;
            !boxes_collide(&trace, seg, margin)
        });
        self.segments.push(trace);
    }

    /// Drop expired segments, suppress drawn segments touching any eraser
    /// trace recorded this cycle, and render the survivors as thick lines
    /// into a fresh black layer.
    ///
    /// The filtered sequence replaces the retained set: a segment that ages
    /// out or erases out never comes back, and no eraser trace survives this
    /// pass. Segments that lie entirely within the header band are retained
    /// but not rendered.
    pub fn rasterize(
        &mut self,
        now: Instant,
        canvas_width: usize,
        canvas_height: usize,
        header_height: i32,
    ) -> Frame {
        let mut layer = Frame::blank(canvas_width, canvas_height);

        // First pass: the eraser traces still alive this cycle.
        let traces: Vec<Segment> = self
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::EraserTrace && !s.expired(now, self.lifetime))
            .cloned()
            .collect();

        // Second pass: expire, suppress, draw, retain.
        let lifetime = self.lifetime;
        let mut retained = Vec::with_capacity(self.segments.len());
        for seg in self.segments.drain(..) {
            if seg.kind == SegmentKind::EraserTrace {
                continue;
            }
            if seg.expired(now, lifetime) {
                continue;
            }
            let suppressed = traces.iter().any(|trace| {
                let margin = (trace.thickness + seg.thickness) as i32;
                boxes_collide(trace, &seg, margin)
            });
            if suppressed {
                continue;
            }
            if seg.start.y > header_height || seg.end.y > header_height {
                raster::draw_segment(&mut layer, seg.start, seg.end, seg.color.packed(), seg.thickness);
            }
            retained.push(seg);
        }
        self.segments = retained;
        layer
    }

    /// Hard wipe (keyboard clear, hand-absence timeout).
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of retained drawn segments.
    pub fn drawn_count(&self) -> usize {
        self.segments.iter().filter(|s| s.kind == SegmentKind::Drawn).count()
    }

    /// The retained sequence, in insertion order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RED_COLOR;

    const W: usize = 1920;
    const H: usize = 1080;
    const HEADER: i32 = 125;

    fn ledger() -> Ledger {
        Ledger::new(Duration::from_secs(30))
    }

    #[test]
    fn commit_grows_by_exactly_one() {
        let mut led = ledger();
        let t0 = Instant::now();
        for i in 0..5 {
            led.commit(
                Point::new(100 + i, 300),
                Point::new(110 + i, 310),
                RED_COLOR,
                5,
                t0,
            );
            assert_eq!(led.drawn_count(), (i + 1) as usize);
        }
    }

    #[test]
    fn expiry_boundary() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.commit(Point::new(100, 200), Point::new(150, 220), RED_COLOR, 5, t0);

        // Present right at the lifetime edge.
        led.rasterize(t0 + Duration::from_secs(30), W, H, HEADER);
        assert_eq!(led.drawn_count(), 1);

        // Gone just past it, and the surviving set is empty.
        led.rasterize(t0 + Duration::from_secs(31), W, H, HEADER);
        assert_eq!(led.drawn_count(), 0);
        assert!(led.is_empty());
    }

    #[test]
    fn expired_segments_never_resurrect() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.commit(Point::new(100, 200), Point::new(150, 220), RED_COLOR, 5, t0);
        led.rasterize(t0 + Duration::from_secs(31), W, H, HEADER);
        assert!(led.is_empty());
        // Rasterizing at an earlier instant afterwards must not bring it back.
        let layer = led.rasterize(t0 + Duration::from_secs(5), W, H, HEADER);
        assert!(led.is_empty());
        assert!(layer.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn disjoint_erase_leaves_ledger_unchanged() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.commit(Point::new(100, 300), Point::new(150, 300), RED_COLOR, 5, t0);
        // Eraser far away: expanded boxes (margin 15) cannot reach x=100..150.
        led.erase(Point::new(1000, 900), Point::new(1010, 900), 10, t0);
        assert_eq!(led.drawn_count(), 1);
    }

    #[test]
    fn overlapping_erase_removes_exactly_the_target() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.commit(Point::new(500, 500), Point::new(520, 500), RED_COLOR, 5, t0);
        led.commit(Point::new(1500, 900), Point::new(1520, 900), RED_COLOR, 5, t0);
        led.erase(
            Point::new(505, 500),
            Point::new(515, 500),
            10,
            t0 + Duration::from_secs(1),
        );
        assert_eq!(led.drawn_count(), 1);
        assert_eq!(led.segments()[0].start, Point::new(1500, 900));
    }

    #[test]
    fn erase_scenario_empties_the_ledger() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.commit(Point::new(500, 500), Point::new(520, 500), RED_COLOR, 5, t0);
        led.erase(
            Point::new(505, 500),
            Point::new(515, 500),
            10,
            t0 + Duration::from_secs(1),
        );
        assert_eq!(led.drawn_count(), 0);
    }

    #[test]
    fn no_eraser_trace_survives_rasterize() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.erase(Point::new(400, 400), Point::new(420, 400), 10, t0);
        assert_eq!(led.segments().len(), 1); // the transient trace
        led.rasterize(t0, W, H, HEADER);
        assert!(led.is_empty());
    }

    #[test]
    fn erasers_do_not_erase_erasers() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.erase(Point::new(400, 400), Point::new(420, 400), 10, t0);
        led.erase(Point::new(405, 400), Point::new(415, 400), 10, t0);
        // Both traces still pending for the rasterize pass.
        assert_eq!(led.segments().len(), 2);
        assert!(led.segments().iter().all(|s| s.kind == SegmentKind::EraserTrace));
    }

    #[test]
    fn trace_suppresses_segment_committed_after_the_erase() {
        // The second filter: a stroke committed after the erase call but
        // before rasterize, touching the eraser path, is suppressed.
        let mut led = ledger();
        let t0 = Instant::now();
        led.erase(Point::new(500, 500), Point::new(520, 500), 10, t0);
        led.commit(Point::new(505, 505), Point::new(515, 505), RED_COLOR, 5, t0);
        led.rasterize(t0, W, H, HEADER);
        assert_eq!(led.drawn_count(), 0);
    }

    #[test]
    fn rasterize_is_idempotent_at_fixed_now() {
        let mut led = ledger();
        let t0 = Instant::now();
        led.commit(Point::new(200, 300), Point::new(260, 340), RED_COLOR, 5, t0);
        led.commit(Point::new(800, 700), Point::new(840, 710), crate::config::GREEN_COLOR, 9, t0);
        let now = t0 + Duration::from_secs(2);

        let first = led.rasterize(now, W, H, HEADER);
        let survivors_first: Vec<Point> = led.segments().iter().map(|s| s.start).collect();
        let second = led.rasterize(now, W, H, HEADER);
        let survivors_second: Vec<Point> = led.segments().iter().map(|s| s.start).collect();

        assert_eq!(first, second);
        assert_eq!(survivors_first, survivors_second);
    }

    #[test]
    fn scenario_lifetime_30() {
        // Commit A at t=0; at t=5 it renders; at t=31 it is gone.
        let mut led = ledger();
        let t0 = Instant::now();
        led.commit(Point::new(100, 200), Point::new(150, 220), RED_COLOR, 5, t0);

        let layer = led.rasterize(t0 + Duration::from_secs(5), W, H, HEADER);
        assert!(layer.pixels.iter().any(|&p| p == RED_COLOR.packed()));
        assert_eq!(led.drawn_count(), 1);

        let layer = led.rasterize(t0 + Duration::from_secs(31), W, H, HEADER);
        assert!(layer.pixels.iter().all(|&p| p == 0));
        assert!(led.segments().is_empty());
    }

    #[test]
    fn header_band_segments_are_retained_but_not_rendered() {
        let mut led = ledger();
        let t0 = Instant::now();
        // Both endpoints within the header strip.
        led.commit(Point::new(100, 50), Point::new(150, 60), RED_COLOR, 5, t0);
        let layer = led.rasterize(t0, W, H, HEADER);
        assert!(layer.pixels.iter().all(|&p| p == 0));
        assert_eq!(led.drawn_count(), 1);
    }
}
