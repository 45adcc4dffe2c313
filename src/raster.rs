// Software rasterization primitives: pixels, thick lines, rectangles, discs,
// a tiny 5x7 bitmap font, and the frame-wide transforms the capture path
// needs (mirror flip, nearest resize).

use crate::types::{Frame, Point};

/// Put a pixel if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut Frame, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line_thin(fb: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fill a disc centered at (cx,cy). Scans just the bounding box.
pub fn fill_disc(fb: &mut Frame, cx: i32, cy: i32, radius: i32, color: u32) {
    if radius <= 0 {
        put_pixel(fb, cx, cy, color);
        return;
    }
    let r2 = radius * radius;
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let dx = x - cx;
            let dy = y - cy;
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, x, y, color);
            }
        }
    }
}

/// Draw a circle outline of the given stroke width.
pub fn draw_ring(fb: &mut Frame, cx: i32, cy: i32, radius: i32, width: i32, color: u32) {
    let outer = radius + width.max(1);
    let inner2 = radius * radius;
    let outer2 = outer * outer;
    for y in (cy - outer)..=(cy + outer) {
        for x in (cx - outer)..=(cx + outer) {
            let dx = x - cx;
            let dy = y - cy;
            let d2 = dx * dx + dy * dy;
            if d2 > inner2 && d2 <= outer2 {
                put_pixel(fb, x, y, color);
            }
        }
    }
}

/// Draw a straight stroke of the given pixel thickness by stamping a disc at
/// every Bresenham step. Thickness 1 degenerates to a thin line.
pub fn draw_segment(fb: &mut Frame, a: Point, b: Point, color: u32, thickness: u32) {
    if thickness <= 1 {
        draw_line_thin(fb, a.x, a.y, b.x, b.y, color);
        return;
    }
    let radius = (thickness / 2) as i32;
    let (mut x0, mut y0, x1, y1) = (a.x, a.y, b.x, b.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        fill_disc(fb, x0, y0, radius, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fill an axis-aligned rectangle given two opposite corners (any order).
pub fn fill_rect(fb: &mut Frame, a: Point, b: Point, color: u32) {
    let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
    let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
    for y in y0..=y1 {
        for x in x0..=x1 {
            put_pixel(fb, x, y, color);
        }
    }
}

/// Draw a horizontal rule of the given thickness centered on `y`, spanning
/// the full frame width.
pub fn draw_hline(fb: &mut Frame, y: i32, thickness: i32, color: u32) {
    let half = thickness / 2;
    for row in (y - half)..=(y + half) {
        for x in 0..fb.width as i32 {
            put_pixel(fb, x, row, color);
        }
    }
}

/// Mirror the frame left-to-right in place (selfie view).
pub fn flip_horizontal(fb: &mut Frame) {
    for y in 0..fb.height {
        let row = &mut fb.pixels[y * fb.width..(y + 1) * fb.width];
        row.reverse();
    }
}

/// Nearest-neighbor resize into a new frame. Returns a clone when the size
/// already matches.
pub fn resize_nearest(src: &Frame, width: usize, height: usize) -> Frame {
    if src.width == width && src.height == height {
        return src.clone();
    }
    let mut out = Frame::blank(width, height);
    for y in 0..height {
        let sy = y * src.height / height;
        for x in 0..width {
            let sx = x * src.width / width;
            out.pixels[y * width + x] = src.pixels[sy * src.width + sx];
        }
    }
    out
}

/* ---------- 5x7 bitmap font for the on-canvas affordances ---------- */

/// Return a 5x7 glyph bitmap for the character set the affordances need
/// (brush readout digits, +/- buttons, the auto-clear countdown).
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Uppercase letters for "AUTO-CLEAR IN ...S"
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),

        // Punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single glyph at (x,y), each font pixel scaled to a scale x scale
/// block, with a 1-block black shadow for contrast against the camera image.
fn draw_char_5x7(fb: &mut Frame, x: i32, y: i32, ch: char, scale: i32, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    let s = scale.max(1);
    for pass in 0..2 {
        let (ofs, col) = if pass == 0 { (s, 0u32) } else { (0, color) };
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx as i32 * s + ofs;
                    let py = y + ry as i32 * s + ofs;
                    for dy in 0..s {
                        for dx in 0..s {
                            put_pixel(fb, px + dx, py + dy, col);
                        }
                    }
                }
            }
        }
    }
}

/// Draw a text string in 5x7 glyphs, scaled up by an integer factor.
pub fn draw_text_5x7(fb: &mut Frame, mut x: i32, y: i32, text: &str, scale: i32, color: u32) {
    let advance = 6 * scale.max(1); // 5 pixels glyph width + 1 pixel spacing
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, scale, color);
        x += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bgr;

    const INK: u32 = 0x00FF_0000;

    #[test]
    fn put_pixel_clips_out_of_bounds() {
        let mut fb = Frame::blank(4, 4);
        put_pixel(&mut fb, -1, 0, INK);
        put_pixel(&mut fb, 0, -1, INK);
        put_pixel(&mut fb, 4, 0, INK);
        put_pixel(&mut fb, 0, 4, INK);
        assert!(fb.pixels.iter().all(|&p| p == 0));
        put_pixel(&mut fb, 3, 3, INK);
        assert_eq!(fb.get(3, 3), INK);
    }

    #[test]
    fn thin_segment_touches_both_endpoints() {
        let mut fb = Frame::blank(16, 16);
        draw_segment(&mut fb, Point::new(2, 2), Point::new(12, 9), INK, 1);
        assert_eq!(fb.get(2, 2), INK);
        assert_eq!(fb.get(12, 9), INK);
    }

    #[test]
    fn thick_segment_covers_its_radius() {
        let mut fb = Frame::blank(32, 32);
        draw_segment(&mut fb, Point::new(10, 16), Point::new(22, 16), INK, 6);
        // Radius 3 around the midline.
        assert_eq!(fb.get(16, 16), INK);
        assert_eq!(fb.get(16, 13), INK);
        assert_eq!(fb.get(16, 19), INK);
        assert_eq!(fb.get(16, 10), 0);
    }

    #[test]
    fn flip_mirrors_rows() {
        let mut fb = Frame::blank(3, 1);
        fb.pixels = vec![1, 2, 3];
        flip_horizontal(&mut fb);
        assert_eq!(fb.pixels, vec![3, 2, 1]);
    }

    #[test]
    fn resize_preserves_corner_colors() {
        let mut src = Frame::blank(2, 2);
        src.pixels = vec![1, 2, 3, 4];
        let out = resize_nearest(&src, 4, 4);
        assert_eq!(out.get(0, 0), 1);
        assert_eq!(out.get(3, 0), 2);
        assert_eq!(out.get(0, 3), 3);
        assert_eq!(out.get(3, 3), 4);
    }

    #[test]
    fn text_marks_ink_for_known_glyphs_only() {
        let mut fb = Frame::blank(64, 16);
        let white = Bgr::WHITE.packed();
        draw_text_5x7(&mut fb, 1, 1, "75", 1, white);
        assert!(fb.pixels.iter().any(|&p| p == white));
        let mut unknown = Frame::blank(64, 16);
        draw_text_5x7(&mut unknown, 1, 1, "@@", 1, white);
        assert!(unknown.pixels.iter().all(|&p| p == 0));
    }
}
