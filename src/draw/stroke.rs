use crate::draw::buffer::PixelBuffer;
use crate::draw::color::Color;
use crate::draw::fill::BoundingBox;

/// Dirty bounds of a segment before clipping, padded by the brush radius.
pub fn segment_bounds(start: (i32, i32), end: (i32, i32), stroke_width: u32) -> BoundingBox {
    let radius = brush_radius(stroke_width);
    let mut rect = BoundingBox::from_points(start, end);
    rect.min_x = rect.min_x.saturating_sub(radius);
    rect.min_y = rect.min_y.saturating_sub(radius);
    rect.max_x = rect.max_x.saturating_add(radius);
    rect.max_y = rect.max_y.saturating_add(radius);
    rect
}

/// Stamps a round brush at every step of the Bresenham line from `start` to
/// `end`. Returns the clipped dirty rectangle, `None` when nothing landed on
/// the buffer.
///
/// Endpoints far outside the buffer are clipped to the buffer padded by the
/// brush radius first, so the walk stays proportional to the visible length.
pub fn draw_segment(
    buffer: &mut PixelBuffer,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    stroke_width: u32,
) -> Option<BoundingBox> {
    let dirty = segment_bounds(start, end, stroke_width).clamp(buffer.width(), buffer.height())?;

    let radius = i64::from(brush_radius(stroke_width));
    let min = (-radius - 1, -radius - 1);
    let max = (
        i64::from(buffer.width()) + radius,
        i64::from(buffer.height()) + radius,
    );
    let ((mut x0, mut y0), (x1, y1)) = clip_segment(start, end, min, max)?;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp_brush(buffer, (x0, y0), color, radius);
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

    Some(dirty)
}

pub fn draw_dot(
    buffer: &mut PixelBuffer,
    center: (i32, i32),
    color: Color,
    stroke_width: u32,
) -> Option<BoundingBox> {
    draw_segment(buffer, center, center, color, stroke_width)
}

fn brush_radius(stroke_width: u32) -> i32 {
    (stroke_width.max(1).saturating_sub(1) / 2).min(i32::MAX as u32) as i32
}

/// Liang-Barsky clip of `start..end` against the inclusive rectangle
/// `min..=max`. Unclipped endpoints come back unchanged.
fn clip_segment(
    start: (i32, i32),
    end: (i32, i32),
    min: (i64, i64),
    max: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (f64::from(start.0), f64::from(start.1));
    let dx = f64::from(end.0) - x0;
    let dy = f64::from(end.1) - y0;
    let (min_x, min_y) = (min.0 as f64, min.1 as f64);
    let (max_x, max_y) = (max.0 as f64, max.1 as f64);

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        (
            (x0 + t * dx).round().clamp(min_x, max_x) as i64,
            (y0 + t * dy).round().clamp(min_y, max_y) as i64,
        )
    };
    Some((at(t0), at(t1)))
}

/// Paints the disc of `radius` around `center`, visiting only rows and
/// columns that lie on the buffer.
fn stamp_brush(buffer: &mut PixelBuffer, center: (i64, i64), color: Color, radius: i64) {
    let last_x = i64::from(buffer.width()) - 1;
    let last_y = i64::from(buffer.height()) - 1;
    let radius_sq = radius * radius;
    for y in (center.1 - radius).max(0)..=(center.1 + radius).min(last_y) {
        for x in (center.0 - radius).max(0)..=(center.0 + radius).min(last_x) {
            let dx = x - center.0;
            let dy = y - center.1;
            if dx * dx + dy * dy <= radius_sq {
                buffer.set_pixel(x as i32, y as i32, color);
            }
        }
    }
}
