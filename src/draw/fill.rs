use crate::draw::buffer::{byte_len, read_pixel, write_pixel, PixelBuffer};
use crate::draw::color::{colors_equal, Color};

/// Inclusive pixel rectangle touched by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub fn point(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    pub fn from_points(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            max_x: a.0.max(b.0),
            min_y: a.1.min(b.1),
            max_y: a.1.max(b.1),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    /// Intersects with a `width × height` surface. `None` when nothing overlaps.
    pub fn clamp(self, width: u32, height: u32) -> Option<BoundingBox> {
        if width == 0 || height == 0 {
            return None;
        }
        let max_w = width as i32 - 1;
        let max_h = height as i32 - 1;
        let clamped = BoundingBox {
            min_x: self.min_x.max(0),
            max_x: self.max_x.min(max_w),
            min_y: self.min_y.max(0),
            max_y: self.max_y.min(max_h),
        };
        clamped.is_valid().then_some(clamped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodFillResult {
    pub bounding_box: BoundingBox,
    pub pixels_filled: usize,
}

impl FloodFillResult {
    pub fn changed(&self) -> bool {
        self.pixels_filled > 0
    }
}

/// Recolors the 4-connected region around `(start_x, start_y)` whose pixels match
/// `target_color` within `tolerance`, writing `fill_color` in place.
///
/// Uses an explicit LIFO stack. Neighbors are pushed unconditionally in the order
/// +x, -x, +y, -y and filtered on pop, so an out-of-range seed simply fills
/// nothing. When `fill_color` itself matches `target_color` the call returns
/// immediately: re-visited pixels would otherwise keep matching forever.
#[allow(clippy::too_many_arguments)]
pub fn perform_flood_fill(
    pixels: &mut [u8],
    start_x: i32,
    start_y: i32,
    target_color: Color,
    fill_color: Color,
    width: u32,
    height: u32,
    tolerance: u8,
) -> FloodFillResult {
    let mut bounding_box = BoundingBox::point(start_x, start_y);
    let mut pixels_filled = 0usize;

    if colors_equal(target_color, fill_color, tolerance) {
        return FloodFillResult {
            bounding_box,
            pixels_filled,
        };
    }

    if pixels.len() < byte_len(width, height) {
        tracing::warn!(
            len = pixels.len(),
            width,
            height,
            "flood fill skipped: pixel slice shorter than surface"
        );
        return FloodFillResult {
            bounding_box,
            pixels_filled,
        };
    }

    let mut stack: Vec<(i32, i32)> = vec![(start_x, start_y)];
    while let Some((x, y)) = stack.pop() {
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            continue;
        }
        let current = read_pixel(pixels, x as u32, y as u32, width);
        if !colors_equal(current, target_color, tolerance) {
            continue;
        }

        write_pixel(pixels, x as u32, y as u32, width, fill_color);
        bounding_box.include(x, y);
        pixels_filled += 1;

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    tracing::debug!(
        start_x,
        start_y,
        pixels_filled,
        ?bounding_box,
        "flood fill finished"
    );

    FloodFillResult {
        bounding_box,
        pixels_filled,
    }
}

/// Call-site wrapper: samples the seed color, skips no-op fills and runs the
/// engine on `buffer`. Returns `None` when nothing would change.
pub fn flood_fill_at(
    buffer: &mut PixelBuffer,
    x: i32,
    y: i32,
    fill_color: Color,
    tolerance: u8,
) -> Option<FloodFillResult> {
    let target_color = buffer.pixel(x, y)?;
    if colors_equal(target_color, fill_color, tolerance) {
        return None;
    }
    let (width, height) = (buffer.width(), buffer.height());
    let result = perform_flood_fill(
        buffer.as_bytes_mut(),
        x,
        y,
        target_color,
        fill_color,
        width,
        height,
        tolerance,
    );
    result.changed().then_some(result)
}
