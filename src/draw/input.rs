/// Minimum squared distance, in device pixels, between two recorded pen samples.
const MIN_POINT_DIST_SQ: i64 = 4;

/// Pointer position in logical (CSS-like) pixels relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPoint {
    pub x: f32,
    pub y: f32,
}

impl PointerPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub fn sanitize_device_pixel_ratio(dpr: f32) -> f32 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}

/// Maps a logical pointer position to the device pixel underneath it.
pub fn to_device_pixel(point: PointerPoint, device_pixel_ratio: f32) -> (i32, i32) {
    let dpr = sanitize_device_pixel_ratio(device_pixel_ratio);
    (
        (point.x * dpr).floor() as i32,
        (point.y * dpr).floor() as i32,
    )
}

/// Backing-store size for a canvas of the given logical size.
pub fn device_size(logical_width: u32, logical_height: u32, device_pixel_ratio: f32) -> (u32, u32) {
    let dpr = sanitize_device_pixel_ratio(device_pixel_ratio);
    let scale = |v: u32| ((v as f32 * dpr).round() as u32).max(1);
    (scale(logical_width), scale(logical_height))
}

pub fn should_append_point(last: Option<(i32, i32)>, point: (i32, i32)) -> bool {
    let Some((last_x, last_y)) = last else {
        return true;
    };

    let dx = point.0 as i64 - last_x as i64;
    let dy = point.1 as i64 - last_y as i64;
    dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)) >= MIN_POINT_DIST_SQ
}
