use crate::draw::buffer::PixelBuffer;
use crate::draw::color::{Color, ColorError};
use crate::draw::debounce::Debouncer;
use crate::draw::fill::{flood_fill_at, BoundingBox};
use crate::draw::history::HistoryManager;
use crate::draw::input::{
    device_size, sanitize_device_pixel_ratio, should_append_point, to_device_pixel, PointerPoint,
};
use crate::draw::save;
use crate::draw::settings::{DrawSettings, DrawTool, MAX_PEN_WIDTH};
use crate::draw::stroke::{draw_dot, draw_segment};
use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Owns the live pixel buffer and sequences every edit into the history.
///
/// Pen strokes are committed through a debounced save so bursts of strokes
/// collapse into one entry; fills, clears and resizes are committed at once.
/// Any pending save is flushed before undo, redo, resize, tool switches,
/// export and teardown.
pub struct DrawingCanvas {
    settings: DrawSettings,
    tool: DrawTool,
    pen_color: Color,
    pen_width: u32,
    tolerance: u8,
    device_pixel_ratio: f32,
    buffer: PixelBuffer,
    history: HistoryManager,
    pending_save: Debouncer,
    active_stroke: Option<(i32, i32)>,
}

impl DrawingCanvas {
    pub fn new(
        logical_width: u32,
        logical_height: u32,
        device_pixel_ratio: f32,
        mut settings: DrawSettings,
    ) -> Self {
        settings.sanitize();
        let dpr = sanitize_device_pixel_ratio(device_pixel_ratio);
        let (width, height) = device_size(logical_width, logical_height, dpr);
        let mut canvas = Self {
            tool: settings.last_tool,
            pen_color: settings.pen_color,
            pen_width: settings.pen_width,
            tolerance: settings.fill_tolerance,
            device_pixel_ratio: dpr,
            buffer: PixelBuffer::new(width, height, settings.background_color),
            history: HistoryManager::new(settings.history_config()),
            pending_save: Debouncer::new(settings.save_debounce()),
            active_stroke: None,
            settings,
        };
        canvas.save_now();
        tracing::debug!(width, height, dpr, "drawing canvas created");
        canvas
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    pub fn tool(&self) -> DrawTool {
        self.tool
    }

    pub fn pen_color(&self) -> Color {
        self.pen_color
    }

    pub fn pen_width(&self) -> u32 {
        self.pen_width
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_pending()
    }

    pub fn is_stroking(&self) -> bool {
        self.active_stroke.is_some()
    }

    pub fn set_tool(&mut self, tool: DrawTool) {
        self.settle();
        self.tool = tool;
        self.settings.last_tool = tool;
    }

    /// Parses and applies a pen/fill color. The current color is kept on error.
    pub fn set_color(&mut self, color: &str) -> Result<Color, ColorError> {
        let parsed = Color::parse(color)?;
        self.pen_color = parsed;
        self.settings.pen_color = parsed;
        Ok(parsed)
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.pen_width = width.clamp(1, MAX_PEN_WIDTH);
        self.settings.pen_width = self.pen_width;
    }

    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.tolerance = tolerance;
        self.settings.fill_tolerance = tolerance;
    }

    /// Changes the quiet period before a finished stroke is saved.
    pub fn set_save_debounce_ms(&mut self, millis: u64) {
        self.settings.save_debounce_ms = millis;
        self.settings.sanitize();
        self.pending_save.set_delay(self.settings.save_debounce());
    }

    /// Starts a pen stroke or runs a fill at the pointer. Returns the region of
    /// the buffer that changed.
    pub fn pointer_down(&mut self, point: PointerPoint) -> Option<BoundingBox> {
        let (x, y) = to_device_pixel(point, self.device_pixel_ratio);
        match self.tool {
            DrawTool::Pen => {
                self.active_stroke = Some((x, y));
                draw_dot(&mut self.buffer, (x, y), self.pen_color, self.pen_width)
            }
            DrawTool::Fill => {
                self.flush_pending_save();
                let result = flood_fill_at(&mut self.buffer, x, y, self.pen_color, self.tolerance)?;
                self.save_now();
                Some(result.bounding_box)
            }
        }
    }

    pub fn pointer_move(&mut self, point: PointerPoint) -> Option<BoundingBox> {
        let last = self.active_stroke?;
        let next = to_device_pixel(point, self.device_pixel_ratio);
        if !should_append_point(Some(last), next) {
            return None;
        }
        self.active_stroke = Some(next);
        draw_segment(&mut self.buffer, last, next, self.pen_color, self.pen_width)
    }

    /// Ends the stroke and schedules its history entry after the quiet period.
    pub fn pointer_up(&mut self, point: PointerPoint, now: Instant) -> Option<BoundingBox> {
        let last = self.active_stroke.take()?;
        let end = to_device_pixel(point, self.device_pixel_ratio);
        let dirty = if end != last {
            draw_segment(&mut self.buffer, last, end, self.pen_color, self.pen_width)
        } else {
            None
        };
        self.pending_save.arm(now);
        dirty
    }

    /// Drives the debounced save. Returns true when a history entry was written.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.pending_save.poll(now) {
            self.save_now();
            return true;
        }
        false
    }

    /// Commits a pending debounced save immediately.
    pub fn flush_pending_save(&mut self) -> bool {
        if self.pending_save.flush() {
            self.save_now();
            return true;
        }
        false
    }

    pub fn undo(&mut self) -> bool {
        self.settle();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.buffer.copy_from(snapshot);
        tracing::debug!(index = ?self.history.current_index(), "undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        self.settle();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.buffer.copy_from(snapshot);
        tracing::debug!(index = ?self.history.current_index(), "redo");
        true
    }

    pub fn clear(&mut self) {
        self.settle();
        self.buffer.fill(self.settings.background_color);
        self.save_now();
        tracing::debug!("canvas cleared");
    }

    /// Resizes the backing buffer, keeping the drawing anchored top-left.
    /// Returns false when the device size is unchanged.
    pub fn resize(&mut self, logical_width: u32, logical_height: u32, device_pixel_ratio: f32) -> bool {
        self.settle();
        self.device_pixel_ratio = sanitize_device_pixel_ratio(device_pixel_ratio);
        let (width, height) = device_size(logical_width, logical_height, self.device_pixel_ratio);
        if width == self.buffer.width() && height == self.buffer.height() {
            return false;
        }
        self.buffer = self
            .buffer
            .resized(width, height, self.settings.background_color);
        self.save_now();
        tracing::debug!(width, height, "canvas resized");
        true
    }

    pub fn export_png(&mut self, output_dir: &Path, now: chrono::DateTime<Local>) -> Result<PathBuf> {
        self.settle();
        save::export_png(&self.buffer, output_dir, now)
    }

    pub fn export_png_to_default_folder(&mut self) -> Result<PathBuf> {
        let folder = save::resolve_export_folder(self.settings.export_folder.as_deref())?;
        self.export_png(&folder, Local::now())
    }

    /// Idle-time memory reclamation. Returns the number of evicted states.
    pub fn reclaim_memory(&mut self, min_to_keep: usize) -> usize {
        self.settle();
        self.history.force_cleanup(min_to_keep)
    }

    pub fn teardown(&mut self) {
        self.settle();
        self.history.clear();
    }

    /// Ends any in-progress stroke and drains the pending save so the next
    /// operation sees a linear history.
    fn settle(&mut self) {
        if self.active_stroke.take().is_some() {
            self.pending_save.arm(Instant::now());
        }
        self.flush_pending_save();
    }

    fn save_now(&mut self) {
        self.pending_save.cancel();
        self.history.save_state(self.buffer.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::DrawingCanvas;
    use crate::draw::color::Color;
    use crate::draw::input::PointerPoint;
    use crate::draw::settings::{DrawSettings, DrawTool, MAX_PEN_WIDTH};
    use std::time::{Duration, Instant};

    fn canvas() -> DrawingCanvas {
        DrawingCanvas::new(16, 16, 1.0, DrawSettings::default())
    }

    fn stroke(canvas: &mut DrawingCanvas, from: (f32, f32), to: (f32, f32), now: Instant) {
        canvas.pointer_down(PointerPoint::new(from.0, from.1));
        canvas.pointer_move(PointerPoint::new(to.0, to.1));
        canvas.pointer_up(PointerPoint::new(to.0, to.1), now);
    }

    #[test]
    fn new_canvas_saves_blank_state() {
        let canvas = canvas();
        assert_eq!(canvas.history().len(), 1);
        assert_eq!(canvas.history().current_index(), Some(0));
        assert!(!canvas.can_undo());
        assert_eq!(canvas.buffer().pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn buffer_uses_device_pixel_ratio() {
        let canvas = DrawingCanvas::new(10, 5, 2.0, DrawSettings::default());
        assert_eq!((canvas.buffer().width(), canvas.buffer().height()), (20, 10));
    }

    #[test]
    fn stroke_is_saved_after_debounce() {
        let mut canvas = canvas();
        let start = Instant::now();
        stroke(&mut canvas, (2.0, 2.0), (10.0, 2.0), start);

        assert!(canvas.has_pending_save());
        assert!(!canvas.tick(start + Duration::from_millis(100)));
        assert!(canvas.tick(start + Duration::from_millis(500)));
        assert_eq!(canvas.history().len(), 2);
        assert!(canvas.can_undo());
    }

    #[test]
    fn rapid_strokes_coalesce_into_one_entry() {
        let mut canvas = canvas();
        let start = Instant::now();
        stroke(&mut canvas, (1.0, 1.0), (5.0, 1.0), start);
        stroke(&mut canvas, (1.0, 5.0), (5.0, 5.0), start + Duration::from_millis(200));
        stroke(&mut canvas, (1.0, 9.0), (5.0, 9.0), start + Duration::from_millis(400));

        assert!(!canvas.tick(start + Duration::from_millis(800)));
        assert!(canvas.tick(start + Duration::from_millis(900)));
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn undo_flushes_pending_stroke_first() {
        let mut canvas = canvas();
        stroke(&mut canvas, (2.0, 2.0), (10.0, 2.0), Instant::now());
        assert_eq!(canvas.buffer().pixel(5, 2), Some(Color::BLACK));

        assert!(canvas.undo());
        assert!(!canvas.has_pending_save());
        assert_eq!(canvas.buffer().pixel(5, 2), Some(Color::WHITE));
        assert!(canvas.can_redo());

        assert!(canvas.redo());
        assert_eq!(canvas.buffer().pixel(5, 2), Some(Color::BLACK));
    }

    #[test]
    fn fill_commits_immediately() {
        let mut canvas = canvas();
        canvas.set_tool(DrawTool::Fill);
        canvas.set_color("#ff0000").expect("valid color");

        let dirty = canvas.pointer_down(PointerPoint::new(3.0, 3.0)).expect("fill applied");

        assert_eq!((dirty.min_x, dirty.max_x), (0, 15));
        assert_eq!(canvas.history().len(), 2);
        assert!(!canvas.has_pending_save());
        assert_eq!(canvas.buffer().pixel(15, 15), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn fill_with_same_color_is_skipped() {
        let mut canvas = canvas();
        canvas.set_tool(DrawTool::Fill);
        canvas.set_color("white").expect("valid color");

        assert_eq!(canvas.pointer_down(PointerPoint::new(3.0, 3.0)), None);
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn invalid_color_keeps_previous() {
        let mut canvas = canvas();
        assert!(canvas.set_color("not-a-color").is_err());
        assert_eq!(canvas.pen_color(), Color::BLACK);
    }

    #[test]
    fn tool_switch_mid_stroke_commits_stroke() {
        let mut canvas = canvas();
        canvas.pointer_down(PointerPoint::new(4.0, 4.0));
        canvas.pointer_move(PointerPoint::new(8.0, 4.0));
        assert!(canvas.is_stroking());

        canvas.set_tool(DrawTool::Fill);

        assert!(!canvas.is_stroking());
        assert!(!canvas.has_pending_save());
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn clear_and_resize_save_immediately() {
        let mut canvas = canvas();
        stroke(&mut canvas, (2.0, 2.0), (10.0, 2.0), Instant::now());
        canvas.clear();
        assert_eq!(canvas.history().len(), 3);
        assert_eq!(canvas.buffer().pixel(5, 2), Some(Color::WHITE));

        assert!(canvas.resize(20, 16, 1.0));
        assert_eq!(canvas.buffer().width(), 20);
        assert_eq!(canvas.history().len(), 4);
        assert!(!canvas.resize(20, 16, 1.0));
    }

    #[test]
    fn stroke_dragged_far_off_canvas_is_clipped() {
        let mut canvas = canvas();
        canvas.pointer_down(PointerPoint::new(8.0, 8.0));

        let dirty = canvas
            .pointer_move(PointerPoint::new(3.0e9, 8.0))
            .expect("stroke touches the canvas");
        assert_eq!((dirty.min_x, dirty.max_x), (7, 15));
        assert_eq!(canvas.buffer().pixel(15, 8), Some(Color::BLACK));

        assert_eq!(
            canvas.pointer_up(PointerPoint::new(-3.0e9, -3.0e9), Instant::now()),
            None
        );
        assert!(canvas.has_pending_save());
    }

    #[test]
    fn shorter_debounce_saves_sooner() {
        let mut canvas = canvas();
        canvas.set_save_debounce_ms(50);
        assert_eq!(canvas.settings().save_debounce_ms, 50);

        let start = Instant::now();
        stroke(&mut canvas, (2.0, 2.0), (10.0, 2.0), start);
        assert!(canvas.tick(start + Duration::from_millis(50)));
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn pen_width_is_capped() {
        let mut canvas = canvas();
        canvas.set_pen_width(u32::MAX);
        assert_eq!(canvas.pen_width(), MAX_PEN_WIDTH);
    }

    #[test]
    fn teardown_clears_history() {
        let mut canvas = canvas();
        stroke(&mut canvas, (2.0, 2.0), (10.0, 2.0), Instant::now());
        canvas.teardown();
        assert!(canvas.history().is_empty());
        assert!(!canvas.can_undo());
    }
}
