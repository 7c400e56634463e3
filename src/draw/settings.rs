use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::draw::color::Color;
use crate::draw::history::HistoryConfig;

pub const MAX_PEN_WIDTH: u32 = 256;
const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrawTool {
    Pen,
    Fill,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawSettings {
    #[serde(default = "default_history_max_states")]
    pub history_max_states: usize,
    #[serde(default = "default_history_min_states")]
    pub history_min_states: usize,
    #[serde(default = "default_history_max_memory_mb")]
    pub history_max_memory_mb: usize,
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
    #[serde(default = "default_last_tool")]
    pub last_tool: DrawTool,
    #[serde(default = "default_pen_color")]
    pub pen_color: Color,
    #[serde(default = "default_pen_width")]
    pub pen_width: u32,
    #[serde(default)]
    pub fill_tolerance: u8,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default)]
    pub export_folder: Option<String>,
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_history_max_states() -> usize {
    crate::draw::history::DEFAULT_MAX_STATES
}

fn default_history_min_states() -> usize {
    crate::draw::history::DEFAULT_MIN_STATES
}

fn default_history_max_memory_mb() -> usize {
    crate::draw::history::DEFAULT_MAX_MEMORY_BYTES / (1024 * 1024)
}

fn default_save_debounce_ms() -> u64 {
    500
}

fn default_last_tool() -> DrawTool {
    DrawTool::Pen
}

fn default_pen_color() -> Color {
    Color::BLACK
}

fn default_pen_width() -> u32 {
    4
}

fn default_background_color() -> Color {
    Color::WHITE
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            history_max_states: default_history_max_states(),
            history_min_states: default_history_min_states(),
            history_max_memory_mb: default_history_max_memory_mb(),
            save_debounce_ms: default_save_debounce_ms(),
            last_tool: default_last_tool(),
            pen_color: default_pen_color(),
            pen_width: default_pen_width(),
            fill_tolerance: 0,
            background_color: default_background_color(),
            export_folder: None,
            debug_logging: false,
        }
    }
}

impl DrawSettings {
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            max_states: self.history_max_states,
            min_states: self.history_min_states,
            max_memory_bytes: self.history_max_memory_mb.saturating_mul(1024 * 1024),
        }
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    /// Clamps values a hand-edited settings file may get wrong. Returns whether
    /// anything changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();

        self.history_max_states = self.history_max_states.max(2);
        self.history_min_states = self.history_min_states.clamp(2, self.history_max_states);
        self.history_max_memory_mb = self.history_max_memory_mb.max(1);
        self.save_debounce_ms = self.save_debounce_ms.min(MAX_DEBOUNCE_MS);
        self.pen_width = self.pen_width.clamp(1, MAX_PEN_WIDTH);
        if self
            .export_folder
            .as_deref()
            .is_some_and(|folder| folder.trim().is_empty())
        {
            self.export_folder = None;
        }

        *self != before
    }
}
