pub mod buffer;
pub mod canvas;
pub mod color;
pub mod debounce;
pub mod fill;
pub mod history;
pub mod input;
pub mod save;
pub mod settings;
pub mod settings_store;
pub mod stroke;

pub use buffer::PixelBuffer;
pub use canvas::DrawingCanvas;
pub use color::{colors_equal, Color, ColorError};
pub use fill::{flood_fill_at, perform_flood_fill, BoundingBox, FloodFillResult};
pub use history::{HistoryConfig, HistoryManager};
