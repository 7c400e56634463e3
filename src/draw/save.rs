use crate::draw::buffer::PixelBuffer;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

pub const DRAW_EXPORT_SUBDIR: &str = "Draw";
pub const EXPORT_FILE_PREFIX: &str = "Draw";

/// `Draw_YYYY_MM_DD_HH_MM_SS.png`, zero padded, local time.
pub fn export_file_name(now: chrono::DateTime<Local>) -> String {
    format!("{}_{}.png", EXPORT_FILE_PREFIX, now.format("%Y_%m_%d_%H_%M_%S"))
}

pub fn exe_relative_output_folder_from_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(DRAW_EXPORT_SUBDIR))
}

/// The user's Pictures folder when the platform has one, else a folder next to
/// the executable.
pub fn default_export_folder() -> Result<PathBuf> {
    if let Some(pictures) = dirs_next::picture_dir() {
        return Ok(pictures.join(DRAW_EXPORT_SUBDIR));
    }
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    exe_relative_output_folder_from_path(&exe_path)
}

pub fn resolve_export_folder(configured: Option<&str>) -> Result<PathBuf> {
    match configured.map(str::trim).filter(|folder| !folder.is_empty()) {
        Some(folder) => Ok(PathBuf::from(folder)),
        None => default_export_folder(),
    }
}

/// Encodes `buffer` as PNG into `output_dir`, creating the folder if needed.
pub fn export_png(
    buffer: &PixelBuffer,
    output_dir: &Path,
    now: chrono::DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create export folder {}", output_dir.display()))?;

    let path = output_dir.join(export_file_name(now));
    let png = buffer.encode_png().context("encode canvas as png")?;
    fs::write(&path, png).with_context(|| format!("write png {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "exported drawing"
    );
    Ok(path)
}
