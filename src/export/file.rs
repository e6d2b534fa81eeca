//! Writing exported images to disk.

use super::types::ExportError;
use crate::util::sanitize_filename_component;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback used when a filename template cannot be formatted.
const FALLBACK_TEMPLATE: &str = "Layout_{branch}_%Y%m%d-%H%M%S";

/// Default directory for exports: `~/Pictures/Floormark`.
pub fn default_export_directory() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Floormark")
}

/// Generate a PNG filename from a template and a timestamp.
///
/// `{branch}` is replaced with the sanitized branch name; the rest of the
/// template may contain chrono format specifiers.
///
/// # Arguments
/// * `template` - Template string, e.g. `Layout_{branch}_%Y%m%d-%H%M%S`
/// * `branch` - Branch the layout belongs to
/// * `time` - Timestamp to format (normally the save time)
pub fn suggested_filename(template: &str, branch: &str, time: &DateTime<Local>) -> String {
    let branch = sanitize_filename_component(branch);
    let expanded = template.replace("{branch}", &branch);

    let mut name = String::new();
    if write!(name, "{}", time.format(&expanded)).is_err() {
        log::warn!("Invalid filename template '{template}'; using the default");
        name.clear();
        let fallback = FALLBACK_TEMPLATE.replace("{branch}", &branch);
        if write!(name, "{}", time.format(&fallback)).is_err() {
            log::error!("Fallback filename template failed to format");
            name = branch;
        }
    }
    format!("{name}.png")
}

/// Ensure the export directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Write PNG bytes into `directory` under `filename`.
///
/// # Returns
/// Path to the saved file
pub fn save_artifact(
    png: &[u8],
    directory: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(directory)?;
    let file_path = directory.join(filename);

    log::info!(
        "Saving export to: {} ({} bytes)",
        file_path.display(),
        png.len()
    );

    fs::write(&file_path, png)?;

    let written_size = fs::metadata(&file_path)?.len();
    log::debug!("File written: {} bytes", written_size);

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, 8, 30, 5).unwrap()
    }

    #[test]
    fn filename_expands_branch_and_time() {
        let name = suggested_filename("Layout_{branch}_%Y%m%d-%H%M%S", "Central World", &time());
        assert_eq!(name, "Layout_Central_World_20250602-083005.png");
    }

    #[test]
    fn branch_cannot_inject_format_specifiers() {
        let name = suggested_filename("Layout_{branch}", "100%Y", &time());
        assert_eq!(name, "Layout_100_Y.png");
    }

    #[test]
    fn invalid_template_falls_back() {
        let name = suggested_filename("bad_%Q", "b", &time());
        assert_eq!(name, "Layout_b_20250602-083005.png");

        let name = suggested_filename("%Q", "  ", &time());
        assert_eq!(name, "Layout_untitled_20250602-083005.png");
    }

    #[test]
    fn save_creates_directory_and_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("exports");
        let path = save_artifact(b"png-bytes", &target, "a.png").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"png-bytes");
        assert!(path.ends_with("a.png"));
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
        assert!(!expand_tilde("~/Pictures").to_string_lossy().starts_with('~'));
    }
}
