//! File naming and saving for screenshots.

use super::types::CaptureError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to timestamped captures (`_MM_dd_yyyy_HH_mm_ss`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "_%m_%d_%Y_%H_%M_%S";

/// True when every specifier in `template` is one chrono understands.
pub fn is_valid_timestamp_format(template: &str) -> bool {
    !StrftimeItems::new(template).any(|item| matches!(item, Item::Error))
}

/// Derive the output path `<base>.<format lowercased>`.
pub fn output_path(file_name_base: &str, format: &str) -> PathBuf {
    expand_tilde(&format!("{}.{}", file_name_base, format.to_lowercase()))
}

/// Append a timestamp to `file_name_base`.
///
/// A trailing `.<extension>` on the base is removed first so that
/// `shot.jpg` becomes `shot_10_14_2026_09_30_00` rather than
/// `shot.jpg_10_14_2026_09_30_00`.
///
/// # Arguments
/// * `file_name_base` - Base name, optionally already carrying the extension
/// * `extension` - Extension that will be added to the final path
/// * `template` - chrono format string for the suffix
/// * `now` - Capture time
///
/// An unusable `template` is replaced by [`DEFAULT_TIMESTAMP_FORMAT`].
pub fn timestamped_base(
    file_name_base: &str,
    extension: &str,
    template: &str,
    now: DateTime<Local>,
) -> String {
    let stem = file_name_base
        .len()
        .checked_sub(extension.len() + 1)
        .filter(|split| {
            file_name_base.is_char_boundary(*split)
                && file_name_base[*split..]
                    .strip_prefix('.')
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .map_or(file_name_base, |split| &file_name_base[..split]);

    let template = if is_valid_timestamp_format(template) {
        template
    } else {
        log::warn!(
            "Invalid timestamp format '{}', using '{}'",
            template,
            DEFAULT_TIMESTAMP_FORMAT
        );
        DEFAULT_TIMESTAMP_FORMAT
    };

    let mut base = stem.to_string();
    if write!(base, "{}", now.format(template)).is_err() {
        base.truncate(stem.len());
        let _ = write!(base, "{}", now.format(DEFAULT_TIMESTAMP_FORMAT));
    }
    base
}

/// Encode `image` as `format` and write it to `path`.
///
/// The file is created (or truncated) before encoding starts, so a failed
/// encode can leave a partial file behind.
///
/// # Returns
/// Size of the written file in bytes
pub fn save_screenshot(
    image: RgbaImage,
    format: ImageFormat,
    path: &Path,
) -> Result<u64, CaptureError> {
    let write_error = |source| CaptureError::Write {
        path: path.to_path_buf(),
        source,
    };

    log::info!(
        "Saving {}x{} screenshot to: {} ({:?})",
        image.width(),
        image.height(),
        path.display(),
        format
    );

    let image = DynamicImage::ImageRgba8(image);
    let image = if has_alpha_channel(format) {
        image
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);

    image
        .write_to(&mut writer, format)
        .map_err(|err| match err {
            ImageError::IoError(source) => write_error(source),
            source => CaptureError::Encode {
                path: path.to_path_buf(),
                source,
            },
        })?;
    writer.flush().map_err(write_error)?;
    drop(writer);

    // Set permissions to user read/write only (security)
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    let written_size = fs::metadata(path).map_err(write_error)?.len();
    log::debug!("File written: {} bytes", written_size);

    Ok(written_size)
}

fn has_alpha_channel(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
