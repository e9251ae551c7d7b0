//! Writing rendered images to disk.

use std::fs;
use std::path::Path;

use crate::error::{RenderError, RenderResult};
use crate::ImageBuffer;
use log::info;

/// Encode `image` to `path`. The format follows the file extension
/// (`.png`, `.ppm`, ...). Missing parent directories are created.
pub fn save_image(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let too_large = || RenderError::ImageTooLarge {
        width: image.width(),
        height: image.height(),
    };
    let width = u32::try_from(image.width()).map_err(|_| too_large())?;
    let height = u32::try_from(image.height()).map_err(|_| too_large())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    image::save_buffer(
        path,
        image.as_bytes(),
        width,
        height,
        image::ColorType::Rgb8,
    )
    .map_err(|source| RenderError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}
