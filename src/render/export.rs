use crate::engine::output::{OutputJob, render_output};
use crate::engine::EngineError;
use crate::render::cancellation::{CancelToken, Cancelled};
use image::{DynamicImage, RgbaImage};
use std::error::Error;
use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum ExportError {
    Cancelled(Cancelled),
    Render(EngineError),
    UnsupportedFormat(String),
    BadRaster { width: u32, height: u32 },
    Image(image::ImageError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled(c) => write!(f, "{}", c),
            Self::Render(err) => write!(f, "render failed: {}", err),
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported export format `{}`", ext)
            }
            Self::BadRaster { width, height } => {
                write!(f, "rendered raster {}x{} cannot be encoded", width, height)
            }
            Self::Image(err) => write!(f, "{}", err),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cancelled(c) => Some(c),
            Self::Render(err) => Some(err),
            Self::Image(err) => Some(err),
            _ => None,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Renders an output job and writes it to `path`.
///
/// The format follows the file extension: `png` and `tiff` keep the alpha
/// channel, `jpg`, `jpeg` and `bmp` are written as RGB. Cancellation is
/// honoured during the render phases; encoding, once started, runs to
/// completion.
pub fn run_export(
    job: &OutputJob,
    path: &Path,
    cancel: &dyn CancelToken,
) -> Result<(), ExportError> {
    let extension = extension_of(path);
    if !matches!(extension.as_str(), "png" | "tiff" | "jpg" | "jpeg" | "bmp") {
        return Err(ExportError::UnsupportedFormat(extension));
    }

    let raster = render_output(job, cancel).map_err(|err| match err {
        EngineError::Cancelled(c) => ExportError::Cancelled(c),
        other => ExportError::Render(other),
    })?;
    if cancel.is_cancelled() {
        return Err(ExportError::Cancelled(Cancelled));
    }

    let width = raster.width();
    let height = raster.height();
    let rgba = RgbaImage::from_raw(width, height, raster.into_bytes())
        .ok_or(ExportError::BadRaster { width, height })?;

    let result = match extension.as_str() {
        "png" | "tiff" => rgba.save(path),
        _ => DynamicImage::ImageRgba8(rgba).to_rgb8().save(path),
    };
    result.map_err(ExportError::Image)?;

    log::info!("exported {}x{} image to {:?}", width, height, path);

    Ok(())
}
