// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Output file writing.
//!
//! The output format follows the file extension. `.svg` stores the vector
//! composition as-is; every raster format the `image` crate can encode is
//! produced by rasterizing that composition with `resvg` at the requested
//! DPI on a white background.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::{ImageError, ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::{debug, info};

use crate::{
    figure::CollageFigure,
    error::{self, Error},
    layout::POINTS_PER_INCH,
};

/// Encoding selected from the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum OutputFormat
{
    /// Vector output, written verbatim.
    Svg,
    /// Raster output encoded by the `image` crate.
    Raster(ImageFormat,),
}

impl OutputFormat
{
    /// Picks the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the extension is missing, unknown,
    /// or names a format that cannot be encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use collage::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path(Path::new("team.SVG"))?, OutputFormat::Svg);
    /// assert!(OutputFormat::from_path(Path::new("team")).is_err());
    /// # Ok::<(), collage::Error>(())
    /// ```
    pub fn from_path(path: &Path,) -> Result<Self, Error,>
    {
        let extension = path
            .extension()
            .and_then(|value| value.to_str(),)
            .map(str::to_ascii_lowercase,)
            .ok_or_else(|| {
                Error::validation(format!("output path {} has no file extension", path.display()),)
            },)?;

        if extension == "svg" {
            return Ok(Self::Svg,);
        }

        match ImageFormat::from_extension(&extension,) {
            Some(format,) if format.writing_enabled() => Ok(Self::Raster(format,),),
            _ => Err(Error::validation(format!("unsupported output format '.{extension}'"),),),
        }
    }
}

/// Writes `figure` to `path` at `dpi` dots per inch.
///
/// # Errors
///
/// Returns [`Error::Validation`] for unsupported extensions,
/// [`Error::Render`] when rasterization or encoding fails, and
/// [`Error::Export`] when the file cannot be written.
pub fn export_collage(figure: &CollageFigure, path: &Path, dpi: u32,) -> Result<PathBuf, Error,>
{
    let format = OutputFormat::from_path(path,)?;
    let svg = figure.to_svg()?;

    match format {
        OutputFormat::Svg => {
            fs::write(path, svg.as_bytes(),).map_err(|source| error::export_error(path, source,),)?;
        }
        OutputFormat::Raster(format,) => {
            let image = rasterize(&svg, dpi,)?;
            debug!("Encoding {}x{} raster as {:?}", image.width(), image.height(), format);
            let rgb = image::DynamicImage::ImageRgba8(image,).to_rgb8();
            rgb.save_with_format(path, format,).map_err(|failure| match failure {
                ImageError::IoError(source,) => error::export_error(path, source,),
                other => Error::render(format!("failed to encode {}: {other}", path.display()),),
            },)?;
        }
    }

    info!("Collage written to {}", path.display());
    Ok(path.to_path_buf(),)
}

/// Rasterizes an SVG document measured in points at `dpi`.
///
/// The canvas is filled white before drawing, so every pixel is opaque.
///
/// # Errors
///
/// Returns [`Error::Render`] when the document cannot be parsed or the
/// scaled canvas is empty or too large to allocate.
pub fn rasterize(svg: &str, dpi: u32,) -> Result<RgbaImage, Error,>
{
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options,)
        .map_err(|e| Error::render(format!("invalid SVG composition: {e}"),),)?;

    let scale = dpi as f32 / POINTS_PER_INCH;
    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height,).ok_or_else(|| {
        Error::render(format!("cannot allocate a {width}x{height} canvas at {dpi} dpi"),)
    },)?;
    pixmap.fill(tiny_skia::Color::WHITE,);
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale,), &mut pixmap.as_mut(),);

    RgbaImage::from_raw(width, height, pixmap.take(),)
        .ok_or_else(|| Error::render("rasterized buffer does not match canvas size",),)
}
