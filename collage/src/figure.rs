// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Collage composition.
//!
//! The figure is composed as an SVG document: one square cell per handle,
//! holding the avatar under a centered title. Blank cells emit nothing, so
//! trailing cells of a partial last row stay empty. The document's view box
//! is the tight, padded bounding box of the populated cells.

use std::{borrow::Cow, fmt::Write as _, io::Cursor};

use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::{
    avatar::{Avatar, AvatarSource},
    error::Error,
    layout::{GridLayout, Rect},
    roster::Roster,
};

/// Font stack used for handle titles.
const TITLE_FONT_FAMILY: &str = "'DejaVu Sans', 'Helvetica', 'Arial', sans-serif";
/// Blank space between a cell edge and its avatar, in points.
const CELL_MARGIN: f32 = 8.0;

/// Avatars laid out on a grid, ready to be rendered or exported.
#[derive(Debug, Clone,)]
pub struct CollageFigure
{
    layout:   GridLayout,
    avatars:  Vec<Avatar,>,
    fontsize: f32,
}

impl CollageFigure
{
    /// Arranges `avatars` on a grid of `ncols` columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `ncols` is zero.
    pub fn new(avatars: Vec<Avatar,>, ncols: usize, fontsize: f32,) -> Result<Self, Error,>
    {
        let layout = GridLayout::new(avatars.len(), ncols,)?;
        Ok(Self {
            layout, avatars, fontsize,
        },)
    }

    /// Grid geometry of the figure.
    pub fn layout(&self,) -> &GridLayout
    {
        &self.layout
    }

    /// Avatars in cell order.
    pub fn avatars(&self,) -> &[Avatar]
    {
        &self.avatars
    }

    /// Title size in points.
    pub fn fontsize(&self,) -> f32
    {
        self.fontsize
    }

    /// Renders the figure as an SVG document measured in points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] when an avatar cannot be re-encoded for
    /// embedding.
    pub fn to_svg(&self,) -> Result<String, Error,>
    {
        let bounds = self.layout.content_bounds();
        let mut buffer = String::with_capacity(512 + self.avatars.len() * 4096,);

        let _ = writeln!(
            buffer,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"{x} {y} {w} {h}\">",
            x = fmt_num(bounds.x,),
            y = fmt_num(bounds.y,),
            w = fmt_num(bounds.width,),
            h = fmt_num(bounds.height,),
        );
        let _ = writeln!(
            buffer,
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>",
            fmt_num(bounds.x,),
            fmt_num(bounds.y,),
            fmt_num(bounds.width,),
            fmt_num(bounds.height,),
        );

        for (index, avatar,) in self.avatars.iter().enumerate() {
            let Some(cell,) = self.layout.cell_rect(index,) else {
                break;
            };
            self.write_cell(&mut buffer, cell, avatar,)?;
        }

        buffer.push_str("</svg>\n",);
        Ok(buffer,)
    }

    fn write_cell(&self, buffer: &mut String, cell: Rect, avatar: &Avatar,) -> Result<(), Error,>
    {
        let title_band = self.fontsize * 1.6;
        let side = (cell.width - 2.0 * CELL_MARGIN)
            .min(cell.height - title_band - 2.0 * CELL_MARGIN,)
            .max(1.0,);
        let image_x = cell.x + (cell.width - side) / 2.0;
        let image_y = cell.y + CELL_MARGIN + title_band;
        let title_x = cell.x + cell.width / 2.0;
        let title_y = cell.y + CELL_MARGIN + self.fontsize * 1.2;

        let encoded = encode_png(avatar,)?;

        let _ = writeln!(
            buffer,
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"{TITLE_FONT_FAMILY}\" font-size=\"{}\" fill=\"#000000\">{}</text>",
            fmt_num(title_x,),
            fmt_num(title_y,),
            fmt_num(self.fontsize,),
            escape_xml(&avatar.handle,),
        );
        let _ = writeln!(
            buffer,
            "  <image x=\"{}\" y=\"{}\" width=\"{side}\" height=\"{side}\" preserveAspectRatio=\"xMidYMid meet\" xlink:href=\"data:image/png;base64,{encoded}\"/>",
            fmt_num(image_x,),
            fmt_num(image_y,),
            side = fmt_num(side,),
        );

        Ok((),)
    }
}

/// Downloads the avatar of every handle in `roster` and arranges them on a
/// grid of `ncols` columns.
///
/// Avatars are fetched one at a time in roster order. The first failing
/// download aborts the whole figure; there is no partial fallback. An empty
/// roster produces an empty figure.
///
/// # Errors
///
/// Propagates [`Error::HttpStatus`], [`Error::Transport`] and
/// [`Error::Decode`] from [`AvatarSource::fetch`], and [`Error::Validation`]
/// when `ncols` is zero.
pub async fn compose_collage(
    source: &AvatarSource,
    roster: &Roster,
    ncols: usize,
    fontsize: f32,
) -> Result<CollageFigure, Error,>
{
    let layout = GridLayout::new(roster.len(), ncols,)?;
    info!(
        "Composing {} avatars on a {}x{} grid",
        layout.populated(),
        layout.columns(),
        layout.rows()
    );

    let pb = ProgressBar::new(roster.len() as u64,);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {msg}",)
            .map_err(|e| Error::render(format!("invalid progress template: {e}"),),)?,
    );

    let mut avatars = Vec::with_capacity(roster.len(),);
    for handle in roster {
        pb.set_message(handle.clone(),);
        let avatar = match source.fetch(handle,).await {
            Ok(avatar,) => avatar,
            Err(error,) => {
                pb.abandon_with_message(format!("failed on {handle}"),);
                return Err(error,);
            }
        };
        debug!("Decoded {}x{} avatar for {}", avatar.image.width(), avatar.image.height(), handle);
        avatars.push(avatar,);
        pb.inc(1,);
    }
    pb.finish_and_clear();

    CollageFigure::new(avatars, ncols, fontsize,)
}

fn encode_png(avatar: &Avatar,) -> Result<String, Error,>
{
    let mut buffer = Cursor::new(Vec::new(),);
    DynamicImage::ImageRgba8(avatar.image.to_rgba8(),)
        .write_to(&mut buffer, ImageFormat::Png,)
        .map_err(|e| Error::render(format!("failed to encode avatar of '{}': {e}", avatar.handle),),)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buffer.into_inner(),),)
}

fn fmt_num(value: f32,) -> String
{
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() { format!("{}", rounded as i64) } else { format!("{rounded}") }
}

fn escape_xml(value: &str,) -> Cow<'_, str,>
{
    if value.chars().any(|character| matches!(character, '&' | '<' | '>' | '"' | '\''),) {
        let mut escaped = String::with_capacity(value.len(),);
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;",),
                '<' => escaped.push_str("&lt;",),
                '>' => escaped.push_str("&gt;",),
                '"' => escaped.push_str("&quot;",),
                '\'' => escaped.push_str("&apos;",),
                other => escaped.push(other,),
            }
        }
        Cow::Owned(escaped,)
    } else {
        Cow::Borrowed(value,)
    }
}
