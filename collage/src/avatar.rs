// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Avatar downloads.
//!
//! GitHub serves every account's avatar at `https://github.com/{handle}.png`.
//! Images are decoded eagerly so a broken avatar fails the run before any
//! output is written.

use image::DynamicImage;
use reqwest::Client;
use tracing::debug;

use crate::{error::Error, http};

/// Decoded avatar of one handle.
#[derive(Debug, Clone,)]
pub struct Avatar
{
    /// Handle the avatar belongs to.
    pub handle: String,
    /// Decoded pixel data.
    pub image:  DynamicImage,
}

impl Avatar
{
    /// Decodes `bytes` as the avatar of `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the bytes are not a supported image.
    pub fn decode(handle: &str, bytes: &[u8],) -> Result<Self, Error,>
    {
        let image = image::load_from_memory(bytes,).map_err(|e| Error::Decode {
            handle: handle.to_owned(), message: e.to_string(),
        },)?;

        Ok(Self {
            handle: handle.to_owned(), image,
        },)
    }
}

/// Downloads and decodes avatars from a fixed host.
#[derive(Debug, Clone,)]
pub struct AvatarSource
{
    client: Client,
    base:   String,
}

impl AvatarSource
{
    /// Creates a source serving `{base}/{handle}.png`.
    pub fn new(client: Client, base: &str,) -> Self
    {
        Self {
            client, base: base.trim_end_matches('/',).to_owned(),
        }
    }

    /// Avatar URL of `handle`.
    pub fn url(&self, handle: &str,) -> String
    {
        format!("{}/{}.png", self.base, handle)
    }

    /// Downloads and decodes the avatar of `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpStatus`] or [`Error::Transport`] when the
    /// download fails and [`Error::Decode`] when the image is unreadable.
    pub async fn fetch(&self, handle: &str,) -> Result<Avatar, Error,>
    {
        let url = self.url(handle,);
        debug!("Fetching avatar of {} from {}", handle, url);
        let bytes = http::get_bytes(&self.client, &url,).await?;
        Avatar::decode(handle, &bytes,)
    }
}
