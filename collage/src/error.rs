#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the collage crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint, so the lint is disabled
//! for this module.

use std::path::{Path, PathBuf};

/// Unified error type returned by the fetchers, the renderer and the CLI.
///
/// Network failures keep the requested URL so diagnostics point at the exact
/// resource. Credentials are never part of any variant.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the configuration violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// The remote answered with a non-success status code.
    #[error("GET {url} returned HTTP {status}: {body}")]
    HttpStatus {
        /// Requested URL or API route.
        url:    String,
        /// Status code reported by the server.
        status: u16,
        /// Response body kept for diagnostics.
        body:   String
    },
    /// The request never produced a response.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL or API route.
        url:     String,
        /// Description of the transport failure.
        message: String
    },
    /// A JSON payload did not match the expected record shape.
    #[error("unexpected payload from {url}: {message}")]
    Payload {
        /// Requested URL or API route.
        url:     String,
        /// Decoder message.
        message: String
    },
    /// An avatar could not be decoded into pixel data.
    #[error("failed to decode avatar of '{handle}': {message}")]
    Decode {
        /// Handle whose avatar failed to decode.
        handle:  String,
        /// Decoder message.
        message: String
    },
    /// The composed figure could not be rasterized or encoded.
    #[error("failed to render collage: {message}")]
    Render {
        /// Human readable message describing the rendering failure.
        message: String
    },
    /// Wraps I/O errors that occur while writing the output image.
    #[error("failed to write collage to {path:?}: {source}")]
    Export {
        /// Location of the output image.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while printing the roster.
    #[error("failed to write to standard output: {source}")]
    Output {
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a rendering error from the provided displayable value.
    pub fn render<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Render {
            message: message.into()
        }
    }

    /// Constructs a transport error for `url`.
    pub fn transport<U, M>(url: U, message: M) -> Self
    where
        U: Into<String>,
        M: Into<String>
    {
        Self::Transport {
            url:     url.into(),
            message: message.into()
        }
    }

    /// Returns the HTTP status carried by [`Error::HttpStatus`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus {
                status, ..
            } => Some(*status),
            _ => None
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|url| url.to_string())
            .unwrap_or_else(|| "<unknown>".to_owned());
        Self::Transport {
            url,
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Export`] variant capturing the failing path and source.
pub fn export_error(path: &Path, source: std::io::Error) -> Error {
    Error::Export {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Output`] variant for a failed write to stdout.
pub fn output_error(source: std::io::Error) -> Error {
    Error::Output {
        source
    }
}
