// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Configuration types describing a collage run.
//!
//! A run is configured from four layers applied in order: built-in defaults,
//! the `COLLAGE_IGNORE` environment variable, an optional YAML file, and
//! command-line flags. Each layer is expressed as a [`ConfigLayer`] whose
//! unset fields leave earlier values untouched. [`CollageConfig::resolve`]
//! folds the layers and validates the result.

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{self, Error},
    roster::HandleSet,
};

/// Environment variable overriding the default ignore-set.
pub const IGNORE_ENV_VAR: &str = "COLLAGE_IGNORE";

/// Organization queried when nothing else is configured.
pub const DEFAULT_ORGANIZATION: &str = "simpeg";
/// Repositories queried when nothing else is configured.
pub const DEFAULT_REPOSITORIES: &[&str] =
    &["simpeg", "discretize", "pydiso", "geoana", "aurora", "pymatsolver",];
/// Handles ignored unless [`IGNORE_ENV_VAR`] says otherwise.
pub const DEFAULT_IGNORE: &[&str] = &["quantifiedcode-bot",];
/// Credits file scanned for `@handle` citations.
pub const DEFAULT_AUTHORS_FILE: &str = "AUTHORS.rst";
/// Branch the credits file is read from.
pub const DEFAULT_BRANCH: &str = "main";
/// Number of grid columns.
pub const DEFAULT_NCOLS: u32 = 7;
/// Resolution of the exported raster.
pub const DEFAULT_DPI: u32 = 72;
/// Label size in points.
pub const DEFAULT_FONTSIZE: f32 = 18.0;
/// GitHub caps contributor pages at 100 entries.
pub const MAX_PER_PAGE: u8 = 100;

/// GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Host serving raw repository files.
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
/// Host serving `/{handle}.png` avatars.
pub const DEFAULT_AVATAR_BASE: &str = "https://github.com";

/// Organization/repository pair identifying a fetch target.
///
/// # Examples
///
/// ```
/// use collage::RepositoryRef;
///
/// let repository = RepositoryRef::new("simpeg", "discretize",);
/// assert_eq!(repository.to_string(), "simpeg/discretize");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,)]
pub struct RepositoryRef
{
    /// Account owning the repository.
    pub organization: String,
    /// Repository name.
    pub repository:   String,
}

impl RepositoryRef
{
    /// Creates a reference from its two components.
    pub fn new<O, R,>(organization: O, repository: R,) -> Self
    where
        O: Into<String,>,
        R: Into<String,>,
    {
        Self {
            organization: organization.into(), repository: repository.into(),
        }
    }
}

impl fmt::Display for RepositoryRef
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}/{}", self.organization, self.repository)
    }
}

/// Username and token used for HTTP Basic authentication against the API.
#[derive(Clone, PartialEq, Eq,)]
pub struct Credentials
{
    /// GitHub username.
    pub username: String,
    /// Personal access token for `username`.
    pub token:    String,
}

impl Credentials
{
    /// Pairs `username` and `token`, returning `None` unless both are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use collage::Credentials;
    ///
    /// assert!(Credentials::from_parts(Some("octocat",), Some("ghp_x",)).is_some());
    /// assert!(Credentials::from_parts(Some("octocat",), None).is_none());
    /// ```
    pub fn from_parts(username: Option<&str,>, token: Option<&str,>,) -> Option<Self,>
    {
        let username = username.map(str::trim,).filter(|value| !value.is_empty(),)?;
        let token = token.map(str::trim,).filter(|value| !value.is_empty(),)?;
        Some(Self {
            username: username.to_owned(), token: token.to_owned(),
        },)
    }
}

impl fmt::Debug for Credentials
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("Credentials",)
            .field("username", &self.username,)
            .field("token", &"<redacted>",)
            .finish()
    }
}

/// Base URLs of the three services a run talks to.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Endpoints
{
    /// REST API root used for contributor listings.
    pub api:    String,
    /// Host serving raw files for the authors extractor.
    pub raw:    String,
    /// Host serving avatar images.
    pub avatar: String,
}

impl Default for Endpoints
{
    fn default() -> Self
    {
        Self {
            api:    DEFAULT_API_BASE.to_owned(),
            raw:    DEFAULT_RAW_BASE.to_owned(),
            avatar: DEFAULT_AVATAR_BASE.to_owned(),
        }
    }
}

/// One layer of optional settings, as read from YAML or the command line.
///
/// # Examples
///
/// ```
/// use collage::ConfigLayer;
///
/// let yaml = r#"
/// organization: octo-org
/// repositories: [alpha, beta]
/// include: [hubot]
/// ncols: 5
/// "#;
/// let layer: ConfigLayer = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(layer.ncols, Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer
{
    /// Organization owning every repository.
    #[serde(default, alias = "org")]
    pub organization: Option<String,>,

    /// Repository names, replacing earlier values.
    #[serde(default, alias = "repos")]
    pub repositories: Option<Vec<String,>,>,

    /// Ignored handles, replacing the default ignore-set.
    #[serde(default)]
    pub ignore: Option<Vec<String,>,>,

    /// Ignored handles added on top of `ignore`.
    #[serde(default, alias = "extend-ignore")]
    pub extend_ignore: Option<Vec<String,>,>,

    /// Handles always rendered.
    #[serde(default)]
    pub include: Option<Vec<String,>,>,

    /// Number of grid columns.
    #[serde(default)]
    pub ncols: Option<u32,>,

    /// Raster resolution.
    #[serde(default)]
    pub dpi: Option<u32,>,

    /// Label size in points.
    #[serde(default, alias = "font_size")]
    pub fontsize: Option<f32,>,

    /// Contributors requested per API page.
    #[serde(default, alias = "per-page")]
    pub per_page: Option<u8,>,

    /// Credits file path inside each repository.
    #[serde(default, alias = "authors-file")]
    pub authors_file: Option<String,>,

    /// Branch holding the credits file.
    #[serde(default)]
    pub branch: Option<String,>,

    /// REST API root override.
    #[serde(default)]
    pub api_base: Option<String,>,

    /// Raw file host override.
    #[serde(default)]
    pub raw_base: Option<String,>,

    /// Avatar host override.
    #[serde(default)]
    pub avatar_base: Option<String,>,
}

impl ConfigLayer
{
    /// Reads a layer from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Parse`] when it is not a valid layer.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        debug!("Reading configuration from {}", path.display());
        let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        Self::parse(&contents,)
    }

    /// Parses a layer from a YAML string. An empty document yields an empty
    /// layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed YAML or unknown keys.
    pub fn parse(contents: &str,) -> Result<Self, Error,>
    {
        if contents.trim().is_empty() {
            return Ok(Self::default(),);
        }
        Ok(serde_yaml::from_str(contents,)?,)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq,)]
pub struct CollageConfig
{
    /// Organization owning every repository.
    pub organization: String,
    /// Repository names queried in order.
    pub repositories: Vec<String,>,
    /// Handles removed from the roster.
    pub ignore:       HandleSet,
    /// Handles always added to the roster.
    pub include:      HandleSet,
    /// Number of grid columns, at least one.
    pub ncols:        u32,
    /// Raster resolution, at least one.
    pub dpi:          u32,
    /// Label size in points.
    pub fontsize:     f32,
    /// Contributors requested per API page, within `1..=100`.
    pub per_page:     u8,
    /// Credits file path inside each repository.
    pub authors_file: String,
    /// Branch holding the credits file.
    pub branch:       String,
    /// Service base URLs.
    pub endpoints:    Endpoints,
}

impl CollageConfig
{
    /// Folds `layers` over the defaults and validates the result.
    ///
    /// `env_ignore` is the raw value of [`IGNORE_ENV_VAR`]; when present it
    /// replaces [`DEFAULT_IGNORE`]. An explicit `ignore` in any layer
    /// replaces both, while `extend_ignore` accumulates across layers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when a numeric setting is out of range,
    /// the organization is blank, or an include entry is not a valid handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use collage::{CollageConfig, ConfigLayer};
    ///
    /// let cli = ConfigLayer {
    ///     extend_ignore: Some(vec!["dependabot[bot]".to_owned()],),
    ///     ..ConfigLayer::default()
    /// };
    /// let config = CollageConfig::resolve(Some("bot-a, bot-b",), &[cli,],)?;
    /// assert!(config.ignore.contains("bot-b"));
    /// assert!(config.ignore.contains("dependabot[bot]"));
    /// assert!(!config.ignore.contains("quantifiedcode-bot"));
    /// # Ok::<(), collage::Error>(())
    /// ```
    pub fn resolve(env_ignore: Option<&str,>, layers: &[ConfigLayer],) -> Result<Self, Error,>
    {
        let mut organization = DEFAULT_ORGANIZATION.to_owned();
        let mut repositories: Vec<String,> =
            DEFAULT_REPOSITORIES.iter().map(|name| (*name).to_owned(),).collect();
        let mut ignore: Vec<String,> = match env_ignore {
            Some(raw,) => split_list(raw,),
            None => DEFAULT_IGNORE.iter().map(|name| (*name).to_owned(),).collect(),
        };
        let mut extend_ignore = Vec::new();
        let mut include = Vec::new();
        let mut ncols = DEFAULT_NCOLS;
        let mut dpi = DEFAULT_DPI;
        let mut fontsize = DEFAULT_FONTSIZE;
        let mut per_page = MAX_PER_PAGE;
        let mut authors_file = DEFAULT_AUTHORS_FILE.to_owned();
        let mut branch = DEFAULT_BRANCH.to_owned();
        let mut endpoints = Endpoints::default();

        for layer in layers {
            if let Some(value,) = &layer.organization {
                organization = value.trim().to_owned();
            }
            if let Some(values,) = &layer.repositories {
                repositories = normalize_list(values,);
            }
            if let Some(values,) = &layer.ignore {
                ignore = normalize_list(values,);
            }
            if let Some(values,) = &layer.extend_ignore {
                extend_ignore.extend(normalize_list(values,),);
            }
            if let Some(values,) = &layer.include {
                include.extend(normalize_list(values,),);
            }
            ncols = layer.ncols.unwrap_or(ncols,);
            dpi = layer.dpi.unwrap_or(dpi,);
            fontsize = layer.fontsize.unwrap_or(fontsize,);
            per_page = layer.per_page.unwrap_or(per_page,);
            if let Some(value,) = &layer.authors_file {
                authors_file = value.trim().to_owned();
            }
            if let Some(value,) = &layer.branch {
                branch = value.trim().to_owned();
            }
            if let Some(value,) = &layer.api_base {
                endpoints.api = trim_base(value,);
            }
            if let Some(value,) = &layer.raw_base {
                endpoints.raw = trim_base(value,);
            }
            if let Some(value,) = &layer.avatar_base {
                endpoints.avatar = trim_base(value,);
            }
        }

        if organization.is_empty() {
            return Err(Error::validation("organization cannot be empty",),);
        }
        if ncols == 0 {
            return Err(Error::validation("ncols must be at least 1",),);
        }
        if dpi == 0 {
            return Err(Error::validation("dpi must be at least 1",),);
        }
        if !(fontsize.is_finite() && fontsize > 0.0) {
            return Err(Error::validation("fontsize must be a positive number",),);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(Error::validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            ),),);
        }
        if authors_file.is_empty() {
            return Err(Error::validation("authors_file cannot be empty",),);
        }
        if branch.is_empty() || branch.chars().any(char::is_whitespace,) {
            return Err(Error::validation("branch must be a non-empty name without whitespace",),);
        }
        if let Some(invalid,) = include.iter().find(|handle| !is_valid_handle(handle,),) {
            return Err(Error::validation(format!("'{invalid}' is not a valid GitHub handle"),),);
        }

        ignore.extend(extend_ignore,);

        Ok(Self {
            organization,
            repositories,
            ignore: ignore.into_iter().collect(),
            include: include.into_iter().collect(),
            ncols,
            dpi,
            fontsize,
            per_page,
            authors_file,
            branch,
            endpoints,
        },)
    }

    /// Repository references in query order.
    pub fn repository_refs(&self,) -> Vec<RepositoryRef,>
    {
        self.repositories
            .iter()
            .map(|name| RepositoryRef::new(self.organization.as_str(), name.as_str(),),)
            .collect()
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
///
/// # Examples
///
/// ```
/// use collage::split_list;
///
/// assert_eq!(split_list(" a, b,,c "), vec!["a", "b", "c"]);
/// ```
pub fn split_list(raw: &str,) -> Vec<String,>
{
    raw.split(',',)
        .map(str::trim,)
        .filter(|entry| !entry.is_empty(),)
        .map(str::to_owned,)
        .collect()
}

/// Returns `true` for non-empty strings made of ASCII letters, digits and
/// hyphens.
pub fn is_valid_handle(handle: &str,) -> bool
{
    !handle.is_empty() && handle.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-',)
}

fn normalize_list(values: &[String],) -> Vec<String,>
{
    values.iter().flat_map(|value| split_list(value,),).collect()
}

fn trim_base(value: &str,) -> String
{
    value.trim().trim_end_matches('/',).to_owned()
}
