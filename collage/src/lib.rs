//! Build a collage of the contributors of a GitHub organization.
//!
//! The library lists the contributors of a set of repositories, extracts the
//! authors cited in each repository's credits file, filters and sorts the
//! merged handles into a [`Roster`], and renders a grid of avatars labeled
//! with their handles. Each stage is usable on its own; [`collect_roster`],
//! [`compose_collage`] and [`export_collage`] chain them the way the `collage`
//! binary does.

mod authors;
mod avatar;
mod config;
mod contributors;
mod error;
mod export;
mod figure;
mod http;
mod layout;
mod pipeline;
mod roster;

pub use authors::{AuthorCollection, AuthorExtractor};
pub use avatar::{Avatar, AvatarSource};
pub use config::{
    CollageConfig, ConfigLayer, Credentials, DEFAULT_IGNORE, Endpoints, IGNORE_ENV_VAR,
    RepositoryRef, is_valid_handle, split_list,
};
pub use contributors::ContributorFetcher;
pub use error::{Error, export_error, io_error, output_error};
pub use export::{OutputFormat, export_collage, rasterize};
pub use figure::{CollageFigure, compose_collage};
pub use http::build_client;
pub use layout::{CellPosition, GridLayout, Rect};
pub use pipeline::{RosterReport, collect_roster};
pub use roster::{HandleSet, Roster, build_roster};
