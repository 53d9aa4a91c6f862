// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the collage binary.
//!
//! The CLI resolves the run configuration, collects the roster of every
//! configured repository, downloads the avatars and writes the collage image.

use std::{env, io, path::PathBuf, process};

use clap::{ArgAction, Parser};
use collage::{
    AvatarSource, CollageConfig, ConfigLayer, Credentials, Error, IGNORE_ENV_VAR, OutputFormat,
    RepositoryRef, Roster, build_client, collect_roster, compose_collage, export_collage,
    output_error,
};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Render a collage of the contributors of a GitHub organization.
#[derive(Debug, Parser,)]
#[command(name = "collage", version, about = "Render a collage of GitHub contributors")]
struct Cli
{
    /// Output image; the extension selects the format (png, jpg, svg, ...).
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// YAML file providing defaults for any of the options below.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// GitHub organization [default: simpeg].
    #[arg(short = 'o', long = "organization", value_name = "ORG")]
    organization: Option<String,>,

    /// Repositories to scan, comma separated or repeated.
    #[arg(short = 'r', long = "repositories", value_name = "LIST")]
    repositories: Vec<String,>,

    /// Contributors left out of the collage, replacing the default list.
    #[arg(long = "ignore", value_name = "LIST")]
    ignore: Vec<String,>,

    /// Contributors left out in addition to the ignore list.
    #[arg(long = "extend-ignore", value_name = "LIST")]
    extend_ignore: Vec<String,>,

    /// Contributors always added to the collage.
    #[arg(long = "include", value_name = "LIST")]
    include: Vec<String,>,

    /// Number of columns in the collage [default: 7].
    #[arg(long = "ncols", value_parser = clap::value_parser!(u32).range(1..))]
    ncols: Option<u32,>,

    /// Resolution of the output image [default: 72].
    #[arg(long = "dpi", value_parser = clap::value_parser!(u32).range(1..))]
    dpi: Option<u32,>,

    /// Font size of contributor names, in points [default: 18].
    #[arg(long = "fontsize")]
    fontsize: Option<f32,>,

    /// GitHub username to use with the token.
    #[arg(long = "gh-username", env = "GITHUB_USERNAME")]
    gh_username: Option<String,>,

    /// GitHub token for the given username.
    #[arg(long = "gh-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    gh_token: Option<String,>,

    /// Contributors requested per API page [default: 100].
    #[arg(long = "per-page", value_parser = clap::value_parser!(u8).range(1..=100))]
    per_page: Option<u8,>,

    /// Credits file scanned for @handle citations [default: AUTHORS.rst].
    #[arg(long = "authors-file", value_name = "PATH")]
    authors_file: Option<String,>,

    /// Branch holding the credits file [default: main].
    #[arg(long = "branch")]
    branch: Option<String,>,

    #[arg(long = "api-base", hide = true)]
    api_base: Option<String,>,

    #[arg(long = "raw-base", hide = true)]
    raw_base: Option<String,>,

    #[arg(long = "avatar-base", hide = true)]
    avatar_base: Option<String,>,

    /// Log every request.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli
{
    /// Options given on the command line, as a configuration layer.
    fn to_layer(&self,) -> ConfigLayer
    {
        ConfigLayer {
            organization:  self.organization.clone(),
            repositories:  non_empty(&self.repositories,),
            ignore:        non_empty(&self.ignore,),
            extend_ignore: non_empty(&self.extend_ignore,),
            include:       non_empty(&self.include,),
            ncols:         self.ncols,
            dpi:           self.dpi,
            fontsize:      self.fontsize,
            per_page:      self.per_page,
            authors_file:  self.authors_file.clone(),
            branch:        self.branch.clone(),
            api_base:      self.api_base.clone(),
            raw_base:      self.raw_base.clone(),
            avatar_base:   self.avatar_base.clone(),
        }
    }

    fn credentials(&self,) -> Option<Credentials,>
    {
        let credentials =
            Credentials::from_parts(self.gh_username.as_deref(), self.gh_token.as_deref(),);
        if credentials.is_none() && (self.gh_username.is_some() || self.gh_token.is_some()) {
            warn!("Both --gh-username and --gh-token are required; using anonymous access");
        }
        credentials
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main(flavor = "current_thread")]
async fn main()
{
    let cli = Cli::parse();
    init_tracing(cli.verbose,);

    if let Err(error,) = run(cli,).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing(verbose: bool,)
{
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose,).into(),),)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr,),)
        .init();
}

/// Filter applied when `RUST_LOG` is unset.
fn default_filter(verbose: bool,) -> &'static str
{
    if verbose { "collage=debug" } else { "collage=info" }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, contributor listing, avatar and export errors.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let config = resolve_config(&cli, env::var(IGNORE_ENV_VAR,).ok().as_deref(),)?;
    OutputFormat::from_path(&cli.image,)?;
    let credentials = cli.credentials();
    let client = build_client()?;

    let report = collect_roster(&config, credentials.as_ref(), &client,).await?;
    if let Err(source,) = write_author_failures(&mut io::stderr().lock(), &report.author_failures,) {
        warn!("Failed to report skipped credits files: {source}");
    }

    write_roster(&mut io::stdout().lock(), &report.roster,).map_err(output_error,)?;

    println!("\nGenerating image...");
    let source = AvatarSource::new(client, &config.endpoints.avatar,);
    let figure = compose_collage(&source, &report.roster, config.ncols as usize, config.fontsize,).await?;
    let written = export_collage(&figure, &cli.image, config.dpi,)?;

    println!("\nDone! Collage image saved in '{}'.", written.display());
    Ok((),)
}

fn resolve_config(cli: &Cli, env_ignore: Option<&str,>,) -> Result<CollageConfig, Error,>
{
    let mut layers = Vec::with_capacity(2,);
    if let Some(path,) = cli.config.as_deref() {
        layers.push(ConfigLayer::load(path,)?,);
    }
    layers.push(cli.to_layer(),);

    CollageConfig::resolve(env_ignore, &layers,)
}

fn write_roster<W: io::Write,>(writer: &mut W, roster: &Roster,) -> io::Result<(),>
{
    writeln!(writer, "\nCollected contributors:")?;
    writeln!(writer, "-----------------------")?;
    for handle in roster {
        writeln!(writer, "- {handle}")?;
    }
    Ok((),)
}

fn write_author_failures<W: io::Write,>(
    writer: &mut W,
    failures: &[(RepositoryRef, Error,)],
) -> io::Result<(),>
{
    for (repository, error,) in failures {
        writeln!(writer, "Skipped authors of {repository}: {}", error.to_display_string())?;
    }
    Ok((),)
}

fn non_empty(values: &[String],) -> Option<Vec<String,>,>
{
    (!values.is_empty()).then(|| values.to_vec(),)
}
