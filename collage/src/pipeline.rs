// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Roster collection across every configured repository.
//!
//! Contributors are fetched first, then authors, one repository at a time.
//! A contributor failure aborts the run; an authors-file failure is recorded
//! and skipped.

use std::collections::BTreeSet;

use reqwest::Client;
use tracing::info;

use crate::{
    authors::AuthorExtractor,
    config::{CollageConfig, Credentials, RepositoryRef},
    contributors::ContributorFetcher,
    error::Error,
    roster::{Roster, build_roster},
};

/// Roster of a run together with the recoverable failures met on the way.
#[derive(Debug,)]
pub struct RosterReport
{
    /// Final ordered handles.
    pub roster:          Roster,
    /// Repositories whose credits file could not be read.
    pub author_failures: Vec<(RepositoryRef, Error,),>,
}

/// Collects contributors and authors of every repository in `config` and
/// combines them into the roster.
///
/// # Errors
///
/// Propagates the first contributor listing failure. Authors-file failures
/// are returned in [`RosterReport::author_failures`] instead.
///
/// # Example
///
/// ```no_run
/// use collage::{CollageConfig, build_client, collect_roster};
///
/// # async fn example() -> Result<(), collage::Error> {
/// let config = CollageConfig::resolve(None, &[],)?;
/// let report = collect_roster(&config, None, &build_client()?,).await?;
/// for handle in &report.roster {
///     println!("- {handle}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn collect_roster(
    config: &CollageConfig,
    credentials: Option<&Credentials,>,
    client: &Client,
) -> Result<RosterReport, Error,>
{
    let repositories = config.repository_refs();

    let fetcher = ContributorFetcher::new(&config.endpoints.api, credentials, config.per_page,)?;
    let mut contributors = BTreeSet::new();
    for repository in &repositories {
        contributors.extend(fetcher.fetch(repository,).await?,);
    }

    let extractor = AuthorExtractor::new(
        client.clone(),
        &config.endpoints.raw,
        &config.branch,
        &config.authors_file,
    )?;
    let authors = extractor.collect(&repositories,).await;

    info!(
        "Collected {} contributors and {} authors from {} repositories",
        contributors.len(),
        authors.handles.len(),
        repositories.len()
    );

    let roster = build_roster(contributors, authors.handles, &config.ignore, &config.include,);

    Ok(RosterReport {
        roster, author_failures: authors.failures,
    },)
}

#[cfg(test)]
mod tests
{
    use mockito::{Matcher, Server};

    use super::*;
    use crate::{config::ConfigLayer, http};

    fn layer(server_url: &str,) -> ConfigLayer
    {
        ConfigLayer {
            organization: Some("octo-org".to_owned(),),
            repositories: Some(vec!["alpha".to_owned(), "beta".to_owned()],),
            ignore: Some(vec!["bob".to_owned()],),
            include: Some(vec!["dave".to_owned()],),
            api_base: Some(server_url.to_owned(),),
            raw_base: Some(server_url.to_owned(),),
            avatar_base: Some(server_url.to_owned(),),
            ..ConfigLayer::default()
        }
    }

    #[tokio::test]
    async fn combines_repositories_and_skips_missing_authors()
    {
        let mut server = Server::new_async().await;
        let _alpha = server
            .mock("GET", "/repos/octo-org/alpha/contributors",)
            .match_query(Matcher::Any,)
            .with_status(200,)
            .with_body("[{\"login\":\"alice\"},{\"login\":\"bob\"}]",)
            .create_async()
            .await;
        let _beta = server
            .mock("GET", "/repos/octo-org/beta/contributors",)
            .match_query(Matcher::Any,)
            .with_status(200,)
            .with_body("[]",)
            .create_async()
            .await;
        let _alpha_authors = server
            .mock("GET", "/octo-org/alpha/main/AUTHORS.rst",)
            .with_status(404,)
            .with_body("404: Not Found",)
            .create_async()
            .await;
        let _beta_authors = server
            .mock("GET", "/octo-org/beta/main/AUTHORS.rst",)
            .with_status(200,)
            .with_body("- Carol (@carol)\n",)
            .create_async()
            .await;

        let config = CollageConfig::resolve(None, &[layer(&server.url(),),],).expect("config",);
        let client = http::build_client().expect("client",);
        let report = collect_roster(&config, None, &client,).await.expect("collect",);

        assert_eq!(report.roster.handles(), ["alice", "carol", "dave"]);
        assert_eq!(report.author_failures.len(), 1);
        assert_eq!(report.author_failures[0].0.repository, "alpha");
    }

    #[tokio::test]
    async fn contributor_failure_is_fatal()
    {
        let mut server = Server::new_async().await;
        let _alpha = server
            .mock("GET", "/repos/octo-org/alpha/contributors",)
            .match_query(Matcher::Any,)
            .with_status(403,)
            .with_body("{\"message\":\"API rate limit exceeded\"}",)
            .create_async()
            .await;

        let config = CollageConfig::resolve(None, &[layer(&server.url(),),],).expect("config",);
        let client = http::build_client().expect("client",);
        let error = collect_roster(&config, None, &client,).await.expect_err("expected failure",);

        match error {
            Error::HttpStatus {
                status,
                body,
                ..
            } => {
                assert_eq!(status, 403);
                assert!(body.contains("rate limit"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
