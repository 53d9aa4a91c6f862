// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Contributor listing for repositories hosted on GitHub.
//!
//! Walks the paginated `/repos/{owner}/{repo}/contributors` endpoint and
//! collects the login of every account credited with commits.

use std::collections::BTreeSet;

use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    config::{Credentials, MAX_PER_PAGE, RepositoryRef},
    error::Error,
};

/// Contributor entry as returned by the GitHub API. Only the login is kept.
#[derive(Debug, Clone, Deserialize,)]
struct ContributorEntry
{
    login: String,
}

/// Client listing the contributors of a repository.
#[derive(Clone,)]
pub struct ContributorFetcher
{
    octocrab: Octocrab,
    per_page: u8,
}

impl std::fmt::Debug for ContributorFetcher
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.debug_struct("ContributorFetcher",).field("per_page", &self.per_page,).finish_non_exhaustive()
    }
}

impl ContributorFetcher
{
    /// Builds a fetcher against `api_base`.
    ///
    /// Requests use HTTP Basic authentication when `credentials` is present
    /// and are anonymous otherwise. `per_page` is clamped to `1..=100`.
    /// Failed requests are never re-sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `api_base` is not a valid URI and
    /// [`Error::Transport`] when the client cannot be constructed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use collage::{ContributorFetcher, RepositoryRef};
    ///
    /// # async fn example() -> Result<(), collage::Error> {
    /// let fetcher = ContributorFetcher::new("https://api.github.com", None, 100,)?;
    /// let handles = fetcher.fetch(&RepositoryRef::new("simpeg", "discretize",),).await?;
    /// println!("{} contributors", handles.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        api_base: &str,
        credentials: Option<&Credentials,>,
        per_page: u8,
    ) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder()
            .base_uri(api_base,)
            .map_err(|e| Error::validation(format!("invalid API base '{api_base}': {e}"),),)?
            .add_retry_config(RetryConfig::None,);

        if let Some(credentials,) = credentials {
            debug!("Authenticating API requests as {}", credentials.username);
            builder = builder.basic_auth(credentials.username.clone(), credentials.token.clone(),);
        }

        let octocrab = builder
            .build()
            .map_err(|e| Error::transport(api_base, format!("failed to build GitHub client: {e}"),),)?;

        Ok(Self {
            octocrab,
            per_page: per_page.clamp(1, MAX_PER_PAGE,),
        },)
    }

    /// Page size used for listing requests.
    pub fn per_page(&self,) -> u8
    {
        self.per_page
    }

    /// Fetches every contributor login of `repository`.
    ///
    /// Pages are requested until one comes back shorter than the page size,
    /// so repositories with more contributors than a single page allows are
    /// not truncated. A `204 No Content` answer, which GitHub sends for empty
    /// repositories, yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpStatus`] with the status and body when GitHub
    /// rejects a request, [`Error::Payload`] when a page is not an array of
    /// objects carrying a `login`, and [`Error::Transport`] when no response
    /// arrives. Nothing is retried.
    pub async fn fetch(&self, repository: &RepositoryRef,) -> Result<BTreeSet<String,>, Error,>
    {
        debug!("Fetching contributors for {}", repository);

        let mut handles = BTreeSet::new();
        let mut page = 1u32;

        loop {
            let route = format!(
                "/repos/{}/{}/contributors?per_page={}&page={}",
                repository.organization, repository.repository, self.per_page, page
            );
            let entries = self.fetch_page(&route,).await?;
            let count = entries.len();

            handles.extend(entries.into_iter().map(|entry| entry.login,),);

            if count < usize::from(self.per_page,) {
                break;
            }
            page += 1;
        }

        info!("Found {} contributors for {}", handles.len(), repository);

        Ok(handles,)
    }

    async fn fetch_page(&self, route: &str,) -> Result<Vec<ContributorEntry,>, Error,>
    {
        let response = self
            .octocrab
            ._get(route,)
            .await
            .map_err(|e| Error::transport(route, e.to_string(),),)?;

        let status = response.status();
        if status.as_u16() == 204 {
            debug!("{} returned no content", route);
            return Ok(Vec::new(),);
        }

        let body = self
            .octocrab
            .body_to_string(response,)
            .await
            .map_err(|e| Error::transport(route, e.to_string(),),)?;

        if !status.is_success() {
            warn!("{} returned HTTP {}", route, status.as_u16());
            return Err(Error::HttpStatus {
                url: route.to_owned(), status: status.as_u16(), body,
            },);
        }

        parse_page(route, &body,)
    }
}

fn parse_page(route: &str, body: &str,) -> Result<Vec<ContributorEntry,>, Error,>
{
    serde_json::from_str(body,).map_err(|e| Error::Payload {
        url: route.to_owned(), message: e.to_string(),
    },)
}
