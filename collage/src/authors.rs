// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Author extraction from credits files.
//!
//! Downloads a repository's plain-text credits file and collects the handles
//! cited with the `@handle` convention.

use std::collections::BTreeSet;

use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{config::RepositoryRef, error::Error, http};

const HANDLE_PATTERN: &str = r"@([A-Za-z0-9-]+)";

/// Downloads credits files and extracts the handles they cite.
#[derive(Debug, Clone,)]
pub struct AuthorExtractor
{
    client:       Client,
    raw_base:     String,
    branch:       String,
    authors_file: String,
    pattern:      Regex,
}

/// Outcome of collecting authors over several repositories.
#[derive(Debug, Default,)]
pub struct AuthorCollection
{
    /// Union of the handles found in every readable credits file.
    pub handles:  BTreeSet<String,>,
    /// Repositories whose credits file could not be read, with the cause.
    pub failures: Vec<(RepositoryRef, Error,),>,
}

impl AuthorExtractor
{
    /// Creates an extractor reading `authors_file` from `branch` on the raw
    /// file host `raw_base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the handle pattern fails to compile.
    ///
    /// # Example
    ///
    /// ```
    /// use collage::AuthorExtractor;
    ///
    /// # fn main() -> Result<(), collage::Error> {
    /// let client = collage::build_client()?;
    /// let extractor = AuthorExtractor::new(
    ///     client,
    ///     "https://raw.githubusercontent.com",
    ///     "main",
    ///     "AUTHORS.rst",
    /// )?;
    /// let handles = extractor.extract_handles("Thanks @octocat and @hubot!",);
    /// assert_eq!(handles.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        client: Client,
        raw_base: &str,
        branch: &str,
        authors_file: &str,
    ) -> Result<Self, Error,>
    {
        let pattern = Regex::new(HANDLE_PATTERN,)
            .map_err(|e| Error::validation(format!("invalid handle pattern: {e}"),),)?;

        Ok(Self {
            client,
            raw_base: raw_base.trim_end_matches('/',).to_owned(),
            branch: branch.to_owned(),
            authors_file: authors_file.trim_start_matches('/',).to_owned(),
            pattern,
        },)
    }

    /// URL of the credits file of `repository`.
    pub fn file_url(&self, repository: &RepositoryRef,) -> String
    {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base,
            repository.organization,
            repository.repository,
            self.branch,
            self.authors_file
        )
    }

    /// Returns every handle cited as `@handle` in `text`.
    ///
    /// Handles are made of ASCII letters, digits and hyphens; repeated
    /// citations collapse into one entry.
    pub fn extract_handles(&self, text: &str,) -> BTreeSet<String,>
    {
        self.pattern.captures_iter(text,).map(|captures| captures[1].to_owned(),).collect()
    }

    /// Downloads the credits file of `repository` and extracts its handles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpStatus`] when the file does not exist on the
    /// branch and [`Error::Transport`] when the download fails.
    pub async fn fetch(&self, repository: &RepositoryRef,) -> Result<BTreeSet<String,>, Error,>
    {
        let url = self.file_url(repository,);
        debug!("Fetching authors of {} from {}", repository, url);

        let bytes = http::get_bytes(&self.client, &url,).await?;
        let text = String::from_utf8_lossy(&bytes,);
        let handles = self.extract_handles(&text,);

        info!("Found {} authors in {} of {}", handles.len(), self.authors_file, repository);

        Ok(handles,)
    }

    /// Collects authors across `repositories`, one at a time.
    ///
    /// A credits file that cannot be fetched does not abort the collection:
    /// the failure is logged, recorded in [`AuthorCollection::failures`], and
    /// the remaining repositories are still read.
    pub async fn collect(&self, repositories: &[RepositoryRef],) -> AuthorCollection
    {
        let mut collection = AuthorCollection::default();

        for repository in repositories {
            match self.fetch(repository,).await {
                Ok(handles,) => collection.handles.extend(handles,),
                Err(error,) => {
                    warn!("Skipping authors of {}: {}", repository, error);
                    collection.failures.push((repository.clone(), error,),);
                }
            }
        }

        collection
    }
}

#[cfg(test)]
mod tests
{
    use mockito::Server;

    use super::*;

    fn extractor(raw_base: &str,) -> AuthorExtractor
    {
        let client = http::build_client().expect("client",);
        AuthorExtractor::new(client, raw_base, "main", "AUTHORS.rst",).expect("extractor",)
    }

    #[test]
    fn extract_handles_collapses_duplicates()
    {
        let handles = extractor("https://raw.githubusercontent.com",).extract_handles(
            "Thanks to @Alice-2 and @bob for contributions. Also @Alice-2 again.",
        );
        assert_eq!(handles.into_iter().collect::<Vec<_,>>(), ["Alice-2", "bob"]);
    }

    #[test]
    fn extract_handles_stops_at_disallowed_characters()
    {
        let handles = extractor("https://raw.githubusercontent.com",)
            .extract_handles("- Jane Doe (@jane_doe), `@dev.bot`, mail: me@example.com, @",);
        assert_eq!(handles.into_iter().collect::<Vec<_,>>(), ["dev", "example", "jane"]);
    }

    #[test]
    fn extract_handles_on_plain_text_is_empty()
    {
        assert!(extractor("https://raw.githubusercontent.com",).extract_handles("no citations").is_empty());
    }

    #[test]
    fn file_url_joins_components()
    {
        let url = extractor("https://raw.githubusercontent.com/",)
            .file_url(&RepositoryRef::new("simpeg", "discretize",),);
        assert_eq!(url, "https://raw.githubusercontent.com/simpeg/discretize/main/AUTHORS.rst");
    }

    #[tokio::test]
    async fn fetch_extracts_from_remote_file()
    {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/octo-org/alpha/main/AUTHORS.rst",)
            .with_status(200,)
            .with_body("Authors\n=======\n\n- Alice (@alice)\n- Bob (@bob)\n",)
            .create_async()
            .await;

        let handles = extractor(&server.url(),)
            .fetch(&RepositoryRef::new("octo-org", "alpha",),)
            .await
            .expect("fetch should succeed",);

        mock.assert_async().await;
        assert_eq!(handles.into_iter().collect::<Vec<_,>>(), ["alice", "bob"]);
    }

    #[tokio::test]
    async fn collect_continues_after_missing_file()
    {
        let mut server = Server::new_async().await;
        let missing = server
            .mock("GET", "/octo-org/alpha/main/AUTHORS.rst",)
            .with_status(404,)
            .with_body("404: Not Found",)
            .create_async()
            .await;
        let present = server
            .mock("GET", "/octo-org/beta/main/AUTHORS.rst",)
            .with_status(200,)
            .with_body("@carol",)
            .create_async()
            .await;

        let repositories =
            [RepositoryRef::new("octo-org", "alpha",), RepositoryRef::new("octo-org", "beta",),];
        let collection = extractor(&server.url(),).collect(&repositories,).await;

        missing.assert_async().await;
        present.assert_async().await;
        assert_eq!(collection.handles.into_iter().collect::<Vec<_,>>(), ["carol"]);
        assert_eq!(collection.failures.len(), 1);
        let (repository, error,) = &collection.failures[0];
        assert_eq!(repository.repository, "alpha");
        assert_eq!(error.status(), Some(404));
    }
}
