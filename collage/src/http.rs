// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Plain HTTP downloads for raw files and avatars.

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::Error;

/// User agent sent with every request; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("collage/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the author and avatar downloads.
///
/// # Errors
///
/// Returns [`Error::Transport`] when the TLS backend cannot be initialized.
pub fn build_client() -> Result<Client, Error,>
{
    Client::builder()
        .user_agent(USER_AGENT,)
        .build()
        .map_err(|e| Error::transport("<client>", format!("failed to build HTTP client: {e}"),),)
}

/// Downloads `url` and returns the response body.
///
/// # Errors
///
/// Returns [`Error::HttpStatus`] carrying the status and body text for
/// non-success responses and [`Error::Transport`] when the request fails.
pub async fn get_bytes(client: &Client, url: &str,) -> Result<Vec<u8,>, Error,>
{
    debug!("GET {}", url);

    let response = client.get(url,).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("GET {} returned HTTP {}", url, status.as_u16());
        return Err(Error::HttpStatus {
            url: url.to_owned(), status: status.as_u16(), body,
        },);
    }

    Ok(response.bytes().await?.to_vec(),)
}

#[cfg(test)]
mod tests
{
    use mockito::Server;

    use super::*;

    #[test]
    fn user_agent_names_the_crate()
    {
        assert!(USER_AGENT.starts_with("collage/"));
    }

    #[tokio::test]
    async fn get_bytes_returns_body_on_success()
    {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", "/file.txt",).with_status(200,).with_body("payload",).create_async().await;

        let client = build_client().expect("client",);
        let body = get_bytes(&client, &format!("{}/file.txt", server.url()),).await.expect("download",);

        mock.assert_async().await;
        assert_eq!(body, b"payload");
    }

    #[tokio::test]
    async fn get_bytes_reports_status_and_body()
    {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", "/gone",).with_status(410,).with_body("gone for good",).create_async().await;

        let client = build_client().expect("client",);
        let url = format!("{}/gone", server.url());
        let error = get_bytes(&client, &url,).await.expect_err("expected HTTP error",);

        mock.assert_async().await;
        match error {
            Error::HttpStatus {
                url: reported,
                status,
                body,
            } => {
                assert_eq!(reported, url);
                assert_eq!(status, 410);
                assert_eq!(body, "gone for good");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
