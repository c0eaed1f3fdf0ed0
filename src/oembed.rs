//! Social-post lookup collaborator.
//!
//! The tweet rewriter only sees [`TweetLookup`]: a post URL in, an optional
//! rich rendering out. `None` uniformly encodes every failure shape
//! (non-success status, transport failure, unparseable body) — the rewriter
//! must not distinguish them. [`OembedClient`] is the default implementation
//! against the publish.twitter.com oEmbed endpoint.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://publish.twitter.com/oembed";

/// Rich rendering of one social post.
#[derive(Debug, Clone, PartialEq)]
pub struct TweetRendering {
    /// Markup fragment to splice into the tree.
    pub markup: String,
    /// Display name of the post author.
    pub author_name: String,
}

/// Outbound post-lookup collaborator.
#[async_trait]
pub trait TweetLookup: Send + Sync {
    async fn lookup(&self, url: &str) -> Option<TweetRendering>;
}

/// Errors inside the default client. These never cross the [`TweetLookup`]
/// boundary; they collapse to `None` there.
#[derive(Debug, Error)]
pub enum OembedError {
    #[error("oembed request failed")]
    Transport(#[from] reqwest::Error),

    #[error("oembed endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed oembed response")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    html: String,
    author_name: String,
}

/// oEmbed-backed [`TweetLookup`].
///
/// No timeout is imposed here; callers wanting bounded latency configure it
/// on the [`reqwest::Client`] they pass to [`with_client`](Self::with_client).
pub struct OembedClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OembedClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Use a caller-configured HTTP client (timeouts, proxies).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Override the endpoint (tests, self-hosted oembed proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch(&self, url: &str) -> Result<TweetRendering, OembedError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("url", url), ("omit_script", "true"), ("dnt", "true")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OembedError::Status(status));
        }

        let body = response.text().await?;
        let parsed: OembedResponse = serde_json::from_str(&body)?;
        Ok(TweetRendering {
            markup: parsed.html,
            author_name: parsed.author_name,
        })
    }
}

impl Default for OembedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TweetLookup for OembedClient {
    async fn lookup(&self, url: &str) -> Option<TweetRendering> {
        match self.fetch(url).await {
            Ok(rendering) => Some(rendering),
            Err(err) => {
                debug!("tweet lookup failed for {url}: {err}");
                None
            }
        }
    }
}
