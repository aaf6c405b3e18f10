#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for modhost
//!
//! HTTP access to the package registry and artifact downloads, with retry
//! logic and bounded timeouts. The resolver and install pipeline only see
//! the [`Registry`] and [`ArtifactFetcher`] traits.

mod client;
mod modrinth;

pub use client::{NetClient, NetConfig};
pub use modrinth::ModrinthClient;

use async_trait::async_trait;
use modhost_errors::{Error, NetworkError};
use modhost_types::{ProjectDetails, ProjectFile, SearchPage, VersionRecord};
use url::Url;

/// Remote package registry
#[async_trait]
pub trait Registry: Send + Sync {
    /// Version record with its declared dependencies
    async fn fetch_version(&self, version_id: &str) -> Result<VersionRecord, Error>;

    /// Newest file of a project compatible with the configured loader and
    /// `game_version`
    async fn fetch_project_latest_file(
        &self,
        project_id: &str,
        game_version: &str,
    ) -> Result<ProjectFile, Error>;

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, Error>;

    async fn project_details(
        &self,
        project_id: &str,
        game_version: &str,
    ) -> Result<ProjectDetails, Error>;
}

/// Source of artifact bytes
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, Error>;
}

#[async_trait]
impl ArtifactFetcher for NetClient {
    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, Error> {
        self.fetch_bytes(url).await
    }
}

/// Registry search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: Option<String>,
    /// Sort order: relevance, downloads, follows, newest, updated
    pub index: String,
    pub limit: u32,
    pub offset: u32,
    pub game_version: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(game_version: impl Into<String>) -> Self {
        Self {
            text: None,
            index: "relevance".to_string(),
            limit: 24,
            offset: 0,
            game_version: game_version.into(),
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }
}

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or not http(s).
pub fn parse_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(NetworkError::InvalidUrl(format!("unsupported scheme {other}: {url}")).into()),
    }
}
