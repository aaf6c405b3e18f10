//! Modrinth v2 API adapter

use crate::{ArtifactFetcher, NetClient, Registry, SearchQuery};
use async_trait::async_trait;
use modhost_config::Config;
use modhost_errors::{Error, NetworkError, RegistryError};
use modhost_types::{
    ProjectDetails, ProjectFile, ProjectVersion, SearchHit, SearchPage, VersionRecord,
};
use serde::Deserialize;
use url::Url;

/// Registry client for a Modrinth-compatible API
#[derive(Clone, Debug)]
pub struct ModrinthClient {
    net: NetClient,
    base: Url,
    loader: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    updated: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    icon_url: Option<String>,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    server_side: Option<String>,
    #[serde(default)]
    client_side: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
    #[serde(default)]
    total_hits: u64,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

impl ModrinthClient {
    /// # Errors
    ///
    /// Returns `InvalidUrl` if `base_url` cannot be parsed or cannot carry a path.
    pub fn new(net: NetClient, base_url: &str, loader: impl Into<String>) -> Result<Self, Error> {
        let base = crate::parse_url(base_url)?;
        if base.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(base_url.to_string()).into());
        }
        Ok(Self {
            net,
            base,
            loader: loader.into(),
            token: None,
        })
    }

    /// Build from the `[registry]` and `[network]` sections
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let net = NetClient::new(crate::NetConfig::from_config(config))?;
        let client = Self::new(net, &config.registry.base_url, &config.registry.loader)?;
        Ok(client.with_token(config.registry.token.clone()))
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.endpoint(segments);
        let response = self.net.get(&url, query, self.token.as_deref()).await?;
        response.json::<T>().await.map_err(|e| {
            RegistryError::InvalidResponse {
                message: format!("{url}: {e}"),
            }
            .into()
        })
    }

    async fn project(&self, project_id: &str) -> Result<ProjectResponse, Error> {
        self.get(&["project", project_id], &[])
            .await
            .map_err(|e| not_found(e, || RegistryError::ProjectNotFound {
                project_id: project_id.to_string(),
            }))
    }

    async fn compatible_versions(
        &self,
        project_id: &str,
        game_version: &str,
    ) -> Result<Vec<ProjectVersion>, Error> {
        let query = [
            ("loaders", format!("[\"{}\"]", self.loader)),
            ("game_versions", format!("[\"{game_version}\"]")),
        ];
        self.get(&["project", project_id, "version"], &query)
            .await
            .map_err(|e| not_found(e, || RegistryError::ProjectNotFound {
                project_id: project_id.to_string(),
            }))
    }
}

/// Map a 404 onto a registry-level not-found error
fn not_found(err: Error, make: impl FnOnce() -> RegistryError) -> Error {
    match err {
        Error::Network(NetworkError::HttpError { status: 404, .. }) => make().into(),
        other => other,
    }
}

#[async_trait]
impl Registry for ModrinthClient {
    async fn fetch_version(&self, version_id: &str) -> Result<VersionRecord, Error> {
        self.get(&["version", version_id], &[])
            .await
            .map_err(|e| not_found(e, || RegistryError::VersionNotFound {
                version_id: version_id.to_string(),
            }))
    }

    async fn fetch_project_latest_file(
        &self,
        project_id: &str,
        game_version: &str,
    ) -> Result<ProjectFile, Error> {
        let project = self.project(project_id).await?;
        let versions = self.compatible_versions(project_id, game_version).await?;

        let latest = versions
            .into_iter()
            .next()
            .ok_or_else(|| RegistryError::NoCompatibleVersion {
                project_id: project_id.to_string(),
                loader: self.loader.clone(),
                game_version: game_version.to_string(),
            })?;
        let file = latest
            .primary_file()
            .ok_or_else(|| RegistryError::NoFiles {
                version_id: latest.id.clone(),
            })?;

        Ok(ProjectFile {
            project_id: project_id.to_string(),
            version_id: latest.id.clone(),
            title: project.title,
            description: project.description,
            icon_url: project.icon_url,
            file_url: file.url.clone(),
            file_name: file.filename.clone(),
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, Error> {
        let facets = format!(
            "[[\"categories:{}\"],[\"versions:{}\"],[\"project_type:mod\"],[\"server_side:optional\",\"server_side:required\"]]",
            self.loader, query.game_version
        );
        let mut params = vec![
            ("index", query.index.clone()),
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
            ("facets", facets),
        ];
        if let Some(text) = query.text.as_ref().filter(|t| !t.is_empty()) {
            params.push(("query", text.clone()));
        }

        let response: SearchResponse = self.get(&["search"], &params).await?;
        Ok(SearchPage {
            total_hits: response.total_hits,
            limit: response.limit.unwrap_or(query.limit),
            offset: response.offset.unwrap_or(query.offset),
            results: response.hits,
        })
    }

    async fn project_details(
        &self,
        project_id: &str,
        game_version: &str,
    ) -> Result<ProjectDetails, Error> {
        let project = self.project(project_id).await?;
        let versions = self.compatible_versions(project_id, game_version).await?;

        Ok(ProjectDetails {
            project_id: project.id,
            title: project.title,
            description: project.description,
            body: project.body,
            updated: project.updated,
            published: project.published,
            icon_url: project.icon_url,
            downloads: project.downloads,
            followers: project.followers,
            server_side: project.server_side,
            client_side: project.client_side,
            versions,
        })
    }
}

#[async_trait]
impl ArtifactFetcher for ModrinthClient {
    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, Error> {
        self.net.fetch_bytes(url).await
    }
}
