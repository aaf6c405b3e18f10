//! Registry-facing types
//!
//! These are the shapes the resolver and the CLI consume. The HTTP adapter
//! in `modhost-net` maps registry responses onto them.

use crate::PackageRecord;
use serde::{Deserialize, Serialize};

/// How a version relates to one of its declared dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
    Incompatible,
    Embedded,
    #[serde(other)]
    Unknown,
}

/// A dependency declared by a version record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDependency {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub version_id: Option<String>,
    pub dependency_type: DependencyType,
}

impl RegistryDependency {
    /// Project id of a required dependency, `None` for anything the
    /// resolver must ignore
    #[must_use]
    pub fn required_project(&self) -> Option<&str> {
        match (self.dependency_type, self.project_id.as_deref()) {
            (DependencyType::Required, Some(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }
}

/// One version of a project with its declared dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub dependencies: Vec<RegistryDependency>,
}

/// The concrete file a project resolves to for the configured loader and
/// game version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub project_id: String,
    pub version_id: String,
    pub title: String,
    pub description: String,
    pub icon_url: Option<String>,
    pub file_url: String,
    pub file_name: String,
}

impl ProjectFile {
    /// Turn the file into a package record with no parents yet
    #[must_use]
    pub fn into_record(self) -> PackageRecord {
        PackageRecord::new(self.version_id, self.project_id, self.file_url, self.file_name)
            .with_metadata(self.title, self.description, self.icon_url)
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub project_id: String,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub server_side: Option<String>,
}

/// A page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub total_hits: u64,
    pub limit: u32,
    pub offset: u32,
    pub results: Vec<SearchHit>,
}

/// A downloadable file attached to a project version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFile {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub primary: bool,
}

/// A project version compatible with the configured loader and game version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version_number: String,
    #[serde(default)]
    pub date_published: Option<String>,
    #[serde(default)]
    pub files: Vec<VersionFile>,
    #[serde(default)]
    pub dependencies: Vec<RegistryDependency>,
}

impl ProjectVersion {
    /// The primary file, falling back to the first listed file
    #[must_use]
    pub fn primary_file(&self) -> Option<&VersionFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }
}

/// Full project view shown before adding a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub server_side: Option<String>,
    #[serde(default)]
    pub client_side: Option<String>,
    /// Compatible versions, newest first
    #[serde(default)]
    pub versions: Vec<ProjectVersion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_required_dependencies_with_project_count() {
        let deps: Vec<RegistryDependency> = serde_json::from_str(
            r#"[
                {"project_id": "P1", "version_id": null, "dependency_type": "required"},
                {"project_id": "P2", "dependency_type": "optional"},
                {"project_id": null, "version_id": "v9", "dependency_type": "required"},
                {"project_id": "P3", "dependency_type": "something-new"}
            ]"#,
        )
        .unwrap();

        let required: Vec<_> = deps
            .iter()
            .filter_map(RegistryDependency::required_project)
            .collect();
        assert_eq!(required, vec!["P1"]);
        assert_eq!(deps[3].dependency_type, DependencyType::Unknown);
    }

    #[test]
    fn test_primary_file_fallback() {
        let mut version = ProjectVersion {
            id: "v1".into(),
            name: String::new(),
            version_number: "1.0.0".into(),
            date_published: None,
            files: vec![
                VersionFile {
                    url: "https://cdn/a-sources.jar".into(),
                    filename: "a-sources.jar".into(),
                    primary: false,
                },
                VersionFile {
                    url: "https://cdn/a.jar".into(),
                    filename: "a.jar".into(),
                    primary: true,
                },
            ],
            dependencies: Vec::new(),
        };
        assert_eq!(version.primary_file().unwrap().filename, "a.jar");

        version.files[1].primary = false;
        assert_eq!(version.primary_file().unwrap().filename, "a-sources.jar");
    }
}
