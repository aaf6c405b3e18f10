//! Package record definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// One concrete installable unit, as persisted in the `ready` and
/// `installed` list documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Registry version identifier, unique within a list
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    pub download_url: String,
    /// Stable identity of the project across versions
    pub project_id: String,
    pub file_name: String,
    /// Version ids of the packages that pulled this one in as a dependency.
    /// Empty for packages added directly.
    #[serde(default)]
    pub dependency_of: Vec<String>,
    /// Unix seconds, set only once the record is in the installed list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<i64>,
}

impl PackageRecord {
    /// Create a directly-added record with no parents
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        download_url: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            icon_url: None,
            download_url: download_url.into(),
            project_id: project_id.into(),
            file_name: file_name.into(),
            dependency_of: Vec::new(),
            installed_at: None,
        }
    }

    /// Set the descriptive metadata
    #[must_use]
    pub fn with_metadata(
        mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        icon_url: Option<String>,
    ) -> Self {
        self.title = title.into();
        self.description = description.into();
        self.icon_url = icon_url;
        self
    }

    /// Add a parent edge
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.add_parent(parent_id);
        self
    }

    /// Record `parent_id` as requiring this package. Returns false when the
    /// edge was already present.
    pub fn add_parent(&mut self, parent_id: impl Into<String>) -> bool {
        let parent_id = parent_id.into();
        if self.dependency_of.contains(&parent_id) {
            return false;
        }
        self.dependency_of.push(parent_id);
        true
    }

    /// Drop the edge to `parent_id`. Returns false when there was none.
    pub fn remove_parent(&mut self, parent_id: &str) -> bool {
        let before = self.dependency_of.len();
        self.dependency_of.retain(|p| p != parent_id);
        before != self.dependency_of.len()
    }

    /// Whether `parent_id` depends on this package
    #[must_use]
    pub fn is_dependency_of(&self, parent_id: &str) -> bool {
        self.dependency_of.iter().any(|p| p == parent_id)
    }

    /// Whether this package was added directly rather than as a dependency
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.dependency_of.is_empty()
    }

    /// Display label, falling back to the project id for untitled records
    #[must_use]
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.project_id
        } else {
            &self.title
        }
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.id)
    }
}

/// The two persisted package lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    /// Staged for the next install
    Ready,
    /// Currently placed in the live artifact directory
    Installed,
}

impl ListName {
    /// Document name the list is persisted under
    #[must_use]
    pub fn document(self) -> &'static str {
        match self {
            Self::Ready => "ready_to_install.json",
            Self::Installed => "installed_mods.json",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Installed => "installed",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a project currently sits, used to annotate search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLookup {
    pub version_id: Option<String>,
    pub installed: bool,
    pub ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_edges_are_a_set() {
        let mut record = PackageRecord::new("v2", "P2", "https://cdn/x.jar", "x.jar");
        assert!(record.is_direct());
        assert!(record.add_parent("v1"));
        assert!(!record.add_parent("v1"));
        assert!(record.add_parent("v3"));
        assert_eq!(record.dependency_of, vec!["v1", "v3"]);
        assert!(record.remove_parent("v1"));
        assert!(!record.remove_parent("v1"));
        assert_eq!(record.dependency_of, vec!["v3"]);
    }

    #[test]
    fn test_reads_records_without_optional_fields() {
        // Directly added records were historically written without
        // dependency_of or installed_at.
        let json = r#"{
            "id": "v1",
            "title": "Fabric API",
            "description": "Core hooks",
            "icon_url": null,
            "download_url": "https://cdn.modrinth.com/fabric-api.jar",
            "project_id": "P7dR8mSH",
            "file_name": "fabric-api.jar"
        }"#;
        let record: PackageRecord = serde_json::from_str(json).unwrap();
        assert!(record.dependency_of.is_empty());
        assert_eq!(record.installed_at, None);
        assert_eq!(record.label(), "Fabric API");
    }

    #[test]
    fn test_installed_at_omitted_until_set() {
        let mut record = PackageRecord::new("v1", "P1", "https://cdn/a.jar", "a.jar");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("installed_at"));
        record.installed_at = Some(1_700_000_000);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"installed_at\":1700000000"));
    }
}
