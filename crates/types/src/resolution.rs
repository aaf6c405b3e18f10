//! Output of one dependency walk

use crate::PackageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A dependency edge onto a project that was already tracked before the walk
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KnownEdge {
    pub project_id: String,
    /// Version id of the package that declared the dependency
    pub parent_id: String,
}

/// Everything discovered below a root version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub root_id: String,
    /// Newly discovered dependency records, depth-first discovery order
    pub packages: Vec<PackageRecord>,
    /// Required dependencies whose project was already known
    pub known_edges: Vec<KnownEdge>,
}

impl Resolution {
    #[must_use]
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            packages: Vec::new(),
            known_edges: Vec::new(),
        }
    }

    /// Project ids of the newly discovered records
    #[must_use]
    pub fn new_project_ids(&self) -> BTreeSet<&str> {
        self.packages.iter().map(|p| p.project_id.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.known_edges.is_empty()
    }
}
