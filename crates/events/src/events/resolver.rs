use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Resolver domain events for the transitive dependency walk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResolverEvent {
    /// Walk started from a root version
    Started {
        root_id: String,
        project_id: String,
        known_projects: usize,
        timeout_seconds: u64,
    },

    /// A new dependency version was discovered and will be staged
    DependencyStaged {
        root_id: String,
        version_id: String,
        project_id: String,
    },

    /// A dependency whose project is already tracked; not fetched again
    KnownDependency {
        root_id: String,
        project_id: String,
    },

    /// Walk finished and the results were merged into the ready list
    Completed {
        root_id: String,
        added: Vec<String>,
        linked: Vec<String>,
        duration_ms: u64,
    },

    Failed {
        root_id: String,
        failure: FailureContext,
    },
}
