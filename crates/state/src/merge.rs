//! Staging rules for the ready list

use modhost_errors::StateError;
use modhost_types::{ListName, PackageRecord, Resolution, StageReport};

/// Fail if any version of `project_id` is already in either list
pub fn ensure_not_added(
    project_id: &str,
    ready: &[PackageRecord],
    installed: &[PackageRecord],
) -> Result<(), StateError> {
    let hit = ready
        .iter()
        .map(|r| (r, ListName::Ready))
        .chain(installed.iter().map(|r| (r, ListName::Installed)))
        .find(|(r, _)| r.project_id == project_id);

    match hit {
        Some((existing, list)) => Err(StateError::DuplicateProject {
            project_id: project_id.to_string(),
            existing_id: existing.id.clone(),
            list: list.to_string(),
        }),
        None => Ok(()),
    }
}

/// Merge a root record and its resolved dependencies into `ready`
///
/// Nothing is modified when the root's project is already added.
/// Dependencies already installed are left alone. A dependency already
/// staged is not duplicated; it gains the root as a parent, whichever
/// version of the walk declared it. Only records the walk created keep
/// their declaring parents.
pub fn merge_resolved(
    root: PackageRecord,
    resolution: &Resolution,
    ready: &mut Vec<PackageRecord>,
    installed: &[PackageRecord],
) -> Result<StageReport, StateError> {
    ensure_not_added(&root.project_id, ready, installed)?;

    let mut added = Vec::new();
    let mut linked = Vec::new();

    for dependency in &resolution.packages {
        if dependency.project_id == root.project_id
            || installed.iter().any(|r| r.project_id == dependency.project_id)
        {
            continue;
        }
        match ready
            .iter_mut()
            .find(|r| r.project_id == dependency.project_id)
        {
            Some(existing) => link_root(existing, &root.id, &mut linked),
            None => {
                added.push(dependency.id.clone());
                ready.push(dependency.clone());
            }
        }
    }

    for edge in &resolution.known_edges {
        if edge.project_id == root.project_id {
            continue;
        }
        if let Some(existing) = ready.iter_mut().find(|r| r.project_id == edge.project_id) {
            link_root(existing, &root.id, &mut linked);
        }
    }

    let report = StageReport {
        root_id: root.id.clone(),
        project_id: root.project_id.clone(),
        added,
        linked,
    };
    ready.push(root);
    Ok(report)
}

fn link_root(existing: &mut PackageRecord, root_id: &str, linked: &mut Vec<String>) {
    if existing.add_parent(root_id.to_string()) && !linked.contains(&existing.id) {
        linked.push(existing.id.clone());
    }
}
