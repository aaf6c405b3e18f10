//! Single-level removal cascade over one list

use modhost_errors::StateError;
use modhost_types::{ListName, PackageRecord};

/// What a removal took out of a list and what it kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    /// Target first, then its orphaned direct dependencies in list order
    pub removed: Vec<PackageRecord>,
    /// Dependencies kept because another parent still needs them
    pub retained: Vec<String>,
}

/// Remove `target` and every direct dependency that only `target` needed
///
/// Dependencies shared with another parent lose their edge to `target` and
/// stay. Dependencies of the removed dependencies are not examined. On
/// error `records` is left as it was.
pub fn plan_removal(
    records: &mut Vec<PackageRecord>,
    list: ListName,
    target: &str,
) -> Result<CascadePlan, StateError> {
    if !records.iter().any(|r| r.id == target) {
        return Err(StateError::PackageNotFound {
            version_id: target.to_string(),
            list: list.to_string(),
        });
    }

    let mut retained = Vec::new();
    let mut orphaned = Vec::new();
    for record in records.iter_mut() {
        if record.id == target || !record.is_dependency_of(target) {
            continue;
        }
        if record.dependency_of.len() > 1 {
            record.remove_parent(target);
            retained.push(record.id.clone());
        } else {
            orphaned.push(record.id.clone());
        }
    }

    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(records.len());
    for record in records.drain(..) {
        if record.id == target {
            removed.insert(0, record);
        } else if orphaned.contains(&record.id) {
            removed.push(record);
        } else {
            kept.push(record);
        }
    }
    *records = kept;

    Ok(CascadePlan { removed, retained })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, project: &str, parents: &[&str]) -> PackageRecord {
        let mut r = PackageRecord::new(id, project, "https://cdn/f.jar", format!("{id}.jar"));
        for p in parents {
            r.add_parent(*p);
        }
        r
    }

    #[test]
    fn sole_parent_takes_dependency_with_it() {
        let mut list = vec![record("v1", "P1", &[]), record("v2", "P2", &["v1"])];
        let plan = plan_removal(&mut list, ListName::Installed, "v1").unwrap();

        let removed: Vec<_> = plan.removed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(removed, vec!["v1", "v2"]);
        assert!(plan.retained.is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn shared_dependency_is_retained() {
        let mut list = vec![
            record("v1", "P1", &[]),
            record("v2", "P2", &["v1", "v3"]),
            record("v3", "P3", &[]),
        ];
        let plan = plan_removal(&mut list, ListName::Installed, "v1").unwrap();

        assert_eq!(plan.removed.len(), 1);
        assert_eq!(plan.retained, vec!["v2".to_string()]);
        let v2 = list.iter().find(|r| r.id == "v2").unwrap();
        assert_eq!(v2.dependency_of, vec!["v3".to_string()]);
    }

    #[test]
    fn cascade_is_single_level() {
        let mut list = vec![
            record("v1", "P1", &[]),
            record("v2", "P2", &["v1"]),
            record("v3", "P3", &["v2"]),
        ];
        plan_removal(&mut list, ListName::Ready, "v1").unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "v3");
        assert_eq!(list[0].dependency_of, vec!["v2".to_string()]);
    }

    #[test]
    fn missing_target_changes_nothing() {
        let mut list = vec![record("v1", "P1", &[])];
        let before = list.clone();
        let err = plan_removal(&mut list, ListName::Ready, "nope").unwrap_err();
        assert!(matches!(err, StateError::PackageNotFound { .. }));
        assert_eq!(list, before);
    }

    #[test]
    fn removing_a_dependency_directly_keeps_its_parent() {
        let mut list = vec![record("v1", "P1", &[]), record("v2", "P2", &["v1"])];
        let plan = plan_removal(&mut list, ListName::Ready, "v2").unwrap();
        assert_eq!(plan.removed.len(), 1);
        assert_eq!(list[0].id, "v1");
    }
}
