//! Integration tests for state management

#[cfg(test)]
mod tests {
    use modhost_errors::{Error, StateError, StorageError};
    use modhost_state::*;
    use modhost_store::{BlobStore, LocalBlobStore};
    use modhost_types::{CommandRecord, KnownEdge, ListName, PackageRecord, Resolution};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (PackageState, Arc<dyn BlobStore>, TempDir) {
        let dir = tempdir().unwrap();
        let store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
            dir.path().join("config"),
            dir.path().join("mods"),
            dir.path().join("mods_backup"),
        ));
        (PackageState::new(Arc::clone(&store)), store, dir)
    }

    fn record(id: &str, project: &str) -> PackageRecord {
        PackageRecord::new(
            id,
            project,
            format!("https://cdn.modrinth.com/{id}.jar"),
            format!("{project}-{id}.jar"),
        )
        .with_metadata(format!("Mod {project}"), "desc", None)
    }

    #[tokio::test]
    async fn save_then_load_preserves_records() {
        let (state, _store, _dir) = setup();
        let mut installed = record("v1", "P1").with_parent("v0");
        installed.installed_at = Some(1_700_000_000);
        let records = vec![record("v0", "P0"), installed];

        let txn = state.begin().await;
        txn.save(ListName::Installed, &records).await.unwrap();
        let loaded = txn.load(ListName::Installed).await.unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn absent_documents_are_empty_lists() {
        let (state, _store, _dir) = setup();
        assert!(state.list(ListName::Ready).await.is_empty());
        assert!(state.known_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_resolved_twice_is_rejected_without_changes() {
        let (state, store, _dir) = setup();
        let mut resolution = Resolution::new("a1");
        resolution.packages.push(record("d1", "D").with_parent("a1"));

        state
            .add_resolved(record("a1", "A"), &resolution)
            .await
            .unwrap();
        let before = store
            .read_document(ListName::Ready.document())
            .await
            .unwrap();

        let err = state
            .add_resolved(record("a1", "A"), &resolution)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::State(StateError::DuplicateProject { .. })
        ));
        let after = store
            .read_document(ListName::Ready.document())
            .await
            .unwrap();
        assert_eq!(before, after);
        assert!(state.list(ListName::Installed).await.is_empty());
    }

    #[tokio::test]
    async fn shared_dependency_appears_once_with_both_parents() {
        let (state, _store, _dir) = setup();

        let mut first = Resolution::new("a1");
        first.packages.push(record("p1", "P").with_parent("a1"));
        state.add_resolved(record("a1", "A"), &first).await.unwrap();

        let mut second = Resolution::new("b1");
        second.known_edges.push(KnownEdge {
            project_id: "P".into(),
            parent_id: "b1".into(),
        });
        let report = state.add_resolved(record("b1", "B"), &second).await.unwrap();
        assert_eq!(report.linked, vec!["p1".to_string()]);

        let ready = state.list(ListName::Ready).await;
        let shared: Vec<_> = ready.iter().filter(|r| r.project_id == "P").collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].dependency_of, vec!["a1".to_string(), "b1".to_string()]);
    }

    #[tokio::test]
    async fn add_direct_checks_both_lists() {
        let (state, _store, _dir) = setup();
        {
            let txn = state.begin().await;
            txn.save(ListName::Installed, &[record("v1", "P1")])
                .await
                .unwrap();
        }

        let err = state.add_direct(record("v2", "P1")).await.unwrap_err();
        assert!(err.to_string().contains("already added"));
        state.add_direct(record("v3", "P3")).await.unwrap();

        let lookup = state.lookup("P1").await.unwrap();
        assert_eq!(lookup.version_id.as_deref(), Some("v1"));
        assert!(lookup.installed);
        assert!(!lookup.ready);

        let lookup = state.lookup("P3").await.unwrap();
        assert!(lookup.ready);
        assert!(!state.lookup("nope").await.unwrap().installed);
    }

    #[tokio::test]
    async fn lookup_prefers_installed_when_project_is_in_both_lists() {
        let (state, _store, _dir) = setup();
        {
            let txn = state.begin().await;
            txn.save(ListName::Installed, &[record("v1", "P1")])
                .await
                .unwrap();
            txn.save(ListName::Ready, &[record("v2", "P1")]).await.unwrap();
        }

        let lookup = state.lookup("P1").await.unwrap();
        assert_eq!(lookup.version_id.as_deref(), Some("v1"));
        assert!(lookup.installed);
        assert!(!lookup.ready);
    }

    #[tokio::test]
    async fn concurrent_adds_of_one_project_admit_exactly_one() {
        let (state, _store, _dir) = setup();
        let mut handles = Vec::new();
        for i in 0..8 {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                state.add_direct(record(&format!("v{i}"), "SAME")).await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(state.list(ListName::Ready).await.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_document_blocks_mutation_but_not_listing() {
        let (state, store, _dir) = setup();
        store
            .write_document(ListName::Ready.document(), b"{not json")
            .await
            .unwrap();

        let err = state.add_direct(record("v1", "P1")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::CorruptedData { .. })
        ));
        let bytes = store
            .read_document(ListName::Ready.document())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bytes, b"{not json");

        let (tx, mut rx) = modhost_events::channel();
        let state = state.with_events(tx);
        assert!(state.list(ListName::Ready).await.is_empty());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn remove_by_version_id_persists_cascade() {
        let (state, _store, _dir) = setup();
        let txn = state.begin().await;
        txn.save(
            ListName::Installed,
            &[record("v1", "P1"), record("v2", "P2").with_parent("v1")],
        )
        .await
        .unwrap();

        let plan = txn
            .remove_by_version_id(ListName::Installed, "v1")
            .await
            .unwrap();
        assert_eq!(plan.removed.len(), 2);
        assert!(txn.load(ListName::Installed).await.unwrap().is_empty());

        let err = txn
            .remove_by_version_id(ListName::Installed, "v1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::State(StateError::PackageNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn command_log_appends_in_order() {
        let (_state, store, _dir) = setup();
        let log = CommandLog::new(store);
        assert!(log.history().await.is_empty());

        log.append(CommandRecord {
            timestamp: 1,
            command: "say hello".into(),
        })
        .await
        .unwrap();
        log.append(CommandRecord {
            timestamp: 2,
            command: "time set day".into(),
        })
        .await
        .unwrap();

        let history = log.history().await;
        let commands: Vec<_> = history.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(commands, vec!["say hello", "time set day"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ready_never_holds_two_versions_of_a_project(
                roots in prop::collection::vec((0u8..6, prop::collection::vec(0u8..6, 0..4)), 1..8)
            ) {
                let mut ready: Vec<PackageRecord> = Vec::new();
                let installed = vec![record("i0", "P0")];

                for (n, (root_project, deps)) in roots.iter().enumerate() {
                    let root_id = format!("r{n}");
                    let mut resolution = Resolution::new(&root_id);
                    for (m, dep) in deps.iter().enumerate() {
                        resolution.packages.push(
                            record(&format!("d{n}_{m}"), &format!("P{dep}")).with_parent(&root_id),
                        );
                    }
                    let _ = merge::merge_resolved(
                        record(&root_id, &format!("P{root_project}")),
                        &resolution,
                        &mut ready,
                        &installed,
                    );
                }

                let mut seen = std::collections::HashSet::new();
                for r in &ready {
                    prop_assert!(seen.insert(r.project_id.clone()));
                    prop_assert_ne!(r.project_id.as_str(), "P0");
                }
            }
        }
    }
}
