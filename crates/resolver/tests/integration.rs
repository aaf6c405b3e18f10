//! Integration tests for the dependency resolver

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use modhost_errors::{Error, NetworkError, RegistryError};
    use modhost_net::{Registry, SearchQuery};
    use modhost_resolver::Resolver;
    use modhost_types::{
        DependencyType, ProjectDetails, ProjectFile, RegistryDependency, SearchPage,
        VersionRecord,
    };
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;

    /// In-memory registry: project `P` has exactly one version `P-v`
    #[derive(Default)]
    struct FakeRegistry {
        deps: HashMap<String, Vec<(String, DependencyType)>>,
        failing: HashSet<String>,
        delay: Option<Duration>,
    }

    impl FakeRegistry {
        fn project(mut self, project: &str, required: &[&str]) -> Self {
            self.deps.insert(
                project.to_string(),
                required
                    .iter()
                    .map(|d| ((*d).to_string(), DependencyType::Required))
                    .collect(),
            );
            self
        }

        fn with_dep(mut self, project: &str, dep: &str, kind: DependencyType) -> Self {
            self.deps
                .entry(project.to_string())
                .or_default()
                .push((dep.to_string(), kind));
            self
        }
    }

    fn version_of(project: &str) -> String {
        format!("{project}-v")
    }

    #[async_trait]
    impl Registry for FakeRegistry {
        async fn fetch_version(&self, version_id: &str) -> Result<VersionRecord, Error> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let project = version_id.trim_end_matches("-v");
            let deps = self
                .deps
                .get(project)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    version_id: version_id.to_string(),
                })?;
            Ok(VersionRecord {
                id: version_id.to_string(),
                project_id: project.to_string(),
                dependencies: deps
                    .iter()
                    .map(|(p, kind)| RegistryDependency {
                        project_id: Some(p.clone()),
                        version_id: None,
                        dependency_type: *kind,
                    })
                    .collect(),
            })
        }

        async fn fetch_project_latest_file(
            &self,
            project_id: &str,
            _game_version: &str,
        ) -> Result<ProjectFile, Error> {
            if self.failing.contains(project_id) {
                return Err(NetworkError::Timeout {
                    url: format!("https://registry/project/{project_id}"),
                }
                .into());
            }
            Ok(ProjectFile {
                project_id: project_id.to_string(),
                version_id: version_of(project_id),
                title: project_id.to_uppercase(),
                description: String::new(),
                icon_url: None,
                file_url: format!("https://cdn/{project_id}.jar"),
                file_name: format!("{project_id}.jar"),
            })
        }

        async fn search(&self, _query: &SearchQuery) -> Result<SearchPage, Error> {
            unimplemented!()
        }

        async fn project_details(
            &self,
            _project_id: &str,
            _game_version: &str,
        ) -> Result<ProjectDetails, Error> {
            unimplemented!()
        }
    }

    fn resolver(registry: FakeRegistry) -> Resolver {
        Resolver::new(Arc::new(registry), "1.21.1")
    }

    #[tokio::test]
    async fn collects_transitive_required_dependencies() {
        let registry = FakeRegistry::default()
            .project("A", &["B"])
            .project("B", &["C"])
            .project("C", &[])
            .with_dep("A", "D", DependencyType::Optional)
            .with_dep("A", "E", DependencyType::Incompatible);

        let resolution = resolver(registry)
            .resolve("A-v", &HashSet::new())
            .await
            .unwrap();

        let ids: Vec<_> = resolution.packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B-v", "C-v"]);
        assert_eq!(resolution.packages[0].dependency_of, vec!["A-v".to_string()]);
        assert_eq!(resolution.packages[1].dependency_of, vec!["B-v".to_string()]);
        assert!(resolution.known_edges.is_empty());
    }

    #[tokio::test]
    async fn diamond_dependency_is_fetched_once_with_both_parents() {
        let registry = FakeRegistry::default()
            .project("A", &["B", "C"])
            .project("B", &["D"])
            .project("C", &["D"])
            .project("D", &[]);

        let resolution = resolver(registry)
            .resolve("A-v", &HashSet::new())
            .await
            .unwrap();

        let d: Vec<_> = resolution
            .packages
            .iter()
            .filter(|p| p.project_id == "D")
            .collect();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].dependency_of, vec!["B-v".to_string(), "C-v".to_string()]);
    }

    #[tokio::test]
    async fn cycles_terminate_and_skip_the_root_project() {
        let registry = FakeRegistry::default()
            .project("A", &["B"])
            .project("B", &["C"])
            .project("C", &["A", "B"]);

        let resolution = resolver(registry)
            .resolve("A-v", &HashSet::new())
            .await
            .unwrap();

        let projects: Vec<_> = resolution
            .packages
            .iter()
            .map(|p| p.project_id.as_str())
            .collect();
        assert_eq!(projects, vec!["B", "C"]);
        assert!(resolution.known_edges.is_empty());
        let b = &resolution.packages[0];
        assert_eq!(b.dependency_of, vec!["A-v".to_string(), "C-v".to_string()]);
    }

    #[tokio::test]
    async fn known_projects_are_not_fetched() {
        let registry = FakeRegistry::default()
            .project("A", &["B", "K"])
            .project("B", &["K"])
            .project("K", &["Z"])
            .project("Z", &[]);
        let known: HashSet<String> = ["K".to_string()].into();

        let resolution = resolver(registry).resolve("A-v", &known).await.unwrap();

        assert_eq!(resolution.packages.len(), 1);
        assert_eq!(resolution.packages[0].project_id, "B");
        let parents: BTreeSet<_> = resolution
            .known_edges
            .iter()
            .map(|e| (e.project_id.as_str(), e.parent_id.as_str()))
            .collect();
        assert_eq!(parents, BTreeSet::from([("K", "A-v"), ("K", "B-v")]));
    }

    #[tokio::test]
    async fn any_fetch_failure_aborts_the_walk() {
        let mut registry = FakeRegistry::default()
            .project("A", &["B", "C"])
            .project("B", &[])
            .project("C", &[]);
        registry.failing.insert("C".to_string());

        let (tx, mut rx) = modhost_events::channel();
        let err = resolver(registry)
            .with_events(tx)
            .resolve("A-v", &HashSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(NetworkError::Timeout { .. })));

        let mut saw_failure = false;
        while let Ok(message) = rx.try_recv() {
            if let modhost_events::AppEvent::Resolver(modhost_events::ResolverEvent::Failed {
                ..
            }) = message.event
            {
                saw_failure = true;
            }
        }
        assert!(saw_failure);
    }

    #[tokio::test]
    async fn unknown_root_is_version_not_found() {
        let err = resolver(FakeRegistry::default())
            .resolve("missing-v", &HashSet::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::VersionNotFound { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_registry_hits_the_walk_budget() {
        let mut registry = FakeRegistry::default()
            .project("A", &["B"])
            .project("B", &[]);
        registry.delay = Some(Duration::from_secs(60));

        let err = resolver(registry)
            .with_timeout(Duration::from_secs(90))
            .resolve("A-v", &HashSet::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::ResolveTimeout { seconds: 90 })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn reachable(graph: &HashMap<String, Vec<String>>, root: &str) -> BTreeSet<String> {
            let mut seen = BTreeSet::new();
            let mut stack = vec![root.to_string()];
            while let Some(p) = stack.pop() {
                for d in graph.get(&p).into_iter().flatten() {
                    if d != root && seen.insert(d.clone()) {
                        stack.push(d.clone());
                    }
                }
            }
            seen
        }

        proptest! {
            #[test]
            fn walk_terminates_with_unique_projects(
                edges in prop::collection::vec(prop::collection::vec(0usize..8, 0..5), 8),
                known in prop::collection::hash_set(1usize..8, 0..3),
            ) {
                let graph: HashMap<String, Vec<String>> = edges
                    .iter()
                    .enumerate()
                    .map(|(p, ds)| (format!("P{p}"), ds.iter().map(|d| format!("P{d}")).collect()))
                    .collect();
                let mut registry = FakeRegistry::default();
                for (p, ds) in &graph {
                    let refs: Vec<&str> = ds.iter().map(String::as_str).collect();
                    registry = registry.project(p, &refs);
                }
                let known: HashSet<String> = known.iter().map(|k| format!("P{k}")).collect();

                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .unwrap();
                let resolution = runtime
                    .block_on(resolver(registry).resolve("P0-v", &known))
                    .unwrap();

                let mut seen = HashSet::new();
                for p in &resolution.packages {
                    prop_assert!(seen.insert(p.project_id.clone()));
                    prop_assert!(!known.contains(&p.project_id));
                    prop_assert_ne!(p.project_id.as_str(), "P0");
                    prop_assert!(!p.dependency_of.is_empty());
                }

                if known.is_empty() {
                    let expected = reachable(&graph, "P0");
                    let got: BTreeSet<String> =
                        resolution.packages.iter().map(|p| p.project_id.clone()).collect();
                    prop_assert_eq!(got, expected);
                }
            }
        }
    }
}
