//! Transitive dependency walk

use modhost_errors::{Error, RegistryError};
use modhost_events::{AppEvent, EventEmitter, EventSender, FailureContext, ResolverEvent};
use modhost_net::Registry;
use modhost_types::{KnownEdge, Resolution, VersionRecord};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Dependency resolver
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<dyn Registry>,
    game_version: String,
    timeout: Duration,
    tx: Option<EventSender>,
}

impl EventEmitter for Resolver {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

/// Mutable state threaded through one walk
struct Walk {
    root_id: String,
    root_project: String,
    /// Projects that must not be fetched again
    discovered: HashSet<String>,
    resolution: Resolution,
}

impl Resolver {
    #[must_use]
    pub fn new(registry: Arc<dyn Registry>, game_version: impl Into<String>) -> Self {
        Self {
            registry,
            game_version: game_version.into(),
            timeout: Duration::from_secs(120),
            tx: None,
        }
    }

    /// Budget for one complete walk
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Resolve the required dependencies of `root_version_id`
    ///
    /// Projects in `known` are never fetched; a required dependency on one
    /// of them is reported as a [`KnownEdge`] so the caller can record the
    /// parent. The root's own project is never part of the result.
    ///
    /// # Errors
    ///
    /// Any registry failure aborts the walk and no partial result is
    /// returned. Exceeding the walk budget yields `ResolveTimeout`.
    pub async fn resolve(
        &self,
        root_version_id: &str,
        known: &HashSet<String>,
    ) -> Result<Resolution, Error> {
        let walk = self.walk(root_version_id, known);
        let result = match tokio::time::timeout(self.timeout, walk).await {
            Ok(result) => result,
            Err(_) => Err(RegistryError::ResolveTimeout {
                seconds: self.timeout.as_secs(),
            }
            .into()),
        };

        if let Err(e) = &result {
            self.emit_correlated(
                root_version_id,
                AppEvent::Resolver(ResolverEvent::Failed {
                    root_id: root_version_id.to_string(),
                    failure: FailureContext::from_error(e),
                }),
            );
        }
        result
    }

    async fn walk(
        &self,
        root_version_id: &str,
        known: &HashSet<String>,
    ) -> Result<Resolution, Error> {
        let root = self.registry.fetch_version(root_version_id).await?;

        self.emit_correlated(
            root_version_id,
            AppEvent::Resolver(ResolverEvent::Started {
                root_id: root_version_id.to_string(),
                project_id: root.project_id.clone(),
                known_projects: known.len(),
                timeout_seconds: self.timeout.as_secs(),
            }),
        );

        let mut discovered = known.clone();
        discovered.insert(root.project_id.clone());
        let mut walk = Walk {
            root_id: root_version_id.to_string(),
            root_project: root.project_id.clone(),
            discovered,
            resolution: Resolution::new(root_version_id),
        };

        self.visit(root, &mut walk).await?;
        Ok(walk.resolution)
    }

    /// Stage the required dependencies of `version`, then descend into each
    /// newly discovered one
    async fn visit(&self, version: VersionRecord, walk: &mut Walk) -> Result<(), Error> {
        for dependency in &version.dependencies {
            let Some(project_id) = dependency.required_project() else {
                continue;
            };

            if let Some(existing) = walk
                .resolution
                .packages
                .iter_mut()
                .find(|p| p.project_id == project_id)
            {
                existing.add_parent(version.id.clone());
                continue;
            }

            if walk.discovered.contains(project_id) {
                if project_id != walk.root_project {
                    let edge = KnownEdge {
                        project_id: project_id.to_string(),
                        parent_id: version.id.clone(),
                    };
                    if !walk.resolution.known_edges.contains(&edge) {
                        self.emit_correlated(
                            &walk.root_id,
                            AppEvent::Resolver(ResolverEvent::KnownDependency {
                                root_id: walk.root_id.clone(),
                                project_id: edge.project_id.clone(),
                            }),
                        );
                        walk.resolution.known_edges.push(edge);
                    }
                }
                continue;
            }

            walk.discovered.insert(project_id.to_string());
            let file = self
                .registry
                .fetch_project_latest_file(project_id, &self.game_version)
                .await?;
            let next_id = file.version_id.clone();

            self.emit_correlated(
                &walk.root_id,
                AppEvent::Resolver(ResolverEvent::DependencyStaged {
                    root_id: walk.root_id.clone(),
                    version_id: next_id.clone(),
                    project_id: project_id.to_string(),
                }),
            );
            walk.resolution
                .packages
                .push(file.into_record().with_parent(version.id.clone()));

            let next = self.registry.fetch_version(&next_id).await?;
            Box::pin(self.visit(next, walk)).await?;
        }
        Ok(())
    }
}
