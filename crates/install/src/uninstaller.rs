//! Removal cascade with artifact cleanup

use modhost_errors::{Error, UserFacingError};
use modhost_events::{AppEvent, EventEmitter, EventSender, FailureContext, UninstallEvent};
use modhost_state::PackageState;
use modhost_store::ArtifactLocation;
use modhost_types::{ListName, RemovalReport};

/// Removes records from either list
#[derive(Debug, Clone)]
pub struct Uninstaller {
    state: PackageState,
    tx: Option<EventSender>,
}

impl EventEmitter for Uninstaller {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl Uninstaller {
    #[must_use]
    pub fn new(state: PackageState) -> Self {
        Self { state, tx: None }
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Remove `version_id` and every direct dependency only it needed
    ///
    /// The shortened list is persisted first. For the installed list the
    /// removed records' artifacts are then deleted from the live directory;
    /// a failed delete is reported as a warning and does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if the record is not in `list`, or a
    /// storage error if the list cannot be read or saved. The list is
    /// unchanged on error.
    pub async fn remove(&self, list: ListName, version_id: &str) -> Result<RemovalReport, Error> {
        self.emit(AppEvent::Uninstall(UninstallEvent::Started {
            version_id: version_id.to_string(),
            list: list.to_string(),
        }));

        let txn = self.state.begin().await;
        let plan = match txn.remove_by_version_id(list, version_id).await {
            Ok(plan) => plan,
            Err(e) => {
                self.emit(AppEvent::Uninstall(UninstallEvent::Failed {
                    version_id: version_id.to_string(),
                    list: list.to_string(),
                    failure: FailureContext::from_error(&e),
                }));
                return Err(e);
            }
        };

        for record in plan.removed.iter().skip(1) {
            self.emit(AppEvent::Uninstall(UninstallEvent::DependencyRemoved {
                version_id: record.id.clone(),
                parent_id: version_id.to_string(),
            }));
        }
        if !plan.retained.is_empty() {
            let remaining = txn.load(list).await.unwrap_or_default();
            for retained in &plan.retained {
                let parents = remaining
                    .iter()
                    .find(|r| &r.id == retained)
                    .map_or(0, |r| r.dependency_of.len());
                self.emit(AppEvent::Uninstall(UninstallEvent::DependencyRetained {
                    version_id: retained.clone(),
                    parent_id: version_id.to_string(),
                    remaining_parents: parents,
                }));
            }
        }

        let mut artifacts_deleted = Vec::new();
        if list == ListName::Installed {
            let store = txn.store();
            for record in &plan.removed {
                match store
                    .delete_artifact(&ArtifactLocation::Active, &record.file_name)
                    .await
                {
                    Ok(true) => artifacts_deleted.push(record.file_name.clone()),
                    Ok(false) => {}
                    Err(e) => {
                        self.emit(AppEvent::Uninstall(UninstallEvent::ArtifactDeleteFailed {
                            file_name: record.file_name.clone(),
                            error: e.user_message().into_owned(),
                        }));
                    }
                }
            }
        }

        self.emit(AppEvent::Uninstall(UninstallEvent::Completed {
            version_id: version_id.to_string(),
            list: list.to_string(),
            removed: plan.removed.iter().map(|r| r.id.clone()).collect(),
            artifacts_deleted: artifacts_deleted.len(),
        }));

        Ok(RemovalReport {
            list,
            removed: plan.removed,
            retained: plan.retained,
            artifacts_deleted,
        })
    }
}
