//! Ready → installed promotion

use crate::DEFAULT_DOWNLOAD_TIMEOUT;
use modhost_errors::{Error, InstallError, UserFacingError};
use modhost_events::{
    AppEvent, DownloadEvent, EventEmitter, EventSender, FailureContext, InstallEvent,
};
use modhost_net::ArtifactFetcher;
use modhost_state::{ListTxn, PackageState};
use modhost_store::{ArtifactLocation, BlobStore};
use modhost_types::{
    unix_timestamp, InstallOutcome, InstallReport, ListName, PackageRecord, SkippedRecord,
};
use std::sync::Arc;
use std::time::Duration;

/// Runs the install pipeline over the ready list
#[derive(Clone)]
pub struct Installer {
    state: PackageState,
    fetcher: Arc<dyn ArtifactFetcher>,
    download_timeout: Duration,
    tx: Option<EventSender>,
}

impl std::fmt::Debug for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("download_timeout", &self.download_timeout)
            .finish_non_exhaustive()
    }
}

impl EventEmitter for Installer {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl Installer {
    #[must_use]
    pub fn new(state: PackageState, fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        Self {
            state,
            fetcher,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            tx: None,
        }
    }

    #[must_use]
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Install everything in the ready list
    ///
    /// Existing artifacts are backed up, the live directory is cleared,
    /// artifacts of records already installed are restored from the backup,
    /// and each ready record is downloaded and placed. A record that fails
    /// to download or place is reported as skipped and the batch continues.
    /// The ready list is emptied at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if a list cannot be loaded, if the backup or the
    /// clearing step fails (nothing destructive has happened yet in either
    /// case), or if a list cannot be persisted afterwards.
    pub async fn install_ready(&self) -> Result<InstallOutcome, Error> {
        let txn = self.state.begin().await;
        let result = self.run(&txn).await;
        if let Err(e) = &result {
            self.emit(AppEvent::Install(InstallEvent::Failed {
                failure: FailureContext::from_error(e),
            }));
        }
        result
    }

    async fn run(&self, txn: &ListTxn) -> Result<InstallOutcome, Error> {
        let ready = txn.load(ListName::Ready).await?;
        let mut installed = txn.load(ListName::Installed).await?;
        if ready.is_empty() {
            self.emit_debug("ready list is empty, nothing to install");
            return Ok(InstallOutcome::NothingToInstall);
        }

        self.emit(AppEvent::Install(InstallEvent::Started {
            pending: ready.len(),
            installed: installed.len(),
        }));

        let store = txn.store();
        let mut report = InstallReport::default();

        if !installed.is_empty() {
            let backup = self.back_up(store.as_ref()).await?;
            report.backup = Some(backup);
        }

        let removed = store
            .clear_active()
            .await
            .map_err(|e| InstallError::ClearFailed {
                message: e.user_message().into_owned(),
            })?;
        self.emit(AppEvent::Install(InstallEvent::ActiveCleared { removed }));

        if let Some(backup) = report.backup.clone() {
            self.restore(store.as_ref(), &backup, &installed, &mut report)
                .await;
        }

        for mut record in ready {
            if installed.iter().any(|r| r.id == record.id) {
                self.emit(AppEvent::Install(InstallEvent::AlreadyInstalled {
                    version_id: record.id.clone(),
                }));
                report.already_installed.push(record.id);
                continue;
            }

            match self.place(store.as_ref(), &record).await {
                Ok(()) => {
                    record.installed_at = Some(unix_timestamp());
                    self.emit(AppEvent::Install(InstallEvent::ArtifactPlaced {
                        version_id: record.id.clone(),
                        file_name: record.file_name.clone(),
                    }));
                    report.installed.push(record.id.clone());
                    installed.push(record);
                }
                Err(e) => {
                    let reason = e.user_message().into_owned();
                    self.emit(AppEvent::Install(InstallEvent::ArtifactSkipped {
                        version_id: record.id.clone(),
                        reason: reason.clone(),
                    }));
                    report.skipped.push(SkippedRecord {
                        id: record.id,
                        reason,
                    });
                }
            }
        }

        persist(txn, ListName::Installed, &installed).await?;
        persist(txn, ListName::Ready, &[]).await?;

        self.emit(AppEvent::Install(InstallEvent::Completed {
            installed: report.installed.len(),
            already_installed: report.already_installed.len(),
            skipped: report.skipped.len(),
        }));
        Ok(InstallOutcome::Completed(report))
    }

    /// Copy every live artifact into a new backup location
    async fn back_up(&self, store: &dyn BlobStore) -> Result<String, Error> {
        let failed = |e: Error| InstallError::BackupFailed {
            message: e.user_message().into_owned(),
        };

        let name = store.create_backup().await.map_err(failed)?;
        let location = ArtifactLocation::Backup(name.clone());
        let artifacts = store
            .list_artifacts(&ArtifactLocation::Active)
            .await
            .map_err(failed)?;
        for file_name in &artifacts {
            store
                .copy_artifact(&ArtifactLocation::Active, &location, file_name)
                .await
                .map_err(failed)?;
        }

        self.emit(AppEvent::Install(InstallEvent::BackupCreated {
            location: name.clone(),
            artifacts: artifacts.len(),
        }));
        Ok(name)
    }

    /// Put artifacts of already-installed records back into the live directory
    async fn restore(
        &self,
        store: &dyn BlobStore,
        backup: &str,
        installed: &[PackageRecord],
        report: &mut InstallReport,
    ) {
        let location = ArtifactLocation::Backup(backup.to_string());
        for record in installed {
            let restored = store
                .copy_artifact(&location, &ArtifactLocation::Active, &record.file_name)
                .await;
            match restored {
                Ok(()) => self.emit(AppEvent::Install(InstallEvent::ArtifactRestored {
                    file_name: record.file_name.clone(),
                })),
                Err(e) => {
                    let err = InstallError::RestoreFailed {
                        file_name: record.file_name.clone(),
                        message: e.user_message().into_owned(),
                    };
                    self.emit(AppEvent::Install(InstallEvent::RestoreFailed {
                        file_name: record.file_name.clone(),
                        failure: FailureContext::from_error(&err),
                    }));
                    report.restore_failures.push(SkippedRecord {
                        id: record.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    /// Download one record's artifact and write it to the live directory
    async fn place(&self, store: &dyn BlobStore, record: &PackageRecord) -> Result<(), Error> {
        let url = record.download_url.clone();
        let package = Some(record.label().to_string());
        self.emit(AppEvent::Download(DownloadEvent::Started {
            url: url.clone(),
            package: package.clone(),
        }));

        let fetched = tokio::time::timeout(self.download_timeout, self.fetcher.fetch_artifact(&url))
            .await
            .map_err(|_| InstallError::DownloadTimeout {
                version_id: record.id.clone(),
                url: url.clone(),
                timeout_seconds: self.download_timeout.as_secs(),
            })
            .map_err(Error::from)
            .and_then(|inner| inner);

        let bytes = match fetched {
            Ok(bytes) => bytes,
            Err(e) => {
                self.emit(AppEvent::Download(DownloadEvent::Failed {
                    url,
                    package,
                    failure: FailureContext::from_error(&e),
                }));
                return Err(e);
            }
        };

        self.emit(AppEvent::Download(DownloadEvent::Completed {
            url,
            package,
            bytes_downloaded: bytes.len() as u64,
        }));

        store
            .place_artifact(&record.file_name, &bytes)
            .await
            .map_err(|e| {
                InstallError::RecordFailed {
                    version_id: record.id.clone(),
                    message: e.user_message().into_owned(),
                }
                .into()
            })
    }
}

async fn persist(txn: &ListTxn, list: ListName, records: &[PackageRecord]) -> Result<(), Error> {
    txn.save(list, records).await.map_err(|e| {
        InstallError::PersistFailed {
            list: list.to_string(),
            message: e.user_message().into_owned(),
        }
        .into()
    })
}
