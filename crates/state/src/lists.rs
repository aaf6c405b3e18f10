//! The two package lists behind one lock

use crate::cascade::{self, CascadePlan};
use crate::{codec, merge};
use modhost_errors::Error;
use modhost_events::{EventEmitter, EventSender};
use modhost_store::BlobStore;
use modhost_types::{ListName, PackageRecord, ProjectLookup, Resolution, StageReport};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Package list manager
///
/// Both lists share a single lock, so checks that span them and the write
/// that follows are atomic with respect to every other list operation.
#[derive(Clone)]
pub struct PackageState {
    store: Arc<dyn BlobStore>,
    lock: Arc<Mutex<()>>,
    tx: Option<EventSender>,
}

impl std::fmt::Debug for PackageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageState").finish_non_exhaustive()
    }
}

impl EventEmitter for PackageState {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl PackageState {
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
            tx: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Take the list lock. Everything done through the returned handle is
    /// serialized against every other list operation until it is dropped.
    pub async fn begin(&self) -> ListTxn {
        let guard = Arc::clone(&self.lock).lock_owned().await;
        ListTxn {
            _guard: guard,
            store: Arc::clone(&self.store),
        }
    }

    /// Read a list for display
    ///
    /// An unreadable document is reported as a warning and read as empty.
    pub async fn list(&self, list: ListName) -> Vec<PackageRecord> {
        let txn = self.begin().await;
        txn.load(list).await.unwrap_or_else(|e| {
            self.emit_warning_with_context(
                format!("{list} list could not be read, showing it as empty"),
                e.to_string(),
            );
            Vec::new()
        })
    }

    /// Where a project currently sits. The installed list is checked first;
    /// a project found there is never also reported as ready.
    ///
    /// # Errors
    ///
    /// Returns an error if either list document cannot be read or decoded.
    pub async fn lookup(&self, project_id: &str) -> Result<ProjectLookup, Error> {
        let txn = self.begin().await;
        let ready = txn.load(ListName::Ready).await?;
        let installed = txn.load(ListName::Installed).await?;

        let find = |records: &[PackageRecord]| {
            records
                .iter()
                .find(|r| r.project_id == project_id)
                .map(|r| r.id.clone())
        };
        Ok(match find(&installed) {
            Some(id) => ProjectLookup {
                version_id: Some(id),
                installed: true,
                ready: false,
            },
            None => {
                let staged = find(&ready);
                ProjectLookup {
                    ready: staged.is_some(),
                    version_id: staged,
                    installed: false,
                }
            }
        })
    }

    /// Project ids present in either list
    ///
    /// # Errors
    ///
    /// Returns an error if either list document cannot be read or decoded.
    pub async fn known_projects(&self) -> Result<HashSet<String>, Error> {
        self.begin().await.known_projects().await
    }

    /// Stage a record added by hand
    ///
    /// # Errors
    ///
    /// Returns `DuplicateProject` if any version of the project is already
    /// in either list, or a storage error if a list cannot be read or saved.
    pub async fn add_direct(&self, record: PackageRecord) -> Result<(), Error> {
        let txn = self.begin().await;
        let mut ready = txn.load(ListName::Ready).await?;
        let installed = txn.load(ListName::Installed).await?;

        merge::ensure_not_added(&record.project_id, &ready, &installed)?;
        ready.push(record);
        txn.save(ListName::Ready, &ready).await
    }

    /// Stage a root record together with the dependencies resolved for it
    ///
    /// # Errors
    ///
    /// Returns `DuplicateProject` if the root's project is already added, or
    /// a storage error if a list cannot be read or saved. Lists are unchanged
    /// on error.
    pub async fn add_resolved(
        &self,
        root: PackageRecord,
        resolution: &Resolution,
    ) -> Result<StageReport, Error> {
        let txn = self.begin().await;
        let mut ready = txn.load(ListName::Ready).await?;
        let installed = txn.load(ListName::Installed).await?;

        let report = merge::merge_resolved(root, resolution, &mut ready, &installed)?;
        txn.save(ListName::Ready, &ready).await?;
        Ok(report)
    }
}

/// Exclusive access to both lists
pub struct ListTxn {
    _guard: OwnedMutexGuard<()>,
    store: Arc<dyn BlobStore>,
}

impl ListTxn {
    /// Load a list; an absent document is an empty list
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or decoded.
    pub async fn load(&self, list: ListName) -> Result<Vec<PackageRecord>, Error> {
        match self.store.read_document(list.document()).await? {
            Some(bytes) => codec::decode(list.document(), &bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Replace a list document
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the atomic write fails.
    pub async fn save(&self, list: ListName, records: &[PackageRecord]) -> Result<(), Error> {
        let bytes = codec::encode(records)?;
        self.store.write_document(list.document(), &bytes).await
    }

    /// # Errors
    ///
    /// Returns an error if either list document cannot be read or decoded.
    pub async fn known_projects(&self) -> Result<HashSet<String>, Error> {
        let mut known: HashSet<String> = self
            .load(ListName::Ready)
            .await?
            .into_iter()
            .map(|r| r.project_id)
            .collect();
        known.extend(
            self.load(ListName::Installed)
                .await?
                .into_iter()
                .map(|r| r.project_id),
        );
        Ok(known)
    }

    /// Remove a record and its orphaned direct dependencies from one list
    /// and persist the result
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if the target is absent, or a storage error
    /// if the list cannot be read or saved. The document is unchanged on
    /// error.
    pub async fn remove_by_version_id(
        &self,
        list: ListName,
        version_id: &str,
    ) -> Result<CascadePlan, Error> {
        let mut records = self.load(list).await?;
        let plan = cascade::plan_removal(&mut records, list, version_id)?;
        self.save(list, &records).await?;
        Ok(plan)
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }
}
