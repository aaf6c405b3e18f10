//! Backups and artifact export

use crate::{ExportReport, OpsCtx};
use modhost_errors::{Error, OpsError, UserFacingError};
use modhost_events::EventEmitter;
use modhost_store::{pack_artifacts, ArtifactLocation};
use std::path::Path;

/// Backup location names, oldest first
///
/// # Errors
///
/// Returns an error if the backups directory cannot be read.
pub async fn list_backups(ctx: &OpsCtx) -> Result<Vec<String>, Error> {
    ctx.store.list_backups().await
}

/// Pack every live artifact into a gzip-compressed tar archive at `dest`
///
/// # Errors
///
/// Returns `ArchiveFailed` if an artifact cannot be read or the archive
/// cannot be written.
pub async fn export_artifacts(ctx: &OpsCtx, dest: &Path) -> Result<ExportReport, Error> {
    ctx.emit_operation_started("export");
    let failed = |e: Error| OpsError::ArchiveFailed {
        message: e.user_message().into_owned(),
    };

    let names = ctx
        .store
        .list_artifacts(&ArtifactLocation::Active)
        .await
        .map_err(failed)?;
    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let bytes = ctx
            .store
            .read_artifact(&ArtifactLocation::Active, &name)
            .await
            .map_err(failed)?;
        entries.push((name, bytes));
    }

    let artifacts = pack_artifacts(entries, dest).await.map_err(failed)?;
    ctx.emit_operation_completed("export", true);
    Ok(ExportReport {
        path: dest.to_path_buf(),
        artifacts,
    })
}
