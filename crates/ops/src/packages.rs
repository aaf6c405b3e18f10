//! Package list operations

use crate::OpsCtx;
use modhost_errors::Error;
use modhost_events::{AppEvent, EventEmitter, ResolverEvent};
use modhost_state::merge;
use modhost_types::{
    InstallOutcome, ListName, PackageRecord, ProjectLookup, RemovalReport, StageReport,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Stage `root` in the ready list, with its required dependencies when
/// `recursive` is set
///
/// The dependency walk runs outside the list lock against a snapshot of
/// the known projects; the merge re-checks everything under the lock.
///
/// # Errors
///
/// Returns `DuplicateProject` if a version of the root's project is already
/// in either list, or the registry error that aborted the dependency walk.
/// Lists are unchanged on error.
pub async fn resolve_and_stage(
    ctx: &OpsCtx,
    root: PackageRecord,
    recursive: bool,
) -> Result<StageReport, Error> {
    ctx.emit_operation_started("stage");

    let known = {
        let txn = ctx.state.begin().await;
        let ready = txn.load(ListName::Ready).await?;
        let installed = txn.load(ListName::Installed).await?;
        merge::ensure_not_added(&root.project_id, &ready, &installed)?;
        ready
            .iter()
            .chain(installed.iter())
            .map(|r| r.project_id.clone())
            .collect::<HashSet<_>>()
    };

    let report = if recursive {
        let started = Instant::now();
        let resolution = ctx.resolver().resolve(&root.id, &known).await?;
        let report = ctx.state.add_resolved(root, &resolution).await?;
        ctx.emit(AppEvent::Resolver(ResolverEvent::Completed {
            root_id: report.root_id.clone(),
            added: report.added.clone(),
            linked: report.linked.clone(),
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }));
        report
    } else {
        let report = StageReport {
            root_id: root.id.clone(),
            project_id: root.project_id.clone(),
            added: Vec::new(),
            linked: Vec::new(),
        };
        ctx.state.add_direct(root).await?;
        report
    };

    ctx.emit_operation_completed("stage", true);
    Ok(report)
}

/// Stage the newest compatible file of a registry project
///
/// # Errors
///
/// Returns the registry error if the project has no compatible file, plus
/// the errors of [`resolve_and_stage`].
pub async fn add_project(
    ctx: &OpsCtx,
    project_id: &str,
    recursive: bool,
) -> Result<StageReport, Error> {
    let file = ctx
        .registry
        .fetch_project_latest_file(project_id, ctx.game_version())
        .await?;
    resolve_and_stage(ctx, file.into_record(), recursive).await
}

/// Stage a record without looking at its dependencies
///
/// # Errors
///
/// Returns `DuplicateProject` if a version of the project is already added.
pub async fn add_direct(ctx: &OpsCtx, record: PackageRecord) -> Result<(), Error> {
    ctx.state.add_direct(record).await
}

/// Install everything in the ready list
///
/// # Errors
///
/// See [`modhost_install::Installer::install_ready`].
pub async fn install_ready(ctx: &OpsCtx) -> Result<InstallOutcome, Error> {
    ctx.emit_operation_started("install");
    let outcome = ctx.installer().install_ready().await?;
    ctx.emit_operation_completed("install", outcome.is_success());
    Ok(outcome)
}

/// Remove an installed record with its orphaned dependencies, then restart
/// the server without waiting for it
///
/// The restart runs on [`OpsCtx::spawn_background`]; its failure is reported
/// as a warning and never undoes the removal.
///
/// # Errors
///
/// Returns `PackageNotFound` if the version is not installed, or a storage
/// error if the list cannot be saved. No restart is triggered on error.
pub async fn remove_installed(ctx: &OpsCtx, version_id: &str) -> Result<RemovalReport, Error> {
    let report = ctx
        .uninstaller()
        .remove(ListName::Installed, version_id)
        .await?;

    let host = Arc::clone(&ctx.host);
    let tx = ctx.tx.clone();
    ctx.spawn_background(async move {
        if let Err(e) = host.restart().await {
            tx.emit_warning_with_context("server restart after removal failed", e.to_string());
        }
    });

    Ok(report)
}

/// Remove a staged record with its orphaned dependencies
///
/// # Errors
///
/// Returns `PackageNotFound` if the version is not staged, or a storage
/// error if the list cannot be saved.
pub async fn remove_ready(ctx: &OpsCtx, version_id: &str) -> Result<RemovalReport, Error> {
    ctx.uninstaller()
        .remove(ListName::Ready, version_id)
        .await
}

pub async fn list_installed(ctx: &OpsCtx) -> Vec<PackageRecord> {
    ctx.state.list(ListName::Installed).await
}

pub async fn list_ready(ctx: &OpsCtx) -> Vec<PackageRecord> {
    ctx.state.list(ListName::Ready).await
}

/// # Errors
///
/// Returns an error if either list cannot be read.
pub async fn lookup_by_project(ctx: &OpsCtx, project_id: &str) -> Result<ProjectLookup, Error> {
    ctx.state.lookup(project_id).await
}
