//! Registry browsing

use crate::{OpsCtx, ProjectView};
use modhost_errors::Error;
use modhost_net::SearchQuery;
use modhost_types::SearchPage;

/// Search the registry for server-side mods compatible with the configured
/// loader and game version
///
/// `limit` defaults to the configured page size.
///
/// # Errors
///
/// Returns an error if the registry request fails.
pub async fn search(
    ctx: &OpsCtx,
    text: Option<&str>,
    index: Option<&str>,
    limit: Option<u32>,
    offset: u32,
) -> Result<SearchPage, Error> {
    let mut query = SearchQuery::new(ctx.game_version()).page(
        limit.unwrap_or(ctx.config.registry.search_limit),
        offset,
    );
    if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
        query = query.text(text);
    }
    if let Some(index) = index {
        query = query.index(index);
    }
    ctx.registry.search(&query).await
}

/// Project details plus whether a version of it is already staged or
/// installed
///
/// # Errors
///
/// Returns `ProjectNotFound` for an unknown project, or an error if the
/// registry request or the list lookup fails.
pub async fn project_details(ctx: &OpsCtx, project_id: &str) -> Result<ProjectView, Error> {
    let details = ctx
        .registry
        .project_details(project_id, ctx.game_version())
        .await?;
    let lookup = ctx.state.lookup(&details.project_id).await?;
    Ok(ProjectView::new(details, lookup))
}
