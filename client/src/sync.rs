//! Best-effort reconciliation of repositories and permission targets
//! between two instances.
//!
//! The synchronizer makes the target contain every repository the source
//! has, with the source's configuration. Matching is by key only; an
//! existing target repository with different settings is overwritten.
//! There is no two-way sync, no deletion of target-side extras, and no
//! rollback: each item is one independent write, and one item's failure
//! never aborts the batch.

use std::collections::HashSet;

use reqwest::Method;

use crate::error::{ClientError, Result};
use crate::instance::Instance;
use crate::models::{PermissionSummary, ReplicationConfig, RepositoryType};
use crate::repository;

/// Credentials used for the push-replication jobs registered on the source
/// after a local-repository sync.
#[derive(Debug, Clone)]
pub struct ReplicationCredentials {
    pub username: String,
    pub password: String,
}

/// Outcome of one sync run. Per-item failures are collected here in
/// addition to being logged, so automation can branch without parsing logs.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<String>,
    pub skipped_offline: Vec<String>,
    pub failed: Vec<(String, ClientError)>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Read-only diff of the repository listings of two instances.
#[derive(Debug)]
pub struct RepoDiff {
    pub rtype: RepositoryType,
    pub source_count: usize,
    pub target_count: usize,
    pub missing_in_target: Vec<String>,
}

impl RepoDiff {
    pub fn counts_match(&self) -> bool {
        self.source_count == self.target_count
    }
}

enum ItemOutcome {
    Synced,
    SkippedOffline,
}

/// Mirror local repositories from `source` to `target` and register a
/// daily push-replication job on the source for each one.
pub async fn sync_local_repositories(
    source: &Instance,
    target: &Instance,
    replication: &ReplicationCredentials,
) -> Result<SyncReport> {
    sync_repositories(source, target, RepositoryType::Local, Some(replication)).await
}

/// Mirror remote repositories from `source` to `target`. Offline remotes
/// are skipped.
pub async fn sync_remote_repositories(source: &Instance, target: &Instance) -> Result<SyncReport> {
    sync_repositories(source, target, RepositoryType::Remote, None).await
}

/// Mirror repositories of one class from `source` to `target`.
///
/// Reconciliation is an explicit existence check against the target
/// listing followed by a single create (for missing keys) or update (for
/// present ones) — running the sync twice leaves the target unchanged.
pub async fn sync_repositories(
    source: &Instance,
    target: &Instance,
    rtype: RepositoryType,
    replication: Option<&ReplicationCredentials>,
) -> Result<SyncReport> {
    tracing::info!(
        %rtype,
        source = source.base_url(),
        target = target.base_url(),
        "Syncing repositories"
    );
    let source_repos = repository::list_repositories(source, rtype).await?;
    let target_keys: HashSet<String> = repository::list_repositories(target, rtype)
        .await?
        .into_iter()
        .map(|repo| repo.key)
        .collect();

    let mut report = SyncReport::default();
    for repo in source_repos {
        let exists = target_keys.contains(&repo.key);
        match sync_one_repository(source, target, &repo.key, rtype, exists, replication).await {
            Ok(ItemOutcome::Synced) => report.synced.push(repo.key),
            Ok(ItemOutcome::SkippedOffline) => {
                tracing::warn!(key = %repo.key, "Repository is offline and will not be migrated");
                report.skipped_offline.push(repo.key);
            }
            Err(err) => {
                tracing::error!(key = %repo.key, error = %err, "Repository sync failed");
                report.failed.push((repo.key, err));
            }
        }
    }
    tracing::info!(
        synced = report.synced.len(),
        skipped = report.skipped_offline.len(),
        failed = report.failed.len(),
        "Repository sync finished"
    );
    Ok(report)
}

async fn sync_one_repository(
    source: &Instance,
    target: &Instance,
    key: &str,
    rtype: RepositoryType,
    exists_on_target: bool,
    replication: Option<&ReplicationCredentials>,
) -> Result<ItemOutcome> {
    let config = repository::get_repository_config(source, key).await?;
    if rtype == RepositoryType::Remote && config.is_offline() {
        return Ok(ItemOutcome::SkippedOffline);
    }

    let body = if exists_on_target {
        repository::update_repository_config(target, &config).await?
    } else {
        repository::create_repository_config(target, &config).await?
    };
    tracing::debug!(key, response = %body, "Wrote repository configuration to target");

    if let Some(credentials) = replication {
        register_push_replication(source, target, key, credentials).await?;
    }
    Ok(ItemOutcome::Synced)
}

/// Register a daily push-replication job on `source` pointing at the
/// repository on `target`.
async fn register_push_replication(
    source: &Instance,
    target: &Instance,
    key: &str,
    credentials: &ReplicationCredentials,
) -> Result<()> {
    let config = ReplicationConfig::push_daily(
        format!("{}/artifactory/{key}", target.base_url()),
        key.to_string(),
        credentials.username.clone(),
        credentials.password.clone(),
    );
    source
        .send_json(
            Method::PUT,
            &format!("/artifactory/api/replications/{key}"),
            &config,
        )
        .await?;
    tracing::info!(key, "Registered push replication on source");
    Ok(())
}

/// Mirror permission targets from `source` to `target` by name.
///
/// The permission endpoint tolerates PUT-create, so every source
/// permission is written with a single PUT regardless of presence.
pub async fn sync_permissions(source: &Instance, target: &Instance) -> Result<SyncReport> {
    tracing::info!(
        source = source.base_url(),
        target = target.base_url(),
        "Syncing permission targets"
    );
    let source_permissions: Vec<PermissionSummary> = source
        .get_json("/artifactory/api/security/permissions")
        .await?;
    let target_permissions: Vec<PermissionSummary> = target
        .get_json("/artifactory/api/security/permissions")
        .await?;
    let existing: HashSet<String> = target_permissions
        .into_iter()
        .map(|permission| permission.name)
        .collect();
    tracing::debug!(existing = existing.len(), "Permission targets already on target");

    let mut report = SyncReport::default();
    for permission in source_permissions {
        match sync_one_permission(source, target, &permission.name).await {
            Ok(()) => report.synced.push(permission.name),
            Err(err) => {
                tracing::error!(name = %permission.name, error = %err, "Permission sync failed");
                report.failed.push((permission.name, err));
            }
        }
    }
    tracing::info!(
        synced = report.synced.len(),
        failed = report.failed.len(),
        "Permission sync finished"
    );
    Ok(report)
}

async fn sync_one_permission(source: &Instance, target: &Instance, name: &str) -> Result<()> {
    // Permission bodies are opaque to this client; copy them verbatim.
    let config: serde_json::Value = source
        .get_json(&format!("/artifactory/api/security/permissions/{name}"))
        .await?;
    let body = target
        .send_json(
            Method::PUT,
            &format!("/artifactory/api/security/permissions/{name}"),
            &config,
        )
        .await?;
    tracing::debug!(name, response = %body, "Wrote permission target");
    Ok(())
}

/// Compare the repository listings of two instances without writing
/// anything. Count mismatches and missing keys are logged; the returned
/// diff carries the same facts for programmatic use.
pub async fn compare_repositories(
    source: &Instance,
    target: &Instance,
    rtype: RepositoryType,
) -> Result<RepoDiff> {
    tracing::info!(
        %rtype,
        source = source.base_url(),
        target = target.base_url(),
        "Comparing repositories"
    );
    let source_keys: Vec<String> = repository::list_repositories(source, rtype)
        .await?
        .into_iter()
        .map(|repo| repo.key)
        .collect();
    let target_keys: HashSet<String> = repository::list_repositories(target, rtype)
        .await?
        .into_iter()
        .map(|repo| repo.key)
        .collect();

    let diff = RepoDiff {
        rtype,
        source_count: source_keys.len(),
        target_count: target_keys.len(),
        missing_in_target: source_keys
            .into_iter()
            .filter(|key| !target_keys.contains(key))
            .collect(),
    };

    if diff.counts_match() {
        tracing::info!(
            count = diff.source_count,
            %rtype,
            "Source and target have the same number of repositories"
        );
    } else {
        tracing::error!(
            source = diff.source_count,
            target = diff.target_count,
            %rtype,
            "Repository counts differ"
        );
    }
    for key in &diff.missing_in_target {
        tracing::warn!(%key, "Not found in target");
    }
    tracing::info!(%rtype, "Repository check complete");
    Ok(diff)
}
