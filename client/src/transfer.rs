//! Server-side copy of repository content.
//!
//! Copies every artifact of one repository into another using the
//! platform's own copy endpoint; no bytes flow through this client. Only
//! copy is supported — there is no move and no delete-after-copy.

use reqwest::Method;

use crate::error::{ClientError, Result};
use crate::instance::Instance;
use crate::models::StorageListing;

/// Outcome of a content copy run.
#[derive(Debug, Default)]
pub struct CopyReport {
    pub copied: Vec<String>,
    pub failed: Vec<(String, ClientError)>,
}

impl CopyReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// List every artifact path in a repository (deep listing, folders
/// excluded).
pub async fn list_artifact_paths(instance: &Instance, repo: &str) -> Result<Vec<String>> {
    let listing: StorageListing = instance
        .get_json(&format!("/artifactory/api/storage/{repo}?list&deep=1"))
        .await?;
    Ok(listing
        .files
        .into_iter()
        .filter(|entry| !entry.folder)
        .map(|entry| entry.uri)
        .collect())
}

/// Copy all content of `src_repo` into `dst_repo` on the same instance.
/// Per-path failures are recorded and the loop continues.
pub async fn copy_repo_content(
    instance: &Instance,
    src_repo: &str,
    dst_repo: &str,
) -> Result<CopyReport> {
    let paths = list_artifact_paths(instance, src_repo).await?;
    tracing::info!(
        src_repo,
        dst_repo,
        files = paths.len(),
        "Copying repository content"
    );

    let mut report = CopyReport::default();
    for path in paths {
        let endpoint = format!("/artifactory/api/copy/{src_repo}{path}?to=/{dst_repo}{path}");
        match instance
            .send_json(Method::POST, &endpoint, &serde_json::json!({}))
            .await
        {
            Ok(_) => {
                tracing::debug!(%path, "Copied");
                report.copied.push(path);
            }
            Err(err) => {
                tracing::error!(%path, error = %err, "Copy failed");
                report.failed.push((path, err));
            }
        }
    }
    tracing::info!(
        copied = report.copied.len(),
        failed = report.failed.len(),
        "Content copy finished"
    );
    Ok(report)
}
