//! Support bundle creation and download.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Method;
use tokio::io::AsyncWriteExt;

use crate::error::{ClientError, Result};
use crate::instance::{first_error_message, Instance};
use crate::models::{BundleCreated, BundleSpec};

/// Create a support bundle on the instance and return its id.
///
/// A failed creation surfaces the first structured error message from the
/// response body.
pub async fn create_support_bundle(instance: &Instance, spec: &BundleSpec) -> Result<String> {
    tracing::info!(name = %spec.name, "Generating a new support bundle");
    let body = instance
        .send_json(Method::POST, "/artifactory/api/system/support/bundle", spec)
        .await
        .map_err(|err| match err {
            ClientError::Api { status, body } => {
                let message = first_error_message(&body);
                tracing::error!(%status, %message, "Support bundle creation rejected");
                ClientError::Api { status, body: message }
            }
            other => other,
        })?;
    tracing::info!(response = %body, "Support bundle created");
    let created: BundleCreated = serde_json::from_str(&body)?;
    Ok(created.id)
}

/// Download a support bundle archive to `<dest_dir>/<bundle_id>.zip`,
/// streaming 8 KiB-order chunks to disk. Progress is logged against the
/// declared content length when the server sends one. Any stream error
/// aborts the download and propagates.
pub async fn download_support_bundle(
    instance: &Instance,
    bundle_id: &str,
    dest_dir: &Path,
) -> Result<PathBuf> {
    let response = instance
        .get_stream(&format!(
            "/artifactory/api/system/support/bundle/{bundle_id}/archive"
        ))
        .await?;
    let total = response.content_length();

    let dest = dest_dir.join(format!("{bundle_id}.zip"));
    let mut file = tokio::fs::File::create(&dest).await?;
    let mut stream = response.bytes_stream();
    let mut received: u64 = 0;
    let mut next_report: u64 = 0;

    tracing::info!(bundle_id, dest = %dest.display(), total, "Downloading support bundle");
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        if received >= next_report {
            match total {
                Some(total) if total > 0 => {
                    tracing::info!(received, total, percent = received * 100 / total, "Downloading");
                }
                _ => tracing::info!(received, "Downloading"),
            }
            // Report roughly every 8 MiB.
            next_report = received + 8 * 1024 * 1024;
        }
    }
    file.flush().await?;

    if let Some(total) = total {
        if received != total {
            return Err(ClientError::Response(format!(
                "download truncated: received {received} of {total} bytes"
            )));
        }
    }
    tracing::info!(bundle_id, received, "Support bundle downloaded");
    Ok(dest)
}
