//! Read-only platform queries: ping, version, licenses, storage.

use crate::error::Result;
use crate::instance::Instance;
use crate::models::{LicenseInfo, LicensesResponse, StorageInfo, VersionInfo};

/// Check platform health. Connection failures are reported as `false`
/// rather than propagated, so a ping can probe an unreachable host.
pub async fn ping(instance: &Instance) -> bool {
    match instance.get_text("/artifactory/api/system/ping").await {
        Ok(body) => body.trim() == "OK",
        Err(err) => {
            tracing::warn!(url = instance.base_url(), error = %err, "Ping failed");
            false
        }
    }
}

/// Fetch the running platform version.
pub async fn get_version(instance: &Instance) -> Result<VersionInfo> {
    instance.get_json("/artifactory/api/system/version").await
}

/// Fetch license details. A non-2xx response degrades to the documented
/// placeholder value instead of an error.
pub async fn get_license(instance: &Instance) -> Result<LicenseInfo> {
    match instance.get_json("/artifactory/api/system/license").await {
        Ok(license) => Ok(license),
        Err(err) if err.is_remote() => {
            tracing::error!(error = %err, "Could not read license details");
            Ok(LicenseInfo::placeholder())
        }
        Err(err) => Err(err),
    }
}

/// Fetch HA cluster licenses, one entry per node. Empty on a non-2xx
/// response (non-HA installations reject this endpoint).
pub async fn get_licenses(instance: &Instance) -> Result<Vec<LicenseInfo>> {
    match instance
        .get_json::<LicensesResponse>("/artifactory/api/system/licenses")
        .await
    {
        Ok(response) => Ok(response.licenses),
        Err(err) if err.is_remote() => {
            tracing::error!(error = %err, "Could not read cluster licenses");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

/// Number of cluster nodes, derived from the HA license listing.
pub async fn node_count(instance: &Instance) -> Result<usize> {
    Ok(get_licenses(instance).await?.len())
}

/// Fetch the storage summary.
pub async fn get_storage_info(instance: &Instance) -> Result<StorageInfo> {
    instance.get_json("/artifactory/api/storageinfo").await
}
