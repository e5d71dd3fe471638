//! Repository listing, configuration read/write, and creation helpers.

use reqwest::Method;
use serde_json::json;

use crate::error::Result;
use crate::instance::Instance;
use crate::models::{RepositoryConfig, RepositorySummary, RepositoryType};

/// Package types with their own default repository layout.
const LAYOUT_TYPES: [&str; 12] = [
    "bower", "cargo", "composer", "conan", "go", "ivy", "npm", "nuget", "puppet", "sbt", "swift",
    "vcs",
];

/// Pick the default repository layout for a package type.
/// Case-insensitive; unknown types fall back to `simple-default`.
pub fn default_layout(package_type: &str) -> String {
    let ptype = package_type.to_ascii_lowercase();
    if ptype == "maven" || ptype == "gradle" {
        return "maven-2-default".to_string();
    }
    if LAYOUT_TYPES.contains(&ptype.as_str()) {
        return format!("{ptype}-default");
    }
    "simple-default".to_string()
}

/// List repositories of one class.
pub async fn list_repositories(
    instance: &Instance,
    rtype: RepositoryType,
) -> Result<Vec<RepositorySummary>> {
    instance
        .get_json(&format!("/artifactory/api/repositories?type={rtype}"))
        .await
}

/// Count repositories of one class. Degrades to zero on a non-2xx response.
pub async fn repo_count(instance: &Instance, rtype: RepositoryType) -> Result<usize> {
    match list_repositories(instance, rtype).await {
        Ok(repos) => Ok(repos.len()),
        Err(err) if err.is_remote() => {
            tracing::error!(%rtype, error = %err, "Could not list repositories");
            Ok(0)
        }
        Err(err) => Err(err),
    }
}

/// Fetch the full configuration of one repository.
pub async fn get_repository_config(instance: &Instance, key: &str) -> Result<RepositoryConfig> {
    instance
        .get_json(&format!("/artifactory/api/repositories/{key}"))
        .await
}

/// Create a repository (PUT; the key must not exist yet).
pub async fn create_repository_config(
    instance: &Instance,
    config: &RepositoryConfig,
) -> Result<String> {
    instance
        .send_json(
            Method::PUT,
            &format!("/artifactory/api/repositories/{}", config.key),
            config,
        )
        .await
}

/// Update an existing repository in place (POST).
pub async fn update_repository_config(
    instance: &Instance,
    config: &RepositoryConfig,
) -> Result<String> {
    instance
        .send_json(
            Method::POST,
            &format!("/artifactory/api/repositories/{}", config.key),
            config,
        )
        .await
}

/// Create a repository from a minimal definition: key, package type, and
/// class. The layout is derived from the package type and Xray indexing is
/// switched on.
pub async fn create_repository(
    instance: &Instance,
    key: &str,
    package_type: &str,
    rtype: RepositoryType,
) -> Result<String> {
    let body = json!({
        "key": key,
        "rclass": rtype.as_str(),
        "packageType": package_type,
        "xrayIndex": true,
        "repoLayoutRef": default_layout(package_type),
    });
    tracing::info!(key, %rtype, package_type, "Creating repository");
    instance
        .send_json(Method::PUT, &format!("/artifactory/api/repositories/{key}"), &body)
        .await
}
