//! Wire types for the platform REST API.
//!
//! Repository and permission configuration bodies are externally owned and
//! evolve independently, so the typed structs here keep a flattened
//! passthrough map: fields this client does not know about survive a
//! read-modify-write round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Repository class, as accepted by `GET /api/repositories?type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    Local,
    Remote,
    Virtual,
    Federated,
    Distribution,
}

impl RepositoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            RepositoryType::Local => "local",
            RepositoryType::Remote => "remote",
            RepositoryType::Virtual => "virtual",
            RepositoryType::Federated => "federated",
            RepositoryType::Distribution => "distribution",
        }
    }
}

impl std::fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the repository listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub key: String,
    #[serde(rename = "type")]
    pub repo_type: Option<String>,
    #[serde(rename = "packageType")]
    pub package_type: Option<String>,
    pub url: Option<String>,
}

/// Full repository configuration.
///
/// Only the fields the synchronizer inspects are typed; everything else is
/// carried verbatim in `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub key: String,
    pub rclass: String,
    #[serde(rename = "packageType", skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
    /// Remote repositories only; an offline remote is never migrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RepositoryConfig {
    pub fn is_offline(&self) -> bool {
        self.offline.unwrap_or(false)
    }
}

/// Push-replication job definition. Constructed and written, never read back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationConfig {
    pub url: String,
    pub repo_key: String,
    pub username: String,
    pub password: String,
    pub enable_event_replication: bool,
    pub enabled: bool,
    pub cron_exp: String,
    pub sync_deletes: bool,
    pub sync_properties: bool,
    pub sync_statistics: bool,
}

impl ReplicationConfig {
    /// Daily 04:00 push replication with event replication and all sync
    /// flags enabled.
    pub fn push_daily(url: String, repo_key: String, username: String, password: String) -> Self {
        Self {
            url,
            repo_key,
            username,
            password,
            enable_event_replication: true,
            enabled: true,
            cron_exp: "0 0 4 ? * *".to_string(),
            sync_deletes: true,
            sync_properties: true,
            sync_statistics: true,
        }
    }
}

/// One row of the permission-target listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionSummary {
    pub name: String,
    pub uri: Option<String>,
}

/// `GET /api/system/version`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub revision: Option<String>,
}

/// `GET /api/system/license`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseInfo {
    #[serde(rename = "type")]
    pub license_type: Option<String>,
    #[serde(rename = "validThrough")]
    pub valid_through: Option<String>,
    #[serde(rename = "licensedTo")]
    pub licensed_to: Option<String>,
}

impl LicenseInfo {
    /// Fallback value returned when the license endpoint is unavailable.
    pub fn placeholder() -> Self {
        Self {
            license_type: Some("N/A".to_string()),
            valid_through: None,
            licensed_to: None,
        }
    }
}

/// `GET /api/system/licenses` (HA clusters; one entry per node).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensesResponse {
    #[serde(default)]
    pub licenses: Vec<LicenseInfo>,
}

/// `GET /api/storageinfo` binaries summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinariesSummary {
    pub binaries_count: Option<String>,
    pub binaries_size: Option<String>,
    pub artifacts_size: Option<String>,
    pub optimization: Option<String>,
}

/// `GET /api/storageinfo` file store summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStoreSummary {
    pub storage_type: Option<String>,
    pub storage_directory: Option<String>,
    pub total_space: Option<String>,
    pub used_space: Option<String>,
    pub free_space: Option<String>,
}

/// `GET /api/storageinfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub binaries_summary: Option<BinariesSummary>,
    pub file_store_summary: Option<FileStoreSummary>,
}

/// One user row from `GET /access/api/v2/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: Option<String>,
    pub realm: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// One token row from `GET /access/api/v1/tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token_id: String,
    pub subject: Option<String>,
    pub issued_at: Option<i64>,
    pub issuer: Option<String>,
    pub expiry: Option<i64>,
    #[serde(default)]
    pub refreshable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensResponse {
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
}

/// Body for `POST /access/api/v1/tokens`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub refreshable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    pub include_reference_token: bool,
}

impl TokenRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            include_reference_token: true,
            ..Self::default()
        }
    }
}

/// Response of `POST /access/api/v1/tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token_id: Option<String>,
    pub access_token: Option<String>,
    pub reference_token: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

/// `GET|PUT /access/api/v1/tokens/default_expiry`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultExpiry {
    pub default_expiry: u64,
}

/// Body for `POST /api/system/support/bundle`. Optional scope parameters
/// (configuration, system, logs, thread dump) pass through `extra`.
#[derive(Debug, Clone, Serialize)]
pub struct BundleSpec {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BundleSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }
}

/// Response of `POST /api/system/support/bundle`.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleCreated {
    pub id: String,
}

/// One entry of `GET /api/storage/{repo}?list&deep=1`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntry {
    pub uri: String,
    #[serde(default)]
    pub folder: bool,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageListing {
    #[serde(default)]
    pub files: Vec<StorageEntry>,
}
