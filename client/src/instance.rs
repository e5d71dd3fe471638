//! Per-instance request context.
//!
//! An [`Instance`] bundles a normalized base URL, a bearer token, and a
//! `reqwest::Client` with a fixed timeout. Every operation takes the
//! instance it talks to explicitly, so two instances (e.g. a migration
//! source and target) never share header state.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};

/// Timeout for metadata calls.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for archive downloads, applied per request.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Suffixes users commonly leave on a platform base URL. Checked in order,
/// after the trailing slash.
const PRODUCT_SUFFIXES: [&str; 3] = ["/artifactory", "/xray", "/mc"];

/// Normalize a user-supplied base URL.
///
/// Trims whitespace, strips one trailing `/`, then strips one trailing
/// product path segment (`/artifactory`, `/xray`, `/mc`, case-insensitive).
/// Each removal logs a warning. Normalizing an already-normalized URL is a
/// no-op.
pub fn normalize_base_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    if url.ends_with('/') {
        tracing::warn!("Found a / at the end of the URL; it has been removed");
        url.truncate(url.len() - 1);
    }
    for suffix in PRODUCT_SUFFIXES {
        if url.to_ascii_lowercase().ends_with(suffix) {
            tracing::warn!(suffix, "Found a product path at the end of the URL; it has been removed");
            url.truncate(url.len() - suffix.len());
            break;
        }
    }
    url
}

/// One platform deployment: base URL plus admin bearer token.
#[derive(Debug, Clone)]
pub struct Instance {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl Instance {
    /// Build an instance context. The URL is normalized on entry.
    pub fn new(raw_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(METADATA_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: normalize_base_url(raw_url),
            token: token.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (absolute under the base URL) with bearer
    /// auth and a JSON content type.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send a GET and deserialize the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Send a GET and return the body verbatim.
    pub(crate) async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.request(Method::GET, path).send().await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Send a JSON body with the given method and return the response text.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<String> {
        let response = self.request(method, path).json(body).send().await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Send a streaming GET with the download timeout.
    pub(crate) async fn get_stream(&self, path: &str) -> Result<Response> {
        let response = self
            .request(Method::GET, path)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        check_status(response).await
    }
}

/// Map a non-success response to a typed error carrying the body text.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_status(status, body))
}

/// Extract the first structured error message from an API error body
/// (`{"errors": [{"message": "..."}]}`). Falls back to the raw body.
pub(crate) fn first_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("errors")?
                .get(0)?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
