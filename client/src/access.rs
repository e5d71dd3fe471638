//! Identity and token management under `/access`. Every operation here is
//! version-gated through [`Capabilities`].

use chrono::DateTime;
use reqwest::Method;

use crate::error::Result;
use crate::instance::Instance;
use crate::models::{AccessToken, DefaultExpiry, TokenInfo, TokenRequest, TokensResponse, UsersResponse};
use crate::version::{Capabilities, Capability};

/// Count platform users, optionally restricted to one realm
/// (internal|saml|scim). Requires platform >= 7.49.3.
pub async fn count_users(
    instance: &Instance,
    caps: &Capabilities,
    realm: Option<&str>,
) -> Result<usize> {
    caps.require(Capability::UserListing)?;
    let response: UsersResponse = instance.get_json("/access/api/v2/users").await?;
    let count = match realm {
        None => response.users.len(),
        Some(realm) => response
            .users
            .iter()
            .filter(|user| user.realm.as_deref() == Some(realm))
            .count(),
    };
    Ok(count)
}

/// List tokens visible to the authenticated principal. Admins see all
/// tokens; other users only their own. Requires platform >= 7.21.1.
pub async fn list_tokens(instance: &Instance, caps: &Capabilities) -> Result<Vec<TokenInfo>> {
    caps.require(Capability::ScopedTokens)?;
    let response: TokensResponse = instance.get_json("/access/api/v1/tokens").await?;
    Ok(response.tokens)
}

/// Create a new access token. Requires platform >= 7.21.1.
pub async fn create_token(
    instance: &Instance,
    caps: &Capabilities,
    request: &TokenRequest,
) -> Result<AccessToken> {
    caps.require(Capability::ScopedTokens)?;
    let body = instance
        .send_json(Method::POST, "/access/api/v1/tokens", request)
        .await?;
    Ok(serde_json::from_str(&body)?)
}

/// Read the instance-wide default token expiry in seconds.
/// Requires platform >= 7.62.0.
pub async fn default_token_expiry(instance: &Instance, caps: &Capabilities) -> Result<u64> {
    caps.require(Capability::DefaultTokenExpiry)?;
    let response: DefaultExpiry = instance
        .get_json("/access/api/v1/tokens/default_expiry")
        .await?;
    tracing::info!(
        default_expiry = response.default_expiry,
        "The default token expiry is set"
    );
    Ok(response.default_expiry)
}

/// Set the instance-wide default token expiry in seconds.
/// Requires platform >= 7.62.0.
pub async fn set_default_token_expiry(
    instance: &Instance,
    caps: &Capabilities,
    expiry: u64,
) -> Result<()> {
    caps.require(Capability::DefaultTokenExpiry)?;
    instance
        .send_json(
            Method::PUT,
            "/access/api/v1/tokens/default_expiry",
            &DefaultExpiry { default_expiry: expiry },
        )
        .await?;
    tracing::info!(expiry, "Default token expiry updated");
    Ok(())
}

const TOKEN_TABLE_HEADERS: [&str; 6] = ["ID", "Subject", "Issued", "Issuer", "Expiry", "Refreshable"];

fn format_epoch(seconds: Option<i64>) -> String {
    seconds
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format("%d-%m-%Y %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Render the token listing as an aligned text table, suitable for the
/// console or a flat-file export.
pub fn render_token_table(tokens: &[TokenInfo]) -> String {
    let rows: Vec<[String; 6]> = tokens
        .iter()
        .map(|token| {
            [
                token.token_id.clone(),
                token.subject.clone().unwrap_or_default(),
                format_epoch(token.issued_at),
                token.issuer.clone().unwrap_or_default(),
                format_epoch(token.expiry),
                token.refreshable.to_string(),
            ]
        })
        .collect();

    let mut widths: [usize; 6] = TOKEN_TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let render_row = |cells: &[String; 6]| -> String {
        cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: [String; 6] = TOKEN_TABLE_HEADERS.map(str::to_string);
    let separator: String = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("  ");

    let mut out = vec![render_row(&header), separator];
    out.extend(rows.iter().map(render_row));
    out.join("\n")
}
