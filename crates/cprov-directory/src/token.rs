// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OAuth2 client-credentials token acquisition for Microsoft Graph.

use cprov_common_secret::SecretString;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::error::DirectoryError;

pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Service principal credentials for the client-credentials grant.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
	pub tenant_id: String,
	pub client_id: String,
	pub client_secret: SecretString,
}

/// A bearer token for Graph calls.
#[derive(Debug, Clone)]
pub struct AccessToken {
	pub token: SecretString,
	pub expires_in: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	expires_in: u64,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
	#[serde(default)]
	error: String,
	#[serde(default)]
	error_description: String,
}

/// Token endpoint for `tenant_id` under `authority_url`.
pub fn token_url(authority_url: &str, tenant_id: &str) -> String {
	format!(
		"{}/{}/oauth2/v2.0/token",
		authority_url.trim_end_matches('/'),
		tenant_id
	)
}

/// Exchange service principal credentials for a Graph access token.
#[instrument(skip(http_client, credentials), fields(tenant_id = %credentials.tenant_id, client_id = %credentials.client_id))]
pub async fn acquire_token(
	http_client: &Client,
	authority_url: &str,
	credentials: &ClientCredentials,
) -> Result<AccessToken, DirectoryError> {
	let url = token_url(authority_url, &credentials.tenant_id);
	info!("fetching directory access token");

	let params = [
		("grant_type", "client_credentials"),
		("client_id", credentials.client_id.as_str()),
		("client_secret", credentials.client_secret.expose().as_str()),
		("scope", GRAPH_SCOPE),
	];

	let response = http_client.post(&url).form(&params).send().await?;
	let status = response.status();

	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
			Ok(parsed) if !parsed.error.is_empty() => {
				format!("{}: {}", parsed.error, parsed.error_description)
			}
			_ => format!("token request failed with status {status}"),
		};
		error!(status = status.as_u16(), "directory token request rejected");
		return Err(DirectoryError::Authentication(reason));
	}

	let parsed: TokenResponse = response
		.json()
		.await
		.map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?;

	Ok(AccessToken {
		token: SecretString::new(parsed.access_token),
		expires_in: parsed.expires_in,
	})
}
