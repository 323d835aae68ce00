// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Microsoft Graph v1.0 client.

use async_trait::async_trait;
use cprov_common_secret::SecretString;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::api::DirectoryProvider;
use crate::error::DirectoryError;
use crate::models::{
	DirectoryGroup, DirectoryUser, GraphErrorResponse, GraphListResponse, NewSecurityGroup,
};
use crate::token::{acquire_token, ClientCredentials};

pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// Graph client holding a bearer token.
#[derive(Debug, Clone)]
pub struct GraphClient {
	http_client: Client,
	base_url: String,
	token: SecretString,
}

impl GraphClient {
	pub fn new(http_client: Client, token: SecretString) -> Self {
		Self {
			http_client,
			base_url: DEFAULT_GRAPH_URL.to_string(),
			token,
		}
	}

	/// Sets a custom Graph base URL (national clouds, tests).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	/// Acquire a token with `credentials` and build a client around it.
	pub async fn connect(
		http_client: Client,
		authority_url: &str,
		graph_url: &str,
		credentials: &ClientCredentials,
	) -> Result<Self, DirectoryError> {
		let token = acquire_token(&http_client, authority_url, credentials).await?;
		Ok(Self::new(http_client, token.token).with_base_url(graph_url))
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}

	fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
		request.bearer_auth(self.token.expose())
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response, DirectoryError> {
		let response = self.authorized(request).send().await?;
		if response.status().is_success() {
			return Ok(response);
		}
		Err(api_error(response).await)
	}
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DirectoryError> {
	response
		.json()
		.await
		.map_err(|e| DirectoryError::InvalidResponse(e.to_string()))
}

async fn api_error(response: Response) -> DirectoryError {
	let status = response.status();
	let body = response.text().await.unwrap_or_default();
	let (code, message) = match serde_json::from_str::<GraphErrorResponse>(&body) {
		Ok(parsed) => (parsed.error.code, parsed.error.message),
		Err(_) => (
			status.canonical_reason().unwrap_or("Unknown").to_string(),
			body,
		),
	};
	error!(status = status.as_u16(), code = %code, "Graph API error");
	DirectoryError::Api {
		status: status.as_u16(),
		code,
		message,
	}
}

/// `startswith` filter for a display-name prefix. Single quotes are doubled
/// per OData literal rules.
fn prefix_filter(prefix: &str) -> String {
	format!("startswith(displayName,'{}')", prefix.replace('\'', "''"))
}

#[async_trait]
impl DirectoryProvider for GraphClient {
	#[instrument(skip(self))]
	async fn find_group_by_prefix(
		&self,
		prefix: &str,
	) -> Result<Option<DirectoryGroup>, DirectoryError> {
		let filter = prefix_filter(prefix);
		let request = self
			.http_client
			.get(self.url("groups"))
			.query(&[("$filter", filter.as_str())]);
		let groups: GraphListResponse<DirectoryGroup> = decode(self.send(request).await?).await?;
		debug!(matches = groups.value.len(), "group prefix lookup");
		Ok(groups.value.into_iter().next())
	}

	#[instrument(skip(self))]
	async fn create_group(&self, display_name: &str) -> Result<DirectoryGroup, DirectoryError> {
		let body = NewSecurityGroup {
			display_name,
			mail_nickname: display_name,
			mail_enabled: false,
			security_enabled: true,
		};
		let request = self.http_client.post(self.url("groups")).json(&body);
		let group: DirectoryGroup = decode(self.send(request).await?).await?;
		info!(id = %group.id, "created directory group");
		Ok(group)
	}

	#[instrument(skip(self))]
	async fn delete_group(&self, group_id: &str) -> Result<(), DirectoryError> {
		let request = self
			.http_client
			.delete(self.url(&format!("groups/{}", urlencoding::encode(group_id))));
		self.send(request).await?;
		Ok(())
	}

	#[instrument(skip(self))]
	async fn get_user(&self, user: &str) -> Result<DirectoryUser, DirectoryError> {
		let request = self
			.http_client
			.get(self.url(&format!("users/{}", urlencoding::encode(user))));
		match self.send(request).await {
			Ok(response) => decode(response).await,
			Err(DirectoryError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
				Err(DirectoryError::UserNotFound(user.to_string()))
			}
			Err(e) => Err(e),
		}
	}

	#[instrument(skip(self))]
	async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool, DirectoryError> {
		let request = self
			.http_client
			.post(self.url(&format!(
				"directoryObjects/{}/checkMemberGroups",
				urlencoding::encode(user_id)
			)))
			.json(&json!({ "groupIds": [group_id] }));
		let groups: GraphListResponse<String> = decode(self.send(request).await?).await?;
		Ok(groups.value.iter().any(|id| id == group_id))
	}

	#[instrument(skip(self))]
	async fn add_member(&self, group_id: &str, user_id: &str) -> Result<(), DirectoryError> {
		let reference = format!("{}/directoryObjects/{}", self.base_url, user_id);
		let request = self
			.http_client
			.post(self.url(&format!(
				"groups/{}/members/$ref",
				urlencoding::encode(group_id)
			)))
			.json(&json!({ "@odata.id": reference }));
		self.send(request).await?;
		info!("added member to directory group");
		Ok(())
	}
}
