// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity directory settings.

use serde::Deserialize;

const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// Directory settings (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
	/// Directory tenant the service principal authenticates against.
	pub tenant_id: String,
	pub authority_url: String,
	pub graph_url: String,
}

impl DirectoryConfig {
	/// Public-cloud endpoints for the given tenant.
	pub fn new(tenant_id: impl Into<String>) -> Self {
		Self {
			tenant_id: tenant_id.into(),
			authority_url: DEFAULT_AUTHORITY_URL.to_string(),
			graph_url: DEFAULT_GRAPH_URL.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfigLayer {
	#[serde(default)]
	pub tenant_id: Option<String>,
	#[serde(default)]
	pub authority_url: Option<String>,
	#[serde(default)]
	pub graph_url: Option<String>,
}

impl DirectoryConfigLayer {
	pub fn merge(&mut self, other: DirectoryConfigLayer) {
		if other.tenant_id.is_some() {
			self.tenant_id = other.tenant_id;
		}
		if other.authority_url.is_some() {
			self.authority_url = other.authority_url;
		}
		if other.graph_url.is_some() {
			self.graph_url = other.graph_url;
		}
	}

	/// Returns `None` when no tenant is configured.
	pub fn finalize(self) -> Option<DirectoryConfig> {
		let tenant_id = self.tenant_id.filter(|t| !t.trim().is_empty())?;
		Some(DirectoryConfig {
			tenant_id,
			authority_url: trim_slash(
				self
					.authority_url
					.unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string()),
			),
			graph_url: trim_slash(
				self
					.graph_url
					.unwrap_or_else(|| DEFAULT_GRAPH_URL.to_string()),
			),
		})
	}
}

pub(crate) fn trim_slash(url: String) -> String {
	url.trim_end_matches('/').to_string()
}
