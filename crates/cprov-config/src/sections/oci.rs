// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cloud provider settings.

use serde::Deserialize;

/// OCI settings (runtime, fully resolved).
///
/// The endpoints default to the region-derived URLs when unset; overrides
/// exist for private endpoints and tests.
#[derive(Debug, Clone)]
pub struct OciConfig {
	/// Profile section read from the downloaded config file.
	pub profile: String,
	pub identity_endpoint: Option<String>,
	pub budget_endpoint: Option<String>,
	/// Federation protocol of the identity provider to map groups through.
	pub idp_protocol: String,
}

impl Default for OciConfig {
	fn default() -> Self {
		OciConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OciConfigLayer {
	#[serde(default)]
	pub profile: Option<String>,
	#[serde(default)]
	pub identity_endpoint: Option<String>,
	#[serde(default)]
	pub budget_endpoint: Option<String>,
	#[serde(default)]
	pub idp_protocol: Option<String>,
}

impl OciConfigLayer {
	pub fn merge(&mut self, other: OciConfigLayer) {
		if other.profile.is_some() {
			self.profile = other.profile;
		}
		if other.identity_endpoint.is_some() {
			self.identity_endpoint = other.identity_endpoint;
		}
		if other.budget_endpoint.is_some() {
			self.budget_endpoint = other.budget_endpoint;
		}
		if other.idp_protocol.is_some() {
			self.idp_protocol = other.idp_protocol;
		}
	}

	pub fn finalize(self) -> OciConfig {
		OciConfig {
			profile: self.profile.unwrap_or_else(|| "DEFAULT".to_string()),
			identity_endpoint: self.identity_endpoint,
			budget_endpoint: self.budget_endpoint,
			idp_protocol: self.idp_protocol.unwrap_or_else(|| "SAML2".to_string()),
		}
	}
}
