// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Azure file share endpoint settings.

use serde::Deserialize;

use super::directory::trim_slash;

const DEFAULT_FILE_ENDPOINT_SUFFIX: &str = "file.core.windows.net";

/// File share settings (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct FileShareConfig {
	/// Host suffix appended to the storage account name.
	pub endpoint_suffix: String,
	/// Full endpoint override, used instead of `https://<account>.<suffix>`.
	pub endpoint: Option<String>,
}

impl Default for FileShareConfig {
	fn default() -> Self {
		FileShareConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileShareConfigLayer {
	#[serde(default)]
	pub endpoint_suffix: Option<String>,
	#[serde(default)]
	pub endpoint: Option<String>,
}

impl FileShareConfigLayer {
	pub fn merge(&mut self, other: FileShareConfigLayer) {
		if other.endpoint_suffix.is_some() {
			self.endpoint_suffix = other.endpoint_suffix;
		}
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
	}

	pub fn finalize(self) -> FileShareConfig {
		FileShareConfig {
			endpoint_suffix: self
				.endpoint_suffix
				.unwrap_or_else(|| DEFAULT_FILE_ENDPOINT_SUFFIX.to_string()),
			endpoint: self.endpoint.map(trim_slash),
		}
	}
}
