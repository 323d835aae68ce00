// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where downloaded provider credentials are staged.

use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_REMOTE_DIRECTORY: &str = ".oci";

/// Staging configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct StagingConfig {
	/// Parent of the per-run temporary directory.
	pub base_dir: PathBuf,
	/// Directory inside the file share holding the credential artifacts.
	pub remote_directory: String,
}

impl Default for StagingConfig {
	fn default() -> Self {
		StagingConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StagingConfigLayer {
	#[serde(default)]
	pub base_dir: Option<PathBuf>,
	#[serde(default)]
	pub remote_directory: Option<String>,
}

impl StagingConfigLayer {
	pub fn merge(&mut self, other: StagingConfigLayer) {
		if other.base_dir.is_some() {
			self.base_dir = other.base_dir;
		}
		if other.remote_directory.is_some() {
			self.remote_directory = other.remote_directory;
		}
	}

	pub fn finalize(self) -> StagingConfig {
		StagingConfig {
			base_dir: self.base_dir.unwrap_or_else(std::env::temp_dir),
			remote_directory: self
				.remote_directory
				.unwrap_or_else(|| DEFAULT_REMOTE_DIRECTORY.to_string()),
		}
	}
}
