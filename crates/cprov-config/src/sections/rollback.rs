// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Compensation of partially provisioned resources.

use serde::Deserialize;

/// Whether created resources are deleted again when a later step fails.
#[derive(Debug, Clone)]
pub struct RollbackConfig {
	pub enabled: bool,
}

impl Default for RollbackConfig {
	fn default() -> Self {
		Self { enabled: true }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RollbackConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
}

impl RollbackConfigLayer {
	pub fn merge(&mut self, other: RollbackConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
	}

	pub fn finalize(self) -> RollbackConfig {
		RollbackConfig {
			enabled: self.enabled.unwrap_or(true),
		}
	}
}
