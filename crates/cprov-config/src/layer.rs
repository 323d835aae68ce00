// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration assembled from each source before finalizing.

use serde::Deserialize;

use crate::sections::{
	DirectoryConfigLayer, FileShareConfigLayer, HttpConfigLayer, LoggingConfigLayer,
	OciConfigLayer, RollbackConfigLayer, StagingConfigLayer,
};

/// Every field is optional so later sources can override earlier ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisionerConfigLayer {
	#[serde(default)]
	pub staging: Option<StagingConfigLayer>,
	#[serde(default)]
	pub oci: Option<OciConfigLayer>,
	#[serde(default)]
	pub directory: Option<DirectoryConfigLayer>,
	#[serde(default)]
	pub fileshare: Option<FileShareConfigLayer>,
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub rollback: Option<RollbackConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ProvisionerConfigLayer {
	/// Merge `other` into `self`; values present in `other` win.
	pub fn merge(&mut self, other: ProvisionerConfigLayer) {
		merge_option(&mut self.staging, other.staging, StagingConfigLayer::merge);
		merge_option(&mut self.oci, other.oci, OciConfigLayer::merge);
		merge_option(
			&mut self.directory,
			other.directory,
			DirectoryConfigLayer::merge,
		);
		merge_option(
			&mut self.fileshare,
			other.fileshare,
			FileShareConfigLayer::merge,
		);
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(&mut self.rollback, other.rollback, RollbackConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T>(target: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (target.as_mut(), other) {
		(Some(existing), Some(incoming)) => merge(existing, incoming),
		(None, Some(incoming)) => *target = Some(incoming),
		(_, None) => {}
	}
}
