// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading from the file share or staging files locally.
#[derive(Debug, Error)]
pub enum FileShareError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("file '{path}' not found on share")]
	NotFound { path: String },

	#[error("storage account key is not valid base64: {0}")]
	InvalidKey(String),

	#[error("file share error {status}: {message}")]
	Api { status: u16, message: String },

	#[error("staging I/O error at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl FileShareError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, FileShareError::NotFound { .. })
	}
}
