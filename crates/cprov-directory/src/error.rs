// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors raised by the directory client.
#[derive(Debug, Error)]
pub enum DirectoryError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	/// The token endpoint rejected the service principal credentials.
	#[error("authentication failed: {0}")]
	Authentication(String),

	#[error("user '{0}' not found in directory")]
	UserNotFound(String),

	#[error("Graph API error {status} ({code}): {message}")]
	Api {
		status: u16,
		code: String,
		message: String,
	},

	#[error("invalid response from Graph: {0}")]
	InvalidResponse(String),
}
