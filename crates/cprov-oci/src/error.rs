// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the OCI client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating an OCI config profile.
#[derive(Debug, Error)]
pub enum ProfileError {
	#[error("failed to read OCI config at {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed OCI config at line {line}: {message}")]
	Parse { line: usize, message: String },

	#[error("profile [{0}] not found in OCI config")]
	MissingProfile(String),

	#[error("required field '{0}' missing from OCI config profile")]
	MissingField(&'static str),

	#[error("invalid value for '{field}': {message}")]
	InvalidField { field: &'static str, message: String },

	#[error("invalid private key: {0}")]
	InvalidKey(String),
}

/// Errors raised by OCI API calls.
#[derive(Debug, Error)]
pub enum OciError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("OCI API error {status} ({code}): {message}")]
	Api {
		status: u16,
		code: String,
		message: String,
		request_id: Option<String>,
	},

	#[error("invalid response from OCI: {0}")]
	InvalidResponse(String),

	#[error("invalid request URL: {0}")]
	Url(String),

	#[error("failed to encode request body: {0}")]
	Encode(#[from] serde_json::Error),
}

impl OciError {
	/// HTTP status of an API error, if this is one.
	pub fn status(&self) -> Option<u16> {
		match self {
			OciError::Api { status, .. } => Some(*status),
			_ => None,
		}
	}
}
