// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning error taxonomy and exit-code mapping.

use std::fmt;

use cprov_common_secret::SecretError;
use cprov_directory::DirectoryError;
use cprov_fileshare::FileShareError;
use cprov_notify::NotifyError;
use cprov_oci::{OciError, ProfileError};
use thiserror::Error;

/// Process exit status for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit status for a missing configuration artifact and every other
/// failure.
pub const EXIT_FAILURE: i32 = 1;
/// Process exit status when the compartment already exists.
pub const EXIT_DUPLICATE: i32 = 2;

/// The provider call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	ListCompartments,
	CreateCompartment,
	CreateGroup,
	DirectoryToken,
	FindDirectoryGroup,
	CreateDirectoryGroup,
	LookupOwner,
	CheckMembership,
	AddMember,
	ListIdentityProviders,
	CreateGroupMapping,
	CreatePolicy,
	CreateBudget,
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Step::ListCompartments => "list compartments",
			Step::CreateCompartment => "create compartment",
			Step::CreateGroup => "create admin group",
			Step::DirectoryToken => "acquire directory token",
			Step::FindDirectoryGroup => "find directory group",
			Step::CreateDirectoryGroup => "create directory group",
			Step::LookupOwner => "look up owner",
			Step::CheckMembership => "check group membership",
			Step::AddMember => "add owner to directory group",
			Step::ListIdentityProviders => "list identity providers",
			Step::CreateGroupMapping => "create group mapping",
			Step::CreatePolicy => "create policy",
			Step::CreateBudget => "create budget",
		};
		f.write_str(name)
	}
}

/// Failure of an upstream provider call.
#[derive(Debug, Error)]
pub enum UpstreamError {
	#[error(transparent)]
	Cloud(#[from] OciError),

	#[error(transparent)]
	Directory(#[from] DirectoryError),
}

#[derive(Debug, Error)]
pub enum ProvisionError {
	#[error("malformed request: {0}")]
	MalformedInput(String),

	#[error("failed to fetch OCI configuration: {0}")]
	ConfigFetchFailure(#[source] FileShareError),

	#[error("invalid OCI configuration: {0}")]
	ConfigInvalid(#[from] ProfileError),

	#[error("compartment '{name}' already exists")]
	DuplicateCompartment { name: String },

	#[error("parent compartment '{parent}' not found")]
	ParentNotFound { parent: String },

	#[error("no {protocol} identity provider registered in the tenancy")]
	IdentityProviderNotFound { protocol: String },

	#[error("{step} failed: {source}")]
	UpstreamApiFailure {
		step: Step,
		#[source]
		source: UpstreamError,
	},

	#[error(transparent)]
	SecretMissing(#[from] SecretError),

	#[error("failed to notify owner: {0}")]
	Notification(#[from] NotifyError),

	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[source] reqwest::Error),
}

impl ProvisionError {
	pub fn upstream(step: Step, source: impl Into<UpstreamError>) -> Self {
		ProvisionError::UpstreamApiFailure {
			step,
			source: source.into(),
		}
	}

	/// Exit status for a run that ended with this error.
	pub fn exit_code(&self) -> i32 {
		match self {
			ProvisionError::DuplicateCompartment { .. } => EXIT_DUPLICATE,
			_ => EXIT_FAILURE,
		}
	}
}

/// Exit status for the outcome of a run.
pub fn exit_code<T>(result: &Result<T, ProvisionError>) -> i32 {
	match result {
		Ok(_) => EXIT_SUCCESS,
		Err(e) => e.exit_code(),
	}
}
