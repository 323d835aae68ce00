// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Azure Files access for the compartment provisioner.
//!
//! The OCI config file and API key pair live on an Azure file share.
//! [`AzureFileShare`] downloads them with SharedKey authorization and
//! [`stage_oci_config`] writes them into a scoped temporary directory.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod staging;

pub use api::FileShare;
pub use auth::{SharedKeyCredential, STORAGE_API_VERSION};
pub use client::{AzureFileShare, DEFAULT_ENDPOINT_SUFFIX};
pub use error::FileShareError;
pub use staging::{
	stage_oci_config, StagedConfig, CONFIG_FILE, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE,
};
