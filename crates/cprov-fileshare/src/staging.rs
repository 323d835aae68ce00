// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scoped local staging of the OCI config artifacts.
//!
//! The three files are written into a fresh temporary directory under the
//! configured base directory. The directory and everything in it is removed
//! when the [`StagedConfig`] is dropped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{info, instrument};

use crate::api::FileShare;
use crate::error::FileShareError;

pub const CONFIG_FILE: &str = "config";
pub const PRIVATE_KEY_FILE: &str = "oci_api_key.pem";
pub const PUBLIC_KEY_FILE: &str = "oci_api_key_public.pem";

/// OCI config artifacts staged on local disk.
#[derive(Debug)]
pub struct StagedConfig {
	dir: TempDir,
	pub config: PathBuf,
	pub private_key: PathBuf,
	pub public_key: PathBuf,
}

impl StagedConfig {
	pub fn dir(&self) -> &Path {
		self.dir.path()
	}
}

/// Download `config`, `oci_api_key.pem` and `oci_api_key_public.pem` from
/// `remote_directory` on the share into a new directory under `base_dir`.
///
/// Fails with [`FileShareError::NotFound`] if any of the three is missing.
#[instrument(skip(share))]
pub async fn stage_oci_config(
	share: &dyn FileShare,
	base_dir: &Path,
	remote_directory: &str,
) -> Result<StagedConfig, FileShareError> {
	tokio::fs::create_dir_all(base_dir)
		.await
		.map_err(|source| FileShareError::Io {
			path: base_dir.to_path_buf(),
			source,
		})?;
	let dir = tempfile::Builder::new()
		.prefix("cprov-")
		.tempdir_in(base_dir)
		.map_err(|source| FileShareError::Io {
			path: base_dir.to_path_buf(),
			source,
		})?;

	let config = fetch(share, remote_directory, CONFIG_FILE, dir.path()).await?;
	let private_key = fetch(share, remote_directory, PRIVATE_KEY_FILE, dir.path()).await?;
	let public_key = fetch(share, remote_directory, PUBLIC_KEY_FILE, dir.path()).await?;
	restrict_permissions(&private_key)?;

	info!(dir = %dir.path().display(), "staged OCI configuration");

	Ok(StagedConfig {
		dir,
		config,
		private_key,
		public_key,
	})
}

async fn fetch(
	share: &dyn FileShare,
	remote_directory: &str,
	file: &str,
	target: &Path,
) -> Result<PathBuf, FileShareError> {
	let bytes = share.download(remote_directory, file).await?;
	let path = target.join(file);
	tokio::fs::write(&path, bytes)
		.await
		.map_err(|source| FileShareError::Io {
			path: path.clone(),
			source,
		})?;
	Ok(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), FileShareError> {
	use std::os::unix::fs::PermissionsExt;

	std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|source| {
		FileShareError::Io {
			path: path.to_path_buf(),
			source,
		}
	})
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), FileShareError> {
	Ok(())
}
