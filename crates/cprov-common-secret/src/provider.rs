// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret-store capability.
//!
//! The provisioning run looks up a handful of named values (storage account
//! credentials, the directory service principal, the notification endpoint).
//! [`SecretProvider`] abstracts that lookup so the driver can be handed an
//! environment-backed store in production and a [`MemorySecretProvider`] in
//! tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::SecretString;

/// Errors raised while resolving a named secret.
#[derive(Debug, Error)]
pub enum SecretError {
	#[error("secret '{name}' is not set")]
	Missing { name: String },

	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Get-by-name access to a secret store.
#[async_trait]
pub trait SecretProvider: Send + Sync + std::fmt::Debug {
	/// Look up a secret; `Ok(None)` when the store has no such entry.
	async fn get(&self, name: &str) -> Result<Option<SecretString>, SecretError>;

	/// Look up a secret that must exist.
	async fn require(&self, name: &str) -> Result<SecretString, SecretError> {
		self
			.get(name)
			.await?
			.ok_or_else(|| SecretError::Missing {
				name: name.to_string(),
			})
	}
}

/// Secret store backed by environment variables.
///
/// A secret named `oci_storage_account` is read from
/// `CPROV_SECRET_OCI_STORAGE_ACCOUNT`, or from the file named by
/// `CPROV_SECRET_OCI_STORAGE_ACCOUNT_FILE` (the Docker/Kubernetes secret
/// mount convention). The `_FILE` form wins when both are set and a single
/// trailing newline is stripped from file contents.
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
	prefix: String,
}

impl EnvSecretProvider {
	pub const DEFAULT_PREFIX: &'static str = "CPROV_SECRET_";

	pub fn new() -> Self {
		Self::with_prefix(Self::DEFAULT_PREFIX)
	}

	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	/// Environment variable consulted for `name`.
	pub fn var_name(&self, name: &str) -> String {
		let normalized: String = name
			.chars()
			.map(|c| {
				if c.is_ascii_alphanumeric() {
					c.to_ascii_uppercase()
				} else {
					'_'
				}
			})
			.collect();
		format!("{}{}", self.prefix, normalized)
	}
}

impl Default for EnvSecretProvider {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
	async fn get(&self, name: &str) -> Result<Option<SecretString>, SecretError> {
		let var = self.var_name(name);
		let file_var = format!("{var}_FILE");

		if let Ok(path) = std::env::var(&file_var) {
			if path.is_empty() {
				return Err(SecretError::EmptyPath { var: file_var });
			}
			let path = PathBuf::from(path);
			let content = read_secret_file(&path)?;
			debug!(secret = name, source = "file", "resolved secret");
			let value = content.strip_suffix('\n').unwrap_or(&content).to_string();
			return Ok(Some(SecretString::new(value)));
		}

		match std::env::var(&var) {
			Ok(value) if !value.is_empty() => {
				debug!(secret = name, source = "env", "resolved secret");
				Ok(Some(SecretString::new(value)))
			}
			_ => Ok(None),
		}
	}
}

fn read_secret_file(path: &PathBuf) -> Result<String, SecretError> {
	std::fs::read_to_string(path).map_err(|source| SecretError::Io {
		path: path.clone(),
		source,
	})
}

/// In-memory secret store, used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemorySecretProvider {
	values: RwLock<HashMap<String, SecretString>>,
}

impl MemorySecretProvider {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(self, name: impl Into<String>, value: impl Into<SecretString>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert(&self, name: impl Into<String>, value: impl Into<SecretString>) {
		self.values
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(name.into(), value.into());
	}
}

#[async_trait]
impl SecretProvider for MemorySecretProvider {
	async fn get(&self, name: &str) -> Result<Option<SecretString>, SecretError> {
		Ok(self
			.values
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(name)
			.cloned())
	}
}
