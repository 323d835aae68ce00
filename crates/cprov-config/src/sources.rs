// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file and the environment.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ProvisionerConfigLayer;
use crate::sections::{
	DirectoryConfigLayer, FileShareConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer,
	OciConfigLayer, RollbackConfigLayer, StagingConfigLayer,
};

/// Default location of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/cprov/provisioner.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ProvisionerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ProvisionerConfigLayer, ConfigError> {
		Ok(ProvisionerConfigLayer::default())
	}
}

/// TOML file source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ProvisionerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ProvisionerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `CPROV_<SECTION>_<FIELD>`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ProvisionerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ProvisionerConfigLayer {
			staging: Some(StagingConfigLayer {
				base_dir: env_var("CPROV_STAGING_BASE_DIR").map(PathBuf::from),
				remote_directory: env_var("CPROV_STAGING_REMOTE_DIRECTORY"),
			}),
			oci: Some(OciConfigLayer {
				profile: env_var("CPROV_OCI_PROFILE"),
				identity_endpoint: env_var("CPROV_OCI_IDENTITY_ENDPOINT"),
				budget_endpoint: env_var("CPROV_OCI_BUDGET_ENDPOINT"),
				idp_protocol: env_var("CPROV_OCI_IDP_PROTOCOL"),
			}),
			directory: Some(DirectoryConfigLayer {
				tenant_id: env_var("CPROV_DIRECTORY_TENANT_ID"),
				authority_url: env_var("CPROV_DIRECTORY_AUTHORITY_URL"),
				graph_url: env_var("CPROV_DIRECTORY_GRAPH_URL"),
			}),
			fileshare: Some(FileShareConfigLayer {
				endpoint_suffix: env_var("CPROV_FILESHARE_ENDPOINT_SUFFIX"),
				endpoint: env_var("CPROV_FILESHARE_ENDPOINT"),
			}),
			http: Some(HttpConfigLayer {
				timeout_secs: env_u64("CPROV_HTTP_TIMEOUT_SECS")?,
			}),
			rollback: Some(RollbackConfigLayer {
				enabled: env_bool("CPROV_ROLLBACK_ENABLED"),
			}),
			logging: Some(LoggingConfigLayer {
				level: env_var("CPROV_LOG_LEVEL"),
				format: env_var("CPROV_LOG_FORMAT")
					.map(|v| v.parse::<LogFormat>())
					.transpose()?,
			}),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}
