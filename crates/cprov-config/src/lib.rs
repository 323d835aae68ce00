// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration for the compartment provisioner.
//!
//! Configuration is layered from built-in defaults, an optional TOML file
//! (`/etc/cprov/provisioner.toml` unless a path is given) and `CPROV_*`
//! environment variables, in increasing precedence. The result is a single
//! [`ProvisionerConfig`] handed to the provisioning driver.
//!
//! Secrets are not part of this configuration; they come from the secret
//! store at run time.

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use std::path::PathBuf;

pub use error::ConfigError;
pub use layer::ProvisionerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved provisioner configuration.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
	pub staging: StagingConfig,
	pub oci: OciConfig,
	pub directory: DirectoryConfig,
	pub fileshare: FileShareConfig,
	pub http: HttpConfig,
	pub rollback: RollbackConfig,
	pub logging: LoggingConfig,
}

impl ProvisionerConfig {
	/// Configuration with defaults everywhere and the given directory tenant.
	pub fn with_tenant(tenant_id: impl Into<String>) -> Self {
		Self {
			staging: StagingConfig::default(),
			oci: OciConfig::default(),
			directory: DirectoryConfig::new(tenant_id),
			fileshare: FileShareConfig::default(),
			http: HttpConfig::default(),
			rollback: RollbackConfig::default(),
			logging: LoggingConfig::default(),
		}
	}
}

/// Load configuration from all sources.
///
/// `config_path` replaces the system config file location when given.
pub fn load_config(config_path: Option<PathBuf>) -> Result<ProvisionerConfig, ConfigError> {
	let toml = match config_path {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};
	let sources: Vec<Box<dyn ConfigSource>> =
		vec![Box::new(DefaultsSource), Box::new(toml), Box::new(EnvSource)];
	load_from_sources(sources)
}

/// Merge the given sources in precedence order and finalize.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ProvisionerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ProvisionerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize a merged layer into resolved config.
pub fn finalize(layer: ProvisionerConfigLayer) -> Result<ProvisionerConfig, ConfigError> {
	let staging = layer.staging.unwrap_or_default().finalize();
	let oci = layer.oci.unwrap_or_default().finalize();
	let fileshare = layer.fileshare.unwrap_or_default().finalize();
	let http = layer.http.unwrap_or_default().finalize();
	let rollback = layer.rollback.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	let directory = layer
		.directory
		.unwrap_or_default()
		.finalize()
		.ok_or_else(|| {
			ConfigError::Validation(
				"directory.tenant_id is required (set CPROV_DIRECTORY_TENANT_ID or [directory] tenant_id)"
					.to_string(),
			)
		})?;

	validate(&oci, &http)?;

	info!(
		staging_base = %staging.base_dir.display(),
		remote_directory = %staging.remote_directory,
		oci_profile = %oci.profile,
		idp_protocol = %oci.idp_protocol,
		tenant_id = %directory.tenant_id,
		rollback_enabled = rollback.enabled,
		"Provisioner configuration loaded"
	);

	Ok(ProvisionerConfig {
		staging,
		oci,
		directory,
		fileshare,
		http,
		rollback,
		logging,
	})
}

fn validate(oci: &OciConfig, http: &HttpConfig) -> Result<(), ConfigError> {
	if oci.profile.trim().is_empty() {
		return Err(ConfigError::Validation(
			"oci.profile must not be empty".to_string(),
		));
	}
	if http.timeout.is_zero() {
		return Err(ConfigError::Validation(
			"http.timeout_secs must be greater than zero".to_string(),
		));
	}
	Ok(())
}
