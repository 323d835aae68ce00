// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Production [`Connectors`]: real HTTP clients for every provider.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cprov_common_secret::SecretString;
use cprov_config::ProvisionerConfig;
use cprov_directory::{ClientCredentials, DirectoryProvider, GraphClient};
use cprov_fileshare::{AzureFileShare, FileShare, SharedKeyCredential};
use cprov_notify::{HttpNotifier, Notifier};
use cprov_oci::{CloudProvider, OciClient, OciProfile, RequestSigner};
use reqwest::Client;
use tracing::debug;

use crate::driver::Connectors;
use crate::error::{ProvisionError, Step};

/// Connectors sharing one HTTP client configured from [`ProvisionerConfig`].
#[derive(Debug, Clone)]
pub struct LiveConnectors {
	http_client: Client,
	config: ProvisionerConfig,
}

impl LiveConnectors {
	pub fn new(config: &ProvisionerConfig) -> Result<Self, ProvisionError> {
		let http_client = cprov_common_http::new_client_with_timeout(config.http.timeout)
			.map_err(ProvisionError::HttpClient)?;
		Ok(Self {
			http_client,
			config: config.clone(),
		})
	}
}

#[async_trait]
impl Connectors for LiveConnectors {
	fn file_share(
		&self,
		account: &str,
		account_key: &SecretString,
		share: &str,
	) -> Result<Arc<dyn FileShare>, ProvisionError> {
		let credential = SharedKeyCredential::new(account, account_key.expose())
			.map_err(ProvisionError::ConfigFetchFailure)?;
		let mut client = AzureFileShare::new(self.http_client.clone(), credential, share)
			.with_endpoint_suffix(&self.config.fileshare.endpoint_suffix);
		if let Some(endpoint) = &self.config.fileshare.endpoint {
			client = client.with_endpoint(endpoint.clone());
		}
		Ok(Arc::new(client))
	}

	fn cloud(
		&self,
		profile: &OciProfile,
		private_key: &Path,
	) -> Result<Arc<dyn CloudProvider>, ProvisionError> {
		if let Some(configured) = &profile.key_file {
			debug!(
				configured = %configured.display(),
				staged = %private_key.display(),
				"using staged private key"
			);
		}
		let signer = RequestSigner::from_key_file(profile.key_id(), private_key)?;
		let mut client = OciClient::new(self.http_client.clone(), signer, profile);
		if let Some(url) = &self.config.oci.identity_endpoint {
			client = client.with_identity_endpoint(url.clone());
		}
		if let Some(url) = &self.config.oci.budget_endpoint {
			client = client.with_budget_endpoint(url.clone());
		}
		Ok(Arc::new(client))
	}

	async fn directory(
		&self,
		credentials: &ClientCredentials,
	) -> Result<Arc<dyn DirectoryProvider>, ProvisionError> {
		let client = GraphClient::connect(
			self.http_client.clone(),
			&self.config.directory.authority_url,
			&self.config.directory.graph_url,
			credentials,
		)
		.await
		.map_err(|e| ProvisionError::upstream(Step::DirectoryToken, e))?;
		Ok(Arc::new(client))
	}

	fn notifier(&self, endpoint: &str) -> Result<Arc<dyn Notifier>, ProvisionError> {
		Ok(Arc::new(HttpNotifier::new(self.http_client.clone(), endpoint)))
	}
}
