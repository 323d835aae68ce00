// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The provisioning run.
//!
//! [`Provisioner::run`] takes the invocation payload through every step in
//! order: parse, stage configuration, resolve the compartment tree, check for
//! a duplicate, then create the compartment, admin group, directory group,
//! federation mapping, policy and budget before notifying the owner.
//! Resources created before a failure are compensated per
//! [`RollbackConfig`](cprov_config::RollbackConfig).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cprov_common_secret::{SecretProvider, SecretString};
use cprov_config::ProvisionerConfig;
use cprov_directory::{ClientCredentials, DirectoryProvider};
use cprov_fileshare::{stage_oci_config, FileShare, StagedConfig};
use cprov_notify::{Notification, Notifier};
use cprov_oci::{
	CloudProvider, Compartment, CreateBudgetDetails, CreateCompartmentDetails, CreateGroupDetails,
	CreateIdpGroupMappingDetails, CreatePolicyDetails, OciProfile, ResetPeriod, TargetType,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::directory::{ensure_directory_group, ensure_membership};
use crate::error::{ProvisionError, Step};
use crate::request::ProvisioningRequest;
use crate::resolver::resolve_compartments;
use crate::rollback::{Compensation, CompensationPlan};

pub const SECRET_STORAGE_ACCOUNT: &str = "oci_storage_account";
pub const SECRET_STORAGE_ACCOUNT_KEY: &str = "oci_storage_account_key";
pub const SECRET_STORAGE_SHARE: &str = "oci_storage_share_name";
pub const SECRET_DIRECTORY_CLIENT_ID: &str = "AzutomationAccountSPId";
pub const SECRET_DIRECTORY_CLIENT_SECRET: &str = "AutomationAccountSP_Key";
pub const SECRET_EMAIL_ENDPOINT: &str = "EmailRestEndpoint";

pub const DUPLICATE_SUBJECT: &str = "Subscription already exists";
pub const SUCCESS_SUBJECT: &str = "Compartment created Successfully";

/// Builds the provider clients a run talks to.
#[async_trait]
pub trait Connectors: Send + Sync {
	fn file_share(
		&self,
		account: &str,
		account_key: &SecretString,
		share: &str,
	) -> Result<Arc<dyn FileShare>, ProvisionError>;

	/// Cloud client signing with the private key at `private_key`.
	fn cloud(
		&self,
		profile: &OciProfile,
		private_key: &Path,
	) -> Result<Arc<dyn CloudProvider>, ProvisionError>;

	async fn directory(
		&self,
		credentials: &ClientCredentials,
	) -> Result<Arc<dyn DirectoryProvider>, ProvisionError>;

	fn notifier(&self, endpoint: &str) -> Result<Arc<dyn Notifier>, ProvisionError>;
}

/// Everything a successful run created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionReport {
	pub compartment_id: String,
	pub compartment_name: String,
	pub parent_id: String,
	pub group_id: String,
	pub directory_group_id: String,
	pub directory_group_created: bool,
	pub membership_added: bool,
	pub idp_group_mapping_id: String,
	pub policy_id: String,
	pub budget_id: String,
	pub budget_amount: f64,
	pub console_url: String,
}

pub fn duplicate_notification(request: &ProvisioningRequest) -> Notification {
	Notification::new(
		&request.owner,
		DUPLICATE_SUBJECT,
		format!("Subscription {} already exists!", request.subname),
	)
}

pub fn success_notification(request: &ProvisioningRequest, console_url: &str) -> Notification {
	Notification::new(
		&request.owner,
		SUCCESS_SUBJECT,
		format!(
			"Compartment {} was created with a budget of {}. {}",
			request.subname,
			request.display_budget(),
			console_url
		),
	)
}

pub struct Provisioner<C> {
	config: ProvisionerConfig,
	secrets: Arc<dyn SecretProvider>,
	connectors: C,
}

impl<C: Connectors> Provisioner<C> {
	pub fn new(config: ProvisionerConfig, secrets: Arc<dyn SecretProvider>, connectors: C) -> Self {
		Self {
			config,
			secrets,
			connectors,
		}
	}

	#[instrument(skip_all)]
	pub async fn run(&self, payload: &str) -> Result<ProvisionReport, ProvisionError> {
		let request = ProvisioningRequest::parse(payload)?;
		info!(
			subname = %request.subname,
			owner = %request.owner,
			budget = request.monthly_budget,
			"provisioning request accepted"
		);

		let staged = self.stage().await?;
		let profile = OciProfile::from_file(&staged.config, &self.config.oci.profile)?;
		let cloud = self.connectors.cloud(&profile, &staged.private_key)?;
		drop(staged);

		info!(tenancy = %profile.tenancy, region = %profile.region, "retrieving all compartments");
		let index = resolve_compartments(cloud.as_ref(), &profile.tenancy)
			.await
			.map_err(|e| ProvisionError::upstream(Step::ListCompartments, e))?;

		if index.contains(&request.index_key()) {
			error!(subname = %request.subname, "compartment already exists");
			if let Err(e) = self.notify(&duplicate_notification(&request)).await {
				warn!(error = %e, "could not notify owner about duplicate");
			}
			return Err(ProvisionError::DuplicateCompartment {
				name: request.subname.clone(),
			});
		}

		let parent_name = request.parent_name();
		let parent = index
			.get(&parent_name)
			.cloned()
			.ok_or(ProvisionError::ParentNotFound {
				parent: parent_name,
			})?;

		let mut plan = CompensationPlan::new();
		let mut directory: Option<Arc<dyn DirectoryProvider>> = None;
		let created = self
			.create_resources(
				&request,
				&profile,
				cloud.as_ref(),
				&parent,
				&mut plan,
				&mut directory,
			)
			.await;

		let report = match created {
			Ok(report) => report,
			Err(e) => {
				error!(error = %e, "provisioning failed");
				if self.config.rollback.enabled {
					let unwound = plan.unwind(cloud.as_ref(), directory.as_deref()).await;
					info!(
						undone = unwound.undone.len(),
						failed = unwound.failed.len(),
						"rollback finished"
					);
				} else {
					plan.abandon();
				}
				return Err(e);
			}
		};

		// Resources stay in place when the owner cannot be told about them.
		if let Err(e) = self
			.notify(&success_notification(&request, &report.console_url))
			.await
		{
			warn!(
				error = %e,
				compartment_id = %report.compartment_id,
				group_id = %report.group_id,
				policy_id = %report.policy_id,
				budget_id = %report.budget_id,
				"could not notify owner about new compartment"
			);
		}
		info!(compartment_id = %report.compartment_id, "provisioning complete");
		Ok(report)
	}

	async fn stage(&self) -> Result<StagedConfig, ProvisionError> {
		let account = self.secrets.require(SECRET_STORAGE_ACCOUNT).await?;
		let key = self.secrets.require(SECRET_STORAGE_ACCOUNT_KEY).await?;
		let share_name = self.secrets.require(SECRET_STORAGE_SHARE).await?;

		info!(account = %account.expose(), "getting OCI config files from file share");
		let share = self
			.connectors
			.file_share(account.expose(), &key, share_name.expose())?;

		stage_oci_config(
			share.as_ref(),
			&self.config.staging.base_dir,
			&self.config.staging.remote_directory,
		)
		.await
		.map_err(|e| {
			error!(error = %e, "OCI configuration could not be staged");
			ProvisionError::ConfigFetchFailure(e)
		})
	}

	async fn notify(&self, notification: &Notification) -> Result<(), ProvisionError> {
		let endpoint = self.secrets.require(SECRET_EMAIL_ENDPOINT).await?;
		let notifier = self.connectors.notifier(endpoint.expose())?;
		notifier.notify(notification).await?;
		Ok(())
	}

	async fn directory_credentials(&self) -> Result<ClientCredentials, ProvisionError> {
		let client_id = self.secrets.require(SECRET_DIRECTORY_CLIENT_ID).await?;
		let client_secret = self.secrets.require(SECRET_DIRECTORY_CLIENT_SECRET).await?;
		Ok(ClientCredentials {
			tenant_id: self.config.directory.tenant_id.clone(),
			client_id: client_id.expose().clone(),
			client_secret,
		})
	}

	async fn create_resources(
		&self,
		request: &ProvisioningRequest,
		profile: &OciProfile,
		cloud: &dyn CloudProvider,
		parent: &Compartment,
		plan: &mut CompensationPlan,
		directory: &mut Option<Arc<dyn DirectoryProvider>>,
	) -> Result<ProvisionReport, ProvisionError> {
		info!(parent = %parent.name, "creating compartment");
		let compartment = cloud
			.create_compartment(&CreateCompartmentDetails {
				compartment_id: parent.id.clone(),
				name: request.subname.clone(),
				description: request.subname.clone(),
			})
			.await
			.map_err(|e| ProvisionError::upstream(Step::CreateCompartment, e))?;
		plan.record(Compensation::Compartment {
			id: compartment.id.clone(),
		});

		info!("creating compartment admins group");
		let admin_group = request.admin_group_name();
		let group = cloud
			.create_group(&CreateGroupDetails {
				compartment_id: profile.tenancy.clone(),
				name: admin_group.clone(),
				description: admin_group,
			})
			.await
			.map_err(|e| ProvisionError::upstream(Step::CreateGroup, e))?;
		plan.record(Compensation::Group {
			id: group.id.clone(),
		});

		let credentials = self.directory_credentials().await?;
		let client = self.connectors.directory(&credentials).await?;
		*directory = Some(client.clone());

		let ensured = ensure_directory_group(client.as_ref(), &request.directory_group_name()).await?;
		if ensured.created {
			plan.record(Compensation::DirectoryGroup {
				id: ensured.group.id.clone(),
			});
		}
		let membership_added =
			ensure_membership(client.as_ref(), &ensured.group.id, &request.owner).await?;

		let protocol = &self.config.oci.idp_protocol;
		let provider = cloud
			.list_identity_providers(&profile.tenancy, protocol)
			.await
			.map_err(|e| ProvisionError::upstream(Step::ListIdentityProviders, e))?
			.into_iter()
			.next()
			.ok_or_else(|| ProvisionError::IdentityProviderNotFound {
				protocol: protocol.clone(),
			})?;
		info!(provider = %provider.name, id = %provider.id, "using identity provider");

		let mapping = cloud
			.create_idp_group_mapping(
				&provider.id,
				&CreateIdpGroupMappingDetails {
					group_id: group.id.clone(),
					idp_group_name: ensured.group.id.clone(),
				},
			)
			.await
			.map_err(|e| ProvisionError::upstream(Step::CreateGroupMapping, e))?;
		plan.record(Compensation::IdpGroupMapping {
			idp_id: provider.id.clone(),
			mapping_id: mapping.id.clone(),
		});

		info!("creating policy for admins group");
		let policy_name = request.policy_name();
		let policy = cloud
			.create_policy(&CreatePolicyDetails {
				compartment_id: compartment.id.clone(),
				name: policy_name.clone(),
				description: policy_name,
				statements: vec![request.policy_statement()],
			})
			.await
			.map_err(|e| ProvisionError::upstream(Step::CreatePolicy, e))?;
		plan.record(Compensation::Policy {
			id: policy.id.clone(),
		});

		info!(amount = request.monthly_budget, "setting monthly budget");
		let budget_name = request.budget_name();
		let budget = cloud
			.create_budget(&CreateBudgetDetails {
				compartment_id: profile.tenancy.clone(),
				display_name: budget_name.clone(),
				description: budget_name,
				amount: request.monthly_budget,
				reset_period: ResetPeriod::Monthly,
				target_type: TargetType::Compartment,
				targets: vec![compartment.id.clone()],
			})
			.await
			.map_err(|e| ProvisionError::upstream(Step::CreateBudget, e))?;
		plan.record(Compensation::Budget {
			id: budget.id.clone(),
		});

		Ok(ProvisionReport {
			compartment_id: compartment.id,
			compartment_name: compartment.name,
			parent_id: parent.id.clone(),
			group_id: group.id,
			directory_group_id: ensured.group.id,
			directory_group_created: ensured.created,
			membership_added,
			idp_group_mapping_id: mapping.id,
			policy_id: policy.id,
			budget_id: budget.id,
			budget_amount: request.monthly_budget,
			console_url: profile.console_url(),
		})
	}
}
