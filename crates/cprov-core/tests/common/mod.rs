// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recording fakes for driving a provisioning run without network access.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cprov_common_secret::{MemorySecretProvider, SecretString};
use cprov_config::ProvisionerConfig;
use cprov_core::{Connectors, ProvisionError};
use cprov_directory::{
	ClientCredentials, DirectoryError, DirectoryGroup, DirectoryProvider, DirectoryUser,
};
use cprov_fileshare::{FileShare, FileShareError};
use cprov_notify::{Notification, Notifier, NotifyError};
use cprov_oci::{
	Budget, CloudProvider, Compartment, CompartmentSource, CreateBudgetDetails,
	CreateCompartmentDetails, CreateGroupDetails, CreateIdpGroupMappingDetails,
	CreatePolicyDetails, Group, IdentityProvider, IdpGroupMapping, OciError, OciProfile, Policy,
};

pub const TENANCY: &str = "ocid1.tenancy.oc1..aaaaaaaatenancy";
pub const TEAMX: &str = "ocid1.compartment.oc1..teamx";
pub const IDP: &str = "ocid1.saml2idp.oc1..entra";

pub fn oci_config() -> String {
	format!(
		"[DEFAULT]\n\
		 user=ocid1.user.oc1..aaaaaaaauser\n\
		 fingerprint=20:3b:97:13:55:1c:5b:0d:d3:37:d8:50:4e:c5:3a:34\n\
		 key_file=~/.oci/oci_api_key.pem\n\
		 tenancy={TENANCY}\n\
		 region=us-ashburn-1\n"
	)
}

pub fn payload(subname: &str, owner: &str, budget: &str) -> String {
	let body = serde_json::json!({
		"subname": subname,
		"owner": owner,
		"monthlybudget": budget,
	});
	serde_json::json!({ "RequestBody": body.to_string() }).to_string()
}

pub fn secrets() -> MemorySecretProvider {
	MemorySecretProvider::new()
		.with("oci_storage_account", "acct")
		.with("oci_storage_account_key", "a2V5")
		.with("oci_storage_share_name", "oci-config")
		.with("AzutomationAccountSPId", "sp-id")
		.with("AutomationAccountSP_Key", "sp-secret")
		.with("EmailRestEndpoint", "https://mail.example.com/send")
}

pub fn config(base_dir: &Path) -> ProvisionerConfig {
	let mut config = ProvisionerConfig::with_tenant("tenant-1");
	config.staging.base_dir = base_dir.to_path_buf();
	config
}

fn compartment(id: &str, name: &str, parent: &str) -> Compartment {
	Compartment {
		id: id.to_string(),
		name: name.to_string(),
		compartment_id: parent.to_string(),
		description: name.to_string(),
		lifecycle_state: Some("ACTIVE".to_string()),
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum CloudCall {
	ListCompartments(String),
	CreateCompartment { parent: String, name: String },
	DeleteCompartment(String),
	CreateGroup { compartment: String, name: String },
	DeleteGroup(String),
	ListIdentityProviders { compartment: String, protocol: String },
	CreateMapping { idp: String, group_id: String, idp_group_name: String },
	DeleteMapping { idp: String, mapping: String },
	CreatePolicy { compartment: String, name: String, statements: Vec<String> },
	DeletePolicy(String),
	CreateBudget { compartment: String, name: String, amount: f64, targets: Vec<String> },
	DeleteBudget(String),
}

/// In-memory tenancy: `root → {teamx → {dev-teamx-01}, teamy}`.
pub struct FakeCloud {
	tree: Mutex<HashMap<String, Vec<Compartment>>>,
	pub providers: Mutex<Vec<IdentityProvider>>,
	pub fail_policy: Mutex<bool>,
	pub calls: Mutex<Vec<CloudCall>>,
}

impl FakeCloud {
	pub fn new() -> Self {
		let mut tree: HashMap<String, Vec<Compartment>> = HashMap::new();
		tree.insert(
			TENANCY.to_string(),
			vec![
				compartment(TEAMX, "teamx", TENANCY),
				compartment("ocid1.compartment.oc1..teamy", "TeamY", TENANCY),
			],
		);
		tree.insert(
			TEAMX.to_string(),
			vec![compartment("ocid1.compartment.oc1..dev01", "dev-teamx-01", TEAMX)],
		);
		Self {
			tree: Mutex::new(tree),
			providers: Mutex::new(vec![IdentityProvider {
				id: IDP.to_string(),
				name: "EntraID".to_string(),
				protocol: "SAML2".to_string(),
			}]),
			fail_policy: Mutex::new(false),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn without_identity_providers(self) -> Self {
		self.providers.lock().unwrap().clear();
		self
	}

	pub fn failing_policy(self) -> Self {
		*self.fail_policy.lock().unwrap() = true;
		self
	}

	pub fn calls(&self) -> Vec<CloudCall> {
		self.calls.lock().unwrap().clone()
	}

	pub fn count(&self, pred: impl Fn(&CloudCall) -> bool) -> usize {
		self.calls().iter().filter(|c| pred(c)).count()
	}

	fn record(&self, call: CloudCall) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl CompartmentSource for FakeCloud {
	async fn list_compartments(&self, parent_id: &str) -> Result<Vec<Compartment>, OciError> {
		self.record(CloudCall::ListCompartments(parent_id.to_string()));
		Ok(self
			.tree
			.lock()
			.unwrap()
			.get(parent_id)
			.cloned()
			.unwrap_or_default())
	}
}

#[async_trait]
impl CloudProvider for FakeCloud {
	async fn create_compartment(
		&self,
		details: &CreateCompartmentDetails,
	) -> Result<Compartment, OciError> {
		self.record(CloudCall::CreateCompartment {
			parent: details.compartment_id.clone(),
			name: details.name.clone(),
		});
		let created = compartment(
			"ocid1.compartment.oc1..new",
			&details.name,
			&details.compartment_id,
		);
		self.tree
			.lock()
			.unwrap()
			.entry(details.compartment_id.clone())
			.or_default()
			.push(created.clone());
		Ok(created)
	}

	async fn delete_compartment(&self, compartment_id: &str) -> Result<(), OciError> {
		self.record(CloudCall::DeleteCompartment(compartment_id.to_string()));
		for children in self.tree.lock().unwrap().values_mut() {
			children.retain(|c| c.id != compartment_id);
		}
		Ok(())
	}

	async fn create_group(&self, details: &CreateGroupDetails) -> Result<Group, OciError> {
		self.record(CloudCall::CreateGroup {
			compartment: details.compartment_id.clone(),
			name: details.name.clone(),
		});
		Ok(Group {
			id: "ocid1.group.oc1..admins".to_string(),
			name: details.name.clone(),
			compartment_id: details.compartment_id.clone(),
			description: details.description.clone(),
		})
	}

	async fn delete_group(&self, group_id: &str) -> Result<(), OciError> {
		self.record(CloudCall::DeleteGroup(group_id.to_string()));
		Ok(())
	}

	async fn list_identity_providers(
		&self,
		compartment_id: &str,
		protocol: &str,
	) -> Result<Vec<IdentityProvider>, OciError> {
		self.record(CloudCall::ListIdentityProviders {
			compartment: compartment_id.to_string(),
			protocol: protocol.to_string(),
		});
		Ok(self.providers.lock().unwrap().clone())
	}

	async fn create_idp_group_mapping(
		&self,
		idp_id: &str,
		details: &CreateIdpGroupMappingDetails,
	) -> Result<IdpGroupMapping, OciError> {
		self.record(CloudCall::CreateMapping {
			idp: idp_id.to_string(),
			group_id: details.group_id.clone(),
			idp_group_name: details.idp_group_name.clone(),
		});
		Ok(IdpGroupMapping {
			id: "ocid1.idpgroupmapping.oc1..m".to_string(),
			idp_id: idp_id.to_string(),
			group_id: details.group_id.clone(),
			idp_group_name: details.idp_group_name.clone(),
		})
	}

	async fn delete_idp_group_mapping(&self, idp_id: &str, mapping_id: &str) -> Result<(), OciError> {
		self.record(CloudCall::DeleteMapping {
			idp: idp_id.to_string(),
			mapping: mapping_id.to_string(),
		});
		Ok(())
	}

	async fn create_policy(&self, details: &CreatePolicyDetails) -> Result<Policy, OciError> {
		self.record(CloudCall::CreatePolicy {
			compartment: details.compartment_id.clone(),
			name: details.name.clone(),
			statements: details.statements.clone(),
		});
		if *self.fail_policy.lock().unwrap() {
			return Err(OciError::Api {
				status: 400,
				code: "InvalidParameter".to_string(),
				message: "policy statement rejected".to_string(),
				request_id: None,
			});
		}
		Ok(Policy {
			id: "ocid1.policy.oc1..p".to_string(),
			name: details.name.clone(),
			compartment_id: details.compartment_id.clone(),
			statements: details.statements.clone(),
		})
	}

	async fn delete_policy(&self, policy_id: &str) -> Result<(), OciError> {
		self.record(CloudCall::DeletePolicy(policy_id.to_string()));
		Ok(())
	}

	async fn create_budget(&self, details: &CreateBudgetDetails) -> Result<Budget, OciError> {
		self.record(CloudCall::CreateBudget {
			compartment: details.compartment_id.clone(),
			name: details.display_name.clone(),
			amount: details.amount,
			targets: details.targets.clone(),
		});
		Ok(Budget {
			id: "ocid1.budget.oc1..b".to_string(),
			display_name: details.display_name.clone(),
			amount: details.amount,
			targets: details.targets.clone(),
		})
	}

	async fn delete_budget(&self, budget_id: &str) -> Result<(), OciError> {
		self.record(CloudCall::DeleteBudget(budget_id.to_string()));
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
	FindGroup(String),
	CreateGroup(String),
	DeleteGroup(String),
	GetUser(String),
	IsMember { group: String, user: String },
	AddMember { group: String, user: String },
}

#[derive(Default)]
pub struct FakeDirectory {
	groups: Mutex<Vec<DirectoryGroup>>,
	members: Mutex<HashSet<(String, String)>>,
	pub calls: Mutex<Vec<DirectoryCall>>,
}

impl FakeDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_group(self, id: &str, display_name: &str) -> Self {
		self.groups.lock().unwrap().push(DirectoryGroup {
			id: id.to_string(),
			display_name: display_name.to_string(),
		});
		self
	}

	pub fn calls(&self) -> Vec<DirectoryCall> {
		self.calls.lock().unwrap().clone()
	}

	fn record(&self, call: DirectoryCall) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl DirectoryProvider for FakeDirectory {
	async fn find_group_by_prefix(
		&self,
		prefix: &str,
	) -> Result<Option<DirectoryGroup>, DirectoryError> {
		self.record(DirectoryCall::FindGroup(prefix.to_string()));
		Ok(self
			.groups
			.lock()
			.unwrap()
			.iter()
			.find(|g| g.display_name.starts_with(prefix))
			.cloned())
	}

	async fn create_group(&self, display_name: &str) -> Result<DirectoryGroup, DirectoryError> {
		self.record(DirectoryCall::CreateGroup(display_name.to_string()));
		let group = DirectoryGroup {
			id: "dir-group-new".to_string(),
			display_name: display_name.to_string(),
		};
		self.groups.lock().unwrap().push(group.clone());
		Ok(group)
	}

	async fn delete_group(&self, group_id: &str) -> Result<(), DirectoryError> {
		self.record(DirectoryCall::DeleteGroup(group_id.to_string()));
		self.groups.lock().unwrap().retain(|g| g.id != group_id);
		Ok(())
	}

	async fn get_user(&self, user: &str) -> Result<DirectoryUser, DirectoryError> {
		self.record(DirectoryCall::GetUser(user.to_string()));
		Ok(DirectoryUser {
			id: format!("user-{user}"),
			user_principal_name: user.to_string(),
		})
	}

	async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool, DirectoryError> {
		self.record(DirectoryCall::IsMember {
			group: group_id.to_string(),
			user: user_id.to_string(),
		});
		Ok(self
			.members
			.lock()
			.unwrap()
			.contains(&(group_id.to_string(), user_id.to_string())))
	}

	async fn add_member(&self, group_id: &str, user_id: &str) -> Result<(), DirectoryError> {
		self.record(DirectoryCall::AddMember {
			group: group_id.to_string(),
			user: user_id.to_string(),
		});
		self.members
			.lock()
			.unwrap()
			.insert((group_id.to_string(), user_id.to_string()));
		Ok(())
	}
}

pub struct FakeShare {
	files: HashMap<String, Vec<u8>>,
	pub downloads: Mutex<Vec<String>>,
}

impl FakeShare {
	/// Share holding a valid `.oci` directory.
	pub fn complete() -> Self {
		let mut files = HashMap::new();
		files.insert(".oci/config".to_string(), oci_config().into_bytes());
		files.insert(".oci/oci_api_key.pem".to_string(), b"private".to_vec());
		files.insert(".oci/oci_api_key_public.pem".to_string(), b"public".to_vec());
		Self {
			files,
			downloads: Mutex::new(Vec::new()),
		}
	}

	pub fn without(mut self, file: &str) -> Self {
		self.files.remove(&format!(".oci/{file}"));
		self
	}

	pub fn with_config(mut self, content: String) -> Self {
		self.files.insert(".oci/config".to_string(), content.into_bytes());
		self
	}
}

#[async_trait]
impl FileShare for FakeShare {
	async fn download(&self, directory: &str, file: &str) -> Result<Vec<u8>, FileShareError> {
		let key = format!("{directory}/{file}");
		self.downloads.lock().unwrap().push(key.clone());
		self.files
			.get(&key)
			.cloned()
			.ok_or(FileShareError::NotFound { path: key })
	}
}

#[derive(Default)]
pub struct FakeNotifier {
	pub sent: Mutex<Vec<Notification>>,
	rejecting: bool,
}

impl FakeNotifier {
	/// Records every attempt and answers each with a 500.
	pub fn rejecting() -> Self {
		Self {
			sent: Mutex::new(Vec::new()),
			rejecting: true,
		}
	}

	pub fn sent(&self) -> Vec<Notification> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl Notifier for FakeNotifier {
	async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
		self.sent.lock().unwrap().push(notification.clone());
		if self.rejecting {
			return Err(NotifyError::Rejected {
				status: 500,
				message: "down".to_string(),
			});
		}
		Ok(())
	}
}

/// Hands the same fakes to every run so tests can inspect them afterwards.
#[derive(Clone)]
pub struct FakeConnectors {
	pub cloud: Arc<FakeCloud>,
	pub directory: Arc<FakeDirectory>,
	pub share: Arc<FakeShare>,
	pub notifier: Arc<FakeNotifier>,
	pub staged_key: Arc<Mutex<Option<Vec<u8>>>>,
}

impl FakeConnectors {
	pub fn new(cloud: FakeCloud, directory: FakeDirectory, share: FakeShare) -> Self {
		Self {
			cloud: Arc::new(cloud),
			directory: Arc::new(directory),
			share: Arc::new(share),
			notifier: Arc::new(FakeNotifier::default()),
			staged_key: Arc::new(Mutex::new(None)),
		}
	}

	pub fn with_notifier(mut self, notifier: FakeNotifier) -> Self {
		self.notifier = Arc::new(notifier);
		self
	}

	pub fn standard() -> Self {
		Self::new(FakeCloud::new(), FakeDirectory::new(), FakeShare::complete())
	}
}

#[async_trait]
impl Connectors for FakeConnectors {
	fn file_share(
		&self,
		_account: &str,
		_account_key: &SecretString,
		_share: &str,
	) -> Result<Arc<dyn FileShare>, ProvisionError> {
		Ok(self.share.clone())
	}

	fn cloud(
		&self,
		profile: &OciProfile,
		private_key: &Path,
	) -> Result<Arc<dyn CloudProvider>, ProvisionError> {
		assert_eq!(profile.tenancy, TENANCY);
		*self.staged_key.lock().unwrap() = std::fs::read(private_key).ok();
		Ok(self.cloud.clone())
	}

	async fn directory(
		&self,
		credentials: &ClientCredentials,
	) -> Result<Arc<dyn DirectoryProvider>, ProvisionError> {
		assert_eq!(credentials.tenant_id, "tenant-1");
		assert_eq!(credentials.client_id, "sp-id");
		Ok(self.directory.clone())
	}

	fn notifier(&self, endpoint: &str) -> Result<Arc<dyn Notifier>, ProvisionError> {
		assert_eq!(endpoint, "https://mail.example.com/send");
		Ok(self.notifier.clone())
	}
}
