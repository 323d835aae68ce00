// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Capability traits over the OCI APIs the provisioner calls.
//!
//! [`OciClient`](crate::OciClient) is the live implementation; the
//! provisioning driver only sees these traits so tests can hand it recording
//! fakes.

use async_trait::async_trait;

use crate::error::OciError;
use crate::models::{
	Budget, Compartment, CreateBudgetDetails, CreateCompartmentDetails, CreateGroupDetails,
	CreateIdpGroupMappingDetails, CreatePolicyDetails, Group, IdentityProvider, IdpGroupMapping,
	Policy,
};

/// Lists the direct children of a compartment.
#[async_trait]
pub trait CompartmentSource: Send + Sync {
	async fn list_compartments(&self, parent_id: &str) -> Result<Vec<Compartment>, OciError>;
}

/// Identity and budget operations.
#[async_trait]
pub trait CloudProvider: CompartmentSource {
	async fn create_compartment(
		&self,
		details: &CreateCompartmentDetails,
	) -> Result<Compartment, OciError>;

	async fn delete_compartment(&self, compartment_id: &str) -> Result<(), OciError>;

	async fn create_group(&self, details: &CreateGroupDetails) -> Result<Group, OciError>;

	async fn delete_group(&self, group_id: &str) -> Result<(), OciError>;

	/// Identity providers of `protocol` registered in `compartment_id`.
	async fn list_identity_providers(
		&self,
		compartment_id: &str,
		protocol: &str,
	) -> Result<Vec<IdentityProvider>, OciError>;

	async fn create_idp_group_mapping(
		&self,
		idp_id: &str,
		details: &CreateIdpGroupMappingDetails,
	) -> Result<IdpGroupMapping, OciError>;

	async fn delete_idp_group_mapping(&self, idp_id: &str, mapping_id: &str)
		-> Result<(), OciError>;

	async fn create_policy(&self, details: &CreatePolicyDetails) -> Result<Policy, OciError>;

	async fn delete_policy(&self, policy_id: &str) -> Result<(), OciError>;

	async fn create_budget(&self, details: &CreateBudgetDetails) -> Result<Budget, OciError>;

	async fn delete_budget(&self, budget_id: &str) -> Result<(), OciError>;
}
