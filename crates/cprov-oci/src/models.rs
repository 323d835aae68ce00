// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response bodies for the OCI identity and budget APIs.

use serde::{Deserialize, Serialize};

/// A compartment as returned by `ListCompartments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
	pub id: String,
	pub name: String,
	/// Id of the parent compartment.
	pub compartment_id: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub lifecycle_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompartmentDetails {
	pub compartment_id: String,
	pub name: String,
	pub description: String,
}

/// An IAM group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
	pub id: String,
	pub name: String,
	pub compartment_id: String,
	#[serde(default)]
	pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupDetails {
	pub compartment_id: String,
	pub name: String,
	pub description: String,
}

/// A federated identity provider registered in the tenancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub protocol: String,
}

/// Maps an IdP group to an IAM group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpGroupMapping {
	pub id: String,
	pub idp_id: String,
	pub group_id: String,
	pub idp_group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdpGroupMappingDetails {
	pub group_id: String,
	pub idp_group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
	pub id: String,
	pub name: String,
	pub compartment_id: String,
	#[serde(default)]
	pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyDetails {
	pub compartment_id: String,
	pub name: String,
	pub description: String,
	pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
	pub id: String,
	pub display_name: String,
	pub amount: f64,
	#[serde(default)]
	pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetDetails {
	pub compartment_id: String,
	pub display_name: String,
	pub description: String,
	pub amount: f64,
	pub reset_period: ResetPeriod,
	pub target_type: TargetType,
	pub targets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetPeriod {
	Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
	Compartment,
	Tag,
}

/// Error body returned by OCI services.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
	#[serde(default)]
	pub code: String,
	#[serde(default)]
	pub message: String,
}
