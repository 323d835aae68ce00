// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Graph resource shapes used by the provisioner.

use serde::{Deserialize, Serialize};

/// A directory security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
	/// Object id. This is the value federation mappings reference.
	pub id: String,
	pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
	pub id: String,
	#[serde(default)]
	pub user_principal_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewSecurityGroup<'a> {
	pub display_name: &'a str,
	pub mail_nickname: &'a str,
	pub mail_enabled: bool,
	pub security_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct GraphListResponse<T> {
	#[serde(default)]
	pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphErrorResponse {
	pub error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphErrorBody {
	#[serde(default)]
	pub code: String,
	#[serde(default)]
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn group_list_decodes_value_array() {
		let json = r#"{
			"@odata.context": "https://graph.microsoft.com/v1.0/$metadata#groups",
			"value": [
				{"id": "g1", "displayName": "cloud-dev-teamx-02-Admins", "mailEnabled": false}
			]
		}"#;
		let list: GraphListResponse<DirectoryGroup> = serde_json::from_str(json).unwrap();
		assert_eq!(
			list.value,
			vec![DirectoryGroup {
				id: "g1".to_string(),
				display_name: "cloud-dev-teamx-02-Admins".to_string(),
			}]
		);
	}

	#[test]
	fn missing_value_is_an_empty_list() {
		let list: GraphListResponse<DirectoryGroup> = serde_json::from_str("{}").unwrap();
		assert!(list.value.is_empty());
	}
}
