// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning request parsing and resource naming.
//!
//! The invocation payload is an envelope whose `RequestBody` holds the
//! request, either as a JSON-encoded string or as an inline object:
//!
//! ```text
//! {"RequestBody": "{\"subname\":\"dev-teamx-02\",\"owner\":\"alice@example.com\",\"monthlybudget\":\"500\"}"}
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::ProvisionError;

#[derive(Debug, Deserialize)]
struct Envelope {
	#[serde(rename = "RequestBody")]
	request_body: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawRequest {
	subname: Option<String>,
	owner: Option<String>,
	monthlybudget: Option<Value>,
}

/// A validated provisioning request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningRequest {
	/// Compartment name, `<env>-<parent>-<suffix>`.
	pub subname: String,
	/// User principal name of the owner.
	pub owner: String,
	pub monthly_budget: f64,
}

impl ProvisioningRequest {
	pub fn parse(payload: &str) -> Result<Self, ProvisionError> {
		let envelope: Envelope = serde_json::from_str(payload)
			.map_err(|e| malformed(format!("payload is not a JSON envelope: {e}")))?;

		let raw: RawRequest = match envelope.request_body {
			Some(Value::String(body)) => serde_json::from_str(&body)
				.map_err(|e| malformed(format!("RequestBody is not valid JSON: {e}")))?,
			Some(body @ Value::Object(_)) => serde_json::from_value(body)
				.map_err(|e| malformed(format!("RequestBody has the wrong shape: {e}")))?,
			Some(_) => return Err(malformed("RequestBody must be a string or an object")),
			None => return Err(malformed("payload has no RequestBody")),
		};

		let subname = required(raw.subname, "subname")?;
		let owner = required(raw.owner, "owner")?;
		let monthly_budget = parse_budget(raw.monthlybudget)?;

		let mut tokens = subname.split('-');
		let env = tokens.next().unwrap_or_default();
		let parent = tokens.next().unwrap_or_default();
		if env.is_empty() || parent.is_empty() {
			return Err(malformed(format!(
				"subname '{subname}' must look like <env>-<parent>-<suffix>"
			)));
		}

		Ok(Self {
			subname,
			owner,
			monthly_budget,
		})
	}

	/// Lowercase name used for index lookups.
	pub fn index_key(&self) -> String {
		self.subname.to_lowercase()
	}

	/// Lowercased second `-` token of the subname.
	pub fn parent_name(&self) -> String {
		self.subname
			.split('-')
			.nth(1)
			.unwrap_or_default()
			.to_lowercase()
	}

	pub fn admin_group_name(&self) -> String {
		format!("{}-Admins", self.subname)
	}

	pub fn directory_group_name(&self) -> String {
		format!("cloud-{}-Admins", self.subname)
	}

	pub fn policy_name(&self) -> String {
		format!("{}-Policy", self.subname)
	}

	pub fn policy_statement(&self) -> String {
		format!(
			"ALLOW GROUP {} to manage all-resources IN compartment {}",
			self.admin_group_name(),
			self.subname
		)
	}

	pub fn budget_name(&self) -> String {
		format!("{}-Budget", self.subname)
	}

	/// Budget as shown to the owner; whole amounts keep one decimal place.
	pub fn display_budget(&self) -> String {
		if self.monthly_budget.fract() == 0.0 {
			format!("{:.1}", self.monthly_budget)
		} else {
			format!("{}", self.monthly_budget)
		}
	}
}

fn malformed(message: impl Into<String>) -> ProvisionError {
	ProvisionError::MalformedInput(message.into())
}

fn required(value: Option<String>, field: &str) -> Result<String, ProvisionError> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
		.ok_or_else(|| malformed(format!("'{field}' is missing or empty")))
}

fn parse_budget(value: Option<Value>) -> Result<f64, ProvisionError> {
	let amount = match value {
		Some(Value::Number(n)) => n.as_f64(),
		Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
		Some(_) => None,
		None => return Err(malformed("'monthlybudget' is missing")),
	}
	.ok_or_else(|| malformed("'monthlybudget' is not a number"))?;

	if !amount.is_finite() || amount <= 0.0 {
		return Err(malformed(format!(
			"'monthlybudget' must be a positive amount, got {amount}"
		)));
	}
	Ok(amount)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	fn envelope(body: Value) -> String {
		json!({ "RequestBody": body.to_string() }).to_string()
	}

	#[test]
	fn parses_string_envelope() {
		let payload = envelope(json!({
			"subname": "dev-teamx-02",
			"owner": "alice@example.com",
			"monthlybudget": "500"
		}));
		let request = ProvisioningRequest::parse(&payload).unwrap();
		assert_eq!(request.subname, "dev-teamx-02");
		assert_eq!(request.owner, "alice@example.com");
		assert_eq!(request.monthly_budget, 500.0);
		assert_eq!(request.display_budget(), "500.0");
	}

	#[test]
	fn parses_inline_object_and_numeric_budget() {
		let payload = json!({
			"RequestBody": {"subname": "prd-Finance-01", "owner": "bob@example.com", "monthlybudget": 125.5}
		})
		.to_string();
		let request = ProvisioningRequest::parse(&payload).unwrap();
		assert_eq!(request.monthly_budget, 125.5);
		assert_eq!(request.parent_name(), "finance");
		assert_eq!(request.index_key(), "prd-finance-01");
		assert_eq!(request.display_budget(), "125.5");
	}

	#[test]
	fn derived_names() {
		let request = ProvisioningRequest {
			subname: "dev-teamx-02".into(),
			owner: "alice@example.com".into(),
			monthly_budget: 500.0,
		};
		assert_eq!(request.admin_group_name(), "dev-teamx-02-Admins");
		assert_eq!(request.directory_group_name(), "cloud-dev-teamx-02-Admins");
		assert_eq!(request.policy_name(), "dev-teamx-02-Policy");
		assert_eq!(request.budget_name(), "dev-teamx-02-Budget");
		assert_eq!(
			request.policy_statement(),
			"ALLOW GROUP dev-teamx-02-Admins to manage all-resources IN compartment dev-teamx-02"
		);
	}

	#[test]
	fn rejects_missing_fields() {
		for body in [
			json!({"owner": "a@b.c", "monthlybudget": "1"}),
			json!({"subname": "dev-x-1", "monthlybudget": "1"}),
			json!({"subname": "dev-x-1", "owner": "a@b.c"}),
			json!({"subname": "  ", "owner": "a@b.c", "monthlybudget": "1"}),
		] {
			let err = ProvisioningRequest::parse(&envelope(body)).unwrap_err();
			assert!(matches!(err, ProvisionError::MalformedInput(_)), "{err}");
		}
	}

	#[test]
	fn rejects_bad_budgets() {
		for budget in [json!("abc"), json!("-5"), json!(0), json!("NaN"), json!("inf"), json!(true)] {
			let body = json!({"subname": "dev-x-1", "owner": "a@b.c", "monthlybudget": budget});
			assert!(ProvisioningRequest::parse(&envelope(body)).is_err());
		}
	}

	#[test]
	fn rejects_subname_without_parent_token() {
		for subname in ["dev", "dev-", "-teamx-01"] {
			let body = json!({"subname": subname, "owner": "a@b.c", "monthlybudget": "1"});
			let err = ProvisioningRequest::parse(&envelope(body)).unwrap_err();
			assert!(err.to_string().contains("<env>-<parent>"));
		}
	}

	#[test]
	fn rejects_non_envelopes() {
		assert!(ProvisioningRequest::parse("not json").is_err());
		assert!(ProvisioningRequest::parse(r#"{"subname":"dev-x-1"}"#).is_err());
		assert!(ProvisioningRequest::parse(r#"{"RequestBody": 42}"#).is_err());
		assert!(ProvisioningRequest::parse(r#"{"RequestBody": "{oops"}"#).is_err());
	}

	proptest! {
		#[test]
		fn parent_name_is_lowercase_second_token(
			env in "[a-zA-Z]{1,5}",
			parent in "[a-zA-Z0-9]{1,10}",
			suffix in "[0-9]{1,3}",
		) {
			let subname = format!("{env}-{parent}-{suffix}");
			let body = json!({"subname": subname, "owner": "a@b.c", "monthlybudget": "10"});
			let request = ProvisioningRequest::parse(&envelope(body)).unwrap();
			prop_assert_eq!(request.parent_name(), parent.to_lowercase());
		}
	}
}
