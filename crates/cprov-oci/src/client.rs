// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signed REST client for the OCI identity and budget services.

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, instrument, trace};

use crate::api::{CloudProvider, CompartmentSource};
use crate::error::OciError;
use crate::models::{
	ApiErrorBody, Budget, Compartment, CreateBudgetDetails, CreateCompartmentDetails,
	CreateGroupDetails, CreateIdpGroupMappingDetails, CreatePolicyDetails, Group, IdentityProvider,
	IdpGroupMapping, Policy,
};
use crate::profile::OciProfile;
use crate::signer::RequestSigner;

const IDENTITY_VERSION: &str = "20160918";
const BUDGET_VERSION: &str = "20190111";
const PAGE_LIMIT: &str = "1000";

/// Client for the OCI identity and budget APIs.
#[derive(Debug, Clone)]
pub struct OciClient {
	http_client: Client,
	signer: RequestSigner,
	identity_url: String,
	budget_url: String,
}

impl OciClient {
	/// Client for the region named in `profile`.
	pub fn new(http_client: Client, signer: RequestSigner, profile: &OciProfile) -> Self {
		Self {
			http_client,
			signer,
			identity_url: profile.identity_endpoint(),
			budget_url: profile.budget_endpoint(),
		}
	}

	/// Override the identity service base URL.
	pub fn with_identity_endpoint(mut self, url: impl Into<String>) -> Self {
		self.identity_url = url.into().trim_end_matches('/').to_string();
		self
	}

	/// Override the budget service base URL.
	pub fn with_budget_endpoint(mut self, url: impl Into<String>) -> Self {
		self.budget_url = url.into().trim_end_matches('/').to_string();
		self
	}

	fn identity(&self, path: &str) -> Result<Url, OciError> {
		let raw = format!("{}/{IDENTITY_VERSION}/{path}", self.identity_url);
		Url::parse(&raw).map_err(|e| OciError::Url(format!("{raw}: {e}")))
	}

	fn budget(&self, path: &str) -> Result<Url, OciError> {
		let raw = format!("{}/{BUDGET_VERSION}/{path}", self.budget_url);
		Url::parse(&raw).map_err(|e| OciError::Url(format!("{raw}: {e}")))
	}

	async fn send<B: Serialize + ?Sized>(
		&self,
		method: Method,
		url: Url,
		body: Option<&B>,
	) -> Result<Response, OciError> {
		let payload = body.map(serde_json::to_vec).transpose()?;
		let signed = self.signer.sign(&method, &url, payload.as_deref())?;

		debug!(method = %method, url = %url, "sending OCI request");

		let mut request = self.http_client.request(method, url);
		for (name, value) in &signed.headers {
			// reqwest derives content-length from the body
			if *name != "content-length" {
				request = request.header(*name, value);
			}
		}
		if let Some(payload) = payload {
			request = request.body(payload);
		}

		let response = request.send().await.map_err(|e| {
			error!(error = %e, "network error during OCI request");
			OciError::Network(e)
		})?;

		if response.status().is_success() {
			return Ok(response);
		}
		Err(api_error(response).await)
	}

	async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
		&self,
		method: Method,
		url: Url,
		body: Option<&B>,
	) -> Result<T, OciError> {
		let response = self.send(method, url, body).await?;
		decode(response).await
	}

	async fn delete(&self, url: Url) -> Result<(), OciError> {
		self.send::<()>(Method::DELETE, url, None).await?;
		Ok(())
	}

	/// GET every page of a list endpoint.
	async fn list_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, OciError> {
		let mut items = Vec::new();
		let mut page: Option<String> = None;

		loop {
			let mut page_url = url.clone();
			{
				let mut query = page_url.query_pairs_mut();
				query.append_pair("limit", PAGE_LIMIT);
				if let Some(token) = &page {
					query.append_pair("page", token);
				}
			}

			let response = self.send::<()>(Method::GET, page_url, None).await?;
			let next = response
				.headers()
				.get("opc-next-page")
				.and_then(|v| v.to_str().ok())
				.map(str::to_string);
			let batch: Vec<T> = decode(response).await?;
			trace!(count = batch.len(), "received page");
			items.extend(batch);

			match next {
				Some(token) if !token.is_empty() => page = Some(token),
				_ => break,
			}
		}

		Ok(items)
	}
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, OciError> {
	let body = response.text().await?;
	serde_json::from_str(&body).map_err(|e| {
		error!(error = %e, "failed to parse OCI response");
		OciError::InvalidResponse(format!("JSON parse error: {e}"))
	})
}

async fn api_error(response: Response) -> OciError {
	let status = response.status();
	let request_id = response
		.headers()
		.get("opc-request-id")
		.and_then(|v| v.to_str().ok())
		.map(str::to_string);
	let body = response.text().await.unwrap_or_default();
	let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();

	let (code, message) = match parsed {
		Some(parsed) => (parsed.code, parsed.message),
		None => (
			status.canonical_reason().unwrap_or("Unknown").to_string(),
			body,
		),
	};

	error!(
		status = status.as_u16(),
		code = %code,
		request_id = request_id.as_deref().unwrap_or("-"),
		"OCI API error"
	);

	OciError::Api {
		status: status.as_u16(),
		code,
		message,
		request_id,
	}
}

#[async_trait]
impl CompartmentSource for OciClient {
	#[instrument(skip(self))]
	async fn list_compartments(&self, parent_id: &str) -> Result<Vec<Compartment>, OciError> {
		let mut url = self.identity("compartments")?;
		url.query_pairs_mut().append_pair("compartmentId", parent_id);
		self.list_all(url).await
	}
}

#[async_trait]
impl CloudProvider for OciClient {
	#[instrument(skip(self, details), fields(name = %details.name))]
	async fn create_compartment(
		&self,
		details: &CreateCompartmentDetails,
	) -> Result<Compartment, OciError> {
		let url = self.identity("compartments")?;
		let compartment: Compartment = self.send_json(Method::POST, url, Some(details)).await?;
		info!(id = %compartment.id, "created compartment");
		Ok(compartment)
	}

	#[instrument(skip(self))]
	async fn delete_compartment(&self, compartment_id: &str) -> Result<(), OciError> {
		self.delete(self.identity(&format!("compartments/{compartment_id}"))?)
			.await
	}

	#[instrument(skip(self, details), fields(name = %details.name))]
	async fn create_group(&self, details: &CreateGroupDetails) -> Result<Group, OciError> {
		let url = self.identity("groups")?;
		let group: Group = self.send_json(Method::POST, url, Some(details)).await?;
		info!(id = %group.id, "created group");
		Ok(group)
	}

	#[instrument(skip(self))]
	async fn delete_group(&self, group_id: &str) -> Result<(), OciError> {
		self.delete(self.identity(&format!("groups/{group_id}"))?).await
	}

	#[instrument(skip(self))]
	async fn list_identity_providers(
		&self,
		compartment_id: &str,
		protocol: &str,
	) -> Result<Vec<IdentityProvider>, OciError> {
		let mut url = self.identity("identityProviders")?;
		url
			.query_pairs_mut()
			.append_pair("protocol", protocol)
			.append_pair("compartmentId", compartment_id);
		self.list_all(url).await
	}

	#[instrument(skip(self, details), fields(group_id = %details.group_id))]
	async fn create_idp_group_mapping(
		&self,
		idp_id: &str,
		details: &CreateIdpGroupMappingDetails,
	) -> Result<IdpGroupMapping, OciError> {
		let url = self.identity(&format!("identityProviders/{idp_id}/groupMappings"))?;
		let mapping: IdpGroupMapping = self.send_json(Method::POST, url, Some(details)).await?;
		info!(id = %mapping.id, "created identity provider group mapping");
		Ok(mapping)
	}

	#[instrument(skip(self))]
	async fn delete_idp_group_mapping(
		&self,
		idp_id: &str,
		mapping_id: &str,
	) -> Result<(), OciError> {
		self.delete(self.identity(&format!(
			"identityProviders/{idp_id}/groupMappings/{mapping_id}"
		))?)
		.await
	}

	#[instrument(skip(self, details), fields(name = %details.name))]
	async fn create_policy(&self, details: &CreatePolicyDetails) -> Result<Policy, OciError> {
		let url = self.identity("policies")?;
		let policy: Policy = self.send_json(Method::POST, url, Some(details)).await?;
		info!(id = %policy.id, "created policy");
		Ok(policy)
	}

	#[instrument(skip(self))]
	async fn delete_policy(&self, policy_id: &str) -> Result<(), OciError> {
		self.delete(self.identity(&format!("policies/{policy_id}"))?).await
	}

	#[instrument(skip(self, details), fields(name = %details.display_name, amount = details.amount))]
	async fn create_budget(&self, details: &CreateBudgetDetails) -> Result<Budget, OciError> {
		let url = self.budget("budgets")?;
		let budget: Budget = self.send_json(Method::POST, url, Some(details)).await?;
		info!(id = %budget.id, "created budget");
		Ok(budget)
	}

	#[instrument(skip(self))]
	async fn delete_budget(&self, budget_id: &str) -> Result<(), OciError> {
		self.delete(self.budget(&format!("budgets/{budget_id}"))?).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::{ResetPeriod, TargetType};
	use crate::test_support::{test_profile, test_signer};
	use serde_json::json;
	use wiremock::matchers::{body_json, header_exists, method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	async fn client(server: &MockServer) -> OciClient {
		OciClient::new(Client::new(), test_signer(), &test_profile())
			.with_identity_endpoint(server.uri())
			.with_budget_endpoint(format!("{}/", server.uri()))
	}

	fn compartment(id: &str, name: &str, parent: &str) -> serde_json::Value {
		json!({
			"id": id,
			"name": name,
			"compartmentId": parent,
			"description": name,
			"lifecycleState": "ACTIVE"
		})
	}

	#[test]
	fn endpoints_follow_the_profile_region() {
		let client = OciClient::new(Client::new(), test_signer(), &test_profile());
		assert_eq!(
			client.identity("groups").unwrap().as_str(),
			"https://identity.us-ashburn-1.oci.oraclecloud.com/20160918/groups"
		);
		assert_eq!(
			client.budget("budgets").unwrap().as_str(),
			"https://usage.us-ashburn-1.oci.oraclecloud.com/20190111/budgets"
		);
	}

	#[tokio::test]
	async fn list_compartments_follows_pages() {
		let server = MockServer::start().await;

		Mock::given(method("GET"))
			.and(path("/20160918/compartments"))
			.and(query_param("page", "page-2"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([compartment(
				"c2", "teamy", "root"
			)])))
			.expect(1)
			.mount(&server)
			.await;

		Mock::given(method("GET"))
			.and(path("/20160918/compartments"))
			.and(query_param("compartmentId", "root"))
			.and(header_exists("authorization"))
			.and(header_exists("date"))
			.respond_with(
				ResponseTemplate::new(200)
					.insert_header("opc-next-page", "page-2")
					.set_body_json(json!([compartment("c1", "teamx", "root")])),
			)
			.expect(1)
			.mount(&server)
			.await;

		let children = client(&server).await.list_compartments("root").await.unwrap();
		let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["teamx", "teamy"]);
	}

	#[tokio::test]
	async fn create_group_posts_signed_json() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/20160918/groups"))
			.and(header_exists("x-content-sha256"))
			.and(header_exists("authorization"))
			.and(body_json(json!({
				"compartmentId": "ocid1.tenancy.oc1..aaaaaaaatenancy",
				"name": "dev-teamx-02-Admins",
				"description": "dev-teamx-02-Admins"
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"id": "ocid1.group.oc1..g",
				"name": "dev-teamx-02-Admins",
				"compartmentId": "ocid1.tenancy.oc1..aaaaaaaatenancy",
				"description": "dev-teamx-02-Admins"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let group = client(&server)
			.await
			.create_group(&CreateGroupDetails {
				compartment_id: "ocid1.tenancy.oc1..aaaaaaaatenancy".into(),
				name: "dev-teamx-02-Admins".into(),
				description: "dev-teamx-02-Admins".into(),
			})
			.await
			.unwrap();
		assert_eq!(group.id, "ocid1.group.oc1..g");
	}

	#[tokio::test]
	async fn create_budget_goes_to_the_budget_service() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/20190111/budgets"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"id": "ocid1.budget.oc1..b",
				"displayName": "dev-teamx-02-Budget",
				"amount": 500.0,
				"targets": ["ocid1.compartment.oc1..new"]
			})))
			.expect(1)
			.mount(&server)
			.await;

		let budget = client(&server)
			.await
			.create_budget(&CreateBudgetDetails {
				compartment_id: "ocid1.tenancy.oc1..aaaaaaaatenancy".into(),
				display_name: "dev-teamx-02-Budget".into(),
				description: "dev-teamx-02-Budget".into(),
				amount: 500.0,
				reset_period: ResetPeriod::Monthly,
				target_type: TargetType::Compartment,
				targets: vec!["ocid1.compartment.oc1..new".into()],
			})
			.await
			.unwrap();
		assert_eq!(budget.amount, 500.0);
	}

	#[tokio::test]
	async fn api_errors_carry_code_and_request_id() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/20160918/compartments"))
			.respond_with(
				ResponseTemplate::new(409)
					.insert_header("opc-request-id", "req-123")
					.set_body_json(json!({
						"code": "CompartmentAlreadyExists",
						"message": "Compartment dev-teamx-02 already exists"
					})),
			)
			.mount(&server)
			.await;

		let err = client(&server)
			.await
			.create_compartment(&CreateCompartmentDetails {
				compartment_id: "parent".into(),
				name: "dev-teamx-02".into(),
				description: "dev-teamx-02".into(),
			})
			.await
			.unwrap_err();

		assert_eq!(err.status(), Some(409));
		match err {
			OciError::Api {
				code, request_id, ..
			} => {
				assert_eq!(code, "CompartmentAlreadyExists");
				assert_eq!(request_id.as_deref(), Some("req-123"));
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn non_json_errors_fall_back_to_status_text() {
		let server = MockServer::start().await;

		Mock::given(method("DELETE"))
			.and(path("/20160918/groups/g1"))
			.respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
			.mount(&server)
			.await;

		let err = client(&server).await.delete_group("g1").await.unwrap_err();
		match err {
			OciError::Api {
				status,
				code,
				message,
				..
			} => {
				assert_eq!(status, 502);
				assert_eq!(code, "Bad Gateway");
				assert_eq!(message, "bad gateway");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn deletes_accept_empty_bodies() {
		let server = MockServer::start().await;

		Mock::given(method("DELETE"))
			.and(path(
				"/20160918/identityProviders/idp1/groupMappings/m1",
			))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		client(&server)
			.await
			.delete_idp_group_mapping("idp1", "m1")
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn identity_providers_filter_by_protocol() {
		let server = MockServer::start().await;

		Mock::given(method("GET"))
			.and(path("/20160918/identityProviders"))
			.and(query_param("protocol", "SAML2"))
			.and(query_param("compartmentId", "root"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([
				{"id": "idp1", "name": "EntraID", "protocol": "SAML2"}
			])))
			.mount(&server)
			.await;

		let providers = client(&server)
			.await
			.list_identity_providers("root", "SAML2")
			.await
			.unwrap();
		assert_eq!(providers.len(), 1);
		assert_eq!(providers[0].id, "idp1");
	}
}
