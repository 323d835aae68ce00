// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Azure Files REST client.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, instrument};

use crate::api::FileShare;
use crate::auth::{SharedKeyCredential, STORAGE_API_VERSION};
use crate::error::FileShareError;

pub const DEFAULT_ENDPOINT_SUFFIX: &str = "file.core.windows.net";

const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// One share in an Azure storage account.
#[derive(Debug, Clone)]
pub struct AzureFileShare {
	http_client: Client,
	credential: SharedKeyCredential,
	share: String,
	endpoint: String,
}

impl AzureFileShare {
	pub fn new(http_client: Client, credential: SharedKeyCredential, share: impl Into<String>) -> Self {
		let endpoint = format!("https://{}.{}", credential.account(), DEFAULT_ENDPOINT_SUFFIX);
		Self {
			http_client,
			credential,
			share: share.into(),
			endpoint,
		}
	}

	/// Use `https://<account>.<suffix>` instead of the public-cloud suffix.
	pub fn with_endpoint_suffix(mut self, suffix: &str) -> Self {
		self.endpoint = format!(
			"https://{}.{}",
			self.credential.account(),
			suffix.trim_matches('.')
		);
		self
	}

	/// Use an explicit service endpoint (emulators, tests).
	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into().trim_end_matches('/').to_string();
		self
	}

	fn path(&self, directory: &str, file: &str) -> String {
		let mut path = format!("/{}", urlencoding::encode(&self.share));
		for segment in directory.split('/').filter(|s| !s.is_empty()) {
			path.push('/');
			path.push_str(&urlencoding::encode(segment));
		}
		path.push('/');
		path.push_str(&urlencoding::encode(file));
		path
	}
}

#[async_trait]
impl FileShare for AzureFileShare {
	#[instrument(skip(self), fields(share = %self.share))]
	async fn download(&self, directory: &str, file: &str) -> Result<Vec<u8>, FileShareError> {
		let path = self.path(directory, file);
		let date = Utc::now().format(DATE_FORMAT).to_string();
		let string_to_sign = self.credential.string_to_sign(
			"GET",
			&[("x-ms-date", date.as_str()), ("x-ms-version", STORAGE_API_VERSION)],
			&path,
		);
		let authorization = self.credential.authorization(&string_to_sign)?;

		debug!(path = %path, "downloading file from share");

		let response = self
			.http_client
			.get(format!("{}{}", self.endpoint, path))
			.header("x-ms-date", &date)
			.header("x-ms-version", STORAGE_API_VERSION)
			.header("authorization", authorization)
			.send()
			.await?;

		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return Err(FileShareError::NotFound {
				path: format!("{}/{}", directory.trim_end_matches('/'), file),
			});
		}
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			error!(status = status.as_u16(), "file share request failed");
			return Err(FileShareError::Api {
				status: status.as_u16(),
				message,
			});
		}

		Ok(response.bytes().await?.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use base64::engine::general_purpose::STANDARD;
	use base64::Engine;
	use wiremock::matchers::{header, header_exists, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn share(server: &MockServer) -> AzureFileShare {
		let credential = SharedKeyCredential::new("acct", &STANDARD.encode(b"k")).unwrap();
		AzureFileShare::new(Client::new(), credential, "oci-config").with_endpoint(server.uri())
	}

	#[test]
	fn default_endpoint_uses_account_subdomain() {
		let credential = SharedKeyCredential::new("acct", &STANDARD.encode(b"k")).unwrap();
		let share = AzureFileShare::new(Client::new(), credential, "s");
		assert_eq!(share.endpoint, "https://acct.file.core.windows.net");
		let share = share.with_endpoint_suffix("file.core.usgovcloudapi.net");
		assert_eq!(share.endpoint, "https://acct.file.core.usgovcloudapi.net");
	}

	#[test]
	fn path_encodes_each_segment() {
		let credential = SharedKeyCredential::new("acct", &STANDARD.encode(b"k")).unwrap();
		let share = AzureFileShare::new(Client::new(), credential, "oci config");
		assert_eq!(share.path(".oci/", "config"), "/oci%20config/.oci/config");
		assert_eq!(share.path("", "config"), "/oci%20config/config");
	}

	#[tokio::test]
	async fn downloads_with_shared_key_headers() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/oci-config/.oci/config"))
			.and(header("x-ms-version", STORAGE_API_VERSION))
			.and(header_exists("x-ms-date"))
			.and(header_exists("authorization"))
			.respond_with(ResponseTemplate::new(200).set_body_string("[DEFAULT]\n"))
			.expect(1)
			.mount(&server)
			.await;

		let bytes = share(&server).download(".oci", "config").await.unwrap();
		assert_eq!(bytes, b"[DEFAULT]\n");
	}

	#[tokio::test]
	async fn missing_file_is_not_found() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(404))
			.mount(&server)
			.await;

		let err = share(&server)
			.download(".oci", "oci_api_key.pem")
			.await
			.unwrap_err();
		assert!(err.is_not_found());
		assert_eq!(err.to_string(), "file '.oci/oci_api_key.pem' not found on share");
	}

	#[tokio::test]
	async fn auth_failures_are_api_errors() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(403).set_body_string("AuthenticationFailed"))
			.mount(&server)
			.await;

		let err = share(&server).download(".oci", "config").await.unwrap_err();
		assert!(matches!(err, FileShareError::Api { status: 403, .. }));
	}
}
