// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OCI HTTP request signatures.
//!
//! Every OCI API request carries an `Authorization: Signature ...` header: an
//! RSA-SHA256 (PKCS#1 v1.5) signature over a canonical list of headers.
//! Requests without a body sign `date (request-target) host`; requests with a
//! body additionally sign `content-length content-type x-content-sha256`.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::error::{OciError, ProfileError};

const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const JSON: &str = "application/json";

/// Signs OCI API requests with an API signing key.
#[derive(Clone)]
pub struct RequestSigner {
	key_id: String,
	key: SigningKey<Sha256>,
}

impl std::fmt::Debug for RequestSigner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RequestSigner")
			.field("key_id", &self.key_id)
			.field("key", &"[REDACTED]")
			.finish()
	}
}

/// Headers to attach to a signed request, in signing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
	pub headers: Vec<(&'static str, String)>,
	pub signing_string: String,
}

impl RequestSigner {
	/// Build a signer from a PEM private key (PKCS#8 or PKCS#1).
	pub fn from_pem(key_id: impl Into<String>, pem: &str) -> Result<Self, ProfileError> {
		if pem.contains("ENCRYPTED") {
			return Err(ProfileError::InvalidKey(
				"encrypted private keys are not supported".to_string(),
			));
		}
		let key = RsaPrivateKey::from_pkcs8_pem(pem)
			.or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
			.map_err(|e| ProfileError::InvalidKey(e.to_string()))?;

		Ok(Self {
			key_id: key_id.into(),
			key: SigningKey::<Sha256>::new(key),
		})
	}

	pub fn from_key_file(key_id: impl Into<String>, path: &Path) -> Result<Self, ProfileError> {
		let pem = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_pem(key_id, &pem)
	}

	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	/// Sign a request at the current time.
	pub fn sign(
		&self,
		method: &Method,
		url: &Url,
		body: Option<&[u8]>,
	) -> Result<SignedHeaders, OciError> {
		self.sign_at(method, url, body, Utc::now())
	}

	#[instrument(skip(self, body), fields(key_id = %self.key_id))]
	pub fn sign_at(
		&self,
		method: &Method,
		url: &Url,
		body: Option<&[u8]>,
		now: DateTime<Utc>,
	) -> Result<SignedHeaders, OciError> {
		let host = match (url.host_str(), url.port()) {
			(Some(host), Some(port)) => format!("{host}:{port}"),
			(Some(host), None) => host.to_string(),
			(None, _) => return Err(OciError::Url(format!("{url} has no host"))),
		};
		let target = match url.query() {
			Some(query) => format!("{} {}?{}", method.as_str().to_lowercase(), url.path(), query),
			None => format!("{} {}", method.as_str().to_lowercase(), url.path()),
		};

		let mut headers: Vec<(&'static str, String)> = vec![
			("date", now.format(DATE_FORMAT).to_string()),
			("(request-target)", target),
			("host", host),
		];

		if *method == Method::POST || *method == Method::PUT {
			let body = body.unwrap_or_default();
			headers.push(("content-length", body.len().to_string()));
			headers.push(("content-type", JSON.to_string()));
			headers.push(("x-content-sha256", STANDARD.encode(Sha256::digest(body))));
		}

		let signing_string = headers
			.iter()
			.map(|(name, value)| format!("{name}: {value}"))
			.collect::<Vec<_>>()
			.join("\n");
		let signature = STANDARD.encode(self.key.sign(signing_string.as_bytes()).to_bytes());

		let names = headers
			.iter()
			.map(|(name, _)| *name)
			.collect::<Vec<_>>()
			.join(" ");
		let authorization = format!(
			"Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{}\",signature=\"{}\"",
			self.key_id, names, signature
		);

		debug!(headers = %names, "signed request");

		headers.retain(|(name, _)| *name != "(request-target)");
		headers.push(("authorization", authorization));

		Ok(SignedHeaders {
			headers,
			signing_string,
		})
	}
}
