// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage SharedKey authorization.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cprov_common_secret::Secret;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::FileShareError;

type HmacSha256 = Hmac<Sha256>;

pub const STORAGE_API_VERSION: &str = "2020-10-02";

/// Storage account name plus the decoded account key.
#[derive(Debug, Clone)]
pub struct SharedKeyCredential {
	account: String,
	key: Secret<Vec<u8>>,
}

impl SharedKeyCredential {
	/// `key` is the base64 account key as shown in the portal.
	pub fn new(account: impl Into<String>, key: &str) -> Result<Self, FileShareError> {
		let decoded = STANDARD
			.decode(key.trim())
			.map_err(|e| FileShareError::InvalidKey(e.to_string()))?;
		Ok(Self {
			account: account.into(),
			key: Secret::new(decoded),
		})
	}

	pub fn account(&self) -> &str {
		&self.account
	}

	/// String-to-sign for a body-less request. `ms_headers` must be the
	/// `x-ms-*` headers sent with the request; `path` is the encoded URL path.
	pub fn string_to_sign(&self, verb: &str, ms_headers: &[(&str, &str)], path: &str) -> String {
		let mut headers: Vec<(String, &str)> = ms_headers
			.iter()
			.map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
			.collect();
		headers.sort_by(|a, b| a.0.cmp(&b.0));

		let mut out = String::new();
		out.push_str(verb);
		out.push('\n');
		// Content-Encoding through Range, all empty for a GET.
		out.push_str(&"\n".repeat(11));
		for (name, value) in headers {
			out.push_str(&name);
			out.push(':');
			out.push_str(value);
			out.push('\n');
		}
		out.push('/');
		out.push_str(&self.account);
		out.push_str(path);
		out
	}

	/// `Authorization` header value for `string_to_sign`.
	pub fn authorization(&self, string_to_sign: &str) -> Result<String, FileShareError> {
		let mut mac = HmacSha256::new_from_slice(self.key.expose())
			.map_err(|e| FileShareError::InvalidKey(e.to_string()))?;
		mac.update(string_to_sign.as_bytes());
		let signature = STANDARD.encode(mac.finalize().into_bytes());
		Ok(format!("SharedKey {}:{}", self.account, signature))
	}
}
