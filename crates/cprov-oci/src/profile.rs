// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OCI config file profiles.
//!
//! The config file is the INI-style file the OCI CLI and SDKs read:
//!
//! ```text
//! [DEFAULT]
//! user=ocid1.user.oc1..aaaa
//! fingerprint=20:3b:97:13:55:1c:5b:0d:d3:37:d8:50:4e:c5:3a:34
//! key_file=~/.oci/oci_api_key.pem
//! tenancy=ocid1.tenancy.oc1..aaaa
//! region=us-ashburn-1
//! ```
//!
//! Named profiles inherit every value from `[DEFAULT]` they do not set.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ProfileError;

pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// A validated OCI config profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
	pub user: String,
	pub tenancy: String,
	pub fingerprint: String,
	pub region: String,
	/// Key path as written in the file. Informational: the provisioner signs
	/// with the key staged next to the config.
	pub key_file: Option<PathBuf>,
}

impl OciProfile {
	/// Read and validate `profile` from the config file at `path`.
	pub fn from_file(path: &Path, profile: &str) -> Result<Self, ProfileError> {
		let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		debug!(path = %path.display(), profile, "parsing OCI config");
		Self::parse(&content, profile)
	}

	/// Parse and validate `profile` from config file contents.
	pub fn parse(content: &str, profile: &str) -> Result<Self, ProfileError> {
		let sections = parse_sections(content)?;
		let mut values = sections.get(DEFAULT_PROFILE).cloned().unwrap_or_default();
		match sections.get(profile) {
			Some(own) => values.extend(own.clone()),
			None if profile == DEFAULT_PROFILE && !values.is_empty() => {}
			None => return Err(ProfileError::MissingProfile(profile.to_string())),
		}

		if values
			.get("pass_phrase")
			.is_some_and(|p| !p.trim().is_empty())
		{
			return Err(ProfileError::InvalidField {
				field: "pass_phrase",
				message: "encrypted private keys are not supported".to_string(),
			});
		}

		let take = |field: &'static str| -> Result<String, ProfileError> {
			values
				.get(field)
				.map(|v| v.trim().to_string())
				.filter(|v| !v.is_empty())
				.ok_or(ProfileError::MissingField(field))
		};

		let parsed = Self {
			user: take("user")?,
			tenancy: take("tenancy")?,
			fingerprint: take("fingerprint")?,
			region: take("region")?,
			key_file: values
				.get("key_file")
				.filter(|v| !v.trim().is_empty())
				.map(PathBuf::from),
		};
		parsed.validate()?;
		Ok(parsed)
	}

	/// Check field formats.
	pub fn validate(&self) -> Result<(), ProfileError> {
		if !is_ocid(&self.user) {
			return Err(ProfileError::InvalidField {
				field: "user",
				message: format!("'{}' is not an OCID", self.user),
			});
		}
		if !is_ocid(&self.tenancy) {
			return Err(ProfileError::InvalidField {
				field: "tenancy",
				message: format!("'{}' is not an OCID", self.tenancy),
			});
		}
		if !is_fingerprint(&self.fingerprint) {
			return Err(ProfileError::InvalidField {
				field: "fingerprint",
				message: "expected 16 colon-separated lowercase hex pairs".to_string(),
			});
		}
		if !self
			.region
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
		{
			return Err(ProfileError::InvalidField {
				field: "region",
				message: format!("'{}' is not a region identifier", self.region),
			});
		}
		Ok(())
	}

	/// Key id used in request signatures: `<tenancy>/<user>/<fingerprint>`.
	pub fn key_id(&self) -> String {
		format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
	}

	pub fn identity_endpoint(&self) -> String {
		format!("https://identity.{}.oci.oraclecloud.com", self.region)
	}

	pub fn budget_endpoint(&self) -> String {
		format!("https://usage.{}.oci.oraclecloud.com", self.region)
	}

	/// Web console for the profile's region.
	pub fn console_url(&self) -> String {
		format!("https://console.{}.oraclecloud.com", self.region)
	}
}

type Sections = HashMap<String, HashMap<String, String>>;

fn parse_sections(content: &str) -> Result<Sections, ProfileError> {
	let mut sections: Sections = HashMap::new();
	let mut current: Option<String> = None;

	for (idx, raw) in content.lines().enumerate() {
		let line = raw.trim();
		if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
			continue;
		}

		if let Some(rest) = line.strip_prefix('[') {
			let name = rest.strip_suffix(']').ok_or_else(|| ProfileError::Parse {
				line: idx + 1,
				message: "unterminated section header".to_string(),
			})?;
			let name = name.trim().to_string();
			sections.entry(name.clone()).or_default();
			current = Some(name);
			continue;
		}

		let Some((key, value)) = line.split_once('=') else {
			return Err(ProfileError::Parse {
				line: idx + 1,
				message: "expected key=value".to_string(),
			});
		};
		let Some(section) = current.as_ref() else {
			return Err(ProfileError::Parse {
				line: idx + 1,
				message: "value outside of a profile section".to_string(),
			});
		};

		sections
			.entry(section.clone())
			.or_default()
			.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
	}

	Ok(sections)
}

/// OCIDs look like `ocid1.<type>.<realm>.[region][.future].<unique>`.
fn is_ocid(value: &str) -> bool {
	let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
	let parts: Vec<&str> = value.split(['.', ':']).collect();
	parts.len() >= 5
		&& !parts[0].is_empty()
		&& !parts[parts.len() - 1].is_empty()
		&& parts.iter().all(|p| p.chars().all(allowed))
}

fn is_fingerprint(value: &str) -> bool {
	let pairs: Vec<&str> = value.split(':').collect();
	pairs.len() == 16
		&& pairs.iter().all(|p| {
			p.len() == 2
				&& p
					.chars()
					.all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
		})
}
