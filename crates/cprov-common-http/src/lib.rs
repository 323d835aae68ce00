// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client for every outbound call the provisioner makes.
//!
//! All clients carry the same `cprov/{version} ({os}-{arch})` User-Agent so
//! requests can be traced on the provider side.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::debug;

/// Timeout used when the caller has no configured value.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client builder preconfigured with the standard User-Agent.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Build a client with the given request timeout.
pub fn new_client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	debug!(timeout_secs = timeout.as_secs(), "building HTTP client");
	builder().timeout(timeout).build()
}

/// Build a client with [`DEFAULT_TIMEOUT`].
pub fn new_client() -> Result<Client, reqwest::Error> {
	new_client_with_timeout(DEFAULT_TIMEOUT)
}

/// The User-Agent string sent on every request.
pub fn user_agent() -> String {
	format!(
		"cprov/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}
