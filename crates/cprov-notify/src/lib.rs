// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Owner notifications.
//!
//! Messages are posted as JSON `{"TO", "Subject", "Body"}` to an HTTP
//! endpoint (a mail-relay automation) that turns them into email.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};

#[derive(Debug, Error)]
pub enum NotifyError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("notification endpoint returned {status}: {message}")]
	Rejected { status: u16, message: String },
}

/// A message to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
	#[serde(rename = "TO")]
	pub to: String,
	#[serde(rename = "Subject")]
	pub subject: String,
	#[serde(rename = "Body")]
	pub body: String,
}

impl Notification {
	pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			to: to.into(),
			subject: subject.into(),
			body: body.into(),
		}
	}
}

#[async_trait]
pub trait Notifier: Send + Sync {
	async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Posts notifications to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
	http_client: Client,
	endpoint: String,
}

impl HttpNotifier {
	pub fn new(http_client: Client, endpoint: impl Into<String>) -> Self {
		Self {
			http_client,
			endpoint: endpoint.into(),
		}
	}
}

#[async_trait]
impl Notifier for HttpNotifier {
	#[instrument(skip(self, notification), fields(to = %notification.to, subject = %notification.subject))]
	async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
		let response = self
			.http_client
			.post(&self.endpoint)
			.json(notification)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			error!(status = status.as_u16(), "notification rejected");
			return Err(NotifyError::Rejected {
				status: status.as_u16(),
				message,
			});
		}

		info!("notification sent");
		Ok(())
	}
}
