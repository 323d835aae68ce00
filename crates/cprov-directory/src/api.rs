// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::models::{DirectoryGroup, DirectoryUser};

/// Group and membership operations against the identity directory.
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
	/// First group whose display name starts with `prefix`.
	async fn find_group_by_prefix(
		&self,
		prefix: &str,
	) -> Result<Option<DirectoryGroup>, DirectoryError>;

	/// Create a security group named `display_name`.
	async fn create_group(&self, display_name: &str) -> Result<DirectoryGroup, DirectoryError>;

	async fn delete_group(&self, group_id: &str) -> Result<(), DirectoryError>;

	/// Look up a user by user principal name or object id.
	async fn get_user(&self, user: &str) -> Result<DirectoryUser, DirectoryError>;

	async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool, DirectoryError>;

	async fn add_member(&self, group_id: &str, user_id: &str) -> Result<(), DirectoryError>;
}
