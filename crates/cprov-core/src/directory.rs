// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Find-or-create steps against the identity directory.

use cprov_directory::{DirectoryGroup, DirectoryProvider};
use tracing::{info, warn};

use crate::error::{ProvisionError, Step};

/// The directory group and whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredGroup {
	pub group: DirectoryGroup,
	pub created: bool,
}

/// Find the group whose display name starts with `name`, creating it as a
/// security group when there is none.
pub async fn ensure_directory_group(
	directory: &dyn DirectoryProvider,
	name: &str,
) -> Result<EnsuredGroup, ProvisionError> {
	let existing = directory
		.find_group_by_prefix(name)
		.await
		.map_err(|e| ProvisionError::upstream(Step::FindDirectoryGroup, e))?;

	if let Some(group) = existing {
		warn!(group = %group.display_name, id = %group.id, "directory group already exists");
		return Ok(EnsuredGroup {
			group,
			created: false,
		});
	}

	let group = directory
		.create_group(name)
		.await
		.map_err(|e| ProvisionError::upstream(Step::CreateDirectoryGroup, e))?;
	info!(group = %group.display_name, id = %group.id, "created directory group");
	Ok(EnsuredGroup {
		group,
		created: true,
	})
}

/// Make `owner` a member of `group_id`. Returns `true` when a membership was
/// added, `false` when the owner already belonged to the group.
pub async fn ensure_membership(
	directory: &dyn DirectoryProvider,
	group_id: &str,
	owner: &str,
) -> Result<bool, ProvisionError> {
	let user = directory
		.get_user(owner)
		.await
		.map_err(|e| ProvisionError::upstream(Step::LookupOwner, e))?;

	let already = directory
		.is_member(group_id, &user.id)
		.await
		.map_err(|e| ProvisionError::upstream(Step::CheckMembership, e))?;
	if already {
		warn!(owner, group_id, "owner already in directory group");
		return Ok(false);
	}

	directory
		.add_member(group_id, &user.id)
		.await
		.map_err(|e| ProvisionError::upstream(Step::AddMember, e))?;
	info!(owner, group_id, "added owner to directory group");
	Ok(true)
}
