// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Compartment tree resolution.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use cprov_oci::{Compartment, CompartmentSource, OciError};
use tracing::debug;

/// Every compartment under a root, keyed by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct CompartmentIndex {
	entries: HashMap<String, Compartment>,
}

impl CompartmentIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Case-insensitive lookup.
	pub fn get(&self, name: &str) -> Option<&Compartment> {
		self.entries.get(&name.to_lowercase())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Insert under the lowercase name. A later insert with the same name
	/// replaces the earlier one.
	pub fn insert(&mut self, compartment: Compartment) {
		let key = compartment.name.to_lowercase();
		if let Some(previous) = self.entries.get(&key) {
			debug!(
				name = %key,
				replaced = %previous.id,
				by = %compartment.id,
				"compartment name collision, keeping the later entry"
			);
		}
		self.entries.insert(key, compartment);
	}
}

/// Walk the tree under `root_id` depth-first, pre-order, and index every
/// descendant. The root itself is not included.
pub async fn resolve_compartments(
	source: &dyn CompartmentSource,
	root_id: &str,
) -> Result<CompartmentIndex, OciError> {
	let mut index = CompartmentIndex::new();
	walk(source, root_id, &mut index).await?;
	debug!(count = index.len(), "resolved compartment tree");
	Ok(index)
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), OciError>> + Send + 'a>>;

fn walk<'a>(
	source: &'a dyn CompartmentSource,
	parent_id: &'a str,
	index: &'a mut CompartmentIndex,
) -> WalkFuture<'a> {
	Box::pin(async move {
		debug!(parent_id, "listing child compartments");
		for child in source.list_compartments(parent_id).await? {
			if child.id == parent_id {
				continue;
			}
			let child_id = child.id.clone();
			index.insert(child);
			walk(source, &child_id, index).await?;
		}
		Ok(())
	})
}
