// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Compensation for partially completed runs.
//!
//! Each resource is recorded as it is created. On failure the plan is
//! unwound newest first; every undo is attempted even if an earlier one
//! fails.

use cprov_directory::DirectoryProvider;
use cprov_oci::CloudProvider;
use tracing::{error, info, warn};

/// A created resource and how to remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
	Compartment { id: String },
	Group { id: String },
	DirectoryGroup { id: String },
	IdpGroupMapping { idp_id: String, mapping_id: String },
	Policy { id: String },
	Budget { id: String },
}

impl Compensation {
	fn describe(&self) -> String {
		match self {
			Compensation::Compartment { id } => format!("compartment {id}"),
			Compensation::Group { id } => format!("group {id}"),
			Compensation::DirectoryGroup { id } => format!("directory group {id}"),
			Compensation::IdpGroupMapping { idp_id, mapping_id } => {
				format!("group mapping {mapping_id} on {idp_id}")
			}
			Compensation::Policy { id } => format!("policy {id}"),
			Compensation::Budget { id } => format!("budget {id}"),
		}
	}
}

/// Result of unwinding a plan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnwindReport {
	pub undone: Vec<Compensation>,
	pub failed: Vec<Compensation>,
}

#[derive(Debug, Default)]
pub struct CompensationPlan {
	steps: Vec<Compensation>,
}

impl CompensationPlan {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, step: Compensation) {
		self.steps.push(step);
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Recorded steps, oldest first.
	pub fn steps(&self) -> &[Compensation] {
		&self.steps
	}

	/// Log what a failed run left behind without touching it.
	pub fn abandon(self) {
		for step in &self.steps {
			warn!(resource = %step.describe(), "leaving resource from failed run");
		}
	}

	/// Undo every recorded step, newest first. Directory groups are skipped
	/// (and reported as failed) when no directory client is available.
	pub async fn unwind(
		self,
		cloud: &dyn CloudProvider,
		directory: Option<&dyn DirectoryProvider>,
	) -> UnwindReport {
		let mut report = UnwindReport::default();

		for step in self.steps.into_iter().rev() {
			let outcome = match &step {
				Compensation::Compartment { id } => {
					cloud.delete_compartment(id).await.map_err(|e| e.to_string())
				}
				Compensation::Group { id } => cloud.delete_group(id).await.map_err(|e| e.to_string()),
				Compensation::DirectoryGroup { id } => match directory {
					Some(directory) => directory.delete_group(id).await.map_err(|e| e.to_string()),
					None => Err("no directory client".to_string()),
				},
				Compensation::IdpGroupMapping { idp_id, mapping_id } => cloud
					.delete_idp_group_mapping(idp_id, mapping_id)
					.await
					.map_err(|e| e.to_string()),
				Compensation::Policy { id } => cloud.delete_policy(id).await.map_err(|e| e.to_string()),
				Compensation::Budget { id } => cloud.delete_budget(id).await.map_err(|e| e.to_string()),
			};

			match outcome {
				Ok(()) => {
					info!(resource = %step.describe(), "rolled back");
					report.undone.push(step);
				}
				Err(reason) => {
					error!(resource = %step.describe(), error = %reason, "rollback failed");
					report.failed.push(step);
				}
			}
		}

		report
	}
}
