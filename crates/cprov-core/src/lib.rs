// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OCI compartment provisioning.
//!
//! A run parses a [`ProvisioningRequest`], stages the OCI configuration from
//! the file share, resolves the tenancy's compartment tree into a
//! [`CompartmentIndex`], and creates the compartment with its admin group,
//! directory group, federation mapping, policy and budget. See
//! [`Provisioner::run`].

pub mod connectors;
pub mod directory;
pub mod driver;
pub mod error;
pub mod request;
pub mod resolver;
pub mod rollback;

pub use connectors::LiveConnectors;
pub use directory::{ensure_directory_group, ensure_membership, EnsuredGroup};
pub use driver::{
	duplicate_notification, success_notification, Connectors, ProvisionReport, Provisioner,
	DUPLICATE_SUBJECT, SUCCESS_SUBJECT,
};
pub use error::{
	exit_code, ProvisionError, Step, UpstreamError, EXIT_DUPLICATE, EXIT_FAILURE, EXIT_SUCCESS,
};
pub use request::ProvisioningRequest;
pub use resolver::{resolve_compartments, CompartmentIndex};
pub use rollback::{Compensation, CompensationPlan, UnwindReport};
