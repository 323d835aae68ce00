// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Oracle Cloud Infrastructure client for the compartment provisioner.
//!
//! - [`OciProfile`] loads and validates a profile from an OCI config file.
//! - [`RequestSigner`] produces OCI HTTP signatures with the API signing key.
//! - [`OciClient`] calls the identity (`20160918`) and budget (`20190111`)
//!   services and implements [`CloudProvider`].

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod profile;
pub mod signer;

pub use api::{CloudProvider, CompartmentSource};
pub use client::OciClient;
pub use error::{OciError, ProfileError};
pub use models::{
	Budget, Compartment, CreateBudgetDetails, CreateCompartmentDetails, CreateGroupDetails,
	CreateIdpGroupMappingDetails, CreatePolicyDetails, Group, IdentityProvider, IdpGroupMapping,
	Policy, ResetPeriod, TargetType,
};
pub use profile::{OciProfile, DEFAULT_PROFILE};
pub use signer::{RequestSigner, SignedHeaders};
