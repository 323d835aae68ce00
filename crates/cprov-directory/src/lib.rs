// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Microsoft Graph directory access for the compartment provisioner.
//!
//! The provisioner authenticates as a service principal
//! ([`acquire_token`]), then finds or creates the admin security group and
//! adds the compartment owner to it through [`DirectoryProvider`].

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod token;

pub use api::DirectoryProvider;
pub use client::{GraphClient, DEFAULT_GRAPH_URL};
pub use error::DirectoryError;
pub use models::{DirectoryGroup, DirectoryUser};
pub use token::{acquire_token, AccessToken, ClientCredentials, GRAPH_SCOPE};
