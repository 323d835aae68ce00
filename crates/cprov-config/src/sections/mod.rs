// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod directory;
mod fileshare;
mod http;
mod logging;
mod oci;
mod rollback;
mod staging;

pub use directory::{DirectoryConfig, DirectoryConfigLayer};
pub use fileshare::{FileShareConfig, FileShareConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use oci::{OciConfig, OciConfigLayer};
pub use rollback::{RollbackConfig, RollbackConfigLayer};
pub use staging::{StagingConfig, StagingConfigLayer};
