// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::FileShareError;

/// Read access to a managed file share.
#[async_trait]
pub trait FileShare: Send + Sync {
	/// Contents of `directory/file`. A missing file is
	/// [`FileShareError::NotFound`].
	async fn download(&self, directory: &str, file: &str) -> Result<Vec<u8>, FileShareError>;
}
