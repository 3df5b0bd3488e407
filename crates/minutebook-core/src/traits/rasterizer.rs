// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rasterizer adapter trait.

use async_trait::async_trait;

use crate::error::MinutebookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Artifact;

/// Converts a composed HTML document into a binary artifact (usually PDF).
///
/// Treated as a black box that may fail. Failures must be reported as
/// [`MinutebookError::Rasterization`] so callers can tell them apart from
/// "no content yet".
#[async_trait]
pub trait RasterizerAdapter: PluginAdapter {
    /// Rasterize a complete HTML document.
    async fn rasterize(&self, html: &str) -> Result<Artifact, MinutebookError>;
}
