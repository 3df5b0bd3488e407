// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock rasterizer for deterministic testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use minutebook_core::{
    AdapterType, Artifact, HealthStatus, MinutebookError, PluginAdapter, RasterizerAdapter,
};

/// A rasterizer that wraps the HTML it receives in a fake PDF.
///
/// Every input is captured for assertions. After [`MockRasterizer::fail`]
/// every call returns a rasterization error until
/// [`MockRasterizer::recover`] is called.
pub struct MockRasterizer {
    inputs: Arc<Mutex<Vec<String>>>,
    failing: AtomicBool,
}

impl MockRasterizer {
    pub fn new() -> Self {
        Self {
            inputs: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent calls fail.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Make subsequent calls succeed again.
    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    /// HTML documents passed to `rasterize`, successful or not.
    pub async fn inputs(&self) -> Vec<String> {
        self.inputs.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.inputs.lock().await.len()
    }
}

impl Default for MockRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockRasterizer {
    fn name(&self) -> &str {
        "mock-rasterizer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Rasterizer
    }

    async fn health_check(&self) -> Result<HealthStatus, MinutebookError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MinutebookError> {
        Ok(())
    }
}

#[async_trait]
impl RasterizerAdapter for MockRasterizer {
    async fn rasterize(&self, html: &str) -> Result<Artifact, MinutebookError> {
        self.inputs.lock().await.push(html.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(MinutebookError::Rasterization {
                message: "mock rasterizer failure".to_string(),
                source: None,
            });
        }
        let mut bytes = b"%PDF-mock\n".to_vec();
        bytes.extend_from_slice(html.as_bytes());
        Ok(Artifact {
            bytes,
            content_type: "application/pdf".to_string(),
            extension: "pdf".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_inputs_and_fails_on_demand() {
        let rasterizer = MockRasterizer::new();
        let artifact = rasterizer.rasterize("<p>a</p>").await.unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF-mock"));

        rasterizer.fail();
        assert!(rasterizer.rasterize("<p>b</p>").await.is_err());
        rasterizer.recover();
        assert!(rasterizer.rasterize("<p>c</p>").await.is_ok());

        assert_eq!(rasterizer.inputs().await, vec!["<p>a</p>", "<p>b</p>", "<p>c</p>"]);
    }
}
