// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock delivery gateway for deterministic testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use minutebook_core::{
    AdapterType, DeliveryAdapter, DeliveryRequest, HealthStatus, MinutebookError, PluginAdapter,
};

/// A delivery gateway that captures requests instead of sending them.
///
/// Failed attempts are not captured.
pub struct MockDelivery {
    sent: Arc<Mutex<Vec<DeliveryRequest>>>,
    failing: AtomicBool,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// A gateway that rejects every request.
    pub fn failing() -> Self {
        let delivery = Self::new();
        delivery.failing.store(true, Ordering::SeqCst);
        delivery
    }

    /// Get all requests accepted so far.
    pub async fn sent_requests(&self) -> Vec<DeliveryRequest> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockDelivery {
    fn name(&self) -> &str {
        "mock-delivery"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, MinutebookError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MinutebookError> {
        Ok(())
    }
}

#[async_trait]
impl DeliveryAdapter for MockDelivery {
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), MinutebookError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MinutebookError::Delivery {
                message: "mock gateway rejected the message".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minutebook_core::Artifact;

    fn request() -> DeliveryRequest {
        DeliveryRequest {
            subject: "Report".to_string(),
            body_html: "<p>attached</p>".to_string(),
            artifact: Artifact {
                bytes: b"%PDF".to_vec(),
                content_type: "application/pdf".to_string(),
                extension: "pdf".to_string(),
            },
            filename: "report-v1.pdf".to_string(),
            recipients: vec!["a@example.com".to_string()],
        }
    }

    #[tokio::test]
    async fn captures_accepted_requests_only() {
        let ok = MockDelivery::new();
        ok.deliver(&request()).await.unwrap();
        assert_eq!(ok.sent_count().await, 1);
        assert_eq!(ok.sent_requests().await[0].filename, "report-v1.pdf");

        let failing = MockDelivery::failing();
        assert!(failing.deliver(&request()).await.is_err());
        assert_eq!(failing.sent_count().await, 0);
    }
}
