// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery gateway adapter trait.

use async_trait::async_trait;

use crate::error::MinutebookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DeliveryRequest;

/// Transmits a rendered artifact to a list of recipients.
///
/// The core only needs to know whether delivery succeeded, so that the
/// recipients can be recorded on the report row.
#[async_trait]
pub trait DeliveryAdapter: PluginAdapter {
    /// Send the artifact. `Ok` means every recipient was accepted.
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), MinutebookError>;
}
