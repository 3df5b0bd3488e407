// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators the core talks to.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod delivery;
pub mod rasterizer;
pub mod storage;

pub use adapter::PluginAdapter;
pub use delivery::DeliveryAdapter;
pub use rasterizer::RasterizerAdapter;
pub use storage::StorageAdapter;
