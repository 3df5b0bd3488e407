// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Minutebook integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without a real converter or mail server.
//!
//! # Components
//!
//! - [`TestHarness`] - Temp SQLite storage with meeting helpers
//! - [`MockRasterizer`] - Rasterizer that records its input and can be told to fail
//! - [`MockDelivery`] - Delivery gateway that captures requests and can be told to fail

pub mod harness;
pub mod mock_delivery;
pub mod mock_rasterizer;

pub use harness::TestHarness;
pub use mock_delivery::MockDelivery;
pub use mock_rasterizer::MockRasterizer;
