// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report generation for Minutebook.
//!
//! [`compose`] turns a meeting and its latest agenda and minutes into a
//! fixed-shape [`ReportDocument`], a rasterizer turns that into an
//! [`Artifact`](minutebook_core::Artifact), and [`ReportPipeline`] ties both to
//! the report sequencer and the delivery gateway.

pub mod compose;
pub mod pipeline;
pub mod rasterizer;

pub use compose::{compose, Branding, ReportDocument, Section, SectionBody, SectionKind, NO_DATA};
pub use pipeline::{GeneratedReport, ReportPipeline};
pub use rasterizer::{CommandRasterizer, HtmlRasterizer};
