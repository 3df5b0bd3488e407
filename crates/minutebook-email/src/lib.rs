// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP delivery gateway for Minutebook.
//!
//! Sends a rendered report as a mail attachment with an HTML cover note and a
//! plain-text alternative. Built on `lettre`'s async transport.

pub mod smtp;

pub use smtp::{build_message, SmtpDelivery};
