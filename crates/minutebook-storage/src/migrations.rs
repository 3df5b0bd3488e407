// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary with
//! `embed_migrations!` and applied every time the database is opened.

use minutebook_core::MinutebookError;
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), MinutebookError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(MinutebookError::storage)?;
    let applied = report.applied_migrations().len();
    if applied > 0 {
        debug!(applied, "applied schema migrations");
    }
    Ok(())
}
