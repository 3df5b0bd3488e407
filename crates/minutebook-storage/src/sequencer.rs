// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-meeting report version allocation.
//!
//! A version is claimed by inserting the report row; the
//! `UNIQUE(meeting_id, version)` constraint decides between two racing
//! generations and the loser starts over with a freshly read maximum.

use std::future::Future;
use std::sync::Arc;

use minutebook_core::{MinutebookError, Report, StorageAdapter};
use tracing::{info, warn};

/// Default number of attempts before a version collision is reported.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Allocates report versions and records one report row per render.
#[derive(Clone)]
pub struct ReportSequencer {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    max_attempts: u32,
}

impl ReportSequencer {
    pub fn new(storage: Arc<dyn StorageAdapter + Send + Sync>) -> Self {
        Self {
            storage,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set how many render-and-insert cycles are tried on version collisions.
    ///
    /// Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The version the next report for this meeting would take.
    pub async fn next_version(&self, meeting_id: &str) -> Result<u32, MinutebookError> {
        self.storage.next_report_version(meeting_id).await
    }

    /// Run `produce` for the next free version and commit a report row for it.
    ///
    /// `produce` is called once per attempt with the candidate report, whose
    /// version and generation time are what will be stored. If it fails, its
    /// error is returned and no row is written. If another
    /// generation commits the same version first, the cycle repeats with a new
    /// version, up to the configured attempt limit.
    pub async fn allocate<T, F, Fut>(
        &self,
        meeting_id: &str,
        mut produce: F,
    ) -> Result<(Report, T), MinutebookError>
    where
        F: FnMut(Report) -> Fut,
        Fut: Future<Output = Result<T, MinutebookError>>,
    {
        if self.storage.get_meeting(meeting_id).await?.is_none() {
            return Err(MinutebookError::MeetingNotFound {
                meeting_id: meeting_id.to_string(),
            });
        }

        let mut attempt = 1;
        loop {
            let version = self.storage.next_report_version(meeting_id).await?;
            let report = Report::new(meeting_id, version);
            let output = produce(report.clone()).await?;

            match self.storage.insert_report(&report).await {
                Ok(()) => {
                    info!(
                        meeting_id,
                        report_id = %report.id,
                        version,
                        "report version committed"
                    );
                    return Ok((report, output));
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        meeting_id,
                        version,
                        attempt,
                        "report version taken by a concurrent generation, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
