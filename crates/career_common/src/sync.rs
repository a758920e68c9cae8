//! Bulk recomputation across every known user.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::CareerError;
use crate::progress::ProgressEngine;
use crate::types::SyncReport;

/// Run the progress engine for every user id in the platform.
///
/// A failing user is logged and recorded in `failed`; the batch continues so
/// one bad row cannot starve the remaining users of updates.
pub fn sync_all_users(engine: &ProgressEngine) -> Result<SyncReport, CareerError> {
    let started = Instant::now();
    let user_ids = engine.store().list_user_ids()?;

    let mut snapshots = Vec::new();
    let mut failed = Vec::new();

    for user_id in user_ids {
        match engine.update_user(user_id) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => {
                warn!("Progress sync failed for user {}: {}", user_id, e);
                failed.push(user_id);
            }
        }
    }

    let report = SyncReport {
        synced: snapshots.len(),
        failed,
        snapshots,
        duration_ms: started.elapsed().as_millis() as u64,
        synced_at: Utc::now(),
    };
    info!(
        "Progress sync covered {} users ({} failed)",
        report.synced,
        report.failed.len()
    );
    Ok(report)
}
