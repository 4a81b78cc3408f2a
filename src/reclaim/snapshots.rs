//! Old snapshot reclamation
//!
//! Deletes self-owned snapshots whose start time is older than the
//! retention window. The window is a required parameter: deleting
//! unconditionally is only expressible as an explicit `--keep-days 0`.

use crate::ec2_utils::ec2_client_for_region;
use crate::error::{FleetctlError, Result};
use aws_sdk_ec2::types::Snapshot;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Delete snapshots older than `keep_days` in the given region
pub async fn reclaim_snapshots(keep_days: i64, region: &str) -> Result<()> {
    if keep_days < 0 {
        return Err(FleetctlError::Validation {
            field: "keep_days".to_string(),
            reason: format!("Retention window must be >= 0 days, got {}", keep_days),
        });
    }

    let client = ec2_client_for_region(region).await;

    let response = client
        .describe_snapshots()
        .owner_ids("self")
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe snapshots: {}", e)))?;

    let snapshots = response.snapshots().to_vec();
    let cutoff = Utc::now() - Duration::days(keep_days);
    let expired = snapshots_to_delete(&snapshots, cutoff);

    info!(
        "{} of {} snapshot(s) in {} older than {} days",
        expired.len(),
        snapshots.len(),
        region,
        keep_days
    );

    let mut deleted = 0usize;
    for snapshot in expired {
        let Some(snapshot_id) = snapshot.snapshot_id() else {
            continue;
        };
        println!("Deleting snapshot {}...", snapshot_id);
        client
            .delete_snapshot()
            .snapshot_id(snapshot_id)
            .send()
            .await
            .map_err(|e| {
                FleetctlError::Aws(format!("Failed to delete snapshot {}: {}", snapshot_id, e))
            })?;
        println!("Snapshot {} deleted.", snapshot_id);
        deleted += 1;
    }

    println!("Deleted {} snapshot(s).", deleted);
    Ok(())
}

/// Select snapshots with a start time strictly older than the cutoff
///
/// Snapshots without a start time are retained; their age is unknown
/// and deletion is irreversible.
pub fn snapshots_to_delete<'a>(
    snapshots: &'a [Snapshot],
    cutoff: DateTime<Utc>,
) -> Vec<&'a Snapshot> {
    snapshots
        .iter()
        .filter(|snapshot| match snapshot.start_time() {
            Some(start) => match DateTime::from_timestamp(start.secs(), start.subsec_nanos()) {
                Some(started) => started < cutoff,
                None => false,
            },
            None => false,
        })
        .collect()
}
