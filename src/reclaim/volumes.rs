//! Unattached volume reclamation
//!
//! Deletes volumes in the "available" state. The API rejects deletion
//! of in-use volumes anyway, but the state is also checked locally so
//! no delete call is ever issued for an attached volume.

use crate::ec2_utils::ec2_client_for_region;
use crate::error::{FleetctlError, Result};
use aws_sdk_ec2::types::{Filter, Volume, VolumeState};
use tracing::info;

/// Delete all available (unattached) volumes in the given region
pub async fn reclaim_volumes(region: &str) -> Result<()> {
    let client = ec2_client_for_region(region).await;

    let response = client
        .describe_volumes()
        .filters(Filter::builder().name("status").values("available").build())
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe volumes: {}", e)))?;

    let volumes = response.volumes().to_vec();
    let deletable = volumes_to_delete(&volumes);

    info!(
        "{} available volume(s) in {} eligible for deletion",
        deletable.len(),
        region
    );

    let mut deleted = 0usize;
    for volume in deletable {
        let Some(volume_id) = volume.volume_id() else {
            continue;
        };
        println!("Deleting volume {}", volume_id);
        client
            .delete_volume()
            .volume_id(volume_id)
            .send()
            .await
            .map_err(|e| {
                FleetctlError::Aws(format!("Failed to delete volume {}: {}", volume_id, e))
            })?;
        deleted += 1;
    }

    println!("Deleted {} volume(s).", deleted);
    Ok(())
}

/// Select volumes whose state is exactly `available`
pub fn volumes_to_delete(volumes: &[Volume]) -> Vec<&Volume> {
    volumes
        .iter()
        .filter(|v| v.state() == Some(&VolumeState::Available))
        .collect()
}
