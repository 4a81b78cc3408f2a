//! Common EC2 utilities shared across commands
//!
//! Region-scoped client construction, region discovery, and the
//! poll-until-running wait used by `instance create`.

use crate::error::{FleetctlError, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::Client as Ec2Client;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Load shared AWS config for a specific region
///
/// Credentials come from the ambient provider chain (env, profile,
/// instance role); only the region is pinned explicitly.
pub async fn sdk_config_for_region(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// EC2 client scoped to a region
pub async fn ec2_client_for_region(region: &str) -> Ec2Client {
    Ec2Client::new(&sdk_config_for_region(region).await)
}

/// List all regions the account has access to
pub async fn list_regions(client: &Ec2Client) -> Result<Vec<String>> {
    let response = client
        .describe_regions()
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe regions: {}", e)))?;

    Ok(response
        .regions()
        .iter()
        .filter_map(|r| r.region_name().map(|n| n.to_string()))
        .collect())
}

/// Wait for an instance to reach the running state
///
/// Polls the EC2 API until the instance is running. Fails if the
/// instance terminates during the wait or the timeout elapses.
pub async fn wait_for_instance_running(client: &Ec2Client, instance_id: &str) -> Result<()> {
    const MAX_ATTEMPTS: u32 = 60;
    const POLL_INTERVAL: Duration = Duration::from_secs(5);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Waiting for instance to start...");

    for _attempt in 0..MAX_ATTEMPTS {
        sleep(POLL_INTERVAL).await;
        pb.tick();

        let state = describe_instance_state(client, instance_id).await?;

        match state.as_deref() {
            Some("running") => {
                pb.finish_with_message("Instance running");
                info!("Instance {} reached running state", instance_id);
                return Ok(());
            }
            Some("terminated") | Some("shutting-down") => {
                pb.finish_with_message("Instance terminated");
                return Err(FleetctlError::Aws(format!(
                    "Instance {} terminated before becoming ready",
                    instance_id
                )));
            }
            other => {
                pb.set_message(format!("State: {}...", other.unwrap_or("unknown")));
            }
        }
    }

    pb.finish_with_message("Timeout");
    Err(FleetctlError::Aws(format!(
        "Instance {} did not reach running state within {} minutes",
        instance_id,
        MAX_ATTEMPTS as u64 * POLL_INTERVAL.as_secs() / 60
    )))
}

/// Current state name of a single instance
async fn describe_instance_state(
    client: &Ec2Client,
    instance_id: &str,
) -> Result<Option<String>> {
    let response = client
        .describe_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe instance: {}", e)))?;

    let instance = response
        .reservations()
        .iter()
        .flat_map(|r| r.instances())
        .find(|i| i.instance_id() == Some(instance_id))
        .ok_or_else(|| FleetctlError::ResourceNotFound {
            resource_type: "instance".to_string(),
            resource_id: instance_id.to_string(),
        })?;

    Ok(instance
        .state()
        .and_then(|s| s.name())
        .map(|n| n.as_str().to_string()))
}
