//! Unused AMI reclamation
//!
//! Sweeps every accessible region: collects the set of AMI ids
//! referenced by instances (in any state), lists self-owned images, and
//! deregisters those that are unreferenced and older than the retention
//! cutoff. An AMI referenced by any instance is never deregistered,
//! regardless of age.

use crate::config::Config;
use crate::ec2_utils::{ec2_client_for_region, list_regions};
use crate::error::{FleetctlError, Result};
use aws_sdk_ec2::types::Image;
use aws_sdk_ec2::Client as Ec2Client;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::{info, warn};

/// Deregister unused AMIs older than `keep_days` in all regions
pub async fn reclaim_images(keep_days: i64, config: &Config) -> Result<()> {
    if keep_days < 0 {
        return Err(FleetctlError::Validation {
            field: "keep_days".to_string(),
            reason: format!("Retention window must be >= 0 days, got {}", keep_days),
        });
    }

    let home_client = ec2_client_for_region(&config.aws.region).await;
    let regions = list_regions(&home_client).await?;
    let cutoff = Utc::now() - Duration::days(keep_days);

    info!(
        "Sweeping {} regions for unused AMIs older than {} days",
        regions.len(),
        keep_days
    );

    let mut total = 0usize;
    for region in regions {
        let client = ec2_client_for_region(&region).await;

        let referenced = referenced_image_ids(&client).await?;
        let images = self_owned_images(&client).await?;
        let reclaimable = images_to_reclaim(&images, &referenced, cutoff);

        if reclaimable.is_empty() {
            info!("No reclaimable AMIs in {}", region);
            continue;
        }

        for image in reclaimable {
            let Some(image_id) = image.image_id() else {
                continue;
            };
            client
                .deregister_image()
                .image_id(image_id)
                .send()
                .await
                .map_err(|e| {
                    FleetctlError::Aws(format!(
                        "Failed to deregister {} in {}: {}",
                        image_id, region, e
                    ))
                })?;
            println!("Deregistered {} in {}", image_id, region);
            total += 1;
        }
    }

    println!("Deregistered {} unused AMI(s).", total);
    Ok(())
}

/// AMI ids referenced by any instance in the region, in any state
async fn referenced_image_ids(client: &Ec2Client) -> Result<HashSet<String>> {
    let response = client
        .describe_instances()
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe instances: {}", e)))?;

    Ok(response
        .reservations()
        .iter()
        .flat_map(|r| r.instances())
        .filter_map(|i| i.image_id().map(|id| id.to_string()))
        .collect())
}

async fn self_owned_images(client: &Ec2Client) -> Result<Vec<Image>> {
    let response = client
        .describe_images()
        .owners("self")
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe images: {}", e)))?;

    Ok(response.images().to_vec())
}

/// Select images safe to deregister
///
/// An image qualifies when it is not referenced by any instance and its
/// creation date is strictly older than the cutoff. Images with a
/// missing or unparseable creation date are retained: reclaiming on
/// unknown age would be a guess, and deregistration is irreversible.
pub fn images_to_reclaim<'a>(
    images: &'a [Image],
    referenced: &HashSet<String>,
    cutoff: DateTime<Utc>,
) -> Vec<&'a Image> {
    images
        .iter()
        .filter(|image| {
            let Some(id) = image.image_id() else {
                return false;
            };
            if referenced.contains(id) {
                return false;
            }
            match image.creation_date().map(parse_creation_date) {
                Some(Ok(created)) => created < cutoff,
                Some(Err(_)) => {
                    warn!("Retaining {}: unparseable creation date", id);
                    false
                }
                None => false,
            }
        })
        .collect()
}

/// Parse an AMI creation date (ISO-8601, e.g. 2024-01-01T00:00:00.000Z)
fn parse_creation_date(date: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(date).map(|dt| dt.with_timezone(&Utc))
}
