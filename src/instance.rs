//! EC2 instance lifecycle commands
//!
//! Create, start, stop, reboot, terminate, and list instances. `create`
//! is the only operation that waits for a state transition; the rest
//! issue a single API call and report what was requested.

use crate::config::Config;
use crate::ec2_utils::{ec2_client_for_region, wait_for_instance_running};
use crate::error::{FleetctlError, Result};
use crate::keypair::{ensure_key_pair, KeyPairOutcome};
use aws_sdk_ec2::types::{Filter, Image, Instance, InstanceType};
use aws_sdk_ec2::Client as Ec2Client;
use clap::Subcommand;
use comfy_table::Table;
use tracing::info;

#[derive(Subcommand, Clone)]
pub enum InstanceCommands {
    /// Launch a new instance from the newest matching AMI
    ///
    /// Creates the key pair if it does not exist yet (the private key is
    /// saved under the configured key directory), resolves the newest
    /// available AMI matching the configured name/arch filters, launches
    /// one instance, and blocks until it is running.
    Create {
        /// Key pair name (created if absent)
        #[arg(value_name = "KEY_NAME")]
        key_name: String,

        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
    /// Start a stopped instance
    Start {
        /// EC2 instance ID (e.g., i-1234567890abcdef0)
        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,

        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
    /// Stop a running instance (preserves data, can be restarted)
    Stop {
        /// EC2 instance ID
        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,

        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
    /// Reboot an instance
    Reboot {
        /// EC2 instance ID
        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,

        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
    /// Terminate an instance (permanent)
    Terminate {
        /// EC2 instance ID
        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,

        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
    /// List running instances
    ///
    /// Shows only instances currently in the running state.
    List {
        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
}

pub async fn handle_command(cmd: InstanceCommands, config: &Config) -> Result<()> {
    match cmd {
        InstanceCommands::Create { key_name, region } => {
            let region = resolve_region(region, config)?;
            let client = ec2_client_for_region(&region).await;
            create_instance(&client, &key_name, &region, config).await
        }
        InstanceCommands::Start {
            instance_id,
            region,
        } => {
            crate::validation::validate_instance_id(&instance_id)?;
            let region = resolve_region(region, config)?;
            let client = ec2_client_for_region(&region).await;
            start_instance(&client, &instance_id).await
        }
        InstanceCommands::Stop {
            instance_id,
            region,
        } => {
            crate::validation::validate_instance_id(&instance_id)?;
            let region = resolve_region(region, config)?;
            let client = ec2_client_for_region(&region).await;
            stop_instance(&client, &instance_id).await
        }
        InstanceCommands::Reboot {
            instance_id,
            region,
        } => {
            crate::validation::validate_instance_id(&instance_id)?;
            let region = resolve_region(region, config)?;
            let client = ec2_client_for_region(&region).await;
            reboot_instance(&client, &instance_id).await
        }
        InstanceCommands::Terminate {
            instance_id,
            region,
        } => {
            crate::validation::validate_instance_id(&instance_id)?;
            let region = resolve_region(region, config)?;
            let client = ec2_client_for_region(&region).await;
            terminate_instance(&client, &instance_id).await
        }
        InstanceCommands::List { region } => {
            let region = resolve_region(region, config)?;
            let client = ec2_client_for_region(&region).await;
            list_running_instances(&client).await
        }
    }
}

fn resolve_region(region: Option<String>, config: &Config) -> Result<String> {
    let region = region.unwrap_or_else(|| config.aws.region.clone());
    crate::validation::validate_region(&region)?;
    Ok(region)
}

/// Launch one instance from the newest matching AMI
///
/// Key pair creation treats "already exists" as success, so re-running
/// with the same key name proceeds to the launch.
async fn create_instance(
    client: &Ec2Client,
    key_name: &str,
    region: &str,
    config: &Config,
) -> Result<()> {
    match ensure_key_pair(client, key_name, config).await? {
        KeyPairOutcome::Created(path) => {
            println!("Created key pair {}", key_name);
            println!("Saved private key to {}", path.display());
        }
        KeyPairOutcome::AlreadyExists => {
            println!("Key pair {} already exists.", key_name);
        }
    }

    let image_id = find_latest_image(client, config).await?;
    info!("Launching {} from {}", config.aws.default_instance_type, image_id);

    let response = client
        .run_instances()
        .image_id(&image_id)
        .min_count(1)
        .max_count(1)
        .instance_type(InstanceType::from(
            config.aws.default_instance_type.as_str(),
        ))
        .key_name(key_name)
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to launch instance: {}", e)))?;

    let instance_id = response
        .instances()
        .first()
        .and_then(|i| i.instance_id())
        .ok_or_else(|| {
            FleetctlError::Aws("RunInstances returned no instance ID".to_string())
        })?
        .to_string();

    println!(
        "Created instance {} in {}, waiting until running...",
        instance_id, region
    );
    wait_for_instance_running(client, &instance_id).await?;
    println!("Instance {} is now up and running", instance_id);

    Ok(())
}

/// Find the newest available AMI matching the configured filters
pub async fn find_latest_image(client: &Ec2Client, config: &Config) -> Result<String> {
    let response = client
        .describe_images()
        .owners(&config.aws.image_owner)
        .filters(
            Filter::builder()
                .name("name")
                .values(&config.aws.image_name_pattern)
                .build(),
        )
        .filters(Filter::builder().name("state").values("available").build())
        .filters(
            Filter::builder()
                .name("architecture")
                .values(&config.aws.image_architecture)
                .build(),
        )
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe images: {}", e)))?;

    let latest = select_newest_image(response.images()).ok_or_else(|| {
        FleetctlError::ResourceNotFound {
            resource_type: "image".to_string(),
            resource_id: config.aws.image_name_pattern.clone(),
        }
    })?;

    latest
        .image_id()
        .map(|id| id.to_string())
        .ok_or_else(|| FleetctlError::Aws("AMI has no image ID".to_string()))
}

/// Pick the image with the maximum creation timestamp
///
/// AMI creation dates are ISO-8601 strings, so lexicographic comparison
/// orders them chronologically.
pub fn select_newest_image(images: &[Image]) -> Option<&Image> {
    images
        .iter()
        .max_by(|a, b| a.creation_date().unwrap_or("").cmp(b.creation_date().unwrap_or("")))
}

async fn start_instance(client: &Ec2Client, instance_id: &str) -> Result<()> {
    client
        .start_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to start instance: {}", e)))?;
    println!("Started instance {}", instance_id);
    Ok(())
}

async fn stop_instance(client: &Ec2Client, instance_id: &str) -> Result<()> {
    client
        .stop_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to stop instance: {}", e)))?;
    println!("Stopped instance {}", instance_id);
    Ok(())
}

async fn reboot_instance(client: &Ec2Client, instance_id: &str) -> Result<()> {
    client
        .reboot_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to reboot instance: {}", e)))?;
    println!("Rebooted instance {}", instance_id);
    Ok(())
}

async fn terminate_instance(client: &Ec2Client, instance_id: &str) -> Result<()> {
    client
        .terminate_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to terminate instance: {}", e)))?;
    println!("Terminated instance {}", instance_id);
    Ok(())
}

/// One row of `instance list` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRow {
    pub id: String,
    pub state: String,
    pub instance_type: String,
}

/// Convert instances to display rows, keeping only running ones
///
/// The API call already filters server-side, but the state is
/// re-checked here so a stopped instance can never slip into the list.
pub fn running_instance_rows(instances: &[Instance]) -> Vec<InstanceRow> {
    instances
        .iter()
        .filter(|i| {
            i.state()
                .and_then(|s| s.name())
                .map(|n| n.as_str() == "running")
                .unwrap_or(false)
        })
        .map(|i| InstanceRow {
            id: i.instance_id().unwrap_or("unknown").to_string(),
            state: "running".to_string(),
            instance_type: i
                .instance_type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
        .collect()
}

async fn list_running_instances(client: &Ec2Client) -> Result<()> {
    let response = client
        .describe_instances()
        .filters(
            Filter::builder()
                .name("instance-state-name")
                .values("running")
                .build(),
        )
        .send()
        .await
        .map_err(|e| FleetctlError::Aws(format!("Failed to describe instances: {}", e)))?;

    let instances: Vec<Instance> = response
        .reservations()
        .iter()
        .flat_map(|r| r.instances())
        .cloned()
        .collect();

    let rows = running_instance_rows(&instances);
    if rows.is_empty() {
        println!("No running instances.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "State", "Type"]);
    for row in rows {
        table.add_row(vec![row.id, row.state, row.instance_type]);
    }
    println!("{}", table);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{InstanceState, InstanceStateName};

    fn image(id: &str, creation_date: &str) -> Image {
        Image::builder()
            .image_id(id)
            .creation_date(creation_date)
            .build()
    }

    fn instance(id: &str, state: InstanceStateName, instance_type: InstanceType) -> Instance {
        Instance::builder()
            .instance_id(id)
            .state(InstanceState::builder().name(state).build())
            .instance_type(instance_type)
            .build()
    }

    #[test]
    fn test_select_newest_image_picks_max_timestamp() {
        let images = vec![
            image("ami-old", "2023-01-01T00:00:00.000Z"),
            image("ami-new", "2024-06-01T00:00:00.000Z"),
            image("ami-mid", "2023-09-15T12:30:00.000Z"),
        ];

        let newest = select_newest_image(&images).unwrap();
        assert_eq!(newest.image_id(), Some("ami-new"));
    }

    #[test]
    fn test_select_newest_image_two_candidates() {
        // T1 < T2 means the T2 image is chosen
        let images = vec![
            image("ami-t1", "2024-01-01T00:00:00.000Z"),
            image("ami-t2", "2024-01-01T00:00:01.000Z"),
        ];

        let newest = select_newest_image(&images).unwrap();
        assert_eq!(newest.image_id(), Some("ami-t2"));
    }

    #[test]
    fn test_select_newest_image_empty() {
        assert!(select_newest_image(&[]).is_none());
    }

    #[test]
    fn test_select_newest_image_missing_date_loses() {
        let images = vec![
            image("ami-dated", "2020-01-01T00:00:00.000Z"),
            Image::builder().image_id("ami-undated").build(),
        ];

        let newest = select_newest_image(&images).unwrap();
        assert_eq!(newest.image_id(), Some("ami-dated"));
    }

    #[test]
    fn test_running_instance_rows_filters_stopped() {
        let instances = vec![
            instance("i-running1", InstanceStateName::Running, InstanceType::T2Micro),
            instance("i-stopped1", InstanceStateName::Stopped, InstanceType::T2Micro),
            instance("i-pending1", InstanceStateName::Pending, InstanceType::T3Medium),
            instance("i-running2", InstanceStateName::Running, InstanceType::T3Medium),
        ];

        let rows = running_instance_rows(&instances);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "i-running1");
        assert_eq!(rows[0].instance_type, "t2.micro");
        assert_eq!(rows[1].id, "i-running2");
        assert!(rows.iter().all(|r| r.state == "running"));
    }

    #[test]
    fn test_running_instance_rows_no_state() {
        // An instance without state information is not listed
        let instances = vec![Instance::builder().instance_id("i-unknown").build()];
        assert!(running_instance_rows(&instances).is_empty());
    }
}
