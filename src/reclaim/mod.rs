//! Resource reclamation commands
//!
//! Bulk deletion of unused AMIs, old snapshots, and unattached volumes.
//! These operations are destructive and irreversible; there is no
//! confirmation step, by design, so they can run unattended from cron.

mod images;
mod snapshots;
mod volumes;

pub use images::{images_to_reclaim, reclaim_images};
pub use snapshots::{reclaim_snapshots, snapshots_to_delete};
pub use volumes::{reclaim_volumes, volumes_to_delete};

use crate::config::Config;
use crate::error::Result;
use clap::Subcommand;

#[derive(Subcommand, Clone)]
pub enum ReclaimCommands {
    /// Deregister unused AMIs across all regions
    ///
    /// Scans every region the account has access to. An AMI is
    /// deregistered when it is self-owned, not referenced by any
    /// instance in that region (regardless of instance state), and
    /// older than the retention window.
    ///
    /// DESTRUCTIVE: deregistration is irreversible and there is no
    /// confirmation prompt.
    Images {
        /// Retention window in days (default: from config; 0 keeps
        /// nothing unused)
        #[arg(long, value_name = "DAYS")]
        keep_days: Option<i64>,
    },
    /// Delete snapshots older than the retention window
    ///
    /// Deletes self-owned snapshots in the configured region whose
    /// start time is older than now minus KEEP_DAYS. Younger snapshots
    /// are retained.
    ///
    /// DESTRUCTIVE: deleted snapshots cannot be recovered. Use
    /// --keep-days 0 to delete everything.
    Snapshots {
        /// Retention window in days (required)
        #[arg(long, value_name = "DAYS")]
        keep_days: i64,

        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
    /// Delete unattached volumes
    ///
    /// Deletes volumes in the "available" state (not attached to any
    /// instance) in the configured region. In-use volumes are never
    /// touched.
    ///
    /// DESTRUCTIVE: deleted volumes cannot be recovered.
    Volumes {
        /// AWS region (default: from config)
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },
}

pub async fn handle_command(cmd: ReclaimCommands, config: &Config) -> Result<()> {
    match cmd {
        ReclaimCommands::Images { keep_days } => {
            let keep_days = keep_days.unwrap_or(config.retention.image_keep_days);
            reclaim_images(keep_days, config).await
        }
        ReclaimCommands::Snapshots { keep_days, region } => {
            let region = region.unwrap_or_else(|| config.aws.region.clone());
            crate::validation::validate_region(&region)?;
            reclaim_snapshots(keep_days, &region).await
        }
        ReclaimCommands::Volumes { region } => {
            let region = region.unwrap_or_else(|| config.aws.region.clone());
            crate::validation::validate_region(&region)?;
            reclaim_volumes(&region).await
        }
    }
}
