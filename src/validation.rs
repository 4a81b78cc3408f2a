//! Input validation utilities
//!
//! Validates user inputs before any API call is issued, so a malformed
//! identifier fails as a usage error instead of an AWS round trip.

use crate::error::{FleetctlError, Result};

/// Validate EC2 instance ID format
///
/// Instance IDs must start with "i-" followed by hexadecimal characters.
pub fn validate_instance_id(instance_id: &str) -> Result<()> {
    if !instance_id.starts_with("i-") {
        return Err(FleetctlError::Validation {
            field: "instance_id".to_string(),
            reason: format!("Instance ID must start with 'i-', got: {}", instance_id),
        });
    }

    if instance_id.len() < 10 || instance_id.len() > 19 {
        return Err(FleetctlError::Validation {
            field: "instance_id".to_string(),
            reason: format!(
                "Instance ID must be 10-19 characters, got: {} (len: {})",
                instance_id,
                instance_id.len()
            ),
        });
    }

    let id_part = &instance_id[2..];
    if !id_part.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FleetctlError::Validation {
            field: "instance_id".to_string(),
            reason: format!(
                "Instance ID must contain only alphanumeric characters after 'i-', got: {}",
                instance_id
            ),
        });
    }

    Ok(())
}

/// Validate AWS region name format (e.g., us-west-2)
///
/// Basic shape check only; the API rejects regions that don't exist.
pub fn validate_region(region: &str) -> Result<()> {
    if region.is_empty() {
        return Err(FleetctlError::Validation {
            field: "region".to_string(),
            reason: "Region cannot be empty".to_string(),
        });
    }

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(FleetctlError::Validation {
            field: "region".to_string(),
            reason: format!(
                "Region must contain only lowercase letters, digits, and hyphens, got: {}",
                region
            ),
        });
    }

    if region.matches('-').count() < 2 {
        return Err(FleetctlError::Validation {
            field: "region".to_string(),
            reason: format!("Region must look like 'us-west-2', got: {}", region),
        });
    }

    Ok(())
}

/// Validate EC2 key pair name
///
/// Key names become filenames under the key directory, so path
/// separators and traversal sequences are rejected.
pub fn validate_key_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FleetctlError::Validation {
            field: "key_name".to_string(),
            reason: "Key name cannot be empty".to_string(),
        });
    }

    if name.len() > 255 {
        return Err(FleetctlError::Validation {
            field: "key_name".to_string(),
            reason: format!("Key name must be <= 255 characters (len: {})", name.len()),
        });
    }

    if name.contains('/') || name.contains('\\') || name.contains("..") || name.contains('\0') {
        return Err(FleetctlError::Validation {
            field: "key_name".to_string(),
            reason: format!("Key name cannot contain path separators, got: {}", name),
        });
    }

    Ok(())
}
