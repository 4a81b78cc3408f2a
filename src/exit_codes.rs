//! Exit code standardization for fleetctl
//!
//! Provides consistent exit codes for different error types to enable
//! reliable programmatic error detection by scripts and cron jobs.
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid input, validation failure, resource not found)
//! - `2` = System error (AWS API failure, network error)
//! - `3` = Configuration error (missing config, invalid config values)

use crate::error::FleetctlError;

/// Standard exit codes for fleetctl
pub mod codes {
    /// Success
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (AWS API failure, network error)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error (missing config, invalid values)
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a FleetctlError to an appropriate exit code
pub fn exit_code_for_error(error: &FleetctlError) -> i32 {
    use FleetctlError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        Validation { .. } => codes::USER_ERROR,
        ResourceNotFound { .. } => codes::USER_ERROR,

        Aws(_) => codes::SYSTEM_ERROR,
        Ses(_) => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            exit_code_for_error(&FleetctlError::Validation {
                field: "instance_id".to_string(),
                reason: "bad".to_string(),
            }),
            codes::USER_ERROR
        );
        assert_eq!(
            exit_code_for_error(&FleetctlError::Aws("throttled".to_string())),
            codes::SYSTEM_ERROR
        );
        assert_eq!(
            exit_code_for_error(&FleetctlError::Config(ConfigError::MissingField(
                "aws".to_string()
            ))),
            codes::CONFIG_ERROR
        );
    }
}
