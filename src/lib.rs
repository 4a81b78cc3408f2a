//! fleetctl library
//!
//! Core functionality for the fleetctl CLI: EC2 instance lifecycle,
//! resource reclamation, and SES notifications. The binary in
//! `src/main.rs` is a thin clap dispatcher over these modules.

pub mod config;
pub mod ec2_utils;
pub mod error;
pub mod exit_codes;
pub mod instance;
pub mod keypair;
pub mod notify;
pub mod reclaim;
pub mod validation;

pub use config::Config;
pub use error::{FleetctlError, Result};
