//! CLI surface tests
//!
//! Verifies that missing required arguments fail at parse time, before
//! any AWS client is constructed or API call issued.

use clap::error::ErrorKind;
use clap::Parser;

use fleetctl::instance::InstanceCommands;
use fleetctl::reclaim::ReclaimCommands;

#[derive(Parser)]
struct InstanceHarness {
    #[command(subcommand)]
    cmd: InstanceCommands,
}

#[derive(Parser)]
struct ReclaimHarness {
    #[command(subcommand)]
    cmd: ReclaimCommands,
}

#[test]
fn create_without_key_name_is_a_usage_error() {
    let err = InstanceHarness::try_parse_from(["fleetctl", "create"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    // clap usage errors exit non-zero
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn create_with_key_name_parses() {
    let parsed = InstanceHarness::try_parse_from(["fleetctl", "create", "my-key"]);
    assert!(parsed.is_ok());
}

#[test]
fn lifecycle_actions_require_instance_id() {
    for action in ["start", "stop", "reboot", "terminate"] {
        let err = InstanceHarness::try_parse_from(["fleetctl", action]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::MissingRequiredArgument,
            "action {} should require an instance id",
            action
        );
    }
}

#[test]
fn unknown_action_is_rejected() {
    let err = InstanceHarness::try_parse_from(["fleetctl", "hibernate"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn snapshot_reclaim_requires_keep_days() {
    let err = ReclaimHarness::try_parse_from(["fleetctl", "snapshots"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn snapshot_reclaim_accepts_keep_days() {
    let parsed = ReclaimHarness::try_parse_from(["fleetctl", "snapshots", "--keep-days", "30"]);
    assert!(parsed.is_ok());
}

#[test]
fn image_reclaim_keep_days_is_optional() {
    assert!(ReclaimHarness::try_parse_from(["fleetctl", "images"]).is_ok());
    assert!(ReclaimHarness::try_parse_from(["fleetctl", "images", "--keep-days", "7"]).is_ok());
}

#[test]
fn volume_reclaim_takes_optional_region() {
    assert!(ReclaimHarness::try_parse_from(["fleetctl", "volumes"]).is_ok());
    assert!(
        ReclaimHarness::try_parse_from(["fleetctl", "volumes", "--region", "eu-west-1"]).is_ok()
    );
}
