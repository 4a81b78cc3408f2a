//! Selection and filter behavior for the housekeeping commands
//!
//! Exercises the pure decision logic with builder-constructed SDK types,
//! so no AWS credentials are needed.

use std::collections::HashSet;

use aws_sdk_ec2::primitives::DateTime as AwsDateTime;
use aws_sdk_ec2::types::{
    Image, Instance, InstanceState, InstanceStateName, InstanceType, Snapshot, Volume, VolumeState,
};
use chrono::{Duration, Utc};

use fleetctl::instance::{running_instance_rows, select_newest_image};
use fleetctl::reclaim::{images_to_reclaim, snapshots_to_delete, volumes_to_delete};

fn image(id: &str, creation_date: &str) -> Image {
    Image::builder()
        .image_id(id)
        .creation_date(creation_date)
        .build()
}

#[test]
fn create_selects_image_with_max_creation_timestamp() {
    let images = vec![
        image("ami-a", "2024-02-01T00:00:00.000Z"),
        image("ami-b", "2024-03-01T00:00:00.000Z"),
        image("ami-c", "2024-01-01T00:00:00.000Z"),
    ];

    assert_eq!(
        select_newest_image(&images).and_then(|i| i.image_id()),
        Some("ami-b")
    );
}

#[test]
fn list_includes_only_running_instances() {
    let make = |id: &str, state: InstanceStateName| {
        Instance::builder()
            .instance_id(id)
            .state(InstanceState::builder().name(state).build())
            .instance_type(InstanceType::T2Micro)
            .build()
    };

    let instances = vec![
        make("i-run", InstanceStateName::Running),
        make("i-stop", InstanceStateName::Stopped),
        make("i-term", InstanceStateName::Terminated),
        make("i-stopping", InstanceStateName::Stopping),
    ];

    let rows = running_instance_rows(&instances);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "i-run");
}

#[test]
fn image_reclaimer_never_touches_referenced_images() {
    // Ancient but referenced by an instance: must survive any window
    let images = vec![
        image("ami-referenced", "2010-01-01T00:00:00.000Z"),
        image("ami-orphan", "2010-01-01T00:00:00.000Z"),
    ];
    let referenced: HashSet<String> = ["ami-referenced".to_string()].into_iter().collect();

    let out = images_to_reclaim(&images, &referenced, Utc::now());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].image_id(), Some("ami-orphan"));
}

#[test]
fn image_reclaimer_respects_retention_window() {
    let recent = (Utc::now() - Duration::days(5)).to_rfc3339();
    let stale = (Utc::now() - Duration::days(90)).to_rfc3339();
    let images = vec![image("ami-recent", &recent), image("ami-stale", &stale)];

    let cutoff = Utc::now() - Duration::days(30);
    let out = images_to_reclaim(&images, &HashSet::new(), cutoff);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].image_id(), Some("ami-stale"));
}

#[test]
fn snapshot_retention_keeps_young_deletes_old() {
    let snap = |id: &str, days_ago: i64| {
        Snapshot::builder()
            .snapshot_id(id)
            .start_time(AwsDateTime::from_secs(
                (Utc::now() - Duration::days(days_ago)).timestamp(),
            ))
            .build()
    };

    // Scenario from the retention contract: yesterday vs 40 days ago, N=30
    let snapshots = vec![snap("snap-yesterday", 1), snap("snap-40d", 40)];
    let cutoff = Utc::now() - Duration::days(30);

    let ids: Vec<_> = snapshots_to_delete(&snapshots, cutoff)
        .iter()
        .filter_map(|s| s.snapshot_id())
        .collect();
    assert_eq!(ids, vec!["snap-40d"]);
}

#[test]
fn volume_reclaimer_only_selects_available() {
    let vol = |id: &str, state: VolumeState| Volume::builder().volume_id(id).state(state).build();

    let volumes = vec![
        vol("vol-a", VolumeState::Available),
        vol("vol-b", VolumeState::InUse),
        vol("vol-c", VolumeState::Error),
    ];

    let ids: Vec<_> = volumes_to_delete(&volumes)
        .iter()
        .filter_map(|v| v.volume_id())
        .collect();
    assert_eq!(ids, vec!["vol-a"]);
}
