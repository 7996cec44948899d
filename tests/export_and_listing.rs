//! Artifact round-trip laws and listing-sort behavior through the public API.

use chrono::{Local, TimeZone};
use obsdeck::export::{
    export_profile, import_profile, read_profile_file, write_profile_file, EquipmentProfile,
    ProfileSession,
};
use obsdeck::files::{sort_entries, FileEntry, SortKey, SortOrder};
use obsdeck::session::{SerialParity, SerialSessionConfig};

fn sample_profile() -> EquipmentProfile {
    EquipmentProfile {
        name: "dual refractor rig".to_string(),
        sessions: vec![
            ProfileSession {
                id: "ttyUSB0".to_string(),
                config: SerialSessionConfig {
                    baud: 115200,
                    ..Default::default()
                },
            },
            ProfileSession {
                id: "ttyUSB1".to_string(),
                config: SerialSessionConfig {
                    baud: 9600,
                    parity: SerialParity::Even,
                    ..Default::default()
                },
            },
        ],
        cooler_setpoint_c: -20.0,
        filters: vec!["L".into(), "R".into(), "G".into(), "B".into()],
    }
}

#[test]
fn profile_export_import_export_is_identical() {
    let profile = sample_profile();
    let first = export_profile(&profile).unwrap();
    let reimported = import_profile(&first).unwrap();
    let second = export_profile(&reimported).unwrap();
    assert_eq!(first, second);
    assert_eq!(reimported, profile);
}

#[test]
fn profile_survives_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rig.json");
    let profile = sample_profile();
    write_profile_file(&profile, &path).unwrap();
    assert_eq!(read_profile_file(&path).unwrap(), profile);
}

fn listing() -> Vec<FileEntry> {
    let at = |day| Local.with_ymd_and_hms(2026, 7, day, 22, 0, 0).unwrap();
    vec![
        FileEntry {
            name: "lights".into(),
            path: "/obs/lights".into(),
            is_dir: true,
            size: 0,
            modified: at(4),
        },
        FileEntry {
            name: "ngc7000_300s.fits".into(),
            path: "/obs/ngc7000_300s.fits".into(),
            is_dir: false,
            size: 52_000_000,
            modified: at(2),
        },
        FileEntry {
            name: "session.log".into(),
            path: "/obs/session.log".into(),
            is_dir: false,
            size: 18_000,
            modified: at(5),
        },
    ]
}

#[test]
fn repeated_sorting_is_stable_for_all_keys() {
    for key in [SortKey::Name, SortKey::Size, SortKey::Modified] {
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let mut a = listing();
            sort_entries(&mut a, key, order);
            let mut b = a.clone();
            sort_entries(&mut b, key, order);
            assert_eq!(a, b);
        }
    }
}

#[test]
fn directories_always_lead_the_listing() {
    for order in [SortOrder::Ascending, SortOrder::Descending] {
        let mut entries = listing();
        sort_entries(&mut entries, SortKey::Size, order);
        assert!(entries[0].is_dir);
    }
}
