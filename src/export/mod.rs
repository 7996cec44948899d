//! Artifact export/import.
//!
//! Everything here is produced locally with no server round-trip: plain-text
//! and CSV renderings of a session's message log, and JSON equipment profiles
//! that survive an export/import/export cycle field-identically.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::{
    core::status::SessionView,
    session::{MessageDirection, SerialSessionConfig},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Render a session's log as plain text, one record per line:
/// timestamp, direction arrow, hex payload, ASCII gloss.
pub fn export_log_text(session: &SessionView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# {} rx {} tx {}\n",
        session.display_name, session.rx_count, session.tx_count
    ));
    for record in &session.records {
        let arrow = match record.direction {
            MessageDirection::Rx => "<-",
            MessageDirection::Tx => "->",
        };
        out.push_str(&format!(
            "{} {} {} |{}|\n",
            record.when.format(TIMESTAMP_FORMAT),
            arrow,
            record.payload_hex(),
            record.payload_ascii()
        ));
    }
    out
}

/// Render a session's log as CSV with a header row.
pub fn export_log_csv(session: &SessionView) -> String {
    let mut out = String::from("timestamp,direction,payload_hex\n");
    for record in &session.records {
        let direction = match record.direction {
            MessageDirection::Rx => "rx",
            MessageDirection::Tx => "tx",
        };
        out.push_str(&format!(
            "{},{},{}\n",
            record.when.format(TIMESTAMP_FORMAT),
            direction,
            record.payload_hex().replace(' ', "")
        ));
    }
    out
}

pub fn write_log_file(session: &SessionView, path: &Path) -> Result<()> {
    fs::write(path, export_log_text(session))
        .with_context(|| format!("Failed to write log to {path:?}"))
}

/// An exportable equipment profile: session line configs plus the simulator
/// settings a user tunes (cooler setpoint, installed filters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentProfile {
    pub name: String,
    pub sessions: Vec<ProfileSession>,
    pub cooler_setpoint_c: f64,
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSession {
    pub id: String,
    pub config: SerialSessionConfig,
}

/// Serialize a profile as pretty JSON.
pub fn export_profile(profile: &EquipmentProfile) -> Result<String> {
    serde_json::to_string_pretty(profile).context("Failed to serialize equipment profile")
}

/// Parse a previously exported profile document.
pub fn import_profile(json: &str) -> Result<EquipmentProfile> {
    serde_json::from_str(json).context("Failed to parse equipment profile")
}

pub fn write_profile_file(profile: &EquipmentProfile, path: &Path) -> Result<()> {
    fs::write(path, export_profile(profile)?)
        .with_context(|| format!("Failed to write profile to {path:?}"))
}

pub fn read_profile_file(path: &Path) -> Result<EquipmentProfile> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read profile from {path:?}"))?;
    import_profile(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MessageRecord, SerialParity};

    fn view_with_records() -> SessionView {
        SessionView {
            id: "ttyUSB0".to_string(),
            display_name: "ttyUSB0 (Usb)".to_string(),
            connected: true,
            config: SerialSessionConfig::default(),
            records: vec![
                MessageRecord::tx(b"AT".to_vec()),
                MessageRecord::rx(b"OK".to_vec()),
            ],
            rx_count: 1,
            tx_count: 1,
        }
    }

    #[test]
    fn text_export_has_one_line_per_record() {
        let text = export_log_text(&view_with_records());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("-> 41 54 |AT|"));
        assert!(lines[2].contains("<- 4f 4b |OK|"));
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let csv = export_log_csv(&view_with_records());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,direction,payload_hex");
        assert!(lines[1].ends_with(",tx,4154"));
        assert!(lines[2].ends_with(",rx,4f4b"));
    }

    #[test]
    fn profile_round_trips_field_identical() {
        let profile = EquipmentProfile {
            name: "backyard rig".to_string(),
            sessions: vec![ProfileSession {
                id: "ttyUSB0".to_string(),
                config: SerialSessionConfig {
                    baud: 115200,
                    parity: SerialParity::Odd,
                    ..Default::default()
                },
            }],
            cooler_setpoint_c: -15.0,
            filters: vec!["L".to_string(), "Ha".to_string()],
        };

        let exported = export_profile(&profile).unwrap();
        let imported = import_profile(&exported).unwrap();
        let exported_again = export_profile(&imported).unwrap();

        assert_eq!(imported, profile);
        assert_eq!(exported, exported_again);
    }

    #[test]
    fn profile_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let profile = EquipmentProfile {
            name: "obs".to_string(),
            sessions: Vec::new(),
            cooler_setpoint_c: -10.0,
            filters: Vec::new(),
        };
        write_profile_file(&profile, &path).unwrap();
        assert_eq!(read_profile_file(&path).unwrap(), profile);
    }
}
