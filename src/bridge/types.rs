//! Device-tree shapes expected from the bridge. Rendered as-is by the panel.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub name: String,
    pub group: String,
    pub connected: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Text,
    Number,
    Switch,
    Light,
    Blob,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum PropertyState {
    Idle,
    Ok,
    Busy,
    Alert,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPerm {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyElement {
    pub name: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperty {
    pub device: String,
    pub name: String,
    pub label: String,
    pub group: String,
    pub kind: PropertyKind,
    pub state: PropertyState,
    pub perm: PropertyPerm,
    pub elements: Vec<PropertyElement>,
}

impl DeviceProperty {
    pub fn element(&self, name: &str) -> Option<&PropertyElement> {
        self.elements.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_json_shape_round_trips() {
        let prop = DeviceProperty {
            device: "CCD Simulator".to_string(),
            name: "CCD_TEMPERATURE".to_string(),
            label: "Temperature".to_string(),
            group: "Main Control".to_string(),
            kind: PropertyKind::Number,
            state: PropertyState::Ok,
            perm: PropertyPerm::ReadWrite,
            elements: vec![PropertyElement {
                name: "CCD_TEMPERATURE_VALUE".to_string(),
                label: "Temperature (C)".to_string(),
                value: "-10.0".to_string(),
            }],
        };
        let json = serde_json::to_string(&prop).unwrap();
        assert!(json.contains("\"kind\":\"number\""));
        let parsed: DeviceProperty = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, prop);
        assert_eq!(
            parsed.element("CCD_TEMPERATURE_VALUE").unwrap().value,
            "-10.0"
        );
    }
}
