//! In-memory device bridge backing mock mode.

use anyhow::{anyhow, bail, Result};

use crate::bridge::{
    DeviceBridge, DeviceProperty, DeviceSummary, PropertyElement, PropertyKind, PropertyPerm,
    PropertyState,
};

pub struct MockDeviceBridge {
    devices: Vec<DeviceSummary>,
    properties: Vec<DeviceProperty>,
}

impl Default for MockDeviceBridge {
    fn default() -> Self {
        let devices = vec![
            DeviceSummary {
                name: "CCD Simulator".to_string(),
                group: "Cameras".to_string(),
                connected: false,
            },
            DeviceSummary {
                name: "Telescope Simulator".to_string(),
                group: "Mounts".to_string(),
                connected: false,
            },
            DeviceSummary {
                name: "Filter Wheel Simulator".to_string(),
                group: "Accessories".to_string(),
                connected: false,
            },
        ];

        let properties = vec![
            DeviceProperty {
                device: "CCD Simulator".to_string(),
                name: "CCD_TEMPERATURE".to_string(),
                label: "Temperature".to_string(),
                group: "Main Control".to_string(),
                kind: PropertyKind::Number,
                state: PropertyState::Idle,
                perm: PropertyPerm::ReadWrite,
                elements: vec![PropertyElement {
                    name: "CCD_TEMPERATURE_VALUE".to_string(),
                    label: "Temperature (C)".to_string(),
                    value: "18.0".to_string(),
                }],
            },
            DeviceProperty {
                device: "Telescope Simulator".to_string(),
                name: "EQUATORIAL_EOD_COORD".to_string(),
                label: "Eq. Coordinates".to_string(),
                group: "Main Control".to_string(),
                kind: PropertyKind::Number,
                state: PropertyState::Idle,
                perm: PropertyPerm::ReadWrite,
                elements: vec![
                    PropertyElement {
                        name: "RA".to_string(),
                        label: "RA (hh)".to_string(),
                        value: "0.0".to_string(),
                    },
                    PropertyElement {
                        name: "DEC".to_string(),
                        label: "Dec (dd)".to_string(),
                        value: "90.0".to_string(),
                    },
                ],
            },
            DeviceProperty {
                device: "Filter Wheel Simulator".to_string(),
                name: "FILTER_SLOT".to_string(),
                label: "Filter Slot".to_string(),
                group: "Main Control".to_string(),
                kind: PropertyKind::Number,
                state: PropertyState::Idle,
                perm: PropertyPerm::ReadWrite,
                elements: vec![PropertyElement {
                    name: "FILTER_SLOT_VALUE".to_string(),
                    label: "Slot".to_string(),
                    value: "0".to_string(),
                }],
            },
        ];

        Self {
            devices,
            properties,
        }
    }
}

impl MockDeviceBridge {
    fn device_mut(&mut self, device: &str) -> Result<&mut DeviceSummary> {
        self.devices
            .iter_mut()
            .find(|d| d.name == device)
            .ok_or_else(|| anyhow!("Unknown device: {device}"))
    }
}

impl DeviceBridge for MockDeviceBridge {
    fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        Ok(self.devices.clone())
    }

    fn connect_device(&mut self, device: &str) -> Result<()> {
        let entry = self.device_mut(device)?;
        if entry.connected {
            bail!("Device {device} is already connected");
        }
        entry.connected = true;
        Ok(())
    }

    fn disconnect_device(&mut self, device: &str) -> Result<()> {
        let entry = self.device_mut(device)?;
        if !entry.connected {
            bail!("Device {device} is not connected");
        }
        entry.connected = false;
        Ok(())
    }

    fn get_properties(&self, device: &str) -> Result<Vec<DeviceProperty>> {
        if !self.devices.iter().any(|d| d.name == device) {
            bail!("Unknown device: {device}");
        }
        Ok(self
            .properties
            .iter()
            .filter(|p| p.device == device)
            .cloned()
            .collect())
    }

    fn set_property(
        &mut self,
        device: &str,
        property: &str,
        element: &str,
        value: &str,
    ) -> Result<()> {
        let prop = self
            .properties
            .iter_mut()
            .find(|p| p.device == device && p.name == property)
            .ok_or_else(|| anyhow!("Unknown property: {device}.{property}"))?;
        if prop.perm == PropertyPerm::ReadOnly {
            bail!("Property {device}.{property} is read-only");
        }
        let el = prop
            .elements
            .iter_mut()
            .find(|e| e.name == element)
            .ok_or_else(|| anyhow!("Unknown element: {device}.{property}.{element}"))?;
        el.value = value.to_string();
        prop.state = PropertyState::Ok;
        Ok(())
    }
}
