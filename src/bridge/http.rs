//! JSON-over-HTTP implementation of the device bridge client.

use anyhow::{Context, Result};
use serde::Serialize;
use url::Url;

use crate::bridge::{DeviceBridge, DeviceProperty, DeviceSummary};

pub struct HttpDeviceBridge {
    base: Url,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct SetPropertyRequest<'a> {
    property: &'a str,
    element: &'a str,
    value: &'a str,
}

impl HttpDeviceBridge {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Invalid bridge endpoint path: {path}"))
    }
}

impl DeviceBridge for HttpDeviceBridge {
    fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let url = self.endpoint("devices")?;
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .with_context(|| format!("Bridge request failed: GET {url}"))?;
        response
            .body_mut()
            .read_json()
            .context("Bridge returned malformed device list")
    }

    fn connect_device(&mut self, device: &str) -> Result<()> {
        let url = self.endpoint(&format!("devices/{device}/connect"))?;
        self.agent
            .post(url.as_str())
            .send_empty()
            .with_context(|| format!("Bridge rejected connect for {device}"))?;
        Ok(())
    }

    fn disconnect_device(&mut self, device: &str) -> Result<()> {
        let url = self.endpoint(&format!("devices/{device}/disconnect"))?;
        self.agent
            .post(url.as_str())
            .send_empty()
            .with_context(|| format!("Bridge rejected disconnect for {device}"))?;
        Ok(())
    }

    fn get_properties(&self, device: &str) -> Result<Vec<DeviceProperty>> {
        let url = self.endpoint(&format!("devices/{device}/properties"))?;
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .with_context(|| format!("Bridge request failed: GET {url}"))?;
        response
            .body_mut()
            .read_json()
            .with_context(|| format!("Bridge returned malformed properties for {device}"))
    }

    fn set_property(
        &mut self,
        device: &str,
        property: &str,
        element: &str,
        value: &str,
    ) -> Result<()> {
        let url = self.endpoint(&format!("devices/{device}/properties"))?;
        self.agent
            .post(url.as_str())
            .send_json(SetPropertyRequest {
                property,
                element,
                value,
            })
            .with_context(|| format!("Bridge rejected {device}.{property}.{element}"))?;
        Ok(())
    }
}
