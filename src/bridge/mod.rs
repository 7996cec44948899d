//! Client for the external device-control bridge.
//!
//! The bridge itself (an INDI-like device service) is an external
//! collaborator; this module only defines the device-tree shapes the panel
//! expects and a request/response client for them. A mock implementation
//! backs mock mode so the dashboards render without a bridge attached.

pub mod http;
pub mod mock;
pub mod types;

pub use http::HttpDeviceBridge;
pub use mock::MockDeviceBridge;
pub use types::{
    DeviceProperty, DeviceSummary, PropertyElement, PropertyKind, PropertyPerm, PropertyState,
};

use anyhow::Result;

/// Request/response surface of the device bridge.
pub trait DeviceBridge {
    fn list_devices(&self) -> Result<Vec<DeviceSummary>>;

    fn connect_device(&mut self, device: &str) -> Result<()>;

    fn disconnect_device(&mut self, device: &str) -> Result<()>;

    fn get_properties(&self, device: &str) -> Result<Vec<DeviceProperty>>;

    fn set_property(
        &mut self,
        device: &str,
        property: &str,
        element: &str,
        value: &str,
    ) -> Result<()>;
}
