//! Common types for transport layer

/// Transport type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportType {
    /// USB vendor control transfers
    Usb,
    /// In-memory controller, no hardware attached
    Mock,
}

/// Device identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Transport type
    pub transport_type: TransportType,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Human readable name, falling back to the VID:PID pair
    pub fn display_name(&self) -> String {
        match &self.product_name {
            Some(name) => name.clone(),
            None => format!("{:04x}:{:04x}", self.vid, self.pid),
        }
    }
}

/// A controller found during discovery but not opened yet
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    pub info: TransportDeviceInfo,
    pub(crate) device: rusb::Device<rusb::GlobalContext>,
}
