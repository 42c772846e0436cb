//! Device discovery for BlUSB controllers

use tracing::{debug, info};

use crate::error::TransportError;
use crate::protocol::device;
use crate::types::{DiscoveredDevice, TransportDeviceInfo, TransportType};
use crate::usb::UsbTransport;

/// USB device discovery
pub struct UsbDiscovery {
    /// VID/PID pairs to look for
    known_devices: Vec<(u16, u16)>,
    timeout_ms: Option<u64>,
}

impl Default for UsbDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl UsbDiscovery {
    /// Look for the stock controller identity
    pub fn new() -> Self {
        Self::with_ids(device::VENDOR_ID, device::PRODUCT_ID)
    }

    /// Look for a controller flashed with a different VID/PID
    pub fn with_ids(vid: u16, pid: u16) -> Self {
        Self {
            known_devices: vec![(vid, pid)],
            timeout_ms: None,
        }
    }

    /// Request timeout applied to opened transports
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// List currently available controllers
    pub fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let mut devices = Vec::new();

        for usb in rusb::devices()?.iter() {
            let desc = match usb.device_descriptor() {
                Ok(d) => d,
                Err(e) => {
                    debug!(
                        "Skipping bus {:03} device {:03}: {}",
                        usb.bus_number(),
                        usb.address(),
                        e
                    );
                    continue;
                }
            };
            let ids = (desc.vendor_id(), desc.product_id());
            if !self.known_devices.contains(&ids) {
                continue;
            }

            let device_path = format!("bus {:03} device {:03}", usb.bus_number(), usb.address());
            debug!("Found {:04x}:{:04x} at {}", ids.0, ids.1, device_path);

            // String descriptors need an open handle; without access they stay unknown
            let (product_name, serial) = match usb.open() {
                Ok(handle) => (
                    handle.read_product_string_ascii(&desc).ok(),
                    handle.read_serial_number_string_ascii(&desc).ok(),
                ),
                Err(e) => {
                    debug!("No string descriptors for {}: {}", device_path, e);
                    (None, None)
                }
            };

            devices.push(DiscoveredDevice {
                info: TransportDeviceInfo {
                    vid: ids.0,
                    pid: ids.1,
                    transport_type: TransportType::Usb,
                    device_path,
                    serial,
                    product_name,
                },
                device: usb,
            });
        }

        Ok(devices)
    }

    /// Open a specific controller
    pub fn open_device(&self, device: &DiscoveredDevice) -> Result<UsbTransport, TransportError> {
        let handle = device.device.open()?;
        info!("Opened {}", device.info.display_name());

        let mut transport = UsbTransport::new(handle, device.info.clone());
        if let Some(timeout) = self.timeout_ms {
            transport.set_timeout(timeout);
        }
        Ok(transport)
    }

    /// Open the first controller found
    pub fn open_first(&self) -> Result<UsbTransport, TransportError> {
        let devices = self.list_devices()?;
        let first = devices.first().ok_or_else(|| {
            TransportError::DeviceNotFound("No BlUSB controller connected".into())
        })?;
        self.open_device(first)
    }
}
