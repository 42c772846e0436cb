//! Transport abstraction layer for BlUSB keyboard controller communication
//!
//! The controller is driven through a small set of vendor requests. Each
//! request is an opaque exchange: an opcode and an optional payload go out,
//! a fixed number of reply bytes come back. Backends:
//!
//! - USB (vendor control transfers via rusb)
//! - Mock (in-memory controller for offline editing and tests)
//!
//! Any backend can be wrapped in [`PrinterTransport`] to log the traffic.

pub mod error;
pub mod printer;
pub mod protocol;
pub mod types;

mod discovery;
mod mock;
mod usb;

pub use discovery::UsbDiscovery;
pub use error::TransportError;
pub use mock::{MockState, MockTransport};
pub use printer::PrinterTransport;
pub use types::{DiscoveredDevice, TransportDeviceInfo, TransportType};
pub use usb::UsbTransport;

/// The core transport trait - all backends implement this
///
/// Requests are synchronous and block until the reply is complete or the
/// backend's timeout expires. Nothing is retried at this level.
pub trait Transport: Send + Sync {
    /// Send `payload` under `opcode` and collect `response_len` reply bytes
    ///
    /// # Arguments
    /// * `opcode` - Request byte (e.g., `protocol::cmd::READ_LAYOUT`)
    /// * `payload` - Request data, may be empty
    /// * `response_len` - Number of reply bytes expected, 0 for writes
    fn request(
        &self,
        opcode: u8,
        payload: &[u8],
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Send data without expecting a reply
    fn send(&self, opcode: u8, payload: &[u8]) -> Result<(), TransportError> {
        self.request(opcode, payload, 0).map(|_| ())
    }

    /// Read `len` bytes without sending a payload
    fn query(&self, opcode: u8, len: usize) -> Result<Vec<u8>, TransportError> {
        self.request(opcode, &[], len)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn request(
        &self,
        opcode: u8,
        payload: &[u8],
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError> {
        (**self).request(opcode, payload, response_len)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }
}
