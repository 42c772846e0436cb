//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("Communication timeout")]
    Timeout,

    #[error("Short transfer for {request}: {actual} of {expected} bytes")]
    ShortTransfer {
        request: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Request 0x{0:02X} cannot send a payload and read a reply at once")]
    Bidirectional(u8),

    #[error("Unsupported request 0x{0:02X}")]
    Unsupported(u8),

    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    // USB-specific errors
    #[error("USB error: {0}")]
    Usb(String),

    #[error("USB permission denied: {0}, try running with sudo or add a udev rule")]
    PermissionDenied(String),
}

impl From<rusb::Error> for TransportError {
    fn from(e: rusb::Error) -> Self {
        match e {
            rusb::Error::Timeout => TransportError::Timeout,
            rusb::Error::NoDevice => TransportError::Disconnected,
            rusb::Error::NotFound => TransportError::DeviceNotFound(e.to_string()),
            rusb::Error::Access => TransportError::PermissionDenied(e.to_string()),
            other => TransportError::Usb(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usb_error_mapping() {
        assert!(matches!(
            TransportError::from(rusb::Error::Timeout),
            TransportError::Timeout
        ));
        assert!(matches!(
            TransportError::from(rusb::Error::NoDevice),
            TransportError::Disconnected
        ));
        assert!(matches!(
            TransportError::from(rusb::Error::Access),
            TransportError::PermissionDenied(_)
        ));
        assert!(matches!(
            TransportError::from(rusb::Error::Pipe),
            TransportError::Usb(_)
        ));
    }
}
