//! USB transport over vendor control transfers

use std::time::Duration;

use parking_lot::Mutex;
use rusb::{DeviceHandle, Direction, GlobalContext, Recipient, RequestType};
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{self, cmd, timing, Target, MAX_TRANSFER};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Transport for the USB controller
///
/// A request with a reply becomes a vendor IN transfer, anything else a
/// vendor OUT transfer carrying the payload (possibly empty). The firmware
/// answers vendor requests without the interface being claimed.
pub struct UsbTransport {
    handle: Mutex<DeviceHandle<GlobalContext>>,
    info: TransportDeviceInfo,
    timeout: Duration,
}

impl UsbTransport {
    pub fn new(handle: DeviceHandle<GlobalContext>, info: TransportDeviceInfo) -> Self {
        Self {
            handle: Mutex::new(handle),
            info,
            timeout: Duration::from_millis(timing::REQUEST_TIMEOUT_MS),
        }
    }

    /// Override the request timeout (default 1000ms)
    pub fn set_timeout(&mut self, timeout_ms: u64) {
        self.timeout = Duration::from_millis(timeout_ms);
    }
}

/// `bmRequestType` for a vendor request in `direction`
pub(crate) fn request_type(opcode: u8, direction: Direction) -> u8 {
    let recipient = match protocol::target(opcode) {
        Target::Interface => Recipient::Interface,
        Target::Endpoint => Recipient::Endpoint,
    };
    rusb::request_type(direction, RequestType::Vendor, recipient)
}

impl Transport for UsbTransport {
    fn request(
        &self,
        opcode: u8,
        payload: &[u8],
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError> {
        let len = payload.len().max(response_len);
        if len > MAX_TRANSFER {
            return Err(TransportError::PayloadTooLarge {
                len,
                max: MAX_TRANSFER,
            });
        }
        if !payload.is_empty() && response_len > 0 {
            return Err(TransportError::Bidirectional(opcode));
        }

        let handle = self.handle.lock();
        if response_len == 0 {
            let written = handle.write_control(
                request_type(opcode, Direction::Out),
                opcode,
                0,
                0,
                payload,
                self.timeout,
            )?;
            debug!("Sent {} ({} bytes)", cmd::name(opcode), written);
            if written != payload.len() {
                return Err(TransportError::ShortTransfer {
                    request: cmd::name(opcode),
                    expected: payload.len(),
                    actual: written,
                });
            }
            return Ok(Vec::new());
        }

        // The firmware may answer with fewer bytes than asked for; the rest
        // stays zero, as the callers validate what they decode.
        let mut reply = vec![0u8; response_len];
        let read = handle.read_control(
            request_type(opcode, Direction::In),
            opcode,
            0,
            0,
            &mut reply,
            self.timeout,
        )?;
        if read < response_len {
            debug!(
                "{} returned {}/{} bytes",
                cmd::name(opcode),
                read,
                response_len
            );
        }
        Ok(reply)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_types() {
        // vendor | interface, host to device
        assert_eq!(request_type(cmd::ENABLE_SERVICE_MODE, Direction::Out), 0x41);
        // vendor | interface, device to host
        assert_eq!(request_type(cmd::READ_MATRIX, Direction::In), 0xC1);
        // vendor | endpoint
        assert_eq!(request_type(cmd::READ_LAYOUT, Direction::In), 0xC2);
        assert_eq!(request_type(cmd::WRITE_MACROS, Direction::Out), 0x42);
    }
}
