//! PrinterTransport middleware for monitoring transport operations
//!
//! Wraps any [`Transport`] and logs every request and reply through
//! `tracing`, so the traffic ends up wherever the subscriber writes
//! (stderr for commands, the log file while the editor owns the screen).
//!
//! ```ignore
//! let transport = PrinterTransport::wrap(Box::new(usb), true);
//! ```

use tracing::{info, warn};

use crate::protocol::cmd;
use crate::{Transport, TransportDeviceInfo, TransportError};

/// Longest hex dump printed per packet
const MAX_DUMP: usize = 32;

/// Transport middleware that logs all requests and responses
pub struct PrinterTransport {
    inner: Box<dyn Transport>,
    show_hex: bool,
}

impl PrinterTransport {
    /// Wrap a transport with logging middleware
    pub fn wrap(inner: Box<dyn Transport>, show_hex: bool) -> Box<dyn Transport> {
        Box::new(Self { inner, show_hex })
    }

    fn hex(&self, data: &[u8]) -> String {
        if !self.show_hex || data.is_empty() {
            return String::new();
        }
        let shown = &data[..data.len().min(MAX_DUMP)];
        let mut out = shown
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        if data.len() > MAX_DUMP {
            out.push_str(" ..");
        }
        format!(" [{out}]")
    }
}

impl Transport for PrinterTransport {
    fn request(
        &self,
        opcode: u8,
        payload: &[u8],
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError> {
        info!(
            ">> {} (0x{:02X}) {} bytes{}",
            cmd::name(opcode),
            opcode,
            payload.len(),
            self.hex(payload)
        );
        match self.inner.request(opcode, payload, response_len) {
            Ok(reply) => {
                if response_len > 0 {
                    info!(
                        "<< {} {} bytes{}",
                        cmd::name(opcode),
                        reply.len(),
                        self.hex(&reply)
                    );
                }
                Ok(reply)
            }
            Err(e) => {
                warn!("<< {} failed: {}", cmd::name(opcode), e);
                Err(e)
            }
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }
}
