//! In-memory controller
//!
//! Answers every vendor request from a plain state struct, so the editor
//! can run without hardware and tests can inspect what was written.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::protocol::{cmd, device, sizes};
use crate::types::{TransportDeviceInfo, TransportType};
use crate::Transport;

/// Controller state behind a [`MockTransport`]
#[derive(Debug, Clone)]
pub struct MockState {
    /// Raw layout buffer as the firmware stores it
    pub layout: Vec<u8>,
    pub macros: Vec<u8>,
    pub pwm: [u8; 2],
    pub debounce: u8,
    pub version: (u8, u8),
    pub service_mode: bool,
    /// Matrix reports handed out one per READ_MATRIX while in service mode
    pub scan_queue: VecDeque<[u8; sizes::SHORT_REPLY]>,
    /// Every request seen, in order
    pub requests: Vec<(u8, Vec<u8>)>,
    /// When set, every request fails with `Disconnected`
    pub disconnected: bool,
}

impl Default for MockState {
    fn default() -> Self {
        // one empty layer
        let mut layout = vec![0u8; sizes::LAYOUT_BUFFER];
        layout[0] = 1;

        // macro 1 types "Hello" with left shift held
        let mut macros = vec![0u8; sizes::MACRO_BUFFER];
        macros[..8].copy_from_slice(&[0x02, 0x00, 0x0B, 0x08, 0x0F, 0x0F, 0x12, 0x00]);

        Self {
            layout,
            macros,
            pwm: [0x7F, 0x3F],
            debounce: 5,
            version: (1, 5),
            service_mode: false,
            scan_queue: VecDeque::new(),
            requests: Vec::new(),
            disconnected: false,
        }
    }
}

impl MockState {
    /// Queue a key press at a matrix position
    pub fn push_key(&mut self, row: u8, col: u8) {
        let mut report = [0u8; sizes::SHORT_REPLY];
        report[0] = row;
        report[1] = col;
        report[7] = 1;
        self.scan_queue.push_back(report);
    }

    /// Opcodes of all requests seen so far
    pub fn opcodes(&self) -> Vec<u8> {
        self.requests.iter().map(|(op, _)| *op).collect()
    }

    fn answer(&mut self, opcode: u8, payload: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut short = vec![0u8; sizes::SHORT_REPLY];
        match opcode {
            cmd::ENABLE_SERVICE_MODE => {
                self.service_mode = true;
                Ok(Vec::new())
            }
            cmd::DISABLE_SERVICE_MODE => {
                self.service_mode = false;
                Ok(Vec::new())
            }
            cmd::READ_MATRIX => {
                if self.service_mode {
                    if let Some(report) = self.scan_queue.pop_front() {
                        return Ok(report.to_vec());
                    }
                }
                Ok(short)
            }
            cmd::READ_LAYOUT => Ok(self.layout.clone()),
            cmd::WRITE_LAYOUT => {
                // one count byte in, the stored image keeps two
                let Some((&count, cells)) = payload.split_first() else {
                    return Ok(Vec::new());
                };
                let mut layout = vec![count, 0];
                layout.extend_from_slice(cells);
                layout.resize(sizes::LAYOUT_BUFFER, 0);
                self.layout = layout;
                Ok(Vec::new())
            }
            cmd::READ_VERSION => {
                short[0] = self.version.0;
                short[1] = self.version.1;
                Ok(short)
            }
            cmd::READ_PWM => {
                short[..2].copy_from_slice(&self.pwm);
                Ok(short)
            }
            cmd::WRITE_PWM => {
                if payload.len() >= 2 {
                    self.pwm = [payload[0], payload[1]];
                }
                Ok(Vec::new())
            }
            cmd::READ_DEBOUNCE => {
                short[0] = self.debounce;
                Ok(short)
            }
            cmd::WRITE_DEBOUNCE => {
                if let Some(&value) = payload.first() {
                    self.debounce = value;
                }
                Ok(Vec::new())
            }
            cmd::READ_MACROS => Ok(self.macros.clone()),
            cmd::WRITE_MACROS => {
                let mut macros = payload.to_vec();
                macros.resize(sizes::MACRO_BUFFER, 0);
                self.macros = macros;
                Ok(Vec::new())
            }
            other => Err(TransportError::Unsupported(other)),
        }
    }
}

/// Transport backed by a shared [`MockState`]
///
/// Clones share the same state, so a test can keep one handle while the
/// keyboard owns another.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    info: TransportDeviceInfo,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_state(MockState::default())
    }

    pub fn with_state(state: MockState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            info: TransportDeviceInfo {
                vid: device::VENDOR_ID,
                pid: device::PRODUCT_ID,
                transport_type: TransportType::Mock,
                device_path: "mock".to_string(),
                serial: None,
                product_name: Some("BlUSB (mock)".to_string()),
            },
        }
    }

    /// Run a closure against the controller state
    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock())
    }
}

impl Transport for MockTransport {
    fn request(
        &self,
        opcode: u8,
        payload: &[u8],
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError> {
        let mut state = self.state.lock();
        if state.disconnected {
            return Err(TransportError::Disconnected);
        }
        state.requests.push((opcode, payload.to_vec()));

        let mut reply = state.answer(opcode, payload)?;
        reply.resize(response_len, 0);
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
    fn test_matrix_reports_need_service_mode() {
        let mock = MockTransport::new();
        mock.with(|s| s.push_key(3, 4));

        let idle = mock.query(cmd::READ_MATRIX, sizes::SHORT_REPLY).unwrap();
        assert_eq!(idle[7], 0);

        mock.send(cmd::ENABLE_SERVICE_MODE, &[]).unwrap();
        let report = mock.query(cmd::READ_MATRIX, sizes::SHORT_REPLY).unwrap();
        assert_eq!(&report[..2], &[3, 4]);
        assert_eq!(report[7], 1);
    }

    #[test]
    fn test_reply_is_sized_to_request() {
        let mock = MockTransport::new();
        let reply = mock.query(cmd::READ_VERSION, 2).unwrap();
        assert_eq!(reply, vec![1, 5]);
    }

    #[test]
    fn test_clones_share_state() {
        let mock = MockTransport::new();
        let boxed: Box<dyn Transport> = Box::new(mock.clone());
        boxed.send(cmd::WRITE_DEBOUNCE, &[9]).unwrap();
        assert_eq!(mock.with(|s| s.debounce), 9);
        assert_eq!(mock.with(|s| s.opcodes()), vec![cmd::WRITE_DEBOUNCE]);
    }

    #[test]
    fn test_write_layout_widens_count() {
        let mock = MockTransport::new();
        mock.send(cmd::WRITE_LAYOUT, &[2, 0x34, 0x12]).unwrap();
        let image = mock.query(cmd::READ_LAYOUT, sizes::LAYOUT_BUFFER).unwrap();
        assert_eq!(&image[..4], &[2, 0, 0x34, 0x12]);
        assert_eq!(image.len(), sizes::LAYOUT_BUFFER);
    }

    #[test]
    fn test_disconnected() {
        let mock = MockTransport::new();
        mock.with(|s| s.disconnected = true);
        assert!(matches!(
            mock.query(cmd::READ_PWM, 8),
            Err(TransportError::Disconnected)
        ));
    }

    #[test]
    fn test_unknown_opcode() {
        let mock = MockTransport::new();
        assert!(matches!(
            mock.query(0xEE, 8),
            Err(TransportError::Unsupported(0xEE))
        ));
    }
}
