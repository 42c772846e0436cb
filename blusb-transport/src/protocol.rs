//! Protocol constants for BlUSB controller communication
//!
//! Every exchange is one vendor control transfer on endpoint 0: the opcode
//! goes in `bRequest`, `wValue` and `wIndex` are zero, and the payload or
//! reply is the data stage.

/// `bRequest` values understood by the controller firmware
pub mod cmd {
    pub const ENABLE_SERVICE_MODE: u8 = 0x01;
    pub const DISABLE_SERVICE_MODE: u8 = 0x02;
    pub const READ_MATRIX: u8 = 0x03;
    pub const READ_LAYOUT: u8 = 0x04;
    pub const WRITE_LAYOUT: u8 = 0x05;
    pub const READ_VERSION: u8 = 0x06;
    pub const READ_PWM: u8 = 0x07;
    pub const WRITE_PWM: u8 = 0x08;
    pub const READ_DEBOUNCE: u8 = 0x09;
    pub const WRITE_DEBOUNCE: u8 = 0x0A;
    pub const READ_MACROS: u8 = 0x0B;
    pub const WRITE_MACROS: u8 = 0x0C;

    /// Get command name for debugging
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            ENABLE_SERVICE_MODE => "ENABLE_SERVICE_MODE",
            DISABLE_SERVICE_MODE => "DISABLE_SERVICE_MODE",
            READ_MATRIX => "READ_MATRIX",
            READ_LAYOUT => "READ_LAYOUT",
            WRITE_LAYOUT => "WRITE_LAYOUT",
            READ_VERSION => "READ_VERSION",
            READ_PWM => "READ_PWM",
            WRITE_PWM => "WRITE_PWM",
            READ_DEBOUNCE => "READ_DEBOUNCE",
            WRITE_DEBOUNCE => "WRITE_DEBOUNCE",
            READ_MACROS => "READ_MACROS",
            WRITE_MACROS => "WRITE_MACROS",
            _ => "UNKNOWN",
        }
    }
}

/// USB identity of the controller
pub mod device {
    pub const VENDOR_ID: u16 = 0x04B3;
    pub const PRODUCT_ID: u16 = 0x301C;
}

/// Board geometry shared by the firmware and the host tools
pub mod geometry {
    /// Matrix rows per layer
    pub const ROWS: usize = 20;
    /// Matrix columns per layer
    pub const COLS: usize = 8;
    /// Keys per layer
    pub const KEYS_PER_LAYER: usize = ROWS * COLS;
    /// Layers the firmware can store
    pub const MAX_LAYERS: usize = 6;
    /// Macro slots
    pub const NUM_MACRO_KEYS: usize = 24;
    /// Bytes per macro: modifiers, reserved, six key codes
    pub const LEN_MACRO: usize = 8;
}

/// Reply sizes for each request
pub mod sizes {
    use super::geometry::{KEYS_PER_LAYER, LEN_MACRO, MAX_LAYERS, NUM_MACRO_KEYS};

    /// Layout reply: 16-bit layer count followed by the largest possible matrix
    pub const LAYOUT_BUFFER: usize = 2 + 2 * MAX_LAYERS * KEYS_PER_LAYER;
    /// Macro table, one byte per value
    pub const MACRO_BUFFER: usize = NUM_MACRO_KEYS * LEN_MACRO;
    /// Version, PWM, debounce and matrix position replies
    pub const SHORT_REPLY: usize = 8;
}

pub mod timing {
    /// Upper bound for a single control transfer (ms)
    pub const REQUEST_TIMEOUT_MS: u64 = 1000;
    /// Wait after opening the device before enabling service mode (ms)
    pub const SERVICE_MODE_SETTLE_MS: u64 = 100;
}

/// Largest data stage of one control transfer (`wLength` is 16 bits)
pub const MAX_TRANSFER: usize = u16::MAX as usize;

/// Recipient field of a vendor request's SETUP packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Interface,
    Endpoint,
}

/// The firmware expects the bulk layout and macro transfers addressed to the
/// endpoint and every short request addressed to the interface.
pub fn target(opcode: u8) -> Target {
    match opcode {
        cmd::READ_LAYOUT | cmd::WRITE_LAYOUT | cmd::READ_MACROS | cmd::WRITE_MACROS => {
            Target::Endpoint
        }
        _ => Target::Interface,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_buffer_size() {
        assert_eq!(sizes::LAYOUT_BUFFER, 1922);
        assert_eq!(sizes::MACRO_BUFFER, 192);
    }

    #[test]
    fn test_request_targets() {
        assert_eq!(target(cmd::READ_LAYOUT), Target::Endpoint);
        assert_eq!(target(cmd::WRITE_MACROS), Target::Endpoint);
        assert_eq!(target(cmd::READ_MATRIX), Target::Interface);
        assert_eq!(target(cmd::ENABLE_SERVICE_MODE), Target::Interface);
        assert_eq!(target(cmd::WRITE_DEBOUNCE), Target::Interface);
    }

    #[test]
    fn test_cmd_names() {
        assert_eq!(cmd::name(cmd::READ_LAYOUT), "READ_LAYOUT");
        assert_eq!(cmd::name(0xEE), "UNKNOWN");
    }
}
