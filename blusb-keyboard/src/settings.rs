//! Keyboard settings types

use std::fmt;

use crate::error::KeyboardError;

/// Firmware version information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl FirmwareVersion {
    /// Parse from a READ_VERSION reply (byte 0 major, byte 1 minor)
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            [major, minor, ..] => Self {
                major: *major,
                minor: *minor,
            },
            _ => Self::default(),
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Backlight PWM duty for USB and Bluetooth power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pwm {
    pub usb: u8,
    pub bluetooth: u8,
}

impl Pwm {
    pub fn new(usb: u8, bluetooth: u8) -> Self {
        Self { usb, bluetooth }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            [usb, bluetooth, ..] => Self::new(*usb, *bluetooth),
            _ => Self::default(),
        }
    }

    /// 8-byte WRITE_PWM payload
    pub fn to_bytes(self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0] = self.usb;
        buf[1] = self.bluetooth;
        buf
    }
}

impl fmt::Display for Pwm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "USB: {}, BT: {}", self.usb, self.bluetooth)
    }
}

/// Debounce time in milliseconds, 1..=255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce(u8);

impl Debounce {
    pub fn new(ms: u8) -> Result<Self, KeyboardError> {
        if ms == 0 {
            return Err(KeyboardError::InvalidParameter(
                "debounce must be between 1 and 255 ms".into(),
            ));
        }
        Ok(Self(ms))
    }

    pub fn ms(self) -> u8 {
        self.0
    }

    /// 8-byte WRITE_DEBOUNCE payload
    pub fn to_bytes(self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0] = self.0;
        buf
    }
}

impl fmt::Display for Debounce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.0)
    }
}
